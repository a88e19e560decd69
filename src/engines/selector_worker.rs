//! Background move selection.
//!
//! The worker owns a `MoveSelector` on a dedicated thread. Requests go in
//! over one channel and results come back as `SelectionEvent`s over another,
//! so the caller never blocks on a search. A request is superseded by the
//! next one: late events stay readable but `is_current` reports them stale.
//! Release raises a shared shutdown flag first, so queued requests are
//! dropped unsearched and a running search returns early.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, info};

use crate::engines::engine_trait::Difficulty;
use crate::engines::move_selector::MoveSelector;
use crate::game_state::chess_errors::{ChessError, ChessResult};
use crate::game_state::{chess_types::Move, game_state::GameState};

/// Result of one `request_move`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionEvent {
    pub request_id: u64,
    pub difficulty: Difficulty,
    pub result: ChessResult<Move>,
}

enum WorkerCommand {
    Select {
        request_id: u64,
        game_state: GameState,
        difficulty: Difficulty,
    },
    Shutdown,
}

pub struct SelectorWorker {
    commands: Option<Sender<WorkerCommand>>,
    events: Receiver<SelectionEvent>,
    handle: Option<JoinHandle<()>>,
    shutdown: Arc<AtomicBool>,
    next_request_id: u64,
    current_request: Option<u64>,
}

impl SelectorWorker {
    pub fn spawn(selector: MoveSelector) -> Self {
        let (command_tx, command_rx) = mpsc::channel::<WorkerCommand>();
        let (event_tx, event_rx) = mpsc::channel::<SelectionEvent>();
        let shutdown = Arc::new(AtomicBool::new(false));
        let selector = selector.with_stop_signal(Arc::clone(&shutdown));
        let worker_shutdown = Arc::clone(&shutdown);
        let handle =
            thread::spawn(move || run_worker(selector, command_rx, event_tx, worker_shutdown));
        info!("selector worker spawned");

        Self {
            commands: Some(command_tx),
            events: event_rx,
            handle: Some(handle),
            shutdown,
            next_request_id: 1,
            current_request: None,
        }
    }

    /// Queue a selection for a snapshot of `game_state` and return its id.
    pub fn request_move(
        &mut self,
        game_state: &GameState,
        difficulty: Difficulty,
    ) -> ChessResult<u64> {
        let commands = self.commands.as_ref().ok_or(ChessError::EngineClosed)?;
        let request_id = self.next_request_id;
        let command = WorkerCommand::Select {
            request_id,
            game_state: game_state.clone(),
            difficulty,
        };
        if commands.send(command).is_err() {
            // The worker thread is gone; nothing further can be served.
            self.commands = None;
            return Err(ChessError::EngineClosed);
        }

        self.next_request_id += 1;
        self.current_request = Some(request_id);
        debug!(request_id, %difficulty, "move requested");
        Ok(request_id)
    }

    /// Next finished event, if any, without blocking.
    pub fn try_next_event(&self) -> Option<SelectionEvent> {
        match self.events.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Wait up to `timeout` for the next event. Expiry yields `None`.
    pub fn next_event_timeout(&self, timeout: Duration) -> Option<SelectionEvent> {
        match self.events.recv_timeout(timeout) {
            Ok(event) => Some(event),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }

    /// True when `event` answers the most recent request that was not cancelled.
    pub fn is_current(&self, event: &SelectionEvent) -> bool {
        self.current_request == Some(event.request_id)
    }

    /// Mark the outstanding request stale; its event will not be current.
    pub fn cancel(&mut self) {
        self.current_request = None;
    }

    pub fn is_released(&self) -> bool {
        self.commands.is_none()
    }

    /// Stop the worker thread and release its selector. Idempotent.
    ///
    /// Waits at most for the node in progress: queued requests are skipped
    /// and a running search stops at its next check.
    pub fn release(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
        if let Some(commands) = self.commands.take() {
            let _ = commands.send(WorkerCommand::Shutdown);
        }
        self.current_request = None;
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                debug!("selector worker panicked before shutdown");
            }
            info!("selector worker released");
        }
    }
}

impl Drop for SelectorWorker {
    fn drop(&mut self) {
        self.release();
    }
}

fn run_worker(
    mut selector: MoveSelector,
    commands: Receiver<WorkerCommand>,
    events: Sender<SelectionEvent>,
    shutdown: Arc<AtomicBool>,
) {
    while let Ok(command) = commands.recv() {
        if shutdown.load(Ordering::SeqCst) {
            break;
        }
        match command {
            WorkerCommand::Select {
                request_id,
                game_state,
                difficulty,
            } => {
                let result = selector.select_move(&game_state, difficulty);
                debug!(request_id, ok = result.is_ok(), "selection finished");
                let event = SelectionEvent {
                    request_id,
                    difficulty,
                    result,
                };
                if events.send(event).is_err() {
                    break;
                }
            }
            WorkerCommand::Shutdown => break,
        }
    }
    // Unwinding out of the loop still releases through `MoveSelector::drop`.
    selector.release();
}
