//! Side effects requested by the event handler.
//!
//! State methods never perform I/O. They return [`Action`]s, and the runtime loop
//! in `main.rs` executes them after the event has been handled.

use crate::worker::WorkerMessage;

/// Commands executed by the runtime loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Leaves the browser and restores the terminal.
    Quit,

    /// Spawns a background task for the message.
    ///
    /// The task answers with a [`crate::worker::WorkerResponse`] that comes back in
    /// as [`crate::app::Event::WorkerResponse`].
    PostToWorker(WorkerMessage),
}
