//! File-based logging for a full-screen terminal application.
//!
//! Anything written to stdout or stderr would corrupt the UI, so `tracing`
//! events are formatted by `tracing-subscriber` and appended to a rotating log
//! file under the user data directory:
//!
//! ```text
//! tracing macros → EnvFilter → fmt layer → FileWriter → conda-browse.log
//! ```
//!
//! # Modules
//!
//! - [`init`]: subscriber setup
//! - [`file_writer`]: rotating file writer with size-based rotation

pub mod file_writer;
pub mod init;

pub use file_writer::FileWriter;
pub use init::{init_tracing, LOG_FILE_NAME};
