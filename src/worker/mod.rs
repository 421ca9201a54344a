//! Background tasks for gateway queries and artifact downloads.
//!
//! - `messages`: request/response protocol with ticket and trace propagation
//! - `handler`: [`CatalogWorker`], which runs each message in its own task
//! - `download`: atomic, cancel-safe file transfer

pub mod download;
pub mod handler;
pub mod messages;

pub use handler::{flatten_records, CatalogWorker};
pub use messages::{CatalogPayload, RecordsPurpose, TraceContext, WorkerMessage, WorkerResponse};
