//! In-memory memoization of gateway results and rendered previews.
//!
//! Both caches live on the UI loop and are only written there. Background tasks
//! return results; the controller decides whether to store them.
//!
//! - [`RecordCache`]: package name to its records, valid for one channel and
//!   platform selection.
//! - [`DetailCache`]: preview key to rendered text, additionally tied to the
//!   content width the text was wrapped for.

pub mod details;
pub mod records;

pub use details::DetailCache;
pub use records::RecordCache;
