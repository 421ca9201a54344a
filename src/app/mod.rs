//! Controller layer: state, events and actions.
//!
//! Data flows one way:
//!
//! ```text
//! Terminal input → Event → handle_event → state mutations → Actions → worker tasks
//!                             ↑                                           ↓
//!                             └────────────── WorkerResponse ─────────────┘
//! ```
//!
//! - [`actions`]: side effects returned by the handler
//! - [`handler`]: maps events onto state transitions
//! - [`keys`]: keyboard bindings
//! - [`modes`]: browser mode and text input routing
//! - [`state`]: the controller aggregate
//! - [`preview`] and [`streams`]: latest-request-wins bookkeeping for the detail pane
//! - [`search`]: fuzzy ranking of package names
//! - [`rows`]: grouped, collapsible version rows
//! - [`platforms`]: platform selection draft
//! - [`download`]: single-flight download decisions
//! - [`snapshot`]: rollback point for failed reloads

pub mod actions;
pub mod download;
pub mod handler;
pub mod keys;
pub mod modes;
pub mod platforms;
pub mod preview;
pub mod rows;
pub mod search;
pub mod snapshot;
pub mod state;
pub mod streams;

pub use actions::Action;
pub use handler::{handle_event, Event};
pub use keys::map_key_event;
pub use modes::{InputMode, Mode};
pub use state::{ControllerState, Notification, Severity};
