//! User interface rendering layer with component-based architecture.
//!
//! The UI turns controller state into ratatui widgets through view models and
//! composable components. It also owns the plain-text rendering of package
//! previews and artifact details, which the controller caches.
//!
//! # Architecture
//!
//! ```text
//! ControllerState → compute_viewmodel → UIViewModel → components → Frame
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: View model types representing renderable UI state
//! - [`renderer`]: Top-level rendering coordinator
//! - [`components`]: Composable UI component renderers
//! - [`layout`]: Screen geometry shared with the controller
//! - [`detail`]: Plain-text package previews and artifact details
//! - [`helpers`]: Shared rendering utilities (highlighting, formatting)
//! - [`theme`]: Color scheme definitions and ratatui styles

pub mod components;
pub mod detail;
pub mod helpers;
pub mod layout;
pub mod renderer;
pub mod theme;
pub mod viewmodel;

pub use renderer::render;
pub use theme::Theme;
pub use viewmodel::{DisplayItem, Indicator, UIViewModel};
