//! Composable UI component renderers.
//!
//! Each component draws one area of the screen from its slice of the view model.
//!
//! # Components
//!
//! - [`indicators`]: channel, platform summary, filter query and download badges
//! - [`list`]: packages, versions or platforms
//! - [`status`]: status text below the list
//! - [`pane`]: detail text
//! - [`notification`]: transient message over the detail pane
//! - [`footer`]: key hints

pub mod footer;
pub mod indicators;
pub mod list;
pub mod notification;
pub mod pane;
pub mod status;

pub use footer::render_footer;
pub use indicators::render_indicators;
pub use list::render_list;
pub use notification::render_notification;
pub use pane::render_detail;
pub use status::render_status;
