//! Domain layer for the conda metadata browser.
//!
//! This module contains the core types of the browser, independent of the terminal,
//! the network and the async runtime.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`platform`]: Conda subdir identifiers and default selection rules
//! - [`version`]: Conda version ordering
//! - [`record`]: Metadata records and artifact identity
//! - [`artifact`]: Deduplicated, ordered artifact listings

pub mod artifact;
pub mod error;
pub mod platform;
pub mod record;
pub mod version;

pub use artifact::{compare_subdirs, sort_records_descending, ArtifactSet, SubdirGroup};
pub use error::{BrowseError, Result};
pub use platform::{reconcile_platforms, recommended_platforms, summarize_platforms, Platform};
pub use record::{ArtifactKey, NoArchKind, Record};
pub use version::PackageVersion;
