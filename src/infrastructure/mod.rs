//! Infrastructure layer for filesystem and environment interactions.

pub mod paths;

pub use paths::{default_download_dir, get_data_dir};
