//! Metadata gateway: where channel catalogs come from.
//!
//! # Modules
//!
//! - `backend`: the [`MetadataGateway`] trait the worker talks to
//! - `repodata`: HTTP implementation over `repodata.json`
//! - `memory`: fixed in-memory catalogs
//! - `models`: `repodata.json` wire types

pub mod backend;
pub mod memory;
pub mod models;
pub mod repodata;

pub use backend::MetadataGateway;
pub use memory::MemoryGateway;
pub use repodata::{RepodataGateway, DEFAULT_BASE_URL};
