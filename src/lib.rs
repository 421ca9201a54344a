//! conda-browse: a terminal browser for conda channel metadata.
//!
//! conda-browse lets you explore a conda channel from the terminal:
//! - Fuzzy-filterable list of every package name in the selected platforms
//! - Package previews and full per-artifact metadata in a detail pane
//! - Versions grouped by platform subdir, with collapsible sections
//! - Platform selection with rollback when a reload fails
//! - Channel switching at runtime
//! - Single-flight artifact downloads with atomic writes

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! The crate follows a layered architecture pattern:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Terminal loop (main.rs)                            │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Event handling                                   │  ← Stale-result gating
//! │  - Action dispatching                               │
//! │  - Preview coordination                             │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ Cache Layer   │   │ Worker Layer  │
//! │ (ui/)         │   │ (cache/)      │   │ (worker/)     │
//! │ - Rendering   │   │ - Records     │   │ - Async tasks │
//! │ - Theming     │   │ - Details     │   │ - Downloads   │
//! │ - Components  │   │               │   │               │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!                                                   │
//!                                         ┌───────────────┐
//!                                         │ Gateway       │
//!                                         │ (gateway/)    │
//!                                         │ - Repodata    │
//!                                         │ - In-memory   │
//!                                         └───────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Infrastructure & Domain Layers                     │
//! │  - Platform paths (infrastructure/)                 │
//! │  - Error types (domain/error)                       │
//! │  - Records, versions, platforms (domain/)           │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │
//! │  - tracing subscriber writing a rotating log file   │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Controller state machine with event/action model
//! - [`domain`]: Core domain types (records, versions, platforms, errors)
//! - [`cache`]: Record and rendered-detail caches
//! - [`gateway`]: Metadata gateway trait, HTTP repodata and in-memory implementations
//! - [`worker`]: Background task handling gateway queries and downloads
//! - [`ui`]: Terminal rendering with theme support
//! - [`infrastructure`]: Platform-specific utilities (paths)
//! - [`observability`]: File-based tracing
//!
//! # Initialization Flow
//!
//! 1. **Startup** (`main.rs`): parse CLI arguments into [`Config`], initialize
//!    tracing, create the controller with [`initialize`]
//! 2. **Catalog load**: the worker discovers platforms, reconciles the requested
//!    selection and lists package names
//! 3. **Browsing**: key events become [`Event`]s, [`handle_event`] mutates state
//!    and returns [`Action`]s, which post messages to the worker
//! 4. **Results**: worker responses come back as [`Event::WorkerResponse`] and are
//!    dropped when a newer request of the same kind was issued meanwhile
//!
//! # Example
//!
//! ```rust
//! use conda_browse::{handle_event, initialize, Action, Config, Event};
//!
//! let (mut state, actions) = initialize(&Config::default());
//! assert!(matches!(actions.as_slice(), [Action::PostToWorker(_)]));
//!
//! // Input is ignored until the catalog arrives.
//! let (redraw, actions) = handle_event(&mut state, &Event::MoveDown)?;
//! assert!(!redraw && actions.is_empty());
//! # Ok::<(), conda_browse::BrowseError>(())
//! ```
//!
//! # Key Design Decisions
//!
//! ## Tickets Instead of Cancellation
//!
//! Background requests are never cancelled. Each carries a ticket from its
//! stream; a result is applied only while its ticket is still the latest of the
//! stream and belongs to the current catalog generation.
//!
//! ## Immutable View Models
//!
//! Rendering goes through view models computed per frame, covering only the
//! visible rows of the list.

pub mod app;
pub mod cache;
pub mod domain;
pub mod gateway;
pub mod infrastructure;
pub mod worker;

pub mod ui;

pub mod observability;

pub use app::{handle_event, Action, ControllerState, Event, InputMode, Mode};
pub use domain::{BrowseError, Platform, Result};
pub use ui::Theme;

use std::path::PathBuf;
use std::time::Duration;

/// Default channel browsed at startup.
pub const DEFAULT_CHANNEL: &str = "conda-forge";

/// Browser configuration, built from command line arguments.
#[derive(Debug, Clone)]
pub struct Config {
    /// Channel name browsed at startup. Default: `conda-forge`
    pub channel: String,

    /// Platforms requested at startup.
    ///
    /// Intersected with the platforms the channel provides; empty (or an empty
    /// intersection) means the recommended defaults.
    pub platforms: Vec<Platform>,

    /// Tracing filter directive for the log file.
    ///
    /// Options: `trace`, `debug`, `info`, `warn`, `error`, or a full
    /// `EnvFilter` directive. Default: `"info"`
    pub trace_level: String,

    /// Built-in theme name or path to a TOML theme file.
    ///
    /// Built-ins: `rose-pine`, `rose-pine-dawn`. See [`ui::theme`] for the format.
    pub theme_name: String,

    /// Directory downloads are written to. Default: the working directory
    pub download_dir: PathBuf,

    /// Idle timeout for HTTP requests and download chunks. Default: 60 s
    pub download_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            channel: DEFAULT_CHANNEL.to_string(),
            platforms: Vec::new(),
            trace_level: "info".to_string(),
            theme_name: ui::theme::DEFAULT_THEME.to_string(),
            download_dir: infrastructure::default_download_dir(),
            download_timeout: Duration::from_secs(60),
        }
    }
}

/// Creates the controller for `config` and issues the initial catalog load.
///
/// The returned actions must be executed by the caller; nothing is fetched until
/// they are.
pub fn initialize(config: &Config) -> (ControllerState, Vec<Action>) {
    tracing::debug!(channel = %config.channel, theme = %config.theme_name, "initializing browser");

    let theme = Theme::resolve(&config.theme_name);
    let mut state = ControllerState::new(config, theme);
    let actions = state.start();
    (state, actions)
}
