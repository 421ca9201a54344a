//! Mode definitions for the browser state machine.
//!
//! The browser is always in exactly one [`Mode`]. `Packages` is the hub: both
//! `Versions` and `Platforms` are entered from it and always return to it.
//! [`InputMode`] is orthogonal and decides how printable keys are interpreted.

/// Which dataset the list widget shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Package names of the current channel, optionally filtered.
    #[default]
    Packages,
    /// Artifacts of one package, grouped by subdir.
    Versions,
    /// Platform selection editor.
    Platforms,
}

/// How text input is routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Keys are commands.
    #[default]
    Normal,
    /// Printable keys extend the package filter query.
    Filter,
    /// Printable keys extend the channel name draft.
    ChannelEdit,
}
