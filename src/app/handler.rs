//! Event handling and state transition logic.
//!
//! [`handle_event`] is the only entry point the runtime loop uses to change
//! controller state. It pattern-matches the event, calls the matching
//! [`ControllerState`] method and returns whether the screen needs a redraw
//! together with the actions to execute.
//!
//! # Event Types
//!
//! - **Navigation**: `MoveDown`, `MoveUp`, `PageDown`, `PageUp`, `Home`, `End`
//! - **Input**: `Char`, `Backspace`, `Paste`, `Select`, `Back`
//! - **Commands**: `StartFilter`, `EditChannel`, `OpenPlatforms`, `TogglePlatform`,
//!   `ToggleAllPlatforms`, `Download`, `Quit`
//! - **System**: `Resize`, `Tick`
//! - **Worker**: `WorkerResponse` with typed message variants
//!
//! # Example
//!
//! ```rust
//! use conda_browse::app::{handle_event, ControllerState, Event};
//! use conda_browse::ui::theme::Theme;
//! use conda_browse::Config;
//!
//! let mut state = ControllerState::new(&Config::default(), Theme::default());
//! let (redraw, actions) = handle_event(&mut state, &Event::MoveDown)?;
//! assert!(actions.is_empty());
//! # let _ = redraw;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::app::modes::{InputMode, Mode};
use crate::app::{Action, ControllerState};
use crate::domain::error::Result;
use crate::worker::WorkerResponse;
use chrono::Utc;

/// Events triggered by user input, the terminal, timers or worker responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Moves the highlight down by one row.
    MoveDown,
    /// Moves the highlight up by one row.
    MoveUp,
    /// Moves the highlight down by one page.
    PageDown,
    /// Moves the highlight up by one page.
    PageUp,
    /// Jumps to the first row.
    Home,
    /// Jumps to the last row.
    End,

    /// Enter: open, toggle, apply or confirm depending on mode.
    Select,
    /// Esc: cancel the edit, leave the sub-view or exit the filter.
    Back,
    /// Leaves the browser.
    Quit,

    /// Enters filter mode with an empty query.
    StartFilter,
    /// Starts typing a channel name.
    EditChannel,
    /// Opens the platform selector.
    OpenPlatforms,
    /// Toggles the highlighted platform.
    TogglePlatform,
    /// Selects all platforms or the recommended defaults.
    ToggleAllPlatforms,
    /// Downloads the highlighted artifact.
    Download,

    /// Appends a character to the active text input.
    Char(char),
    /// Removes the last character of the active text input.
    Backspace,
    /// Bracketed paste into the active text input.
    Paste(String),

    /// The terminal was resized.
    Resize {
        width: u16,
        height: u16,
    },

    /// Periodic timer driving notification expiry.
    Tick,

    /// Wraps a response from a background task.
    WorkerResponse(WorkerResponse),
}

/// Processes an event, mutates controller state and returns whether to redraw
/// along with the actions to execute.
///
/// # Errors
///
/// Returns errors from state transitions. None of the current transitions fail,
/// the signature leaves room for ones that do.
#[allow(clippy::too_many_lines)]
pub fn handle_event(state: &mut ControllerState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = ?EventKind(event)).entered();

    if state.loading && blocked_while_loading(event) {
        tracing::trace!("ignoring input while catalog loads");
        return Ok((false, vec![]));
    }

    let page = isize::try_from(state.viewport_rows.max(1)).unwrap_or(isize::MAX);

    match event {
        Event::MoveDown => Ok((true, state.move_highlight(1))),
        Event::MoveUp => Ok((true, state.move_highlight(-1))),
        Event::PageDown => Ok((true, state.move_highlight(page))),
        Event::PageUp => Ok((true, state.move_highlight(-page))),
        Event::Home => Ok((true, state.jump(false))),
        Event::End => Ok((true, state.jump(true))),
        Event::Quit => {
            tracing::debug!("quit requested");
            state.should_quit = true;
            Ok((false, vec![Action::Quit]))
        }
        Event::Select => match state.input_mode() {
            InputMode::ChannelEdit => Ok((true, state.confirm_channel_edit())),
            InputMode::Filter | InputMode::Normal => Ok((true, state.select())),
        },
        Event::Back => {
            if state.input_mode() == InputMode::ChannelEdit {
                state.cancel_channel_edit();
                return Ok((true, vec![]));
            }
            match state.mode {
                Mode::Versions | Mode::Platforms => Ok((true, state.back_to_packages())),
                Mode::Packages if state.filter_active => Ok((true, state.exit_filter())),
                Mode::Packages => Ok((false, vec![])),
            }
        }
        Event::StartFilter => Ok((true, state.start_filter())),
        Event::EditChannel => {
            state.begin_channel_edit();
            Ok((true, vec![]))
        }
        Event::OpenPlatforms => {
            state.open_platforms();
            Ok((true, vec![]))
        }
        Event::TogglePlatform => {
            if state.mode != Mode::Platforms {
                return Ok((false, vec![]));
            }
            state.toggle_platform();
            Ok((true, vec![]))
        }
        Event::ToggleAllPlatforms => {
            if state.mode != Mode::Platforms {
                return Ok((false, vec![]));
            }
            state.toggle_all_platforms();
            Ok((true, vec![]))
        }
        Event::Download => Ok((true, state.request_download())),
        Event::Char(c) => {
            tracing::trace!(char = %c, input_mode = ?state.input_mode(), "text input");
            Ok((true, state.insert_text(c.encode_utf8(&mut [0; 4]))))
        }
        Event::Backspace => Ok((true, state.delete_char())),
        Event::Paste(text) => {
            let text: String = text.chars().filter(|c| *c != '\r' && *c != '\n').collect();
            Ok((true, state.insert_text(&text)))
        }
        Event::Resize { width, height } => Ok((true, state.resize(*width, *height))),
        Event::Tick => Ok((state.expire_notification(Utc::now()), vec![])),
        Event::WorkerResponse(response) => Ok((true, handle_worker_response(state, response.clone()))),
    }
}

const fn blocked_while_loading(event: &Event) -> bool {
    !matches!(
        event,
        Event::Quit | Event::Resize { .. } | Event::Tick | Event::WorkerResponse(_)
    )
}

fn handle_worker_response(state: &mut ControllerState, response: WorkerResponse) -> Vec<Action> {
    match response {
        WorkerResponse::CatalogLoaded {
            ticket,
            channel,
            result,
        } => state.on_catalog_loaded(&ticket, &channel, result),
        WorkerResponse::RecordsLoaded {
            ticket,
            package,
            purpose,
            result,
        } => state.on_records_loaded(&ticket, &package, purpose, result),
        WorkerResponse::DownloadFinished {
            file_name, result, ..
        } => {
            state.on_download_finished(&file_name, result);
            vec![]
        }
    }
}

/// Short event name for span fields; worker payloads can be large.
struct EventKind<'a>(&'a Event);

impl std::fmt::Debug for EventKind<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Event::WorkerResponse(WorkerResponse::CatalogLoaded { .. }) => f.write_str("CatalogLoaded"),
            Event::WorkerResponse(WorkerResponse::RecordsLoaded { package, .. }) => {
                write!(f, "RecordsLoaded({package})")
            }
            Event::WorkerResponse(WorkerResponse::DownloadFinished { .. }) => f.write_str("DownloadFinished"),
            Event::Paste(text) => write!(f, "Paste({} chars)", text.chars().count()),
            other => write!(f, "{other:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::theme::Theme;
    use crate::Config;

    fn state() -> ControllerState {
        ControllerState::new(&Config::default(), Theme::default())
    }

    #[test]
    fn quit_sets_flag_and_emits_action() {
        let mut state = state();
        let (redraw, actions) = handle_event(&mut state, &Event::Quit).unwrap();
        assert!(!redraw);
        assert_eq!(actions, vec![Action::Quit]);
        assert!(state.should_quit);
    }

    #[test]
    fn input_is_ignored_while_loading() {
        let mut state = state();
        state.start();
        assert!(state.loading);

        let (redraw, actions) = handle_event(&mut state, &Event::StartFilter).unwrap();
        assert!(!redraw);
        assert!(actions.is_empty());
        assert!(!state.filter_active);
    }

    #[test]
    fn paste_strips_line_breaks_in_channel_edit() {
        let mut state = state();
        handle_event(&mut state, &Event::EditChannel).unwrap();
        handle_event(&mut state, &Event::Paste("bio\r\nconda\n".to_string())).unwrap();
        assert_eq!(state.channel_draft.as_deref(), Some("bioconda"));
    }

    #[test]
    fn back_cancels_channel_edit_first() {
        let mut state = state();
        handle_event(&mut state, &Event::EditChannel).unwrap();
        handle_event(&mut state, &Event::Char('x')).unwrap();
        handle_event(&mut state, &Event::Back).unwrap();
        assert_eq!(state.channel_draft, None);
        assert_eq!(state.channel, "conda-forge");
    }

    #[test]
    fn empty_channel_draft_warns_and_stays_in_edit() {
        let mut state = state();
        handle_event(&mut state, &Event::EditChannel).unwrap();
        let (_, actions) = handle_event(&mut state, &Event::Select).unwrap();

        assert!(actions.is_empty());
        assert_eq!(state.input_mode(), InputMode::ChannelEdit);
        let notification = state.notification.as_ref().unwrap();
        assert_eq!(notification.message, "Channel cannot be empty.");
    }

    #[test]
    fn tick_only_redraws_when_a_notification_expires() {
        let mut state = state();
        let (redraw, _) = handle_event(&mut state, &Event::Tick).unwrap();
        assert!(!redraw);

        state.notify(crate::app::Severity::Information, "Test", "hello");
        if let Some(notification) = &mut state.notification {
            notification.raised_at -= chrono::Duration::seconds(10);
        }
        let (redraw, _) = handle_event(&mut state, &Event::Tick).unwrap();
        assert!(redraw);
        assert!(state.notification.is_none());
    }
}
