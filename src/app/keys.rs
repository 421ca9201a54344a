//! Keyboard mapping from crossterm key events to controller events.
//!
//! Global (all modes):
//! - `Ctrl+c`: quit
//! - `Ctrl+n`/`Ctrl+p`: move down/up
//!
//! Normal input:
//! - `j`/`Down`, `k`/`Up`, `PageDown`, `PageUp`, `g`/`Home`, `G`/`End`: navigate
//! - `Enter`: select, `Esc`: back, `q`: quit
//! - `f` or `/`: filter, `c`: channel, `p`: platforms
//! - `Space`: toggle platform, `a`: toggle all platforms, `d`: download
//!
//! Filter input: arrows and paging navigate, every printable key is typed.
//!
//! Channel edit: `Enter` confirms, `Esc` cancels, printable keys are typed.

use crate::app::modes::InputMode;
use crate::app::Event;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Maps a key press to a controller event. Returns `None` for keys without a
/// binding and for key releases.
#[must_use]
pub fn map_key_event(key: &KeyEvent, input_mode: InputMode) -> Option<Event> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Event::Quit),
            KeyCode::Char('n') if input_mode != InputMode::ChannelEdit => Some(Event::MoveDown),
            KeyCode::Char('p') if input_mode != InputMode::ChannelEdit => Some(Event::MoveUp),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Enter => return Some(Event::Select),
        KeyCode::Esc => return Some(Event::Back),
        KeyCode::Backspace => return Some(Event::Backspace),
        _ => {}
    }

    match input_mode {
        InputMode::ChannelEdit => match key.code {
            KeyCode::Char(c) => Some(Event::Char(c)),
            _ => None,
        },
        InputMode::Filter => match key.code {
            KeyCode::Char(c) => Some(Event::Char(c)),
            code => navigation(code),
        },
        InputMode::Normal => match key.code {
            KeyCode::Char('j') => Some(Event::MoveDown),
            KeyCode::Char('k') => Some(Event::MoveUp),
            KeyCode::Char('g') => Some(Event::Home),
            KeyCode::Char('G') => Some(Event::End),
            KeyCode::Char('q') => Some(Event::Quit),
            KeyCode::Char('f' | '/') => Some(Event::StartFilter),
            KeyCode::Char('c') => Some(Event::EditChannel),
            KeyCode::Char('p') => Some(Event::OpenPlatforms),
            KeyCode::Char(' ') => Some(Event::TogglePlatform),
            KeyCode::Char('a') => Some(Event::ToggleAllPlatforms),
            KeyCode::Char('d') => Some(Event::Download),
            code => navigation(code),
        },
    }
}

const fn navigation(code: KeyCode) -> Option<Event> {
    match code {
        KeyCode::Down => Some(Event::MoveDown),
        KeyCode::Up => Some(Event::MoveUp),
        KeyCode::PageDown => Some(Event::PageDown),
        KeyCode::PageUp => Some(Event::PageUp),
        KeyCode::Home => Some(Event::Home),
        KeyCode::End => Some(Event::End),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn normal_mode_keys_are_commands() {
        let cases = [
            ('f', Event::StartFilter),
            ('/', Event::StartFilter),
            ('c', Event::EditChannel),
            ('p', Event::OpenPlatforms),
            ('q', Event::Quit),
            (' ', Event::TogglePlatform),
            ('a', Event::ToggleAllPlatforms),
            ('d', Event::Download),
            ('j', Event::MoveDown),
        ];
        for (c, expected) in cases {
            assert_eq!(map_key_event(&press(KeyCode::Char(c)), InputMode::Normal), Some(expected));
        }
    }

    #[test]
    fn filter_mode_types_command_letters() {
        for c in ['f', 'p', 'c', '/', 'q', 'a', 'd', ' ', 'j'] {
            assert_eq!(
                map_key_event(&press(KeyCode::Char(c)), InputMode::Filter),
                Some(Event::Char(c))
            );
        }
        assert_eq!(map_key_event(&press(KeyCode::Down), InputMode::Filter), Some(Event::MoveDown));
        assert_eq!(map_key_event(&press(KeyCode::Enter), InputMode::Filter), Some(Event::Select));
    }

    #[test]
    fn channel_edit_ignores_navigation() {
        assert_eq!(map_key_event(&press(KeyCode::Down), InputMode::ChannelEdit), None);
        assert_eq!(
            map_key_event(&press(KeyCode::Char('q')), InputMode::ChannelEdit),
            Some(Event::Char('q'))
        );
    }

    #[test]
    fn ctrl_c_always_quits() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        for mode in [InputMode::Normal, InputMode::Filter, InputMode::ChannelEdit] {
            assert_eq!(map_key_event(&key, mode), Some(Event::Quit));
        }
    }

    #[test]
    fn releases_are_ignored() {
        let mut key = press(KeyCode::Char('q'));
        key.kind = KeyEventKind::Release;
        assert_eq!(map_key_event(&key, InputMode::Normal), None);
    }
}
