//! Top-level rendering coordinator.
//!
//! Rendering is a two-step process:
//!
//! 1. **View model computation**: [`ControllerState`] becomes a [`UIViewModel`]
//! 2. **Component rendering**: each screen area is drawn by its component

use crate::app::ControllerState;
use crate::ui::components;
use crate::ui::layout;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::UIViewModel;
use ratatui::Frame;

/// Draws the whole browser into `frame`.
pub fn render(frame: &mut Frame, state: &ControllerState) {
    let viewmodel = state.compute_viewmodel();
    render_viewmodel(frame, &viewmodel, &state.theme);
}

fn render_viewmodel(frame: &mut Frame, vm: &UIViewModel, theme: &Theme) {
    let areas = layout::split(frame.area());

    components::render_indicators(frame, areas.indicators, &vm.indicators, theme);
    components::render_list(frame, areas.list, &vm.list, theme);
    components::render_status(frame, areas.status, &vm.status, theme);
    components::render_detail(frame, areas.detail, &vm.detail, theme);
    components::render_footer(frame, areas.footer, &vm.footer, theme);

    if let Some(notification) = &vm.notification {
        components::render_notification(frame, areas.detail, notification, theme);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::Catalog;
    use crate::app::Severity;
    use crate::domain::Platform;
    use crate::Config;
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;
    use ratatui::Terminal;

    fn screen_text(buffer: &Buffer) -> String {
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn draws_list_status_and_notification() {
        let mut state = ControllerState::new(&Config::default(), Theme::default());
        state.catalog = Catalog {
            available: vec![Platform::NoArch],
            selected: [Platform::NoArch].into_iter().collect(),
            names: vec!["numpy".to_string(), "pandas".to_string()],
        };
        state.resize(100, 30);
        state.apply_filter(None);
        state.notify(Severity::Error, "Channel", "Failed to load channel: nope");

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| render(frame, &state)).unwrap();
        let text = screen_text(terminal.backend().buffer());

        assert!(text.contains("Packages (2)"));
        assert!(text.contains("numpy"));
        assert!(text.contains("2 packages in selection."));
        assert!(text.contains("Failed to load channel"));
        assert!(text.contains("conda-forge"));
    }

    #[test]
    fn survives_tiny_terminal() {
        let state = ControllerState::new(&Config::default(), Theme::default());
        let mut terminal = Terminal::new(TestBackend::new(5, 3)).unwrap();
        terminal.draw(|frame| render(frame, &state)).unwrap();
    }
}
