use crossterm::event::KeyCode;
use ratatui::layout::{Constraint, Layout};
use ratatui::prelude::{Frame, Rect};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    StatusBar, StatusBarHint, StatusBarProps, StatusBarSection, StatusBarStyle,
};

use super::{Component, PanelBody, PanelBodyProps};
use crate::action::Action;
use crate::state::{AppState, Metric};

/// Props for WeatherPanel - read-only view of state
pub struct WeatherPanelProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

/// The whole widget: body plus key hints
#[derive(Default)]
pub struct WeatherPanel;

fn select_neighbour(state: &AppState, offset: isize) -> Action {
    let next = state.registry.neighbour(&state.selection.name, offset);
    Action::LocationSelect(next.name.clone())
}

fn toggle(state: &AppState, metric: Metric) -> Action {
    Action::DisplayToggle {
        metric: metric.id().to_string(),
        visible: !state.preferences.is_visible(metric),
    }
}

impl Component<Action> for WeatherPanel {
    type Props<'a> = WeatherPanelProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }

        let state = props.state;
        match event {
            EventKind::Key(key) => match key.code {
                KeyCode::Up | KeyCode::Char('k') => Some(select_neighbour(state, -1)),
                KeyCode::Down | KeyCode::Char('j') => Some(select_neighbour(state, 1)),
                KeyCode::Char(c) => match c {
                    'r' => Some(Action::WeatherFetch),
                    'q' => Some(Action::Quit),
                    _ => Metric::from_hotkey(c).map(|metric| toggle(state, metric)),
                },
                KeyCode::F(5) => Some(Action::WeatherFetch),
                KeyCode::Esc => Some(Action::Quit),
                _ => None,
            },
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: WeatherPanelProps<'_>) {
        let chunks = Layout::vertical([
            Constraint::Min(1),    // Main content
            Constraint::Length(1), // Help bar
        ])
        .split(area);

        let mut body = PanelBody;
        body.render(frame, chunks[0], PanelBodyProps { state: props.state });

        let mut status_bar = StatusBar::new();
        <StatusBar as Component<Action>>::render(
            &mut status_bar,
            frame,
            chunks[1],
            StatusBarProps {
                left: StatusBarSection::empty(),
                center: StatusBarSection::hints(&[
                    StatusBarHint::new("↑↓", "location"),
                    StatusBarHint::new("1-5", "show"),
                    StatusBarHint::new("r", "refresh"),
                    StatusBarHint::new("q", "quit"),
                ]),
                right: StatusBarSection::empty(),
                style: StatusBarStyle::default(),
                is_focused: false,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers};
    use tui_dispatch::testing::*;

    fn collect(event: EventKind, state: &AppState, is_focused: bool) -> Vec<Action> {
        let mut component = WeatherPanel;
        let props = WeatherPanelProps { state, is_focused };
        component.handle_event(&event, props).into_iter().collect()
    }

    #[test]
    fn test_handle_event_refresh() {
        let state = AppState::default();
        let actions = collect(EventKind::Key(key("r")), &state, true);
        actions.assert_count(1);
        actions.assert_first(Action::WeatherFetch);
    }

    #[test]
    fn test_handle_event_down_selects_next_location() {
        let state = AppState::default();
        let actions = collect(
            EventKind::Key(KeyEvent::new(KeyCode::Down, KeyModifiers::NONE)),
            &state,
            true,
        );
        actions.assert_first(Action::LocationSelect("Lisbon, Portugal".into()));

        let actions = collect(EventKind::Key(key("k")), &state, true);
        actions.assert_first(Action::LocationSelect("Amsterdam, North Holand".into()));
    }

    #[test]
    fn test_handle_event_hotkey_flips_flag() {
        let state = AppState::default();

        let actions = collect(EventKind::Key(key("1")), &state, true);
        actions.assert_first(Action::DisplayToggle {
            metric: "temperature".into(),
            visible: false,
        });

        let actions = collect(EventKind::Key(key("5")), &state, true);
        actions.assert_first(Action::DisplayToggle {
            metric: "cloudCover".into(),
            visible: true,
        });

        let actions = collect(EventKind::Key(key("9")), &state, true);
        actions.assert_empty();
    }

    #[test]
    fn test_handle_event_quit() {
        let state = AppState::default();
        let actions = collect(EventKind::Key(key("q")), &state, true);
        actions.assert_first(Action::Quit);
    }

    #[test]
    fn test_handle_event_unfocused_ignores() {
        let state = AppState::default();
        let actions = collect(EventKind::Key(key("r")), &state, false);
        actions.assert_empty();
    }

    #[test]
    fn test_render_initial_state() {
        let mut render = RenderHarness::new(60, 32);
        let mut component = WeatherPanel;
        let state = AppState::default();

        let output = render.render_to_string_plain(|frame| {
            let props = WeatherPanelProps {
                state: &state,
                is_focused: true,
            };
            component.render(frame, frame.area(), props);
        });

        assert!(output.contains("Temperatura: 0°C"));
        assert!(output.contains("Precipitacion: 0mm"));
        assert!(output.contains("Madrid, Spain"));
    }
}
