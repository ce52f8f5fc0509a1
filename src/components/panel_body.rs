use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::{Component, TitleBanner, TitleBannerProps};
use crate::action::Action;
use crate::state::{AppState, Metric};
use crate::view::{PanelView, READOUT_HEADING, SELECTOR_PROMPT, TOGGLES_PROMPT};

/// Selector, toggles and readout, under the title banner
pub struct PanelBody;

pub struct PanelBodyProps<'a> {
    pub state: &'a AppState,
}

/// FIGlet title cap: terminus(6) plus the coordinates line
const BANNER_MAX: u16 = 7;

fn heading(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default().fg(Color::Cyan).bold(),
    ))
}

fn selector_lines(view: &PanelView) -> Vec<Line<'static>> {
    let mut lines = vec![heading(SELECTOR_PROMPT)];
    lines.extend(view.selector.iter().map(|option| {
        if option.selected {
            Line::from(vec![
                Span::styled("▸ ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    option.name.clone(),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
            ])
        } else {
            Line::from(vec![
                Span::raw("  "),
                Span::styled(option.name.clone(), Style::default().fg(Color::Gray)),
            ])
        }
    }));
    lines
}

fn toggle_lines(view: &PanelView) -> Vec<Line<'static>> {
    let mut lines = vec![heading(TOGGLES_PROMPT)];
    lines.extend(view.toggles.iter().map(|toggle| {
        let (mark, style) = if toggle.checked {
            ("[x] ", Style::default().fg(Color::Green))
        } else {
            ("[ ] ", Style::default().fg(Color::DarkGray))
        };
        Line::from(vec![
            Span::styled(
                format!("{} ", toggle.metric.hotkey()),
                Style::default().fg(Color::Cyan),
            ),
            Span::styled(mark, style),
            Span::raw(toggle.label),
        ])
    }));
    lines
}

fn readout_lines(view: &PanelView) -> Vec<Line<'static>> {
    let mut lines = vec![heading(READOUT_HEADING)];
    lines.extend(view.readouts.iter().map(|readout| {
        Line::from(vec![
            Span::styled(
                format!("{}:", readout.label),
                Style::default().fg(Color::Gray),
            ),
            Span::raw(" "),
            Span::styled(readout.value.clone(), Style::default().bold()),
        ])
    }));
    lines
}

impl Component<Action> for PanelBody {
    type Props<'a> = PanelBodyProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let view = PanelView::derive(props.state);
        let selector = selector_lines(&view);
        let toggles = toggle_lines(&view);
        let readout = readout_lines(&view);

        let chunks = Layout::vertical([
            Constraint::Max(BANNER_MAX),
            Constraint::Length(1),
            Constraint::Length(selector.len() as u16),
            Constraint::Length(1),
            Constraint::Length(Metric::ALL.len() as u16 + 1),
            Constraint::Length(1),
            Constraint::Min(readout.len() as u16),
        ])
        .split(area);

        let mut banner = TitleBanner;
        banner.render(
            frame,
            chunks[0],
            TitleBannerProps {
                location: props.state.current_location(),
                temperature: props.state.reading.temperature,
            },
        );

        frame.render_widget(Paragraph::new(selector), chunks[2]);
        frame.render_widget(Paragraph::new(toggles), chunks[4]);
        frame.render_widget(Paragraph::new(readout), chunks[6]);
    }
}
