use artbox::{
    Alignment as ArtAlignment, Color as ArtColor, Fill, LinearGradient, Renderer, fonts,
    integrations::ratatui::ArtBox,
};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::Component;
use crate::action::Action;
use crate::state::Location;
use crate::view::TITLE;

pub struct TitleBanner;

pub struct TitleBannerProps<'a> {
    pub location: &'a Location,
    pub temperature: f64,
}

/// Rows below the FIGlet title: the coordinates line.
pub const BANNER_OVERHEAD: u16 = 1;

fn gradient_colors(celsius: f64) -> (ArtColor, ArtColor) {
    match celsius {
        t if t < 0.0 => (
            ArtColor::rgb(150, 200, 255), // Ice blue
            ArtColor::rgb(200, 230, 255), // Light ice
        ),
        t if t < 15.0 => (
            ArtColor::rgb(100, 180, 255), // Cool blue
            ArtColor::rgb(150, 220, 200), // Teal
        ),
        t if t < 25.0 => (
            ArtColor::rgb(100, 200, 150), // Green
            ArtColor::rgb(255, 220, 100), // Yellow
        ),
        t if t < 35.0 => (
            ArtColor::rgb(255, 180, 80), // Orange
            ArtColor::rgb(255, 120, 80), // Deep orange
        ),
        _ => (
            ArtColor::rgb(255, 100, 80), // Red-orange
            ArtColor::rgb(255, 60, 60),  // Hot red
        ),
    }
}

fn banner_fill(celsius: f64) -> Fill {
    let (start, end) = gradient_colors(celsius);
    Fill::Linear(LinearGradient::horizontal(start, end))
}

/// `38.72°N, 9.13°W`
pub fn format_coordinates(location: &Location) -> String {
    let ns = if location.latitude < 0.0 { 'S' } else { 'N' };
    let ew = if location.longitude < 0.0 { 'W' } else { 'E' };
    format!(
        "{:.2}°{}, {:.2}°{}",
        location.latitude.abs(),
        ns,
        location.longitude.abs(),
        ew
    )
}

impl Component<Action> for TitleBanner {
    type Props<'a> = TitleBannerProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let chunks = Layout::vertical([
            Constraint::Fill(1),                 // FIGlet title
            Constraint::Length(BANNER_OVERHEAD), // Coordinates
        ])
        .split(area);

        let renderer = Renderer::new(fonts::stack(&["terminus", "miniwi"]))
            .with_plain_fallback()
            .with_alignment(ArtAlignment::Center)
            .with_fill(banner_fill(props.temperature));
        frame.render_widget(ArtBox::new(&renderer, TITLE), chunks[0]);

        let coords_line = Line::from(vec![
            Span::styled(
                props.location.name.clone(),
                Style::default().fg(Color::Gray),
            ),
            Span::styled(
                format!("  {}", format_coordinates(props.location)),
                Style::default().fg(Color::DarkGray),
            ),
        ])
        .centered();
        frame.render_widget(Paragraph::new(coords_line), chunks[1]);
    }
}
