use ratatui::{
    style::{Color, Style},
    text::Text,
    widgets::Axis,
};

pub mod error_bars;
pub mod histograms;

/// Axis with labels at both bounds and the midpoint.
fn labeled_axis(title: &str, bounds: [f64; 2]) -> Axis<'_> {
    Axis::default().title(title).bounds(bounds).labels([
        format!("{:.2}", bounds[0]),
        format!("{:.2}", f64::midpoint(bounds[0], bounds[1])),
        format!("{:.2}", bounds[1]),
    ])
}

fn help_line(text: &str) -> Text<'_> {
    Text::from(text)
        .style(Style::default().fg(Color::DarkGray))
        .centered()
}
