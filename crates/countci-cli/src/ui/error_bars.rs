use chart_runtime::App;
use countci_stats::{histogram::Histogram, poisson::BinInterval};
use crossterm::event::Event;
use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    symbols::{Marker, merge::MergeStrategy},
    widgets::{Block, Chart, Dataset, GraphType, Widget},
};

use super::{help_line, labeled_axis};

/// Viewer for histogram counts with asymmetric vertical error bars.
#[derive(Debug)]
pub struct ErrorBarApp {
    title: String,
    points: Vec<(f64, f64)>,
    bars: Vec<[(f64, f64); 2]>,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
    should_exit: bool,
}

impl ErrorBarApp {
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new(title: impl Into<String>, histogram: &Histogram, intervals: &[BinInterval]) -> Self {
        let points = intervals
            .iter()
            .map(|bin| (bin.center, bin.count as f64))
            .collect();
        let bars = intervals
            .iter()
            .map(|bin| [(bin.center, bin.lower), (bin.center, bin.upper)])
            .collect();
        let y_max = intervals
            .iter()
            .map(|bin| bin.upper)
            .fold(1.0, f64::max);
        Self {
            title: title.into(),
            points,
            bars,
            x_bounds: [histogram.low(), histogram.high()],
            y_bounds: [0.0, (y_max * 1.05).ceil()],
            should_exit: false,
        }
    }
}

impl App for ErrorBarApp {
    fn should_exit(&self) -> bool {
        self.should_exit
    }

    fn handle_event(&mut self, event: &Event) {
        self.should_exit |= chart_runtime::is_quit_event(event);
    }

    fn draw(&self, frame: &mut Frame) {
        let [chart_area, help_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(frame.area());

        let chart = ErrorBarChart {
            title: &self.title,
            points: &self.points,
            bars: &self.bars,
            x_bounds: self.x_bounds,
            y_bounds: self.y_bounds,
        };
        frame.render_widget(chart, chart_area);
        frame.render_widget(help_line("q/Esc: Quit"), help_area);
    }
}

struct ErrorBarChart<'a> {
    title: &'a str,
    points: &'a [(f64, f64)],
    bars: &'a [[(f64, f64); 2]],
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
}

impl Widget for ErrorBarChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        // Bars first so the markers are drawn on top
        let mut datasets = self
            .bars
            .iter()
            .map(|bar| {
                Dataset::default()
                    .marker(Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(Style::default().fg(Color::Yellow))
                    .data(bar)
            })
            .collect::<Vec<_>>();
        datasets.push(
            Dataset::default()
                .name("N")
                .marker(Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(Color::Cyan))
                .data(self.points),
        );

        let chart = Chart::new(datasets)
            .block(
                Block::bordered()
                    .merge_borders(MergeStrategy::Exact)
                    .title(self.title),
            )
            .x_axis(labeled_axis("x", self.x_bounds))
            .y_axis(labeled_axis("Entries", self.y_bounds));

        Widget::render(chart, area, buf);
    }
}

#[cfg(test)]
mod tests {
    use countci_stats::{confidence::ConfidenceLevel, poisson};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use super::*;

    fn app() -> ErrorBarApp {
        let mut histogram = Histogram::new(4, 0.0, 4.0).unwrap();
        histogram.fill_all([0.5, 1.5, 1.5, 3.2]);
        let intervals = poisson::bin_intervals(&histogram, ConfidenceLevel::NINETY_FIVE);
        ErrorBarApp::new("Garwood error bars", &histogram, &intervals)
    }

    #[test]
    fn test_bounds_cover_error_bars() {
        let app = app();
        assert_eq!(app.x_bounds, [0.0, 4.0]);
        // U for N = 2 at 95% is ~7.22
        assert!(app.y_bounds[1] >= 7.22);
        assert_eq!(app.points.len(), 4);
        assert_eq!(app.bars[2][0], (2.5, 0.0));
    }

    #[test]
    fn test_renders_title() {
        let app = app();
        let area = Rect::new(0, 0, 60, 20);
        let mut buf = Buffer::empty(area);
        ErrorBarChart {
            title: &app.title,
            points: &app.points,
            bars: &app.bars,
            x_bounds: app.x_bounds,
            y_bounds: app.y_bounds,
        }
        .render(area, &mut buf);
        let first_row = (0..area.width)
            .map(|x| buf[(x, 0)].symbol())
            .collect::<String>();
        assert!(first_row.contains("Garwood error bars"));
    }

    #[test]
    fn test_quits_on_q() {
        let mut app = app();
        app.handle_event(&Event::Key(KeyEvent::new(
            KeyCode::Char('x'),
            KeyModifiers::NONE,
        )));
        assert!(!app.should_exit());
        app.handle_event(&Event::Key(KeyEvent::new(
            KeyCode::Char('q'),
            KeyModifiers::NONE,
        )));
        assert!(app.should_exit());
    }
}
