use chart_runtime::App;
use countci_stats::histogram::Histogram;
use crossterm::event::{Event, KeyCode};
use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Constraint, Layout, Rect, Spacing},
    style::{Color, Modifier, Style},
    symbols::{Marker, merge::MergeStrategy},
    text::Line,
    widgets::{Block, Chart, Dataset, GraphType, Paragraph, Tabs, Widget},
};

use super::{help_line, labeled_axis};

/// One histogram with its summary lines.
#[derive(Debug)]
pub struct HistogramPanel {
    pub title: String,
    pub x_title: String,
    pub histogram: Histogram,
    pub summary: Vec<String>,
}

/// Viewer that pages through several histograms.
#[derive(Debug)]
pub struct HistogramApp {
    panels: Vec<HistogramPanel>,
    selected: usize,
    should_exit: bool,
}

impl HistogramApp {
    /// Creates a viewer starting at panel `selected`.
    #[must_use]
    pub fn new(panels: Vec<HistogramPanel>, selected: usize) -> Self {
        let selected = selected.min(panels.len().saturating_sub(1));
        Self {
            panels,
            selected,
            should_exit: false,
        }
    }

    fn select_next(&mut self) {
        if !self.panels.is_empty() {
            self.selected = (self.selected + 1) % self.panels.len();
        }
    }

    fn select_prev(&mut self) {
        if !self.panels.is_empty() {
            self.selected = self
                .selected
                .checked_sub(1)
                .unwrap_or(self.panels.len() - 1);
        }
    }
}

impl App for HistogramApp {
    fn should_exit(&self) -> bool {
        self.should_exit || self.panels.is_empty()
    }

    fn handle_event(&mut self, event: &Event) {
        if chart_runtime::is_quit_event(event) {
            self.should_exit = true;
            return;
        }
        if let Some(event) = event.as_key_event() {
            match event.code {
                KeyCode::Right | KeyCode::Tab => self.select_next(),
                KeyCode::Left | KeyCode::BackTab => self.select_prev(),
                _ => {}
            }
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let Some(panel) = self.panels.get(self.selected) else {
            return;
        };

        let [tabs_area, main_area, help_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        let [chart_area, summary_area] =
            Layout::horizontal([Constraint::Fill(1), Constraint::Length(40)])
                .spacing(Spacing::Overlap(1))
                .areas(main_area);

        let tabs = Tabs::new(self.panels.iter().map(|panel| panel.title.as_str()))
            .select(self.selected)
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            );

        let summary = Paragraph::new(
            panel
                .summary
                .iter()
                .map(|line| Line::raw(format!("  {line}")))
                .collect::<Vec<_>>(),
        )
        .block(
            Block::bordered()
                .merge_borders(MergeStrategy::Exact)
                .title("Summary"),
        );

        frame.render_widget(tabs, tabs_area);
        frame.render_widget(HistogramChart { panel }, chart_area);
        frame.render_widget(summary, summary_area);
        frame.render_widget(help_line("←/→: Switch | q/Esc: Quit"), help_area);
    }
}

struct HistogramChart<'a> {
    panel: &'a HistogramPanel,
}

impl Widget for HistogramChart<'_> {
    #[expect(clippy::cast_precision_loss)]
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let histogram = &self.panel.histogram;
        let data = histogram
            .bins()
            .iter()
            .map(|bin| (bin.center(), bin.count as f64))
            .collect::<Vec<_>>();
        let y_max = (histogram.max_count() as f64 * 1.05).ceil().max(1.0);

        let dataset = Dataset::default()
            .marker(Marker::HalfBlock)
            .graph_type(GraphType::Bar)
            .style(Style::default().fg(Color::Cyan))
            .data(&data);
        let chart = Chart::new(vec![dataset])
            .block(
                Block::bordered()
                    .merge_borders(MergeStrategy::Exact)
                    .title(format!(
                        "{} (underflow: {}, overflow: {})",
                        self.panel.title,
                        histogram.underflow(),
                        histogram.overflow()
                    )),
            )
            .x_axis(labeled_axis(
                &self.panel.x_title,
                [histogram.low(), histogram.high()],
            ))
            .y_axis(labeled_axis("Toys", [0.0, y_max]));

        Widget::render(chart, area, buf);
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyEvent, KeyModifiers};

    use super::*;

    fn panel(title: &str) -> HistogramPanel {
        let mut histogram = Histogram::from_integer_range(0, 5).unwrap();
        histogram.fill_all([1.0, 2.0, 2.0, 9.0]);
        HistogramPanel {
            title: title.to_owned(),
            x_title: "value".to_owned(),
            histogram,
            summary: vec!["mean: 3.5".to_owned()],
        }
    }

    fn press(app: &mut HistogramApp, code: KeyCode) {
        app.handle_event(&Event::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    #[test]
    fn test_cycles_through_panels() {
        let mut app = HistogramApp::new(vec![panel("a"), panel("b"), panel("c")], 2);
        assert_eq!(app.selected, 2);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.selected, 0);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.selected, 2);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.selected, 0);
        assert!(!app.should_exit());
        press(&mut app, KeyCode::Esc);
        assert!(app.should_exit());
    }

    #[test]
    fn test_clamps_initial_selection() {
        let app = HistogramApp::new(vec![panel("a")], 5);
        assert_eq!(app.selected, 0);
        assert!(HistogramApp::new(vec![], 0).should_exit());
    }

    #[test]
    fn test_chart_title_reports_overflow() {
        let panel = panel("fatalities");
        let area = Rect::new(0, 0, 60, 15);
        let mut buf = Buffer::empty(area);
        HistogramChart { panel: &panel }.render(area, &mut buf);
        let first_row = (0..area.width)
            .map(|x| buf[(x, 0)].symbol())
            .collect::<String>();
        assert!(first_row.contains("fatalities (underflow: 0, overflow: 1)"));
    }
}
