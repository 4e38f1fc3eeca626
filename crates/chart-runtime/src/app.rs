use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::Frame;

/// Trait for chart viewers driven by [`run`](crate::run).
pub trait App {
    /// Returns whether the viewer should close.
    fn should_exit(&self) -> bool;

    /// Handles terminal events (key input, resize, etc.).
    ///
    /// Every event marks the screen dirty, so the next loop iteration redraws.
    fn handle_event(&mut self, event: &Event);

    /// Draws the whole screen.
    fn draw(&self, frame: &mut Frame);
}

/// Returns true for `q`, `Esc` and `Ctrl-C` key presses.
///
/// # Example
///
/// ```
/// use chart_runtime::is_quit_event;
/// use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
///
/// let key = |code, modifiers| Event::Key(KeyEvent::new(code, modifiers));
/// assert!(is_quit_event(&key(KeyCode::Char('q'), KeyModifiers::NONE)));
/// assert!(is_quit_event(&key(KeyCode::Char('c'), KeyModifiers::CONTROL)));
/// assert!(!is_quit_event(&key(KeyCode::Char('c'), KeyModifiers::NONE)));
/// ```
#[must_use]
pub fn is_quit_event(event: &Event) -> bool {
    let Some(key) = event.as_key_event() else {
        return false;
    };
    if key.kind == KeyEventKind::Release {
        return false;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}
