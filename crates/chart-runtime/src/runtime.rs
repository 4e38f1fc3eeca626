use std::io;

use crate::{
    App,
    event::LoopEvent,
    event_loop::{CrosstermEvents, EventLoop, EventSource},
};

/// Runs the viewer in the terminal until `app.should_exit()` returns true.
///
/// The terminal is restored on return, including when drawing fails.
pub fn run<A>(app: &mut A) -> io::Result<()>
where
    A: App,
{
    ratatui::run(|terminal| {
        drive(EventLoop::new(CrosstermEvents), app, |app| {
            terminal.draw(|f| app.draw(f))?;
            Ok(())
        })
    })
}

/// Pumps `events` into `app`, calling `render` whenever the screen is dirty.
fn drive<S, A, F>(mut events: EventLoop<S>, app: &mut A, mut render: F) -> io::Result<()>
where
    S: EventSource,
    A: App,
    F: FnMut(&A) -> io::Result<()>,
{
    while !app.should_exit() {
        match events.next()? {
            LoopEvent::Render => render(app)?,
            LoopEvent::Input(event) => app.handle_event(&event),
        }
    }
    Ok(())
}
