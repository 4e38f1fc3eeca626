use std::io;

use crossterm::event::{self, Event};

use crate::event::LoopEvent;

/// Source of terminal events.
pub(crate) trait EventSource {
    /// Blocks until the next event arrives.
    fn read(&mut self) -> io::Result<Event>;
}

/// Reads events from the terminal through crossterm.
#[derive(Default, Debug, Clone, Copy)]
pub(crate) struct CrosstermEvents;

impl EventSource for CrosstermEvents {
    fn read(&mut self) -> io::Result<Event> {
        event::read()
    }
}

/// Render-on-dirty event loop.
///
/// Yields [`LoopEvent::Render`] once after startup and once after every input event,
/// and otherwise blocks on the event source.
#[derive(Debug)]
pub(crate) struct EventLoop<S> {
    source: S,
    dirty: bool,
}

impl<S> EventLoop<S>
where
    S: EventSource,
{
    pub(crate) fn new(source: S) -> Self {
        Self {
            source,
            dirty: true, // Initial render is required on startup
        }
    }

    pub(crate) fn next(&mut self) -> io::Result<LoopEvent> {
        if self.dirty {
            self.dirty = false;
            return Ok(LoopEvent::Render);
        }
        let event = self.source.read()?;
        self.dirty = true;
        Ok(event.into())
    }
}
