//! Minimal terminal runtime for static chart viewers.
//!
//! A viewer implements [`App`] and is handed to [`run`], which redraws only
//! after input has arrived and returns once [`App::should_exit`] turns true.

pub use self::{
    app::{App, is_quit_event},
    runtime::run,
};

mod app;
mod event;
mod event_loop;
mod runtime;
