use crossterm::event::Event as CrosstermEvent;

/// Events processed by the runtime.
#[derive(Debug, Clone, derive_more::IsVariant, derive_more::From)]
pub(crate) enum LoopEvent {
    /// The screen is dirty and must be redrawn.
    Render,
    /// Terminal events such as key input and resize.
    Input(CrosstermEvent),
}
