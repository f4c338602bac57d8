//! UI state types for the wizard screen.
//!
//! Pure data types with no IO, no async, no ratatui dependency.
//! Owned by the engine, read by the tui for rendering.

mod navigation;
mod palette;

pub use navigation::{AccordionKey, NavigationState};
pub use palette::PaletteState;

/// UI configuration options derived from config/environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiOptions {
    pub ascii_only: bool,
    pub high_contrast: bool,
}
