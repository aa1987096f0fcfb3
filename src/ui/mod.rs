//! Terminal UI components
//!
//! Built with ratatui. Keyboard-first; the palette follows the page theme.

pub mod page;
pub mod theme;

pub use page::render_ui;
pub use theme::Palette;
