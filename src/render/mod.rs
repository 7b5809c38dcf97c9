//! Rendering seam between the monitor loop and a concrete display backend.

pub mod terminal;

pub use terminal::TerminalSink;

use crate::display::TableModel;
use anyhow::Result;

/// Sink accepting the per-cycle table model.
///
/// The loop controller only knows this trait; tests plug in a recording sink
/// and the binary uses [`TerminalSink`].
pub trait RenderSink {
    /// Paints one cycle's model, replacing the previous frame.
    fn draw(&mut self, model: &TableModel) -> Result<()>;

    /// Clears the display on shutdown and restores the terminal.
    fn clear(&mut self) -> Result<()>;
}
