//! Renderer port
//!
//! The core pushes incremental display updates through this trait; turning
//! palette entries into visible colors and cells into pixels or markup is
//! entirely the implementor's concern. Implementations must be `Send`
//! because updates arrive from the background drain task.

use crate::cell::Cell;

/// Receives grid, cursor and viewport updates from the terminal.
pub trait Renderer: Send {
    /// A cell was written at `(x, y)` and should be materialized.
    fn cell_written(&mut self, x: usize, y: usize, cell: &Cell);

    /// A surviving cell now occupies `(x, y)` after a reflow pass.
    fn cell_moved(&mut self, x: usize, y: usize, cell: &Cell);

    /// The cell that was at `(x, y)` left the grid; the value is released
    /// to the implementor for disposal.
    fn cell_released(&mut self, x: usize, y: usize, cell: Cell);

    /// The cursor position should be refreshed.
    fn cursor_moved(&mut self, x: usize, y: usize);

    /// The viewport should scroll by `rows` (negative toward the top).
    fn scroll_viewport(&mut self, rows: i32);

    /// All content was discarded at once.
    fn cleared(&mut self);
}

/// Renderer that ignores every update, for headless use.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn cell_written(&mut self, _x: usize, _y: usize, _cell: &Cell) {}
    fn cell_moved(&mut self, _x: usize, _y: usize, _cell: &Cell) {}
    fn cell_released(&mut self, _x: usize, _y: usize, _cell: Cell) {}
    fn cursor_moved(&mut self, _x: usize, _y: usize) {}
    fn scroll_viewport(&mut self, _rows: i32) {}
    fn cleared(&mut self) {}
}
