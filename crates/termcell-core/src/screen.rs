//! Screen - cursor, style and grid under one roof
//!
//! Owns the terminal's mutable state and exposes the state transitions the
//! interpreter applies. Incremental display updates go out through the
//! renderer handed to each mutating operation; the screen itself never
//! knows what a pixel is.

use crate::cell::Style;
use crate::grid::Grid;
use crate::render::Renderer;

/// Cursor position (0-based, never negative).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub x: usize,
    pub y: usize,
}

/// Terminal screen state.
#[derive(Debug, Default)]
pub struct Screen {
    grid: Grid,
    /// Cursor state
    pub cursor: Cursor,
    /// Current cell styling
    pub style: Style,
}

impl Screen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the cell grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Write one character at the cursor and advance by one column.
    ///
    /// A raw ESC is substituted with a visible placeholder so stray
    /// introducers stay debuggable.
    pub fn put_char(&mut self, c: char, r: &mut dyn Renderer) {
        let c = if c == '\x1b' { '\u{241b}' } else { c };
        let cell = self.style.create_cell(c);
        let Cursor { x, y } = self.cursor;
        r.cell_written(x, y, &cell);
        if let Some(old) = self.grid.ensure_row(y).set(x, cell) {
            r.cell_released(x, y, old);
        }
        self.move_by(1, 0);
    }

    /// Absolute cursor positioning.
    pub fn locate(&mut self, x: usize, y: usize) {
        self.cursor = Cursor { x, y };
    }

    /// Relative cursor move, clamped at the origin.
    pub fn move_by(&mut self, dx: i64, dy: i64) {
        let x = (self.cursor.x as i64 + dx).max(0) as usize;
        let y = (self.cursor.y as i64 + dy).max(0) as usize;
        self.locate(x, y);
    }

    /// Move the cursor to the start of the current row.
    pub fn carriage_return(&mut self) {
        self.cursor.x = 0;
    }

    /// Move the cursor down one row; the column is untouched.
    pub fn line_feed(&mut self) {
        self.move_by(0, 1);
    }

    /// Advance to the next multiple-of-8 tab stop.
    pub fn tab(&mut self) {
        let x = self.cursor.x;
        self.move_by((((x + 8) & !7) - x) as i64, 0);
    }

    /// Non-destructive backspace: a pure cursor move.
    pub fn backspace(&mut self) {
        self.move_by(-1, 0);
    }

    /// Destructive backspace: remove the cell left of the cursor, reflow
    /// the remainder and step back.
    pub fn backspace_delete(&mut self, r: &mut dyn Renderer) {
        if self.cursor.x == 0 {
            return;
        }
        self.clear_line_from(self.cursor.x - 1, self.cursor.y, Some(1), r);
        self.move_by(-1, 0);
    }

    /// Remove `count` cells (all remaining when `None`) from `(x, y)`
    /// rightward. Cells past the removed range shift left and are
    /// repositioned through the renderer.
    pub fn clear_line_from(
        &mut self,
        x: usize,
        y: usize,
        count: Option<usize>,
        r: &mut dyn Renderer,
    ) {
        let Some(row) = self.grid.row_mut(y) else {
            return;
        };
        let (dead, reflow) = row.splice_out(x, count);
        for (col, cell) in dead {
            r.cell_released(col, y, cell);
        }
        if reflow {
            for (col, cell) in row.iter() {
                r.cell_moved(col, y, cell);
            }
        }
    }

    /// Clear from the cursor to the end of the line.
    pub fn clear_line_right(&mut self, r: &mut dyn Renderer) {
        self.clear_line_from(self.cursor.x, self.cursor.y, None, r);
    }

    /// Clear from the start of the line up to (not including) the cursor.
    pub fn clear_line_left(&mut self, r: &mut dyn Renderer) {
        self.clear_line_from(0, self.cursor.y, Some(self.cursor.x), r);
    }

    /// Delete `count` cells rightward from the cursor.
    pub fn delete_chars(&mut self, count: usize, r: &mut dyn Renderer) {
        self.clear_line_from(self.cursor.x, self.cursor.y, Some(count), r);
    }

    /// Drop every row from the cursor's row to the end of the screen.
    pub fn clear_screen_down(&mut self, r: &mut dyn Renderer) {
        for y in self.cursor.y..self.grid.height() {
            self.clear_line_from(0, y, None, r);
        }
        self.grid.truncate(self.cursor.y);
    }

    /// Insert `count` empty cells at the cursor, shifting the rest right.
    pub fn insert_blanks(&mut self, count: usize, r: &mut dyn Renderer) {
        let Cursor { x, y } = self.cursor;
        let row = self.grid.ensure_row(y);
        row.insert_blanks(x, count);
        for (col, cell) in row.iter() {
            r.cell_moved(col, y, cell);
        }
    }

    /// Discard all grid content and home the cursor. The style survives.
    pub fn clear(&mut self, r: &mut dyn Renderer) {
        self.grid.clear();
        r.cleared();
        self.locate(0, 0);
        r.cursor_moved(0, 0);
    }

    /// Style defaults, then `clear`.
    pub fn reset(&mut self, r: &mut dyn Renderer) {
        self.style.reset();
        self.clear(r);
    }
}
