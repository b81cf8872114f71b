//! Terminal cell types
//!
//! A cell represents a single character position in the terminal grid,
//! capturing the character together with the graphic rendition resolved at
//! the moment it was written. Later style changes never touch cells that
//! are already on screen.

use crate::color::{ColorTable, PaletteColor};
use bitflags::bitflags;

bitflags! {
    /// Live graphic-rendition attributes (SGR flags).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct StyleAttrs: u8 {
        /// Bold text
        const BOLD = 1 << 0;
        /// Dim/faint text
        const FAINT = 1 << 1;
        /// Standout (bright palette) text
        const STANDOUT = 1 << 2;
        /// Underlined text
        const UNDERLINE = 1 << 3;
        /// Blinking text
        const BLINK = 1 << 4;
        /// Reverse video (swap fg/bg)
        const REVERSE = 1 << 5;
        /// Hidden/invisible text
        const INVISIBLE = 1 << 6;
    }
}

bitflags! {
    /// Attributes that survive into a written cell.
    ///
    /// Standout, faint, reverse and invisible are consumed by palette
    /// resolution and never reach the cell itself.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CellAttrs: u8 {
        const BOLD = 1 << 0;
        const UNDERLINE = 1 << 1;
        const BLINK = 1 << 2;
    }
}

/// A single written terminal cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// The character in this cell
    pub c: char,
    /// Resolved foreground color
    pub fg: PaletteColor,
    /// Resolved background color
    pub bg: PaletteColor,
    /// Render attributes (bold, underline, blink)
    pub attrs: CellAttrs,
}

/// Current terminal styling state (used when writing new characters).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    /// Foreground palette index (0..=7)
    pub fg: u8,
    /// Background palette index (0..=7)
    pub bg: u8,
    /// Attribute flags
    pub attrs: StyleAttrs,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fg: 7,
            bg: 0,
            attrs: StyleAttrs::empty(),
        }
    }
}

impl Style {
    /// Reset all fields to their defaults.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Apply one SGR parameter. Codes outside the recognized set are
    /// ignored.
    pub fn apply_code(&mut self, code: u16) {
        let code = match code {
            0 => return self.reset(),
            1 => return self.attrs.insert(StyleAttrs::BOLD),
            2 => return self.attrs.insert(StyleAttrs::FAINT),
            3 => return self.attrs.insert(StyleAttrs::STANDOUT),
            4 => return self.attrs.insert(StyleAttrs::UNDERLINE),
            5 => return self.attrs.insert(StyleAttrs::BLINK),
            7 => return self.attrs.insert(StyleAttrs::REVERSE),
            8 | 10 => return self.attrs.insert(StyleAttrs::INVISIBLE),
            22 => return self.attrs.remove(StyleAttrs::BOLD | StyleAttrs::FAINT),
            23 => return self.attrs.remove(StyleAttrs::STANDOUT),
            24 => return self.attrs.remove(StyleAttrs::UNDERLINE),
            25 => return self.attrs.remove(StyleAttrs::BLINK),
            27 => return self.attrs.remove(StyleAttrs::REVERSE),
            // Default foreground/background select the plain entries.
            39 => 37,
            49 => 40,
            other => other,
        };
        match code {
            30..=37 => self.fg = (code - 30) as u8,
            40..=47 => self.bg = (code - 40) as u8,
            90..=97 => self.fg = (code - 90) as u8,
            100..=107 => self.bg = (code - 100) as u8,
            _ => log::trace!("ignored SGR parameter {code}"),
        }
    }

    /// Resolve the effective foreground and background colors.
    ///
    /// The background always comes from the plain table; the foreground
    /// table follows standout, then faint. Reverse swaps the index roles
    /// before lookup, and invisible collapses the foreground onto the
    /// resolved background.
    pub fn resolve(&self) -> (PaletteColor, PaletteColor) {
        let fg_table = if self.attrs.contains(StyleAttrs::STANDOUT) {
            ColorTable::Bright
        } else if self.attrs.contains(StyleAttrs::FAINT) {
            ColorTable::Faint
        } else {
            ColorTable::Plain
        };
        let (fg_index, bg_index) = if self.attrs.contains(StyleAttrs::REVERSE) {
            (self.bg, self.fg)
        } else {
            (self.fg, self.bg)
        };
        let bg = PaletteColor::plain(bg_index);
        let fg = if self.attrs.contains(StyleAttrs::INVISIBLE) {
            bg
        } else {
            PaletteColor::new(fg_table, fg_index)
        };
        (fg, bg)
    }

    /// Create a cell with this style and the given character.
    pub fn create_cell(&self, c: char) -> Cell {
        let (fg, bg) = self.resolve();
        let mut attrs = CellAttrs::empty();
        if self.attrs.contains(StyleAttrs::BOLD) {
            attrs.insert(CellAttrs::BOLD);
        }
        if self.attrs.contains(StyleAttrs::UNDERLINE) {
            attrs.insert(CellAttrs::UNDERLINE);
        }
        if self.attrs.contains(StyleAttrs::BLINK) {
            attrs.insert(CellAttrs::BLINK);
        }
        Cell { c, fg, bg, attrs }
    }
}
