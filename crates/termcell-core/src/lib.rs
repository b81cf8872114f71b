//! termcell-core: character terminal emulation
//!
//! This crate provides the building blocks of a character terminal:
//! - Palette, style and cell types
//! - A sparse, auto-growing cell grid
//! - The escape-sequence tokenizer and interpreter
//! - Batched, non-blocking output scheduling
//! - Keyboard-to-control-byte encoding
//!
//! Display output and key input stay outside the crate: implement
//! [`Renderer`] to materialize cells, and forward key events from your
//! input source into [`Terminal::key_press`].

pub mod cell;
pub mod color;
pub mod grid;
pub mod interpreter;
pub mod key;
pub mod render;
pub mod scheduler;
pub mod screen;
pub mod term;
pub mod tokenizer;

pub use cell::{Cell, CellAttrs, Style, StyleAttrs};
pub use color::{ColorTable, PaletteColor};
pub use grid::{Grid, Row};
pub use interpreter::Interpreter;
pub use key::{KeyBindings, KeyEncoder, KeyError, Modifiers};
pub use render::{NullRenderer, Renderer};
pub use scheduler::SchedulerConfig;
pub use screen::{Cursor, Screen};
pub use term::{Terminal, TerminalConfig, TerminalEvent};
pub use tokenizer::{ControlByte, EscapeKind, EscapeSeq, Token, Tokenizer};
