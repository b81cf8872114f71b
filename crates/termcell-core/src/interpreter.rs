//! Token interpreter
//!
//! Pops tokens in arrival order and applies exactly one state transition
//! per token. Everything the grammar recognizes but this table does not
//! handle is a deliberate no-op: liveness beats conformance.

use tokio::sync::broadcast;

use crate::render::Renderer;
use crate::screen::Screen;
use crate::term::TerminalEvent;
use crate::tokenizer::{ControlByte, EscapeKind, EscapeSeq, Token};

/// Applies tokens to a screen, pushing display updates into the renderer
/// and side effects into the event channel.
pub struct Interpreter<'a> {
    screen: &'a mut Screen,
    renderer: &'a mut dyn Renderer,
    events: &'a broadcast::Sender<TerminalEvent>,
}

impl<'a> Interpreter<'a> {
    pub fn new(
        screen: &'a mut Screen,
        renderer: &'a mut dyn Renderer,
        events: &'a broadcast::Sender<TerminalEvent>,
    ) -> Self {
        Self {
            screen,
            renderer,
            events,
        }
    }

    /// Apply a single token.
    pub fn apply(&mut self, token: Token) {
        match token {
            Token::Literal(c) => self.screen.put_char(c, self.renderer),
            Token::Control(ControlByte::Bell) => self.emit(TerminalEvent::Bell),
            Token::Control(ControlByte::CarriageReturn) => self.screen.carriage_return(),
            Token::Control(ControlByte::LineFeed) => self.screen.line_feed(),
            Token::Control(ControlByte::Tab) => self.screen.tab(),
            Token::Control(ControlByte::Backspace) => self.screen.backspace(),
            Token::Title(text) => self.emit(TerminalEvent::TitleChanged(text)),
            Token::Escape(seq) => self.apply_escape(&seq),
            // Already warned at tokenize time.
            Token::Unrecognized(_) => {}
        }
    }

    fn emit(&self, event: TerminalEvent) {
        // Nobody listening is fine.
        let _ = self.events.send(event);
    }

    fn apply_escape(&mut self, seq: &EscapeSeq) {
        match seq.kind {
            EscapeKind::Csi | EscapeKind::CsiPrivate => self.apply_csi(seq),
            EscapeKind::Bare => self.apply_bare(seq),
            EscapeKind::Reset => self.screen.reset(self.renderer),
            // Charset designation and DEC line attributes are recognized
            // but not emulated.
            EscapeKind::CharsetG0 | EscapeKind::CharsetG1 | EscapeKind::Dec => {}
            EscapeKind::FunctionKey => {
                log::trace!("ignoring function-key sequence O{}", seq.final_byte);
            }
        }
    }

    fn apply_csi(&mut self, seq: &EscapeSeq) {
        let params = &seq.params;
        // Count-style parameter: defaults to 1 when absent.
        let count = params.first().copied().unwrap_or(1);
        // J and K discriminate on the raw value, defaulting to 0.
        let disc = params.first().copied().unwrap_or(0);
        match seq.final_byte {
            'm' => {
                if params.is_empty() {
                    self.screen.style.reset();
                } else {
                    for &code in params {
                        self.screen.style.apply_code(code);
                    }
                }
            }
            'H' => {
                let y = params.first().copied().unwrap_or(0) as usize;
                let x = params.get(1).copied().unwrap_or(0) as usize;
                self.screen.locate(x, y);
            }
            // Tab clearing, terminal identification and mode juggling are
            // accepted and dropped.
            'g' | 'c' | 'd' | 'l' | 'h' | 'r' | 's' => {}
            'J' => {
                self.screen.clear_screen_down(self.renderer);
                if disc == 2 {
                    self.screen.locate(0, 0);
                }
            }
            'K' => {
                if disc == 2 {
                    self.screen.clear_line_left(self.renderer);
                } else {
                    self.screen.clear_line_right(self.renderer);
                }
            }
            'A' => self.screen.move_by(0, -i64::from(count)),
            'B' => self.screen.move_by(0, i64::from(count)),
            'C' => self.screen.move_by(i64::from(count), 0),
            'D' => self.screen.move_by(-i64::from(count), 0),
            'G' => self.screen.carriage_return(),
            'P' => self.screen.delete_chars(usize::from(count), self.renderer),
            '@' => self.screen.insert_blanks(usize::from(count), self.renderer),
            other => log::trace!("unhandled CSI final {other:?} with params {params:?}"),
        }
    }

    fn apply_bare(&mut self, seq: &EscapeSeq) {
        match seq.final_byte {
            // Viewport scrolling belongs to the display adapter.
            'D' => self.renderer.scroll_viewport(-1),
            'M' => self.renderer.scroll_viewport(1),
            // Set tab stop.
            'H' => {}
            other => log::trace!("unhandled escape final {other:?}"),
        }
    }
}
