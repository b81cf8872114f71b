//! Terminal - the public facade
//!
//! Ties tokenizer, scheduler, interpreter, screen and key encoder together
//! behind the write/key entry points and an event stream. One instance owns
//! all of its state; writes enqueue and return, and a background drain task
//! applies queued tokens in bounded batches.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, Notify};

use crate::interpreter::Interpreter;
use crate::key::{KeyBindings, KeyEncoder, Modifiers};
use crate::render::Renderer;
use crate::scheduler::{SchedulerConfig, TokenQueue};
use crate::screen::Screen;
use crate::tokenizer::Tokenizer;

/// Events emitted by the terminal.
#[derive(Debug, Clone)]
pub enum TerminalEvent {
    /// The bell was rung
    Bell,
    /// A title-set sequence arrived
    TitleChanged(String),
    /// An accepted key event produced outgoing bytes
    Input(Vec<u8>),
}

/// Terminal configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TerminalConfig {
    /// Byte sequences for the overridable named keys
    pub keys: KeyBindings,
    /// Drain-loop tuning
    pub scheduler: SchedulerConfig,
}

/// State shared between the entry points and the drain task.
struct State {
    screen: Screen,
    queue: TokenQueue,
    renderer: Box<dyn Renderer>,
    enabled: bool,
}

/// A single terminal instance.
///
/// Entry points may be called from any task, but `write` spawns onto the
/// ambient Tokio runtime and therefore needs one. State is never shared
/// between instances.
pub struct Terminal {
    state: Arc<Mutex<State>>,
    events: broadcast::Sender<TerminalEvent>,
    idle: Arc<Notify>,
    encoder: KeyEncoder,
    scheduler: SchedulerConfig,
}

impl Terminal {
    /// Create a terminal pushing display updates into `renderer`.
    pub fn new(config: TerminalConfig, renderer: Box<dyn Renderer>) -> Self {
        let (events, _) = broadcast::channel(256);
        Self {
            state: Arc::new(Mutex::new(State {
                screen: Screen::new(),
                queue: TokenQueue::default(),
                renderer,
                enabled: false,
            })),
            events,
            idle: Arc::new(Notify::new()),
            encoder: KeyEncoder::new(config.keys),
            scheduler: config.scheduler,
        }
    }

    /// Feed raw terminal output.
    ///
    /// Tokenizes and enqueues synchronously, then returns; nothing is
    /// applied before the first drain tick.
    pub fn write(&self, text: &str) {
        if text.is_empty() {
            return;
        }
        let mut state = self.state.lock();
        for token in Tokenizer::new(text) {
            state.queue.push(token);
        }
        if state.queue.begin_drain() {
            drop(state);
            self.spawn_drain();
        }
    }

    /// Write `text` on a line of its own, breaking first if the cursor sits
    /// mid-line.
    pub fn write_line(&self, text: &str) {
        let mid_line = self.state.lock().screen.cursor.x > 0;
        let prefix = if mid_line { "\r\n" } else { "" };
        self.write(&format!("{prefix}{text}\r\n"));
    }

    /// Discard all grid content and home the cursor, immediately.
    ///
    /// Tokens already queued are not discarded: they apply against the
    /// fresh state on the following ticks.
    pub fn clear(&self) {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        state.screen.clear(state.renderer.as_mut());
    }

    /// Restore default styling, then clear.
    pub fn reset(&self) {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        state.screen.reset(state.renderer.as_mut());
    }

    /// Allow key events to produce input bytes.
    pub fn enable(&self) {
        self.state.lock().enabled = true;
    }

    /// Stop producing input bytes from key events.
    pub fn disable(&self) {
        self.state.lock().enabled = false;
    }

    /// Translate a key event into outgoing bytes.
    ///
    /// Returns whether the event was consumed. Alt chords always pass
    /// through unconsumed, as does everything while disabled.
    pub fn key_press(&self, key: &str, modifiers: Modifiers) -> bool {
        if !self.state.lock().enabled || modifiers.contains(Modifiers::ALT) {
            return false;
        }
        match self.encoder.encode(key, modifiers.contains(Modifiers::CTRL)) {
            Ok(bytes) => {
                let _ = self.events.send(TerminalEvent::Input(bytes));
                true
            }
            Err(err) => {
                log::debug!("{err}");
                false
            }
        }
    }

    /// Subscribe to terminal events.
    pub fn subscribe(&self) -> broadcast::Receiver<TerminalEvent> {
        self.events.subscribe()
    }

    /// Read access to the screen state.
    pub fn with_screen<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Screen) -> R,
    {
        f(&self.state.lock().screen)
    }

    /// Wait until everything written so far has been applied.
    pub async fn flushed(&self) {
        loop {
            let notified = self.idle.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if self.state.lock().queue.is_idle() {
                return;
            }
            notified.await;
        }
    }

    fn spawn_drain(&self) {
        let state = Arc::clone(&self.state);
        let idle = Arc::clone(&self.idle);
        let events = self.events.clone();
        let batch_size = self.scheduler.batch_size;
        let interval = self.scheduler.tick_interval();

        tokio::spawn(async move {
            loop {
                tokio::time::sleep(interval).await;
                {
                    let mut guard = state.lock();
                    let state = &mut *guard;
                    if state.queue.is_empty() {
                        state.queue.end_drain();
                        let cursor = state.screen.cursor;
                        state.renderer.cursor_moved(cursor.x, cursor.y);
                        break;
                    }
                    let mut interp =
                        Interpreter::new(&mut state.screen, state.renderer.as_mut(), &events);
                    for _ in 0..batch_size {
                        match state.queue.pop() {
                            Some(token) => interp.apply(token),
                            None => break,
                        }
                    }
                }
            }
            idle.notify_waiters();
        });
    }
}
