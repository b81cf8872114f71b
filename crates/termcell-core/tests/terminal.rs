//! End-to-end tests for the write/drain pipeline.
//!
//! These run on a paused Tokio clock so the drain ticks elapse instantly
//! while preserving their ordering guarantees.

use std::sync::Arc;

use parking_lot::Mutex;
use termcell_core::{
    Cell, Modifiers, NullRenderer, PaletteColor, Renderer, Terminal, TerminalConfig, TerminalEvent,
};

/// Renderer that records every update it receives.
#[derive(Clone, Default)]
struct Recorder(Arc<Mutex<Log>>);

#[derive(Default)]
struct Log {
    written: Vec<(usize, usize, char)>,
    moved: Vec<(usize, usize, char)>,
    released: Vec<(usize, usize, char)>,
    cursor: Vec<(usize, usize)>,
    scrolled: Vec<i32>,
    cleared: usize,
}

impl Renderer for Recorder {
    fn cell_written(&mut self, x: usize, y: usize, cell: &Cell) {
        self.0.lock().written.push((x, y, cell.c));
    }

    fn cell_moved(&mut self, x: usize, y: usize, cell: &Cell) {
        self.0.lock().moved.push((x, y, cell.c));
    }

    fn cell_released(&mut self, x: usize, y: usize, cell: Cell) {
        self.0.lock().released.push((x, y, cell.c));
    }

    fn cursor_moved(&mut self, x: usize, y: usize) {
        self.0.lock().cursor.push((x, y));
    }

    fn scroll_viewport(&mut self, rows: i32) {
        self.0.lock().scrolled.push(rows);
    }

    fn cleared(&mut self) {
        self.0.lock().cleared += 1;
    }
}

fn recorded_terminal() -> (Terminal, Recorder) {
    let recorder = Recorder::default();
    let term = Terminal::new(TerminalConfig::default(), Box::new(recorder.clone()));
    (term, recorder)
}

fn headless_terminal() -> Terminal {
    Terminal::new(TerminalConfig::default(), Box::new(NullRenderer))
}

fn row_text(term: &Terminal, y: usize) -> String {
    term.with_screen(|s| s.grid().row(y).map(|r| r.text()).unwrap_or_default())
}

#[tokio::test(start_paused = true)]
async fn ascii_run_creates_one_cell_per_char() {
    let term = headless_terminal();
    term.write("hello world");
    term.flushed().await;

    term.with_screen(|s| {
        for (i, c) in "hello world".chars().enumerate() {
            assert_eq!(s.grid().get(i, 0).map(|cell| cell.c), Some(c));
        }
        assert_eq!(s.cursor.x, 11);
        assert_eq!(s.cursor.y, 0);
    });
}

#[tokio::test(start_paused = true)]
async fn sgr_colors_are_snapshotted_per_cell() {
    let term = headless_terminal();
    term.write("A\x1b[31mB\x1b[0mC");
    term.flushed().await;

    term.with_screen(|s| {
        let fg = |x| s.grid().get(x, 0).map(|c| c.fg);
        assert_eq!(fg(0), Some(PaletteColor::plain(7)));
        assert_eq!(fg(1), Some(PaletteColor::plain(1)));
        assert_eq!(fg(2), Some(PaletteColor::plain(7)));
        assert_eq!(s.cursor.x, 3);
        assert_eq!(s.cursor.y, 0);
    });
}

#[tokio::test(start_paused = true)]
async fn carriage_return_overwrites_and_releases() {
    let (term, recorder) = recorded_terminal();
    term.write("AB\rC");
    term.flushed().await;

    assert_eq!(row_text(&term, 0), "CB");
    term.with_screen(|s| assert_eq!((s.cursor.x, s.cursor.y), (1, 0)));
    // The overwritten cell came back to the renderer for disposal.
    assert_eq!(recorder.0.lock().released, vec![(0, 0, 'A')]);
}

#[tokio::test(start_paused = true)]
async fn large_write_drains_across_batches() {
    let term = headless_terminal();
    let input = "x".repeat(1000);
    term.write(&input);
    term.flushed().await;

    term.with_screen(|s| {
        assert_eq!(s.grid().row(0).map(|r| r.len()), Some(1000));
        assert_eq!(s.cursor.x, 1000);
    });
}

#[tokio::test(start_paused = true)]
async fn writes_stay_in_arrival_order() {
    let term = headless_terminal();
    term.write("ab");
    term.write("\x1b[31m");
    term.write("cd");
    term.flushed().await;

    assert_eq!(row_text(&term, 0), "abcd");
    term.with_screen(|s| {
        assert_eq!(s.grid().get(1, 0).map(|c| c.fg), Some(PaletteColor::plain(7)));
        assert_eq!(s.grid().get(2, 0).map(|c| c.fg), Some(PaletteColor::plain(1)));
    });
}

#[tokio::test(start_paused = true)]
async fn drain_finishes_with_cursor_refresh() {
    let (term, recorder) = recorded_terminal();
    term.write("abc");
    term.flushed().await;

    assert_eq!(recorder.0.lock().cursor.last(), Some(&(3, 0)));
}

#[tokio::test(start_paused = true)]
async fn clear_does_not_flush_pending_tokens() {
    let term = headless_terminal();
    term.write("abc");
    // The queue has not ticked yet; the clear lands first and the queued
    // tokens then apply against the fresh screen.
    term.clear();
    assert_eq!(term.with_screen(|s| s.grid().height()), 0);
    term.flushed().await;

    assert_eq!(row_text(&term, 0), "abc");
}

#[tokio::test(start_paused = true)]
async fn reset_restores_default_style_for_later_tokens() {
    let term = headless_terminal();
    term.write("\x1b[31;1m");
    term.flushed().await;
    term.reset();
    term.write("x");
    term.flushed().await;

    term.with_screen(|s| {
        assert_eq!(s.grid().get(0, 0).map(|c| c.fg), Some(PaletteColor::plain(7)));
    });
}

#[tokio::test(start_paused = true)]
async fn bell_and_title_reach_subscribers() {
    let term = headless_terminal();
    let mut events = term.subscribe();
    term.write("\x07\x1b]0;session one\x07");
    term.flushed().await;

    assert!(matches!(events.try_recv(), Ok(TerminalEvent::Bell)));
    assert!(
        matches!(events.try_recv(), Ok(TerminalEvent::TitleChanged(t)) if t == "session one")
    );
    assert!(events.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn viewport_scroll_sequences_reach_renderer() {
    let (term, recorder) = recorded_terminal();
    term.write("\x1bD\x1bM");
    term.flushed().await;

    assert_eq!(recorder.0.lock().scrolled, vec![-1, 1]);
}

#[tokio::test(start_paused = true)]
async fn erase_reflows_surviving_cells() {
    let (term, recorder) = recorded_terminal();
    term.write("abcd");
    term.flushed().await;
    // Home to row 0, column 1 (parameters are 0-based, row first).
    term.write("\x1b[0;1H\x1b[2P");
    term.flushed().await;

    assert_eq!(row_text(&term, 0), "ad");
    let log = recorder.0.lock();
    assert_eq!(log.released.iter().filter(|r| r.1 == 0).count(), 2);
    // The survivor slid from column 3 to column 1.
    assert!(log.moved.contains(&(1, 0, 'd')));
}

#[tokio::test(start_paused = true)]
async fn unrecognized_spans_are_skipped_not_rendered() {
    let _ = env_logger::builder().is_test(true).try_init();
    let term = headless_terminal();
    // The line separator matches no grammar rule; it is warned about and
    // never reaches the screen.
    term.write("a\u{2028}b");
    term.flushed().await;

    assert_eq!(row_text(&term, 0), "ab");
    term.with_screen(|s| assert_eq!(s.cursor.x, 2));
}

#[tokio::test(start_paused = true)]
async fn unknown_key_leaves_event_unhandled() {
    let term = headless_terminal();
    term.enable();
    let mut events = term.subscribe();

    assert!(!term.key_press("F13", Modifiers::empty()));
    assert!(events.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn accepted_keys_emit_input_events() {
    let term = headless_terminal();
    term.enable();
    let mut events = term.subscribe();

    assert!(term.key_press("Enter", Modifiers::empty()));
    assert!(term.key_press("ArrowUp", Modifiers::empty()));
    assert!(matches!(events.try_recv(), Ok(TerminalEvent::Input(b)) if b == b"\n"));
    assert!(matches!(events.try_recv(), Ok(TerminalEvent::Input(b)) if b == b"\x1bOA"));
}
