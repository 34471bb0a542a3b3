// src/term/emulator/mod.rs

//! The emulation core.
//!
//! `Emulator` owns everything a fed byte can touch: the screen, the
//! cursor, the mode flags, the parser state and the escape accumulators,
//! plus the injected sinks for answerback sequences and resize
//! notifications. `term::Terminal` wraps it in a lock; nothing here is
//! aware of threads.

mod csi_handler;
mod parser;
mod str_handler;

pub(crate) use parser::ParserState;

use std::io::Write;

use log::{debug, warn};

use crate::ansi::csi::CsiEscape;
use crate::ansi::str_seq::StrEscape;
use crate::color::Color;
use crate::config::Config;
use crate::glyph::Glyph;
use crate::term::cursor::{CursorController, ScreenContext};
use crate::term::modes::TermMode;
use crate::term::screen::Screen;

/// Sink for answerback sequences (DA, DECID) written back to the
/// attached process. `Sync` because the engine itself is shared between
/// a feeding thread and querying threads.
pub type ReplySink = Box<dyn Write + Send + Sync>;
/// Callback invoked with the new `(cols, rows)` after a resize, so the
/// embedder can propagate the window size to the TTY.
pub type ResizeHook = Box<dyn FnMut(usize, usize) + Send + Sync>;

/// VT102 primary device attributes response.
const VT102_ID: &[u8] = b"\x1b[?6c";

pub(crate) struct Emulator {
    pub(crate) screen: Screen,
    pub(crate) cursor: CursorController,
    pub(crate) mode: TermMode,
    pub(crate) state: ParserState,
    pub(crate) csi: CsiEscape,
    pub(crate) str_seq: StrEscape,
    config: Config,
    reply_sink: Option<ReplySink>,
    resize_hook: Option<ResizeHook>,
}

impl Emulator {
    pub fn new(cols: usize, rows: usize, config: Config) -> Self {
        let mut emulator = Emulator {
            screen: Screen::new(cols, rows, config.tab_interval()),
            cursor: CursorController::default(),
            mode: TermMode::WRAP,
            state: ParserState::Ground,
            csi: CsiEscape::default(),
            str_seq: StrEscape::default(),
            config,
            reply_sink: None,
            resize_hook: None,
        };
        emulator.reset();
        emulator
    }

    pub fn set_reply_sink(&mut self, sink: ReplySink) {
        self.reply_sink = Some(sink);
    }

    pub fn set_resize_hook(&mut self, hook: ResizeHook) {
        self.resize_hook = Some(hook);
    }

    /// RIS: restores the state of a freshly constructed emulator of the
    /// same size. Both grids are cleared, modes collapse to auto-wrap,
    /// tab stops return to their default layout and the cleared cursor is
    /// saved over the DECSC slot.
    pub fn reset(&mut self) {
        if self.screen.alt_active() {
            self.screen.swap_screen();
        }
        self.cursor.reset();
        self.mode = TermMode::WRAP;
        self.state = ParserState::Ground;
        self.csi.reset();
        self.str_seq.reset();
        self.screen.clear_both(self.fill_glyph());
        self.screen.reset_scrolling_region();
        self.screen.init_tabstops(self.config.tab_interval());
        self.screen.mark_all_dirty();
        self.cursor.save();
        debug!("terminal reset");
    }

    /// Changes the grid dimensions, keeping the overlapping content.
    /// Content slides up first when the cursor would otherwise fall off
    /// the bottom; the return value reports whether that happened.
    pub fn resize(&mut self, cols: usize, rows: usize) -> bool {
        if cols == 0 || rows == 0 {
            warn!("ignoring resize to {}x{}", cols, rows);
            return false;
        }
        if cols == self.screen.cols() && rows == self.screen.rows() {
            return false;
        }
        let fill = self.fill_glyph();
        let (_, cursor_y) = self.cursor.pos();
        let slide = (cursor_y + 1).saturating_sub(rows);
        if slide > 0 {
            self.screen.slide_up(slide, fill);
        }
        self.screen.resize(cols, rows, fill, self.config.tab_interval());
        let (x, y) = self.cursor.pos();
        let ctx = self.ctx();
        self.cursor
            .move_to(x as isize, y as isize - slide as isize, &ctx);
        debug!("terminal resized to {}x{}", cols, rows);
        if let Some(hook) = &mut self.resize_hook {
            hook(cols, rows);
        }
        slide > 0
    }

    // --- Queries used by the public surface ---

    pub fn cell(&self, x: usize, y: usize) -> (char, Color, Color) {
        match self.screen.glyph(x, y) {
            Some(g) => (g.c, g.fg, g.bg),
            None => (' ', Color::DEFAULT_FG, Color::DEFAULT_BG),
        }
    }

    pub fn cursor_pos(&self) -> (usize, usize) {
        self.cursor.pos()
    }

    pub fn mode(&self) -> TermMode {
        self.mode
    }

    pub fn in_ground(&self) -> bool {
        self.state == ParserState::Ground
    }

    // --- Shared helpers for the sequence handlers ---

    pub(super) fn ctx(&self) -> ScreenContext {
        ScreenContext {
            cols: self.screen.cols(),
            rows: self.screen.rows(),
            scroll_top: self.screen.scroll_top(),
            scroll_bot: self.screen.scroll_bot(),
        }
    }

    /// The blank cell cleared regions are filled with: the cursor
    /// template's styling around a space.
    pub(super) fn fill_glyph(&self) -> Glyph {
        self.cursor.attr().blank()
    }

    /// Moves down one row, scrolling when the cursor sits on the bottom
    /// margin; optionally returns to column zero.
    pub(super) fn newline(&mut self, first_col: bool) {
        let (x, mut y) = self.cursor.pos();
        if y == self.screen.scroll_bot() {
            let fill = self.fill_glyph();
            let top = self.screen.scroll_top();
            self.screen.scroll_up(top, 1, fill);
        } else {
            y += 1;
        }
        let ctx = self.ctx();
        let x = if first_col { 0 } else { x as isize };
        self.cursor.move_to(x, y as isize, &ctx);
    }

    /// Moves to the next (or previous) tab stop, stopping at the grid
    /// edge when none remains.
    pub(super) fn put_tab(&mut self, forward: bool) {
        let (mut x, y) = self.cursor.pos();
        if forward {
            let cols = self.screen.cols();
            if x + 1 < cols {
                x += 1;
                while x + 1 < cols && !self.screen.is_tabstop(x) {
                    x += 1;
                }
            }
        } else if x > 0 {
            x -= 1;
            while x > 0 && !self.screen.is_tabstop(x) {
                x -= 1;
            }
        }
        let ctx = self.ctx();
        self.cursor.move_to(x as isize, y as isize, &ctx);
    }

    /// Exchanges the visible grid and keeps the ALTSCREEN mode bit in
    /// step with it.
    pub(super) fn swap_screen(&mut self) {
        self.screen.swap_screen();
        self.mode.toggle(TermMode::ALTSCREEN);
    }

    /// Answers a DA or DECID query with the VT102 id, when a reply sink
    /// is attached.
    pub(super) fn identify(&mut self) {
        self.reply(VT102_ID);
    }

    fn reply(&mut self, bytes: &[u8]) {
        if let Some(sink) = &mut self.reply_sink {
            if let Err(e) = sink.write_all(bytes) {
                warn!("reply sink write failed: {}", e);
            }
        }
    }
}
