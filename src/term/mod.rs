// src/term/mod.rs

//! The public terminal surface.
//!
//! `Terminal` wraps the emulation core in a read/write lock so one thread
//! can feed PTY output while another queries cells for rendering. Feeding
//! takes the write lock; queries take the read lock and always observe a
//! consistent state; a sequence is applied in full within one lock hold.

pub mod charset;
pub(crate) mod cursor;
pub(crate) mod emulator;
pub mod modes;
pub(crate) mod screen;

#[cfg(test)]
mod tests;

use std::io;

use log::warn;
use parking_lot::RwLock;

use crate::ansi::utf8::{self, Decoded};
use crate::color::Color;
use crate::config::Config;
use emulator::Emulator;
pub use emulator::{ReplySink, ResizeHook};
pub use modes::TermMode;

/// Code points processed per write-lock hold during a bulk feed. Long
/// feeds release the lock at this quantum (only while the parser sits in
/// ground state) so renderer reads can interleave.
const FEED_QUANTUM: usize = 1024;

/// A headless terminal: bytes in, screen model out.
pub struct Terminal {
    inner: RwLock<Emulator>,
}

impl Terminal {
    /// Creates an engine with `cols` x `rows` cells (each clamped to at
    /// least 1) and default configuration.
    #[must_use]
    pub fn new(cols: usize, rows: usize) -> Self {
        Self::with_config(cols, rows, Config::default())
    }

    #[must_use]
    pub fn with_config(cols: usize, rows: usize, config: Config) -> Self {
        Terminal {
            inner: RwLock::new(Emulator::new(cols, rows, config)),
        }
    }

    /// Installs the sink that receives answerback sequences (DA, DECID)
    /// destined for the attached process.
    pub fn set_reply_sink(&self, sink: ReplySink) {
        self.inner.write().set_reply_sink(sink);
    }

    /// Installs the callback notified with `(cols, rows)` after every
    /// resize, for TTY window-size propagation.
    pub fn set_resize_hook(&self, hook: ResizeHook) {
        self.inner.write().set_resize_hook(hook);
    }

    /// Feeds bytes to the parser and returns how many were consumed.
    ///
    /// The unconsumed tail is always a partial UTF-8 sequence; call again
    /// with those bytes plus whatever arrives next. A malformed byte is
    /// logged and dispatched as U+FFFD; sequence-level garbage degrades
    /// the display, never the session.
    pub fn feed(&self, bytes: &[u8]) -> usize {
        let mut consumed = 0;
        let mut quantum = 0;
        let mut emulator = self.inner.write();
        while consumed < bytes.len() {
            match utf8::decode(&bytes[consumed..]) {
                Decoded::Rune(c, len) => {
                    emulator.advance(c);
                    consumed += len;
                }
                Decoded::Invalid => {
                    warn!("invalid utf8 byte 0x{:02x}", bytes[consumed]);
                    emulator.advance(char::REPLACEMENT_CHARACTER);
                    consumed += 1;
                }
                Decoded::Incomplete => break,
            }
            quantum += 1;
            if quantum >= FEED_QUANTUM && emulator.in_ground() {
                quantum = 0;
                drop(emulator);
                emulator = self.inner.write();
            }
        }
        consumed
    }

    /// Changes the grid size, preserving overlapping content on both
    /// screens. Returns whether content slid up to keep the cursor
    /// visible. Zero dimensions are ignored.
    pub fn resize(&self, cols: usize, rows: usize) -> bool {
        self.inner.write().resize(cols, rows)
    }

    /// Restores the freshly-constructed state (RIS).
    pub fn reset(&self) {
        self.inner.write().reset();
    }

    /// Reads the code point and colors of the cell at `(x, y)` on the
    /// visible grid. Out-of-range coordinates read as blank cells.
    pub fn cell(&self, x: usize, y: usize) -> (char, Color, Color) {
        self.inner.read().cell(x, y)
    }

    /// Current cursor position as `(x, y)`.
    pub fn cursor(&self) -> (usize, usize) {
        self.inner.read().cursor_pos()
    }

    pub fn cursor_hidden(&self) -> bool {
        self.inner.read().mode().contains(TermMode::HIDE)
    }

    /// Tests one mode bit (or any-of for a composite mask).
    pub fn mode(&self, flag: TermMode) -> bool {
        self.inner.read().mode().intersects(flag)
    }

    pub fn cols(&self) -> usize {
        self.inner.read().screen.cols()
    }

    pub fn rows(&self) -> usize {
        self.inner.read().screen.rows()
    }

    /// Whether row `y` changed since the dirty flags were last cleared.
    pub fn line_dirty(&self, y: usize) -> bool {
        self.inner.read().screen.line_dirty(y)
    }

    /// Marks every row clean; call after a full redraw.
    pub fn clear_dirty(&self) {
        self.inner.write().screen.mark_all_clean();
    }
}

impl io::Write for Terminal {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(self.feed(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl io::Write for &Terminal {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(self.feed(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
