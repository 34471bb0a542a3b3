// src/lib.rs

//! A headless VT/ANSI terminal emulation engine.
//!
//! `vtcore` consumes the byte stream a pseudo-terminal produces (UTF-8
//! text interleaved with control codes and ANSI/DEC escape sequences)
//! and maintains the screen model a front-end renders: a grid of styled
//! glyphs, a cursor, tab stops and mode flags. It contains no display
//! code, no font handling, no keyboard translation and no PTY plumbing;
//! those live in the embedder.
//!
//! ```
//! use vtcore::Terminal;
//!
//! let term = Terminal::new(80, 24);
//! term.feed(b"hi \x1b[1;31mthere\x1b[0m");
//!
//! let (c, fg, _bg) = term.cell(3, 0);
//! assert_eq!(c, 't');
//! assert_eq!(fg, vtcore::Color::RED);
//! assert_eq!(term.cursor(), (8, 0));
//! ```
//!
//! Diagnostics go through the [`log`] facade; install any logger to see
//! unknown sequences and malformed input reported at `warn` level.

pub mod ansi;
pub mod color;
pub mod config;
pub mod glyph;
pub mod term;

pub use color::Color;
pub use config::Config;
pub use glyph::{AttrFlags, Glyph};
pub use term::{ReplySink, ResizeHook, TermMode, Terminal};
