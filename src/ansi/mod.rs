// src/ansi/mod.rs

//! Byte-level building blocks for the escape-sequence dispatcher.
//!
//! This module owns the pieces that turn raw PTY bytes into something the
//! state machine in `term` can act on: the incremental UTF-8 decoder and
//! the accumulators for CSI and string-terminated sequences. None of them
//! touch screen state; they only collect and parse.

pub mod csi;
pub mod str_seq;
pub mod utf8;
