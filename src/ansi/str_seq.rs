// src/ansi/str_seq.rs

//! Accumulator for string-terminated sequences.
//!
//! These are the `ESC ] | P | _ | ^ | k` family (OSC, DCS, APC, PM and
//! the old xterm title escape): an introducer, a free-form payload, and a
//! String Terminator (`ESC \`) or BEL. The payload is split on `;` at
//! parse time; arguments can be read back as strings or numbers.
//!
//! The buffer is bounded. An oversized payload keeps its first 256 code
//! points and the rest is dropped until the terminator arrives, so a
//! stream that never terminates cannot absorb memory.

/// Longest payload retained, in code points.
const MAX_BUF: usize = 256;

/// Accumulator and parsed form of one string sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StrEscape {
    kind: char,
    buf: Vec<char>,
    args: Vec<String>,
}

impl StrEscape {
    pub fn reset(&mut self) {
        self.kind = '\0';
        self.buf.clear();
        self.args.clear();
    }

    /// Records which introducer opened the sequence.
    pub fn set_kind(&mut self, kind: char) {
        self.kind = kind;
    }

    /// Appends a payload code point, silently dropping past the bound.
    pub fn put(&mut self, c: char) {
        if self.buf.len() < MAX_BUF {
            self.buf.push(c);
        }
    }

    /// Splits the payload on `;` into arguments.
    pub fn parse(&mut self) {
        self.args = self
            .buf
            .split(|&c| c == ';')
            .map(|part| part.iter().collect())
            .collect();
    }

    #[must_use]
    pub fn kind(&self) -> char {
        self.kind
    }

    #[must_use]
    pub fn num_args(&self) -> usize {
        self.args.len()
    }

    /// Argument `i` parsed as an unsigned decimal, or `default`.
    #[must_use]
    pub fn arg(&self, i: usize, default: usize) -> usize {
        self.args
            .get(i)
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(default)
    }

    /// Argument `i` as a string slice, or `default`.
    #[must_use]
    pub fn arg_str<'a>(&'a self, i: usize, default: &'a str) -> &'a str {
        self.args.get(i).map_or(default, String::as_str)
    }
}
