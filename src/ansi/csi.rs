// src/ansi/csi.rs

//! The CSI (Control Sequence Introducer, `ESC [`) accumulator.
//!
//! Bytes after `ESC [` collect in a buffer until a final byte in
//! `0x40..=0x7E` arrives, then the body is parsed into
//! `{private?, params[], final}`. The buffer is bounded; overflowing it
//! forces a parse so a hostile stream cannot grow memory.

use log::warn;

/// Longest CSI body accepted before a parse is forced.
const MAX_BUF: usize = 256;

/// Accumulator and parsed form of one CSI sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsiEscape {
    buf: Vec<u8>,
    args: Vec<usize>,
    private: bool,
    final_byte: u8,
}

impl CsiEscape {
    pub fn reset(&mut self) {
        self.buf.clear();
        self.args.clear();
        self.private = false;
        self.final_byte = 0;
    }

    /// Feeds one byte. Returns true when a final byte (or overflow)
    /// completed the sequence and the accumulator has been parsed.
    pub fn put(&mut self, b: u8) -> bool {
        self.buf.push(b);
        if (0x40..=0x7E).contains(&b) || self.buf.len() >= MAX_BUF {
            self.parse();
            return true;
        }
        false
    }

    /// Parses the buffered body: an optional leading `?`, `;`-separated
    /// unsigned decimal parameters, and the trailing final byte. A
    /// malformed parameter stops parameter parsing; missing values fall
    /// back to per-operation defaults via `arg`.
    pub fn parse(&mut self) {
        self.args.clear();
        self.private = false;
        let mut body: &[u8] = &self.buf;
        if body.first() == Some(&b'?') {
            self.private = true;
            body = &body[1..];
        }
        let Some((&last, params)) = body.split_last() else {
            self.final_byte = 0;
            return;
        };
        self.final_byte = last;
        for field in params.split(|&b| b == b';') {
            let parsed = std::str::from_utf8(field)
                .ok()
                .and_then(|s| s.parse::<usize>().ok());
            match parsed {
                // Nothing addressable needs more than 16 bits; the clamp
                // keeps downstream coordinate arithmetic overflow-free.
                Some(v) => self.args.push(v.min(u16::MAX as usize)),
                None => {
                    if !field.is_empty() {
                        warn!(
                            "bad CSI parameter {:?} in {:?}",
                            String::from_utf8_lossy(field),
                            String::from_utf8_lossy(&self.buf)
                        );
                    }
                    break;
                }
            }
        }
    }

    /// Returns parameter `i`, or `default` when absent.
    #[must_use]
    pub fn arg(&self, i: usize, default: usize) -> usize {
        self.args.get(i).copied().unwrap_or(default)
    }

    #[must_use]
    pub fn args(&self) -> &[usize] {
        &self.args
    }

    #[must_use]
    pub fn private(&self) -> bool {
        self.private
    }

    #[must_use]
    pub fn final_byte(&self) -> u8 {
        self.final_byte
    }

    /// The raw body, for diagnostics on unknown sequences.
    #[must_use]
    pub fn raw(&self) -> String {
        String::from_utf8_lossy(&self.buf).into_owned()
    }
}
