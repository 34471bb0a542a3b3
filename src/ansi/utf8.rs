// src/ansi/utf8.rs

//! Incremental UTF-8 decoding over byte slices.
//!
//! `decode` classifies the head of a slice without looking past the first
//! code point, so a caller can feed arbitrary chunks: a chunk ending in
//! the middle of a multi-byte sequence is reported as incomplete and the
//! caller retries with those bytes plus whatever arrives next.

use std::str;

// First-byte classification bounds (RFC 3629). 0xC0/0xC1 start overlong
// encodings and 0xF5..=0xFF exceed U+10FFFF, so neither is a valid lead.
const UTF8_2_BYTE_MIN: u8 = 0xC2;
const UTF8_2_BYTE_MAX: u8 = 0xDF;
const UTF8_3_BYTE_MIN: u8 = 0xE0;
const UTF8_3_BYTE_MAX: u8 = 0xEF;
const UTF8_4_BYTE_MIN: u8 = 0xF0;
const UTF8_4_BYTE_MAX: u8 = 0xF4;
const UTF8_CONT_MIN: u8 = 0x80;
const UTF8_CONT_MAX: u8 = 0xBF;

/// Outcome of decoding the head of a byte slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoded {
    /// A complete code point occupying `len` bytes of the slice.
    Rune(char, usize),
    /// Malformed input at the head; the caller consumes one byte and
    /// dispatches U+FFFD in its place.
    Invalid,
    /// The slice ends inside a multi-byte sequence; no bytes consumed.
    Incomplete,
}

/// Decodes one code point from the head of `bytes`.
pub fn decode(bytes: &[u8]) -> Decoded {
    let Some(&first) = bytes.first() else {
        return Decoded::Incomplete;
    };
    let want = match first {
        0x00..=0x7F => return Decoded::Rune(first as char, 1),
        UTF8_2_BYTE_MIN..=UTF8_2_BYTE_MAX => 2,
        UTF8_3_BYTE_MIN..=UTF8_3_BYTE_MAX => 3,
        UTF8_4_BYTE_MIN..=UTF8_4_BYTE_MAX => 4,
        _ => return Decoded::Invalid,
    };
    if bytes.len() < want {
        // Only a tail of valid continuation bytes counts as truncated;
        // a broken sequence must not stall the stream waiting for more.
        let tail_ok = bytes[1..]
            .iter()
            .all(|&b| (UTF8_CONT_MIN..=UTF8_CONT_MAX).contains(&b));
        if tail_ok {
            return Decoded::Incomplete;
        }
        return Decoded::Invalid;
    }
    // `from_utf8` is strict: overlong forms and surrogate code points in
    // an E0/ED prefix come back as errors here.
    match str::from_utf8(&bytes[..want]) {
        Ok(s) => match s.chars().next() {
            Some(c) => Decoded::Rune(c, want),
            None => Decoded::Invalid,
        },
        Err(_) => Decoded::Invalid,
    }
}
