// src/glyph.rs

//! Defines the `Glyph` cell type and its attribute flags.
//!
//! A `Glyph` is one character cell of the screen grid: a code point plus
//! the styling that was in effect when it was written. The cursor carries
//! a `Glyph` of its own as the template whose styling is copied into
//! every cell it writes.

use bitflags::bitflags;

use crate::color::Color;

bitflags! {
    /// Per-cell attribute bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct AttrFlags: u16 {
        const REVERSE   = 1 << 0;
        const UNDERLINE = 1 << 1;
        const BOLD      = 1 << 2;
        /// The DEC graphics (line drawing) charset is selected.
        const GFX       = 1 << 3;
        const ITALIC    = 1 << 4;
        const BLINK     = 1 << 5;
        /// Set on the last cell of a row that auto-wrapped, so a renderer
        /// or reflow pass can reassemble logical lines.
        const WRAP      = 1 << 6;
    }
}

/// A single character cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub c: char,
    pub flags: AttrFlags,
    pub fg: Color,
    pub bg: Color,
}

impl Default for Glyph {
    /// A blank cell with default colors and no attributes.
    fn default() -> Self {
        Glyph {
            c: ' ',
            flags: AttrFlags::empty(),
            fg: Color::DEFAULT_FG,
            bg: Color::DEFAULT_BG,
        }
    }
}

impl Glyph {
    /// A blank cell carrying this glyph's styling. Cleared regions are
    /// filled with the cursor template's blank.
    #[must_use]
    pub fn blank(self) -> Glyph {
        Glyph { c: ' ', ..self }
    }
}
