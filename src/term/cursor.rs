// src/term/cursor.rs

//! Cursor state and clamped movement.
//!
//! The controller owns the live cursor and the DECSC/DECRC saved copy and
//! is the single place movement clamping happens. Coordinates are
//! absolute grid positions; origin mode only changes which rows a move
//! may land on and, for the absolute-addressing forms in `move_abs_to`,
//! where row zero sits.

use bitflags::bitflags;

use crate::glyph::Glyph;

bitflags! {
    /// Cursor state bits, saved and restored with the cursor.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct CursorState: u8 {
        /// The last write filled the rightmost column; the next printable
        /// code point wraps before being placed.
        const WRAP_NEXT = 1 << 0;
        /// Origin mode (DECOM): absolute row addressing is relative to
        /// the scroll top and the cursor is confined to the region.
        const ORIGIN    = 1 << 1;
    }
}

/// The cursor: position, paint template and state bits.
///
/// `attr` is a value, not a reference: SGR changes replace the template
/// and must never retroactively restyle cells already on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pub x: usize,
    pub y: usize,
    /// Template glyph whose styling is copied into every cell the cursor
    /// writes. Its code point is ignored.
    pub attr: Glyph,
    pub state: CursorState,
}

/// Boundary information movement clamps against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenContext {
    pub cols: usize,
    pub rows: usize,
    pub scroll_top: usize,
    pub scroll_bot: usize,
}

/// Owns the live and saved cursor and performs clamped moves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CursorController {
    cursor: Cursor,
    saved: Cursor,
}

fn clamp(v: isize, lo: usize, hi: usize) -> usize {
    if v < lo as isize {
        lo
    } else if v > hi as isize {
        hi
    } else {
        v as usize
    }
}

impl CursorController {
    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn cursor_mut(&mut self) -> &mut Cursor {
        &mut self.cursor
    }

    pub fn pos(&self) -> (usize, usize) {
        (self.cursor.x, self.cursor.y)
    }

    pub fn attr(&self) -> Glyph {
        self.cursor.attr
    }

    pub fn set_attr(&mut self, attr: Glyph) {
        self.cursor.attr = attr;
    }

    /// Moves to `(x, y)`, clamped to the grid and, in origin mode, to the
    /// scroll region. Any explicit move clears the pending wrap.
    pub fn move_to(&mut self, x: isize, y: isize, ctx: &ScreenContext) {
        let (min_y, max_y) = if self.cursor.state.contains(CursorState::ORIGIN) {
            (ctx.scroll_top, ctx.scroll_bot)
        } else {
            (0, ctx.rows.saturating_sub(1))
        };
        self.cursor.state.remove(CursorState::WRAP_NEXT);
        self.cursor.x = clamp(x, 0, ctx.cols.saturating_sub(1));
        self.cursor.y = clamp(y, min_y, max_y);
    }

    /// Absolute addressing for CUP/HVP/VPA: in origin mode the requested
    /// row is relative to the scroll top.
    pub fn move_abs_to(&mut self, x: isize, y: isize, ctx: &ScreenContext) {
        let offset = if self.cursor.state.contains(CursorState::ORIGIN) {
            ctx.scroll_top as isize
        } else {
            0
        };
        self.move_to(x, y + offset, ctx);
    }

    /// DECSC.
    pub fn save(&mut self) {
        self.saved = self.cursor;
    }

    /// DECRC. The restored position is re-clamped against the current
    /// bounds in case the screen changed since the save.
    pub fn restore(&mut self, ctx: &ScreenContext) {
        self.cursor = self.saved;
        self.move_to(self.cursor.x as isize, self.cursor.y as isize, ctx);
    }

    pub fn reset(&mut self) {
        self.cursor = Cursor::default();
        self.saved = Cursor::default();
    }
}
