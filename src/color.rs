// src/color.rs

//! Palette color indices.
//!
//! Colors are 16-bit indices into an abstract 256-entry palette. The two
//! default-color sentinels live well above the palette range so that
//! "no explicit color" stays distinguishable from any concrete index; a
//! front-end can map them to a configurable pair, a transparent
//! background, or whatever else it likes.

/// A palette index, or one of the default-color sentinels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Color(pub u16);

impl Color {
    pub const BLACK: Color = Color(0);
    pub const RED: Color = Color(1);
    pub const GREEN: Color = Color(2);
    pub const YELLOW: Color = Color(3);
    pub const BLUE: Color = Color(4);
    pub const MAGENTA: Color = Color(5);
    pub const CYAN: Color = Color(6);
    pub const LIGHT_GREY: Color = Color(7);
    pub const DARK_GREY: Color = Color(8);
    pub const LIGHT_RED: Color = Color(9);
    pub const LIGHT_GREEN: Color = Color(10);
    pub const LIGHT_YELLOW: Color = Color(11);
    pub const LIGHT_BLUE: Color = Color(12);
    pub const LIGHT_MAGENTA: Color = Color(13);
    pub const LIGHT_CYAN: Color = Color(14);
    pub const WHITE: Color = Color(15);

    /// Default foreground sentinel.
    pub const DEFAULT_FG: Color = Color(0xff90);
    /// Default background sentinel.
    pub const DEFAULT_BG: Color = Color(0xff91);

    /// Returns true for the 16 basic ANSI colors.
    #[must_use]
    pub fn is_ansi(self) -> bool {
        self.0 < 16
    }

    /// Returns true for any concrete palette index (not a sentinel).
    #[must_use]
    pub fn is_indexed(self) -> bool {
        self.0 < 256
    }
}
