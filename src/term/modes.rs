// src/term/modes.rs

//! Terminal mode flags and numeric decoders for mode-changing sequences.

use bitflags::bitflags;
use log::warn;

bitflags! {
    /// The terminal's mode bits, public and internal.
    ///
    /// Most bits are toggled by SM/RM (`CSI h` / `CSI l`) or by the
    /// keypad escapes; a few (BLINK, FBLINK) exist only so the full flag
    /// set round-trips through queries.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TermMode: u32 {
        /// Auto-wrap at the right edge (DECAWM).
        const WRAP        = 1 << 0;
        /// Insert rather than replace on write (IRM).
        const INSERT      = 1 << 1;
        /// Application keypad (DECPAM / DECPNM).
        const APPKEYPAD   = 1 << 2;
        /// The alternate grid is active.
        const ALTSCREEN   = 1 << 3;
        /// LF implies CR (LNM).
        const CRLF        = 1 << 4;
        const MOUSEBTN    = 1 << 5;
        const MOUSEMOTION = 1 << 6;
        /// Reverse video (DECSCNM).
        const REVERSE     = 1 << 7;
        /// Keyboard action mode (KAM).
        const KBDLOCK     = 1 << 8;
        /// The cursor is hidden (inverse of DECTCEM).
        const HIDE        = 1 << 9;
        /// Local echo (inverse of SRM).
        const ECHO        = 1 << 10;
        /// Application cursor keys (DECCKM).
        const APPCURSOR   = 1 << 11;
        /// SGR mouse coordinate encoding.
        const MOUSESGR    = 1 << 12;
        /// 8-bit input mode.
        const EIGHT_BIT   = 1 << 13;
        const BLINK       = 1 << 14;
        const FBLINK      = 1 << 15;
        /// Focus-in/focus-out reporting.
        const FOCUS       = 1 << 16;
        const MOUSEX10    = 1 << 17;
        const MOUSEMANY   = 1 << 18;

        /// Union of the mouse-reporting modes; enabling one clears the
        /// others first.
        const MOUSE_MASK = Self::MOUSEBTN.bits()
            | Self::MOUSEMOTION.bits()
            | Self::MOUSEX10.bits()
            | Self::MOUSEMANY.bits();
    }
}

/// Modes for ED (erase in display) and EL (erase in line).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EraseMode {
    /// Cursor to end of screen/line.
    ToEnd,
    /// Beginning of screen/line to cursor.
    ToStart,
    /// Everything.
    All,
    Unknown,
}

impl From<usize> for EraseMode {
    fn from(value: usize) -> Self {
        match value {
            0 => EraseMode::ToEnd,
            1 => EraseMode::ToStart,
            2 => EraseMode::All,
            _ => {
                warn!("unknown erase mode {}", value);
                EraseMode::Unknown
            }
        }
    }
}

/// Modes for TBC (tabulation clear).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabClearMode {
    /// Clear the stop at the cursor column.
    CurrentColumn,
    /// Clear every stop.
    All,
    Unknown,
}

impl From<usize> for TabClearMode {
    fn from(value: usize) -> Self {
        match value {
            0 => TabClearMode::CurrentColumn,
            3 => TabClearMode::All,
            _ => {
                warn!("unknown tab clear mode {}", value);
                TabClearMode::Unknown
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{EraseMode, TabClearMode, TermMode};

    #[test]
    fn mouse_mask_covers_exactly_the_mouse_modes() {
        let by_hand = TermMode::MOUSEBTN
            | TermMode::MOUSEMOTION
            | TermMode::MOUSEX10
            | TermMode::MOUSEMANY;
        assert_eq!(TermMode::MOUSE_MASK, by_hand);
        assert!(!TermMode::MOUSE_MASK.contains(TermMode::MOUSESGR));
    }

    #[test]
    fn erase_and_tab_modes_decode() {
        assert_eq!(EraseMode::from(0), EraseMode::ToEnd);
        assert_eq!(EraseMode::from(2), EraseMode::All);
        assert_eq!(EraseMode::from(9), EraseMode::Unknown);
        assert_eq!(TabClearMode::from(0), TabClearMode::CurrentColumn);
        assert_eq!(TabClearMode::from(3), TabClearMode::All);
        assert_eq!(TabClearMode::from(1), TabClearMode::Unknown);
    }
}
