// src/term/emulator/csi_handler.rs

//! CSI dispatch: cursor motion, clearing, scrolling, mode set/reset and
//! SGR attribute handling.
//!
//! Every destination coordinate goes through the cursor controller, which
//! clamps to the grid (or to the scroll region under origin mode) and
//! clears the pending wrap. Unknown finals and mode numbers are logged
//! and dropped; a malformed sequence never aborts the stream.

use log::warn;

use super::Emulator;
use crate::color::Color;
use crate::glyph::AttrFlags;
use crate::term::cursor::CursorState;
use crate::term::modes::{EraseMode, TabClearMode, TermMode};

impl Emulator {
    pub(super) fn handle_csi(&mut self) {
        let (x, y) = self.cursor.pos();
        let ctx = self.ctx();
        // Count-like parameters treat 0 as 1 (ECMA-48 default rule).
        let count = self.csi.arg(0, 1).max(1);
        match self.csi.final_byte() {
            b'@' => {
                // ICH: insert blanks at the cursor, shifting right
                let fill = self.fill_glyph();
                self.screen.insert_blank_chars_in_line(y, x, count, fill);
            }
            b'A' => {
                // CUU
                self.cursor
                    .move_to(x as isize, y as isize - count as isize, &ctx);
            }
            b'B' | b'e' => {
                // CUD, VPR
                self.cursor
                    .move_to(x as isize, y as isize + count as isize, &ctx);
            }
            b'c' => {
                // DA
                if self.csi.arg(0, 0) == 0 {
                    self.identify();
                }
            }
            b'C' | b'a' => {
                // CUF, HPR
                self.cursor
                    .move_to(x as isize + count as isize, y as isize, &ctx);
            }
            b'D' => {
                // CUB
                self.cursor
                    .move_to(x as isize - count as isize, y as isize, &ctx);
            }
            b'E' => {
                // CNL
                self.cursor.move_to(0, y as isize + count as isize, &ctx);
            }
            b'F' => {
                // CPL
                self.cursor.move_to(0, y as isize - count as isize, &ctx);
            }
            b'g' => match TabClearMode::from(self.csi.arg(0, 0)) {
                TabClearMode::CurrentColumn => self.screen.clear_tabstop(x),
                TabClearMode::All => self.screen.clear_all_tabstops(),
                TabClearMode::Unknown => {}
            },
            b'G' | b'`' => {
                // CHA, HPA: 1-based column
                self.cursor.move_to(count as isize - 1, y as isize, &ctx);
            }
            b'H' | b'f' => {
                // CUP, HVP: 1-based row;col, origin-aware
                let row = self.csi.arg(0, 1).max(1) - 1;
                let col = self.csi.arg(1, 1).max(1) - 1;
                self.cursor.move_abs_to(col as isize, row as isize, &ctx);
            }
            b'I' => {
                // CHT; more stops than columns cannot exist
                for _ in 0..count.min(self.screen.cols()) {
                    self.put_tab(true);
                }
            }
            b'J' => self.erase_in_display(EraseMode::from(self.csi.arg(0, 0))),
            b'K' => self.erase_in_line(EraseMode::from(self.csi.arg(0, 0))),
            b'S' => {
                // SU
                let fill = self.fill_glyph();
                let top = self.screen.scroll_top();
                self.screen.scroll_up(top, count, fill);
            }
            b'T' => {
                // SD
                let fill = self.fill_glyph();
                let top = self.screen.scroll_top();
                self.screen.scroll_down(top, count, fill);
            }
            b'L' => self.insert_blank_lines(count),
            b'M' => self.delete_lines(count),
            b'X' => {
                // ECH
                let fill = self.fill_glyph();
                self.screen.clear_region(x, y, x + count - 1, y, fill);
            }
            b'P' => {
                // DCH
                let fill = self.fill_glyph();
                self.screen.delete_chars_in_line(y, x, count, fill);
            }
            b'Z' => {
                // CBT
                for _ in 0..count.min(self.screen.cols()) {
                    self.put_tab(false);
                }
            }
            b'd' => {
                // VPA: 1-based row, origin-aware
                self.cursor.move_abs_to(x as isize, count as isize - 1, &ctx);
            }
            b'h' => self.set_modes(true),
            b'l' => self.set_modes(false),
            b'm' => self.handle_sgr(),
            b'r' => {
                // DECSTBM
                if self.csi.private() {
                    warn!("unknown private CSI sequence: {:?}", self.csi.raw());
                } else {
                    let rows = self.screen.rows();
                    let top = self.csi.arg(0, 1).max(1) - 1;
                    // an explicit or missing 0 means the last row
                    let bot = match self.csi.arg(1, rows) {
                        0 => rows,
                        v => v,
                    } - 1;
                    self.screen.set_scrolling_region(top, bot);
                    let ctx = self.ctx();
                    self.cursor.move_abs_to(0, 0, &ctx);
                }
            }
            b's' => self.cursor.save(),
            b'u' => {
                let ctx = self.ctx();
                self.cursor.restore(&ctx);
            }
            _ => warn!("unknown CSI sequence: {:?}", self.csi.raw()),
        }
    }

    fn erase_in_display(&mut self, mode: EraseMode) {
        let (x, y) = self.cursor.pos();
        let cols = self.screen.cols();
        let rows = self.screen.rows();
        let fill = self.fill_glyph();
        match mode {
            EraseMode::ToEnd => {
                self.screen.clear_region(x, y, cols - 1, y, fill);
                if y < rows - 1 {
                    self.screen.clear_region(0, y + 1, cols - 1, rows - 1, fill);
                }
            }
            EraseMode::ToStart => {
                if y > 0 {
                    self.screen.clear_region(0, 0, cols - 1, y - 1, fill);
                }
                self.screen.clear_region(0, y, x, y, fill);
            }
            EraseMode::All => self.screen.clear_region(0, 0, cols - 1, rows - 1, fill),
            EraseMode::Unknown => {}
        }
    }

    fn erase_in_line(&mut self, mode: EraseMode) {
        let (x, y) = self.cursor.pos();
        let cols = self.screen.cols();
        let fill = self.fill_glyph();
        match mode {
            EraseMode::ToEnd => self.screen.clear_region(x, y, cols - 1, y, fill),
            EraseMode::ToStart => self.screen.clear_region(0, y, x, y, fill),
            EraseMode::All => self.screen.clear_region(0, y, cols - 1, y, fill),
            EraseMode::Unknown => {}
        }
    }

    /// IL: blank lines open at the cursor row, pushing the rest of the
    /// region down. Inert when the cursor is outside the scroll region.
    fn insert_blank_lines(&mut self, n: usize) {
        let (_, y) = self.cursor.pos();
        if y >= self.screen.scroll_top() && y <= self.screen.scroll_bot() {
            let fill = self.fill_glyph();
            self.screen.scroll_down(y, n, fill);
        }
    }

    /// DL: lines vanish at the cursor row, pulling the rest of the region
    /// up. Inert outside the scroll region.
    fn delete_lines(&mut self, n: usize) {
        let (_, y) = self.cursor.pos();
        if y >= self.screen.scroll_top() && y <= self.screen.scroll_bot() {
            let fill = self.fill_glyph();
            self.screen.scroll_up(y, n, fill);
        }
    }

    /// SM/RM over every parameter of the sequence.
    fn set_modes(&mut self, set: bool) {
        let private = self.csi.private();
        let args = self.csi.args().to_vec();
        for arg in args {
            self.set_mode(private, set, arg);
        }
    }

    fn set_mode(&mut self, private: bool, set: bool, code: usize) {
        if private {
            self.set_private_mode(set, code);
            return;
        }
        match code {
            2 => self.mode.set(TermMode::KBDLOCK, set), // KAM
            4 => self.mode.set(TermMode::INSERT, set),  // IRM
            // SRM: "send/receive" set means local echo off
            12 => self.mode.set(TermMode::ECHO, !set),
            20 => self.mode.set(TermMode::CRLF, set), // LNM
            _ => warn!("unknown set/reset mode {}", code),
        }
    }

    fn set_private_mode(&mut self, set: bool, code: usize) {
        match code {
            1 => self.mode.set(TermMode::APPCURSOR, set), // DECCKM
            5 => {
                // DECSCNM: a pure repaint concern, but the whole screen
                // changes appearance
                self.mode.set(TermMode::REVERSE, set);
                self.screen.mark_all_dirty();
            }
            6 => {
                // DECOM: re-home relative to the new addressing origin
                self.cursor
                    .cursor_mut()
                    .state
                    .set(CursorState::ORIGIN, set);
                let ctx = self.ctx();
                self.cursor.move_abs_to(0, 0, &ctx);
            }
            7 => self.mode.set(TermMode::WRAP, set), // DECAWM
            // DECTCEM has inverse sense: set means visible
            25 => self.mode.set(TermMode::HIDE, !set),
            9 | 1000 | 1002 | 1003 => {
                // Mouse protocols are mutually exclusive; selecting one
                // clears the mask first.
                self.mode.remove(TermMode::MOUSE_MASK);
                let bit = match code {
                    9 => TermMode::MOUSEX10,
                    1000 => TermMode::MOUSEBTN,
                    1002 => TermMode::MOUSEMOTION,
                    _ => TermMode::MOUSEMANY,
                };
                self.mode.set(bit, set);
            }
            12 => self.mode.set(TermMode::BLINK, set), // att610 cursor blink
            1004 => self.mode.set(TermMode::FOCUS, set),
            1006 => self.mode.set(TermMode::MOUSESGR, set),
            1034 => self.mode.set(TermMode::EIGHT_BIT, set),
            1048 => {
                if set {
                    self.cursor.save();
                } else {
                    let ctx = self.ctx();
                    self.cursor.restore(&ctx);
                }
            }
            47 | 1047 => self.set_alt_screen(set),
            1049 => {
                // 1047 plus cursor save/restore, in xterm's order
                if !self.config.allow_alt_screen {
                    warn!("alternate screen disabled by configuration, ignoring mode 1049");
                    return;
                }
                if set {
                    self.cursor.save();
                    self.set_alt_screen(true);
                } else {
                    self.set_alt_screen(false);
                    let ctx = self.ctx();
                    self.cursor.restore(&ctx);
                }
            }
            _ => warn!("unknown private set/reset mode {}", code),
        }
    }

    /// Modes 47/1047/1049: the alternate screen starts blank on entry and
    /// is preserved on exit for the next visit.
    fn set_alt_screen(&mut self, set: bool) {
        if !self.config.allow_alt_screen {
            warn!("alternate screen disabled by configuration, ignoring swap");
            return;
        }
        let alt = self.mode.contains(TermMode::ALTSCREEN);
        if set && !alt {
            let fill = self.fill_glyph();
            self.screen.clear_alt(fill);
            self.swap_screen();
        } else if !set && alt {
            self.swap_screen();
        }
    }

    /// SGR: folds the parameter list into the cursor template. An empty
    /// list is a reset.
    fn handle_sgr(&mut self) {
        let args: Vec<usize> = if self.csi.args().is_empty() {
            vec![0]
        } else {
            self.csi.args().to_vec()
        };
        let mut attr = self.cursor.attr();
        let mut i = 0;
        while i < args.len() {
            match args[i] {
                0 => {
                    // Style bits only; the charset and wrap bits are not
                    // rendition state.
                    attr.flags.remove(
                        AttrFlags::BOLD
                            | AttrFlags::ITALIC
                            | AttrFlags::UNDERLINE
                            | AttrFlags::BLINK
                            | AttrFlags::REVERSE,
                    );
                    attr.fg = Color::DEFAULT_FG;
                    attr.bg = Color::DEFAULT_BG;
                }
                1 => attr.flags.insert(AttrFlags::BOLD),
                3 => attr.flags.insert(AttrFlags::ITALIC),
                4 => attr.flags.insert(AttrFlags::UNDERLINE),
                5 | 6 => attr.flags.insert(AttrFlags::BLINK),
                7 => attr.flags.insert(AttrFlags::REVERSE),
                21 | 22 => attr.flags.remove(AttrFlags::BOLD),
                23 => attr.flags.remove(AttrFlags::ITALIC),
                24 => attr.flags.remove(AttrFlags::UNDERLINE),
                25 | 26 => attr.flags.remove(AttrFlags::BLINK),
                27 => attr.flags.remove(AttrFlags::REVERSE),
                38 => {
                    if let Some(idx) = indexed_color(&args, &mut i) {
                        attr.fg = Color(idx);
                    }
                }
                39 => attr.fg = Color::DEFAULT_FG,
                48 => {
                    if let Some(idx) = indexed_color(&args, &mut i) {
                        attr.bg = Color(idx);
                    }
                }
                49 => attr.bg = Color::DEFAULT_BG,
                n @ 30..=37 => attr.fg = Color((n - 30) as u16),
                n @ 40..=47 => attr.bg = Color((n - 40) as u16),
                n @ 90..=97 => attr.fg = Color((n - 90 + 8) as u16),
                n @ 100..=107 => attr.bg = Color((n - 100 + 8) as u16),
                n => warn!("gfx attr {} unknown", n),
            }
            i += 1;
        }
        self.cursor.set_attr(attr);
    }
}

/// Parses the `38;5;N` / `48;5;N` indexed-color form starting at `args[*i]`.
/// On the well-formed shape the two extra parameters are consumed even if
/// the index is out of range, so the following parameters stay intact.
fn indexed_color(args: &[usize], i: &mut usize) -> Option<u16> {
    if *i + 2 < args.len() && args[*i + 1] == 5 {
        *i += 2;
        let idx = args[*i];
        if idx <= 255 {
            Some(idx as u16)
        } else {
            warn!("bad color index {}", idx);
            None
        }
    } else {
        warn!("gfx attr {} unknown", args[*i]);
        None
    }
}
