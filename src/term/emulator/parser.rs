// src/term/emulator/parser.rs

//! The dispatcher state machine.
//!
//! Each decoded code point is routed through the current parser state.
//! Control codes are executed immediately even in the middle of a CSI or
//! escape sequence; they must act the moment they arrive, mid-sequence or
//! not. Every transition is a total function from `(state, code point)`
//! to `(state, effects)`.

use log::warn;

use super::Emulator;
use crate::color::Color;
use crate::glyph::AttrFlags;
use crate::term::charset::map_graphics;
use crate::term::cursor::CursorState;
use crate::term::modes::TermMode;

/// Dispatcher states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum ParserState {
    /// Printable text and bare control codes.
    #[default]
    Ground,
    /// After `ESC`.
    Escape,
    /// Collecting a control sequence body (`ESC [`).
    Csi,
    /// Collecting a string-sequence payload (`ESC ] P _ ^ k`).
    Str,
    /// Saw `ESC` inside a string sequence; expecting `\` to terminate.
    StrEnd,
    /// Selecting the G0 charset (`ESC (`).
    Charset,
    /// DEC test sequences (`ESC #`).
    Test,
}

fn is_control_code(c: char) -> bool {
    (c as u32) < 0x20 || c == '\u{7f}'
}

impl Emulator {
    /// Advances the state machine by one decoded code point.
    pub(crate) fn advance(&mut self, c: char) {
        match self.state {
            ParserState::Ground => self.parse_ground(c),
            ParserState::Escape => self.parse_esc(c),
            ParserState::Csi => self.parse_esc_csi(c),
            ParserState::Str => self.parse_esc_str(c),
            ParserState::StrEnd => self.parse_esc_str_end(c),
            ParserState::Charset => self.parse_esc_charset(c),
            ParserState::Test => self.parse_esc_test(c),
        }
    }

    fn parse_ground(&mut self, c: char) {
        if is_control_code(c) {
            // An unrecognized control code only reaches the grid when the
            // graphics charset is live; the remap table knows what to do
            // with it, plain text mode does not.
            if self.handle_control_code(c)
                || !self.cursor.attr().flags.contains(AttrFlags::GFX)
            {
                return;
            }
        }
        self.place_char(c);
    }

    /// Places a printable code point at the cursor: pending wrap, insert
    /// shift, template copy, cursor advance.
    fn place_char(&mut self, c: char) {
        let cols = self.screen.cols();
        if self.mode.contains(TermMode::WRAP)
            && self.cursor.cursor().state.contains(CursorState::WRAP_NEXT)
        {
            // Remember where the line broke so a renderer can rebuild
            // logical lines from the grid.
            let (x, y) = self.cursor.pos();
            if let Some(mut cell) = self.screen.glyph(x, y) {
                cell.flags.insert(AttrFlags::WRAP);
                self.screen.set_glyph(x, y, cell);
            }
            self.newline(true);
        }
        if self.mode.contains(TermMode::INSERT) && self.cursor.pos().0 + 1 < cols {
            let (x, y) = self.cursor.pos();
            let fill = self.fill_glyph();
            self.screen.insert_blank_chars_in_line(y, x, 1, fill);
        }
        let (x, y) = self.cursor.pos();
        self.set_char(c, x, y);
        if x + 1 < cols {
            let ctx = self.ctx();
            self.cursor.move_to(x as isize + 1, y as isize, &ctx);
        } else {
            self.cursor.cursor_mut().state.insert(CursorState::WRAP_NEXT);
        }
    }

    /// Writes `c` at `(x, y)` with the cursor template, remapping through
    /// the graphics table when that charset is selected.
    pub(super) fn set_char(&mut self, c: char, x: usize, y: usize) {
        let mut glyph = self.cursor.attr();
        glyph.c = if glyph.flags.contains(AttrFlags::GFX) {
            map_graphics(c)
        } else {
            c
        };
        if self.config.bright_bold && glyph.flags.contains(AttrFlags::BOLD) && glyph.fg.0 < 8 {
            glyph.fg = Color(glyph.fg.0 + 8);
        }
        self.screen.set_glyph(x, y, glyph);
    }

    fn parse_esc(&mut self, c: char) {
        if self.handle_control_code(c) {
            return;
        }
        self.state = ParserState::Ground;
        match c {
            '[' => {
                self.csi.reset();
                self.state = ParserState::Csi;
            }
            '#' => self.state = ParserState::Test,
            // DCS, APC, PM, OSC and the old title escape all collect a
            // string payload.
            'P' | '_' | '^' | ']' | 'k' => {
                self.str_seq.reset();
                self.str_seq.set_kind(c);
                self.state = ParserState::Str;
            }
            '(' => self.state = ParserState::Charset, // G0
            ')' | '*' | '+' => {}                     // G1-G3 designators, ignored
            'D' => {
                // IND
                let (x, y) = self.cursor.pos();
                if y == self.screen.scroll_bot() {
                    let fill = self.fill_glyph();
                    let top = self.screen.scroll_top();
                    self.screen.scroll_up(top, 1, fill);
                } else {
                    let ctx = self.ctx();
                    self.cursor.move_to(x as isize, y as isize + 1, &ctx);
                }
            }
            'E' => self.newline(true), // NEL
            'H' => {
                // HTS
                let (x, _) = self.cursor.pos();
                self.screen.set_tabstop(x);
            }
            'M' => {
                // RI
                let (x, y) = self.cursor.pos();
                if y == self.screen.scroll_top() {
                    let fill = self.fill_glyph();
                    let top = self.screen.scroll_top();
                    self.screen.scroll_down(top, 1, fill);
                } else {
                    let ctx = self.ctx();
                    self.cursor.move_to(x as isize, y as isize - 1, &ctx);
                }
            }
            'Z' => self.identify(),                       // DECID
            'c' => self.reset(),                          // RIS
            '=' => self.mode.insert(TermMode::APPKEYPAD), // DECPAM
            '>' => self.mode.remove(TermMode::APPKEYPAD), // DECPNM
            '7' => self.cursor.save(),                    // DECSC
            '8' => {
                // DECRC
                let ctx = self.ctx();
                self.cursor.restore(&ctx);
            }
            '\\' => {} // ST with nothing to terminate
            _ => warn!("unknown ESC sequence: ESC {:?}", c),
        }
    }

    fn parse_esc_csi(&mut self, c: char) {
        if self.handle_control_code(c) {
            return;
        }
        if self.csi.put(c as u8) {
            self.state = ParserState::Ground;
            self.handle_csi();
        }
    }

    fn parse_esc_str(&mut self, c: char) {
        match c {
            '\u{1b}' => self.state = ParserState::StrEnd,
            // xterm compatibility: BEL terminates like ST.
            '\u{7}' => {
                self.state = ParserState::Ground;
                self.handle_str();
            }
            _ => self.str_seq.put(c),
        }
    }

    fn parse_esc_str_end(&mut self, c: char) {
        if self.handle_control_code(c) {
            return;
        }
        self.state = ParserState::Ground;
        if c == '\\' {
            self.handle_str();
        }
    }

    fn parse_esc_charset(&mut self, c: char) {
        if self.handle_control_code(c) {
            return;
        }
        match c {
            '0' => {
                // DEC graphics (line drawing)
                let mut attr = self.cursor.attr();
                attr.flags.insert(AttrFlags::GFX);
                self.cursor.set_attr(attr);
            }
            'B' => {
                // US-ASCII
                let mut attr = self.cursor.attr();
                attr.flags.remove(AttrFlags::GFX);
                self.cursor.set_attr(attr);
            }
            // National replacement sets; accepted without remapping.
            'A' | '<' | '5' | 'C' | 'K' => {}
            _ => warn!("unhandled charset designator {:?}", c),
        }
        self.state = ParserState::Ground;
    }

    fn parse_esc_test(&mut self, c: char) {
        if self.handle_control_code(c) {
            return;
        }
        if c == '8' {
            // DEC screen alignment test: fill with E.
            for y in 0..self.screen.rows() {
                for x in 0..self.screen.cols() {
                    self.set_char('E', x, y);
                }
            }
        }
        self.state = ParserState::Ground;
    }

    /// Executes C0 controls. Returns whether `c` was consumed; a false
    /// return leaves the caller to decide what an unrecognized control
    /// means in its state.
    fn handle_control_code(&mut self, c: char) -> bool {
        if !is_control_code(c) {
            return false;
        }
        match c {
            '\t' => self.put_tab(true), // HT
            '\u{8}' => {
                // BS
                let (x, y) = self.cursor.pos();
                let ctx = self.ctx();
                self.cursor.move_to(x as isize - 1, y as isize, &ctx);
            }
            '\r' => {
                // CR
                let (_, y) = self.cursor.pos();
                let ctx = self.ctx();
                self.cursor.move_to(0, y as isize, &ctx);
            }
            '\u{c}' | '\u{b}' | '\n' => {
                // FF, VT, LF: return to column zero only in CRLF mode
                let first_col = self.mode.contains(TermMode::CRLF);
                self.newline(first_col);
            }
            '\u{7}' => {} // BEL: a headless engine has nothing to ring
            '\u{1b}' => {
                // ESC
                self.csi.reset();
                self.state = ParserState::Escape;
            }
            // SO/SI: charset shifting is driven by the escape-level
            // designators instead.
            '\u{e}' | '\u{f}' => {}
            '\u{1a}' | '\u{18}' => self.csi.reset(), // SUB, CAN
            // ENQ, NUL, XON, XOFF, DEL
            '\u{5}' | '\u{0}' | '\u{11}' | '\u{13}' | '\u{7f}' => {}
            _ => return false,
        }
        true
    }
}
