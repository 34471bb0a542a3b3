// src/term/tests.rs

//! End-to-end behavior tests: byte streams in, screen state out.

use std::io;
use std::sync::{Arc, Mutex};

use test_log::test;

use crate::color::Color;
use crate::config::Config;
use crate::glyph::{AttrFlags, Glyph};
use crate::term::cursor::CursorState;
use crate::term::emulator::Emulator;
use crate::term::modes::TermMode;
use crate::term::Terminal;

/// Reads back `[x0, x1]` of `row` as a string, like a renderer would.
fn extract_str(term: &Terminal, x0: usize, x1: usize, row: usize) -> String {
    (x0..=x1).map(|x| term.cell(x, row).0).collect()
}

fn feed_str(emulator: &mut Emulator, s: &str) {
    for c in s.chars() {
        emulator.advance(c);
    }
}

/// `io::Write` that captures everything for assertions (stands in for the
/// PTY the engine answers DA/DECID on).
#[derive(Clone, Default)]
struct CaptureSink(Arc<Mutex<Vec<u8>>>);

impl io::Write for CaptureSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn terminal_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Terminal>();
}

// --- Plain text and line discipline ---

#[test]
fn plain_text_lands_on_row_zero() {
    let term = Terminal::new(80, 24);
    let expected = "Hello world!";
    assert_eq!(term.feed(expected.as_bytes()), expected.len());
    assert_eq!(extract_str(&term, 0, expected.len() - 1, 0), expected);
    assert_eq!(term.cursor(), (expected.len(), 0));
}

#[test]
fn crlf_mode_returns_to_column_zero_on_linefeed() {
    let term = Terminal::new(80, 24);
    term.feed(b"\x1b[20h");
    term.feed(b"Hello world!\n...and more.");
    assert_eq!(extract_str(&term, 0, 11, 0), "Hello world!");
    assert_eq!(extract_str(&term, 0, 11, 1), "...and more.");
    assert_eq!(term.cursor(), (12, 1));
}

#[test]
fn linefeed_without_crlf_mode_keeps_the_column() {
    let term = Terminal::new(80, 24);
    term.feed(b"ab\n");
    assert_eq!(term.cursor(), (2, 1));
}

#[test]
fn utf8_text_is_placed_per_code_point() {
    let term = Terminal::new(20, 2);
    term.feed("héllo ↑".as_bytes());
    assert_eq!(extract_str(&term, 0, 6, 0), "héllo ↑");
    assert_eq!(term.cursor(), (7, 0));
}

#[test]
fn partial_utf8_tail_is_not_consumed() {
    let term = Terminal::new(20, 2);
    let bytes = "é".as_bytes();
    assert_eq!(term.feed(&bytes[..1]), 0);
    assert_eq!(term.feed(bytes), 2);
    assert_eq!(term.cell(0, 0).0, 'é');
    assert_eq!(term.cursor(), (1, 0));
}

#[test]
fn malformed_utf8_surfaces_a_replacement_glyph() {
    let term = Terminal::new(20, 2);
    assert_eq!(term.feed(b"a\x80b"), 3);
    assert_eq!(extract_str(&term, 0, 2, 0), "a\u{fffd}b");
    assert_eq!(term.cursor(), (3, 0));
}

// --- Wrapping ---

#[test]
fn printing_advances_until_the_right_edge() {
    let term = Terminal::new(10, 3);
    term.feed(b"\x1b[1;5H");
    term.feed(b"abc");
    assert_eq!(term.cursor(), (7, 0));
    term.feed(b"de");
    assert_eq!(term.cursor(), (9, 0));
    {
        let emulator = term.inner.read();
        assert!(!emulator
            .cursor
            .cursor()
            .state
            .contains(CursorState::WRAP_NEXT));
    }
    // writing in the last column pins the cursor and arms the wrap
    term.feed(b"f");
    assert_eq!(term.cursor(), (9, 0));
    {
        let emulator = term.inner.read();
        assert!(emulator
            .cursor
            .cursor()
            .state
            .contains(CursorState::WRAP_NEXT));
    }
    term.feed(b"g");
    assert_eq!(term.cursor(), (1, 1));
    assert_eq!(term.cell(0, 1).0, 'g');
}

#[test]
fn filling_a_row_wraps_on_the_next_glyph_and_marks_the_break() {
    let term = Terminal::new(10, 3);
    term.feed(b"ABCDEFGHIJ");
    assert_eq!(term.cursor(), (9, 0));
    term.feed(b"K");
    assert_eq!(term.cursor(), (1, 1));
    assert_eq!(term.cell(0, 1).0, 'K');
    let emulator = term.inner.read();
    let edge = emulator.screen.glyph(9, 0).unwrap();
    assert!(edge.flags.contains(AttrFlags::WRAP));
}

#[test]
fn wrap_disabled_overwrites_the_last_column() {
    let term = Terminal::new(10, 3);
    term.feed(b"\x1b[?7l");
    term.feed(b"ABCDEFGHIJKL");
    assert_eq!(term.cursor(), (9, 0));
    assert_eq!(term.cell(9, 0).0, 'L');
    assert_eq!(term.cell(0, 1).0, ' ');
}

// --- Cursor motion and CSI ---

#[test]
fn cursor_motion_finals_move_and_clamp() {
    let term = Terminal::new(20, 10);
    term.feed(b"\x1b[5;7H");
    assert_eq!(term.cursor(), (6, 4));
    term.feed(b"\x1b[2A");
    assert_eq!(term.cursor(), (6, 2));
    term.feed(b"\x1b[3B\x1b[4C\x1b[2D");
    assert_eq!(term.cursor(), (8, 5));
    term.feed(b"\x1b[99C");
    assert_eq!(term.cursor(), (19, 5));
    term.feed(b"\x1b[E\x1b[E");
    assert_eq!(term.cursor(), (0, 7));
    term.feed(b"\x1b[F");
    assert_eq!(term.cursor(), (0, 6));
    term.feed(b"\x1b[12G");
    assert_eq!(term.cursor(), (11, 6));
    term.feed(b"\x1b[3d");
    assert_eq!(term.cursor(), (11, 2));
}

#[test]
fn zero_counts_act_as_one() {
    let term = Terminal::new(20, 10);
    term.feed(b"\x1b[5;5H\x1b[0A\x1b[0C");
    assert_eq!(term.cursor(), (5, 3));
}

#[test]
fn control_codes_execute_inside_a_csi_sequence() {
    let term = Terminal::new(20, 10);
    term.feed(b"abcd");
    term.feed(b"\x1b[2\rB");
    // CR ran mid-sequence, then CUD 2 completed
    assert_eq!(term.cursor(), (0, 2));
}

#[test]
fn backspace_and_carriage_return_clamp_at_column_zero() {
    let term = Terminal::new(10, 3);
    term.feed(b"ab\x08\x08\x08");
    assert_eq!(term.cursor(), (0, 0));
    term.feed(b"x\ry");
    assert_eq!(term.cell(0, 0).0, 'y');
}

#[test]
fn save_and_restore_cursor_round_trip() {
    let term = Terminal::new(40, 12);
    term.feed(b"\x1b[6;31m\x1b[4;9H\x1b7");
    term.feed(b"\x1b[0m\x1b[1;1Hmoved");
    term.feed(b"\x1b8");
    assert_eq!(term.cursor(), (8, 3));
    let emulator = term.inner.read();
    let attr = emulator.cursor.attr();
    assert_eq!(attr.fg, Color::RED);
    assert!(attr.flags.contains(AttrFlags::BLINK));
}

// --- Erase and edit ---

#[test]
fn erase_in_display_clears_with_cursor_colors() {
    let term = Terminal::new(10, 4);
    term.feed(b"junk everywhere");
    term.feed(b"\x1b[41m\x1b[2J");
    for y in 0..4 {
        for x in 0..10 {
            let (c, _, bg) = term.cell(x, y);
            assert_eq!(c, ' ');
            assert_eq!(bg, Color::RED);
        }
    }
}

#[test]
fn erase_below_and_above_split_at_the_cursor() {
    let term = Terminal::new(4, 4);
    term.feed(b"aaaa\r\nbbbb\r\ncccc\r\ndddd");
    term.feed(b"\x1b[3;3H\x1b[0J");
    assert_eq!(extract_str(&term, 0, 3, 1), "bbbb");
    assert_eq!(extract_str(&term, 0, 3, 2), "cc  ");
    assert_eq!(extract_str(&term, 0, 3, 3), "    ");
    term.feed(b"\x1b[2;2H\x1b[1J");
    assert_eq!(extract_str(&term, 0, 3, 0), "    ");
    assert_eq!(extract_str(&term, 0, 3, 1), "  bb");
}

#[test]
fn erase_in_line_variants() {
    let term = Terminal::new(6, 3);
    term.feed(b"abcdef\x1b[1;4H");
    term.feed(b"\x1b[K");
    assert_eq!(extract_str(&term, 0, 5, 0), "abc   ");
    term.feed(b"\x1b[1;2H\x1b[1K");
    assert_eq!(extract_str(&term, 0, 5, 0), "  c   ");
    term.feed(b"\x1b[2K");
    assert_eq!(extract_str(&term, 0, 5, 0), "      ");
}

#[test]
fn erase_chars_blanks_without_shifting() {
    let term = Terminal::new(10, 2);
    term.feed(b"abcdef\r");
    term.feed(b"\x1b[3X");
    assert_eq!(extract_str(&term, 0, 5, 0), "   def");
    assert_eq!(term.cursor(), (0, 0));
}

#[test]
fn delete_chars_shifts_the_rest_of_the_line_left() {
    let term = Terminal::new(6, 2);
    term.feed(b"abcdef\r");
    term.feed(b"\x1b[2P");
    assert_eq!(extract_str(&term, 0, 5, 0), "cdef  ");
}

#[test]
fn insert_blank_chars_shifts_right() {
    let term = Terminal::new(6, 2);
    term.feed(b"abcd\r");
    term.feed(b"\x1b[2@");
    assert_eq!(extract_str(&term, 0, 5, 0), "  abcd");
    assert_eq!(term.cursor(), (0, 0));
}

#[test]
fn insert_mode_shifts_existing_cells() {
    let term = Terminal::new(8, 2);
    term.feed(b"abc\r\x1b[4h");
    term.feed(b"XY");
    assert_eq!(extract_str(&term, 0, 4, 0), "XYabc");
    term.feed(b"\x1b[4l\r");
    term.feed(b"Z");
    assert_eq!(extract_str(&term, 0, 4, 0), "ZYabc");
}

// --- Scrolling, regions, lines ---

#[test]
fn linefeed_at_the_bottom_scrolls_the_screen() {
    let term = Terminal::new(4, 3);
    term.feed(b"one\r\ntwo\r\nthr");
    assert_eq!(term.cursor(), (3, 2));
    term.feed(b"\r\n");
    assert_eq!(extract_str(&term, 0, 2, 0), "two");
    assert_eq!(extract_str(&term, 0, 2, 1), "thr");
    assert_eq!(extract_str(&term, 0, 2, 2), "   ");
    assert_eq!(term.cursor(), (0, 2));
}

#[test]
fn scroll_region_confines_vertical_motion() {
    let term = Terminal::new(4, 6);
    term.feed(b"r0\r\nr1\r\nr2\r\nr3\r\nr4\r\nr5");
    term.feed(b"\x1b[2;4r");
    assert_eq!(term.cursor(), (0, 0));
    // LF from the region's bottom margin scrolls only the region
    term.feed(b"\x1b[4;1H\n");
    assert_eq!(extract_str(&term, 0, 1, 0), "r0");
    assert_eq!(extract_str(&term, 0, 1, 1), "r2");
    assert_eq!(extract_str(&term, 0, 1, 2), "r3");
    assert_eq!(extract_str(&term, 0, 1, 3), "  ");
    assert_eq!(extract_str(&term, 0, 1, 4), "r4");
}

#[test]
fn reverse_index_at_the_top_margin_scrolls_down() {
    let term = Terminal::new(4, 4);
    term.feed(b"a\r\nb\r\nc\r\nd");
    term.feed(b"\x1b[1;1H\x1bM");
    assert_eq!(extract_str(&term, 0, 0, 0), " ");
    assert_eq!(extract_str(&term, 0, 0, 1), "a");
    assert_eq!(extract_str(&term, 0, 0, 2), "b");
    assert_eq!(extract_str(&term, 0, 0, 3), "c");
}

#[test]
fn insert_and_delete_lines_work_inside_the_region() {
    let term = Terminal::new(3, 5);
    term.feed(b"aa\r\nbb\r\ncc\r\ndd\r\nee");
    term.feed(b"\x1b[2;4r\x1b[2;1H\x1b[1L");
    assert_eq!(extract_str(&term, 0, 1, 0), "aa");
    assert_eq!(extract_str(&term, 0, 1, 1), "  ");
    assert_eq!(extract_str(&term, 0, 1, 2), "bb");
    assert_eq!(extract_str(&term, 0, 1, 3), "cc");
    assert_eq!(extract_str(&term, 0, 1, 4), "ee");
    term.feed(b"\x1b[1M");
    assert_eq!(extract_str(&term, 0, 1, 1), "bb");
    assert_eq!(extract_str(&term, 0, 1, 3), "  ");
}

#[test]
fn insert_lines_outside_the_region_are_inert() {
    let term = Terminal::new(3, 5);
    term.feed(b"aa\r\nbb\r\ncc\r\ndd\r\nee");
    term.feed(b"\x1b[2;4r\x1b[r");
    // region reset; now restrict and park the cursor above it
    term.feed(b"\x1b[3;5r\x1b[1;1H\x1b[2L");
    assert_eq!(extract_str(&term, 0, 1, 0), "aa");
    assert_eq!(extract_str(&term, 0, 1, 1), "bb");
}

#[test]
fn scroll_up_and_down_finals_shift_the_region() {
    let term = Terminal::new(3, 3);
    term.feed(b"aa\r\nbb\r\ncc");
    term.feed(b"\x1b[1S");
    assert_eq!(extract_str(&term, 0, 1, 0), "bb");
    assert_eq!(extract_str(&term, 0, 1, 2), "  ");
    term.feed(b"\x1b[1T");
    assert_eq!(extract_str(&term, 0, 1, 0), "  ");
    assert_eq!(extract_str(&term, 0, 1, 1), "bb");
}

// --- Origin mode ---

#[test]
fn origin_mode_addresses_rows_from_the_scroll_top() {
    let term = Terminal::new(20, 12);
    term.feed(b"\x1b[5;10r\x1b[?6h");
    assert_eq!(term.cursor(), (0, 4));
    term.feed(b"\x1b[3;1H");
    assert_eq!(term.cursor(), (0, 6));
    term.feed(b"\x1b[99;1H");
    assert_eq!(term.cursor(), (0, 9));
    term.feed(b"\x1b[?6l");
    assert_eq!(term.cursor(), (0, 0));
    term.feed(b"\x1b[99;1H");
    assert_eq!(term.cursor(), (0, 11));
}

// --- Tab stops ---

#[test]
fn default_tab_stops_every_eight_columns() {
    let term = Terminal::new(40, 2);
    term.feed(b"\t");
    assert_eq!(term.cursor(), (8, 0));
    term.feed(b"\t");
    assert_eq!(term.cursor(), (16, 0));
}

#[test]
fn custom_tab_stops_and_backward_tabulation() {
    let term = Terminal::new(40, 2);
    term.feed(b"\x1b[1;4H\x1bH\r");
    term.feed(b"\t");
    assert_eq!(term.cursor(), (3, 0));
    term.feed(b"\t");
    assert_eq!(term.cursor(), (8, 0));
    term.feed(b"\x1b[2Z");
    assert_eq!(term.cursor(), (0, 0));
}

#[test]
fn tab_clear_current_and_all() {
    let term = Terminal::new(40, 2);
    term.feed(b"\x1b[1;9H\x1b[g\r\t");
    assert_eq!(term.cursor(), (16, 0));
    term.feed(b"\x1b[3g\r\t");
    assert_eq!(term.cursor(), (39, 0));
}

#[test]
fn forward_tabulation_final_repeats_stops() {
    let term = Terminal::new(40, 2);
    term.feed(b"\x1b[2I");
    assert_eq!(term.cursor(), (16, 0));
}

// --- Modes and SGR ---

#[test]
fn private_mode_25_controls_cursor_visibility() {
    let term = Terminal::new(80, 24);
    assert!(!term.cursor_hidden());
    term.feed(b"\x1b[?25l");
    assert!(term.cursor_hidden());
    term.feed(b"\x1b[?25h");
    assert!(!term.cursor_hidden());
}

#[test]
fn sgr_indexed_background_paints_cells() {
    let term = Terminal::new(80, 24);
    term.feed(b"\x1b[48;5;200m");
    term.feed(b"X");
    let (c, _, bg) = term.cell(0, 0);
    assert_eq!(c, 'X');
    assert_eq!(bg, Color(200));
}

#[test]
fn sgr_basic_and_bright_colors() {
    let term = Terminal::new(80, 24);
    term.feed(b"\x1b[33mA\x1b[93mB\x1b[44mC\x1b[104mD");
    assert_eq!(term.cell(0, 0).1, Color::YELLOW);
    assert_eq!(term.cell(1, 0).1, Color::LIGHT_YELLOW);
    assert_eq!(term.cell(2, 0).2, Color::BLUE);
    assert_eq!(term.cell(3, 0).2, Color::LIGHT_BLUE);
}

#[test]
fn sgr_reset_restores_the_default_template() {
    let term = Terminal::new(80, 24);
    term.feed(b"\x1b[1;3;4;5;7;33;45m");
    term.feed(b"\x1b[0m");
    let emulator = term.inner.read();
    assert_eq!(emulator.cursor.attr(), Glyph::default());
}

#[test]
fn sgr_changes_never_restyle_placed_cells() {
    let term = Terminal::new(80, 24);
    term.feed(b"\x1b[31mA\x1b[32mB");
    assert_eq!(term.cell(0, 0).1, Color::RED);
    assert_eq!(term.cell(1, 0).1, Color::GREEN);
}

#[test]
fn malformed_extended_sgr_keeps_later_parameters() {
    let term = Terminal::new(80, 24);
    // 38 without its 5;N tail is dropped; the trailing 41 still applies
    term.feed(b"\x1b[38;41m");
    term.feed(b"X");
    assert_eq!(term.cell(0, 0).2, Color::RED);
}

#[test]
fn empty_sgr_parameter_list_is_a_reset() {
    let term = Terminal::new(80, 24);
    term.feed(b"\x1b[31m\x1b[m");
    term.feed(b"X");
    assert_eq!(term.cell(0, 0).1, Color::DEFAULT_FG);
}

#[test]
fn mouse_reporting_modes_are_mutually_exclusive() {
    let term = Terminal::new(80, 24);
    term.feed(b"\x1b[?1000h");
    assert!(term.mode(TermMode::MOUSEBTN));
    term.feed(b"\x1b[?1003h");
    assert!(term.mode(TermMode::MOUSEMANY));
    assert!(!term.mode(TermMode::MOUSEBTN));
    term.feed(b"\x1b[?1003l");
    assert!(!term.mode(TermMode::MOUSE_MASK));
    term.feed(b"\x1b[?1006h");
    assert!(term.mode(TermMode::MOUSESGR));
}

#[test]
fn keypad_and_misc_mode_bookkeeping() {
    let term = Terminal::new(80, 24);
    term.feed(b"\x1b=");
    assert!(term.mode(TermMode::APPKEYPAD));
    term.feed(b"\x1b>");
    assert!(!term.mode(TermMode::APPKEYPAD));
    term.feed(b"\x1b[?1h\x1b[?1004h\x1b[?5h\x1b[2h");
    assert!(term.mode(TermMode::APPCURSOR));
    assert!(term.mode(TermMode::FOCUS));
    assert!(term.mode(TermMode::REVERSE));
    assert!(term.mode(TermMode::KBDLOCK));
}

#[test]
fn bright_bold_is_gated_by_configuration() {
    let plain = Terminal::new(10, 2);
    plain.feed(b"\x1b[1;31mX");
    assert_eq!(plain.cell(0, 0).1, Color::RED);

    let upgraded = Terminal::with_config(
        10,
        2,
        Config {
            bright_bold: true,
            ..Config::default()
        },
    );
    upgraded.feed(b"\x1b[1;31mX");
    assert_eq!(upgraded.cell(0, 0).1, Color::LIGHT_RED);
}

// --- Alternate screen ---

#[test]
fn alt_screen_1049_swaps_and_restores_the_cursor() {
    let term = Terminal::new(80, 24);
    term.feed(b"plain");
    let before = term.cursor();
    term.feed(b"\x1b[?1049h");
    assert!(term.mode(TermMode::ALTSCREEN));
    assert_eq!(extract_str(&term, 0, 4, 0), "     ");
    term.feed(b"\x1b[1;1HALT");
    assert_eq!(extract_str(&term, 0, 2, 0), "ALT");
    term.feed(b"\x1b[?1049l");
    assert!(!term.mode(TermMode::ALTSCREEN));
    assert_eq!(term.cursor(), before);
    assert_eq!(extract_str(&term, 0, 4, 0), "plain");
    // the written text is still sitting on the alternate grid
    let mut emulator = term.inner.write();
    emulator.screen.swap_screen();
    assert_eq!(emulator.screen.glyph(0, 0).unwrap().c, 'A');
    assert_eq!(emulator.screen.glyph(2, 0).unwrap().c, 'T');
}

#[test]
fn alt_screen_can_be_disabled_by_configuration() {
    let term = Terminal::with_config(
        20,
        4,
        Config {
            allow_alt_screen: false,
            ..Config::default()
        },
    );
    term.feed(b"keep");
    term.feed(b"\x1b[?1049h");
    assert!(!term.mode(TermMode::ALTSCREEN));
    assert_eq!(extract_str(&term, 0, 3, 0), "keep");
}

// --- Charsets and the alignment test ---

#[test]
fn graphics_charset_remaps_line_drawing_bytes() {
    let term = Terminal::new(10, 2);
    term.feed(b"\x1b(0jkx\x1b(Bj");
    assert_eq!(extract_str(&term, 0, 3, 0), "┘┐│j");
}

#[test]
fn alignment_test_fills_the_screen_with_e() {
    let term = Terminal::new(5, 3);
    term.feed(b"\x1b#8");
    for y in 0..3 {
        assert_eq!(extract_str(&term, 0, 4, y), "EEEEE");
    }
}

// --- String sequences ---

#[test]
fn osc_terminated_by_bel_and_st_leaves_the_grid_alone() {
    let term = Terminal::new(20, 2);
    term.feed(b"\x1b]0;some title\x07A");
    term.feed(b"\x1b]2;other\x1b\\B");
    assert_eq!(extract_str(&term, 0, 1, 0), "AB");
    assert_eq!(term.cursor(), (2, 0));
}

#[test]
fn oversized_string_payload_is_swallowed_quietly() {
    let term = Terminal::new(20, 2);
    let mut seq = b"\x1b]0;".to_vec();
    seq.extend(std::iter::repeat(b'x').take(2000));
    seq.extend_from_slice(b"\x07ok");
    term.feed(&seq);
    assert_eq!(extract_str(&term, 0, 1, 0), "ok");
}

#[test]
fn dcs_apc_pm_payloads_are_accepted_and_ignored() {
    let term = Terminal::new(20, 2);
    term.feed(b"\x1bPpayload\x1b\\\x1b_apc\x1b\\\x1b^pm\x1b\\done");
    assert_eq!(extract_str(&term, 0, 3, 0), "done");
}

// --- Answerback ---

#[test]
fn device_attributes_answer_with_the_vt102_id() {
    let term = Terminal::new(80, 24);
    let sink = CaptureSink::default();
    term.set_reply_sink(Box::new(sink.clone()));
    term.feed(b"\x1b[c");
    assert_eq!(&*sink.0.lock().unwrap(), b"\x1b[?6c");
    sink.0.lock().unwrap().clear();
    term.feed(b"\x1b[0c");
    assert_eq!(&*sink.0.lock().unwrap(), b"\x1b[?6c");
}

#[test]
fn decid_uses_the_same_identification_hook() {
    let term = Terminal::new(80, 24);
    let sink = CaptureSink::default();
    term.set_reply_sink(Box::new(sink.clone()));
    term.feed(b"\x1bZ");
    assert_eq!(&*sink.0.lock().unwrap(), b"\x1b[?6c");
}

// --- Reset and resize ---

#[test]
fn reset_matches_a_freshly_constructed_engine() {
    let mut scribbled = Emulator::new(40, 10, Config::default());
    feed_str(
        &mut scribbled,
        "hello\x1b[5;5H\x1b[1;44m*\x1b[?6h\x1b(0x\x1bH\x1b[2;8r\x1b[?25l\x1b[?1049h junk",
    );
    scribbled.reset();
    let fresh = Emulator::new(40, 10, Config::default());
    assert_eq!(scribbled.screen, fresh.screen);
    assert_eq!(scribbled.cursor, fresh.cursor);
    assert_eq!(scribbled.mode(), fresh.mode());
    assert_eq!(scribbled.state, fresh.state);
}

#[test]
fn resize_preserves_content_and_notifies_the_hook() {
    let term = Terminal::new(10, 4);
    let calls: Arc<Mutex<Vec<(usize, usize)>>> = Arc::default();
    let seen = calls.clone();
    term.set_resize_hook(Box::new(move |cols, rows| {
        seen.lock().unwrap().push((cols, rows));
    }));
    term.feed(b"hold");
    assert!(!term.resize(16, 6));
    assert_eq!((term.cols(), term.rows()), (16, 6));
    assert_eq!(extract_str(&term, 0, 3, 0), "hold");
    assert_eq!(term.cell(12, 5).0, ' ');
    assert_eq!(&*calls.lock().unwrap(), &[(16, 6)]);
}

#[test]
fn resize_slides_content_up_to_keep_the_cursor() {
    let term = Terminal::new(10, 5);
    term.feed(b"0\r\n1\r\n2\r\n3\r\n4");
    assert_eq!(term.cursor(), (1, 4));
    assert!(term.resize(10, 3));
    assert_eq!(extract_str(&term, 0, 0, 0), "2");
    assert_eq!(extract_str(&term, 0, 0, 1), "3");
    assert_eq!(extract_str(&term, 0, 0, 2), "4");
    assert_eq!(term.cursor(), (1, 2));
}

#[test]
fn resize_rejects_zero_dimensions_and_repeats() {
    let term = Terminal::new(10, 4);
    assert!(!term.resize(0, 7));
    assert_eq!((term.cols(), term.rows()), (10, 4));
    assert!(!term.resize(10, 4));
}

#[test]
fn resize_resets_the_scroll_region() {
    let term = Terminal::new(10, 6);
    term.feed(b"\x1b[2;4r");
    term.resize(10, 8);
    let emulator = term.inner.read();
    assert_eq!(emulator.screen.scroll_top(), 0);
    assert_eq!(emulator.screen.scroll_bot(), 7);
}

// --- Dirty tracking ---

#[test]
fn writes_dirty_only_the_touched_rows() {
    let term = Terminal::new(10, 4);
    term.clear_dirty();
    term.feed(b"\x1b[3;1Hx");
    assert!(!term.line_dirty(0));
    assert!(term.line_dirty(2));
    term.clear_dirty();
    assert!(!term.line_dirty(2));
}

// --- Unknown input never corrupts state ---

#[test]
fn unknown_sequences_are_dropped_on_the_floor() {
    let term = Terminal::new(20, 4);
    term.feed(b"\x1b[9999z\x1b[?4242h\x1bq\x1b[>0c");
    term.feed(b"ok");
    assert_eq!(extract_str(&term, 0, 1, 0), "ok");
    assert_eq!(term.cursor(), (2, 0));
}

mod properties {
    use proptest::prelude::*;
    use proptest::strategy::Union;

    use crate::term::cursor::CursorState;
    use crate::term::{TermMode, Terminal};

    /// ASCII-only stream fragments: plain text plus well-formed control
    /// and escape sequences.
    fn fragment() -> impl Strategy<Value = Vec<u8>> {
        let text = "[ -~]{1,16}".prop_map(String::into_bytes).boxed();
        let motion = ("[ABCD]", 1usize..10)
            .prop_map(|(f, n)| format!("\x1b[{}{}", n, f).into_bytes())
            .boxed();
        let cup = (1usize..30, 1usize..90)
            .prop_map(|(r, c)| format!("\x1b[{};{}H", r, c).into_bytes())
            .boxed();
        let erase = ("[JK]", 0usize..3)
            .prop_map(|(f, m)| format!("\x1b[{}{}", m, f).into_bytes())
            .boxed();
        let edit = ("[LM@PX]", 1usize..5)
            .prop_map(|(f, n)| format!("\x1b[{}{}", n, f).into_bytes())
            .boxed();
        let sgr = (30usize..50)
            .prop_map(|n| format!("\x1b[{}m", n).into_bytes())
            .boxed();
        let sgr_indexed = (0usize..256)
            .prop_map(|n| format!("\x1b[48;5;{}m", n).into_bytes())
            .boxed();
        let region = (1usize..12, 1usize..12)
            .prop_map(|(t, b)| format!("\x1b[{};{}r", t, b).into_bytes())
            .boxed();
        let fixed: Vec<&[u8]> = vec![
            b"\r\n",
            b"\t",
            b"\x1b[?6h",
            b"\x1b[?6l",
            b"\x1b[?25l",
            b"\x1b[?1049h",
            b"\x1b[?1049l",
            b"\x1b7",
            b"\x1b8",
            b"\x1bD",
            b"\x1bM",
            b"\x1b]0;t\x07",
        ];
        let fixed = proptest::sample::select(fixed)
            .prop_map(<[u8]>::to_vec)
            .boxed();
        Union::new(vec![
            text,
            motion,
            cup,
            erase,
            edit,
            sgr,
            sgr_indexed,
            region,
            fixed,
        ])
    }

    proptest! {
        /// Invariants hold after feeding arbitrary bytes: cursor in
        /// bounds, rows exactly `cols` wide, region well-formed.
        #[test]
        fn arbitrary_bytes_never_break_the_invariants(
            bytes in prop::collection::vec(any::<u8>(), 0..512),
            cols in 1usize..80,
            rows in 1usize..40,
        ) {
            let term = Terminal::new(cols, rows);
            term.feed(&bytes);
            let (x, y) = term.cursor();
            prop_assert!(x < cols);
            prop_assert!(y < rows);
            let emulator = term.inner.read();
            prop_assert!(emulator.screen.scroll_top() <= emulator.screen.scroll_bot());
            prop_assert!(emulator.screen.scroll_bot() < rows);
            if emulator.cursor.cursor().state.contains(CursorState::ORIGIN) {
                prop_assert!(y >= emulator.screen.scroll_top());
                prop_assert!(y <= emulator.screen.scroll_bot());
            }
            for row in 0..rows {
                prop_assert!(emulator.screen.glyph(cols - 1, row).is_some());
                prop_assert!(emulator.screen.glyph(cols, row).is_none());
            }
            prop_assert_eq!(
                emulator.mode().contains(TermMode::ALTSCREEN),
                emulator.screen.alt_active()
            );
        }

        /// Chunk boundaries are invisible: the post-state is a function
        /// of the byte stream, not of how it was split.
        #[test]
        fn chunked_feeding_matches_whole_feeding(
            fragments in prop::collection::vec(fragment(), 1..24),
            chunk in 1usize..17,
        ) {
            let bytes: Vec<u8> = fragments.concat();
            let whole = Terminal::new(40, 12);
            prop_assert_eq!(whole.feed(&bytes), bytes.len());
            let split = Terminal::new(40, 12);
            for piece in bytes.chunks(chunk) {
                prop_assert_eq!(split.feed(piece), piece.len());
            }
            let a = whole.inner.read();
            let b = split.inner.read();
            prop_assert_eq!(&a.screen, &b.screen);
            prop_assert_eq!(&a.cursor, &b.cursor);
            prop_assert_eq!(a.mode(), b.mode());
        }

        /// Repeating a resize is a no-op.
        #[test]
        fn resize_is_idempotent(
            cols in 1usize..100,
            rows in 1usize..50,
        ) {
            let term = Terminal::new(20, 20);
            term.feed(b"some content\r\nmore");
            term.resize(cols, rows);
            let first = term.inner.read().screen.clone();
            prop_assert!(!term.resize(cols, rows));
            let second = term.inner.read().screen.clone();
            prop_assert_eq!(first, second);
        }
    }
}
