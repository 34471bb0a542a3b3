// src/term/emulator/str_handler.rs

//! String-sequence (OSC, DCS, APC, PM, old title) dispatch.
//!
//! None of these touch the screen model: titles, palette updates and
//! device-control payloads belong to the embedder. The payloads are
//! still parsed so a broken client cannot wedge the state machine, and
//! unknown commands are logged.

use log::{debug, warn};

use super::Emulator;

impl Emulator {
    pub(super) fn handle_str(&mut self) {
        self.str_seq.parse();
        match self.str_seq.kind() {
            ']' => self.handle_osc(),
            'k' => {
                // Old xterm title escape.
                debug!(
                    "title set ignored (legacy escape): {:?}",
                    self.str_seq.arg_str(0, "")
                );
            }
            // DCS/APC/PM payloads are accepted, never executed.
            'P' | '_' | '^' => {}
            kind => warn!("unknown string sequence kind {:?}", kind),
        }
    }

    fn handle_osc(&mut self) {
        match self.str_seq.arg(0, 0) {
            0 | 1 | 2 => {
                let title = self.str_seq.arg_str(1, "");
                if !title.is_empty() {
                    debug!("title set ignored: {:?}", title);
                }
            }
            4 => {
                // Color-set request; the engine has no palette storage.
                if self.str_seq.num_args() < 3 {
                    return;
                }
                debug!(
                    "palette set ignored: index {} -> {:?}",
                    self.str_seq.arg(1, 0),
                    self.str_seq.arg_str(2, "")
                );
            }
            104 => debug!("palette reset ignored"),
            n => warn!("unknown OSC command {}", n),
        }
    }
}
