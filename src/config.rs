// src/config.rs

//! Engine configuration.
//!
//! Every field has a serde default so a config file may specify any
//! subset. The engine takes its `Config` at construction; there is no
//! global state.

use serde::{Deserialize, Serialize};

/// Behavior knobs for the emulation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Interval between default tab stops, in columns.
    pub tabspaces: usize,
    /// Upgrade bold text on the first eight palette colors to their
    /// bright counterparts when cells are written.
    pub bright_bold: bool,
    /// Honor requests to switch to the alternate screen buffer.
    pub allow_alt_screen: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            tabspaces: 8,
            bright_bold: false,
            allow_alt_screen: true,
        }
    }
}

impl Config {
    /// Tab interval clamped to something usable; a zero interval would
    /// make the default tab-stop layout degenerate.
    pub(crate) fn tab_interval(&self) -> usize {
        self.tabspaces.max(1)
    }
}
