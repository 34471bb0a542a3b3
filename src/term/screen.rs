// src/term/screen.rs

//! The rectangular screen state: primary and alternate grids, dirty-row
//! flags, tab stops and the scroll region.
//!
//! `Screen` provides the grid mutation primitives. It does not know about
//! the cursor or escape parsing; `term::emulator` drives it and passes in
//! the fill glyph (the cursor template's blank) wherever cells are
//! created. Every primitive that changes cells marks the affected rows
//! dirty so a renderer can redraw incrementally.

use std::collections::VecDeque;

use log::warn;

use crate::glyph::Glyph;

/// One grid row of exactly `cols` glyphs.
pub type Line = Vec<Glyph>;
/// A grid of exactly `rows` lines. A `VecDeque` keeps full-region
/// scrolls cheap: they are edge pops and pushes.
pub type Grid = VecDeque<Line>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Screen {
    grid: Grid,
    alt_grid: Grid,
    alt_active: bool,
    cols: usize,
    rows: usize,
    scroll_top: usize,
    scroll_bot: usize,
    tabs: Vec<bool>,
    dirty: Vec<bool>,
}

impl Screen {
    /// Creates a screen of `cols` x `rows` (each clamped to at least 1)
    /// with blank grids and default tab stops every `tab_interval`
    /// columns.
    pub fn new(cols: usize, rows: usize, tab_interval: usize) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        let blank = Glyph::default();
        let mut screen = Screen {
            grid: (0..rows).map(|_| vec![blank; cols]).collect(),
            alt_grid: (0..rows).map(|_| vec![blank; cols]).collect(),
            alt_active: false,
            cols,
            rows,
            scroll_top: 0,
            scroll_bot: rows - 1,
            tabs: vec![false; cols],
            dirty: vec![true; rows],
        };
        screen.init_tabstops(tab_interval);
        screen
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn scroll_top(&self) -> usize {
        self.scroll_top
    }

    pub fn scroll_bot(&self) -> usize {
        self.scroll_bot
    }

    pub fn alt_active(&self) -> bool {
        self.alt_active
    }

    fn active_grid(&self) -> &Grid {
        if self.alt_active {
            &self.alt_grid
        } else {
            &self.grid
        }
    }

    fn active_grid_mut(&mut self) -> &mut Grid {
        if self.alt_active {
            &mut self.alt_grid
        } else {
            &mut self.grid
        }
    }

    /// Reads the glyph at `(x, y)` on the active grid.
    pub fn glyph(&self, x: usize, y: usize) -> Option<Glyph> {
        self.active_grid().get(y).and_then(|row| row.get(x)).copied()
    }

    /// Writes one glyph on the active grid.
    pub fn set_glyph(&mut self, x: usize, y: usize, glyph: Glyph) {
        if x >= self.cols || y >= self.rows {
            warn!(
                "set_glyph out of bounds: ({}, {}) on {}x{}",
                x, y, self.cols, self.rows
            );
            return;
        }
        self.active_grid_mut()[y][x] = glyph;
        self.mark_line_dirty(y);
    }

    /// Fills the inclusive rectangle `(x0, y0)..=(x1, y1)` with `fill`.
    /// Out-of-order corners are swapped and everything is clamped to the
    /// grid, so callers can pass raw sequence arithmetic.
    pub fn clear_region(&mut self, x0: usize, y0: usize, x1: usize, y1: usize, fill: Glyph) {
        let (x0, x1) = if x0 > x1 { (x1, x0) } else { (x0, x1) };
        let (y0, y1) = if y0 > y1 { (y1, y0) } else { (y0, y1) };
        let x0 = x0.min(self.cols - 1);
        let x1 = x1.min(self.cols - 1);
        let y0 = y0.min(self.rows - 1);
        let y1 = y1.min(self.rows - 1);
        let grid = self.active_grid_mut();
        for y in y0..=y1 {
            for cell in &mut grid[y][x0..=x1] {
                *cell = fill;
            }
        }
        for y in y0..=y1 {
            self.mark_line_dirty(y);
        }
    }

    /// Fills both grids entirely (used by RIS).
    pub fn clear_both(&mut self, fill: Glyph) {
        for grid in [&mut self.grid, &mut self.alt_grid] {
            for row in grid.iter_mut() {
                row.fill(fill);
            }
        }
        self.mark_all_dirty();
    }

    /// Fills the alternate grid (entering the alt screen starts blank).
    pub fn clear_alt(&mut self, fill: Glyph) {
        for row in self.alt_grid.iter_mut() {
            row.fill(fill);
        }
        if self.alt_active {
            self.mark_all_dirty();
        }
    }

    /// Scrolls `[orig, scroll_bot]` up by `n`; rows leaving at `orig` are
    /// discarded and `n` fresh `fill` rows appear at the bottom of the
    /// region.
    pub fn scroll_up(&mut self, orig: usize, n: usize, fill: Glyph) {
        let bot = self.scroll_bot;
        if orig > bot || bot >= self.rows {
            warn!("scroll_up: bad region orig={} bot={}", orig, bot);
            return;
        }
        let n = n.min(bot - orig + 1);
        if n == 0 {
            return;
        }
        let cols = self.cols;
        let grid = self.active_grid_mut();
        for _ in 0..n {
            let _ = grid.remove(orig);
        }
        let insert_at = bot + 1 - n;
        for _ in 0..n {
            grid.insert(insert_at, vec![fill; cols]);
        }
        for y in orig..=bot {
            self.mark_line_dirty(y);
        }
    }

    /// Scrolls `[orig, scroll_bot]` down by `n`; rows leaving at the
    /// bottom of the region are discarded and `n` fresh `fill` rows
    /// appear at `orig`.
    pub fn scroll_down(&mut self, orig: usize, n: usize, fill: Glyph) {
        let bot = self.scroll_bot;
        if orig > bot || bot >= self.rows {
            warn!("scroll_down: bad region orig={} bot={}", orig, bot);
            return;
        }
        let n = n.min(bot - orig + 1);
        if n == 0 {
            return;
        }
        let cols = self.cols;
        let grid = self.active_grid_mut();
        for _ in 0..n {
            let _ = grid.remove(bot);
            grid.insert(orig, vec![fill; cols]);
        }
        for y in orig..=bot {
            self.mark_line_dirty(y);
        }
    }

    /// ICH: shifts `[x, cols)` of row `y` right by `n`, filling the gap.
    /// Cells pushed past the right edge are lost.
    pub fn insert_blank_chars_in_line(&mut self, y: usize, x: usize, n: usize, fill: Glyph) {
        if y >= self.rows || x >= self.cols || n == 0 {
            return;
        }
        let count = n.min(self.cols - x);
        let row = &mut self.active_grid_mut()[y];
        row[x..].rotate_right(count);
        for cell in &mut row[x..x + count] {
            *cell = fill;
        }
        self.mark_line_dirty(y);
    }

    /// DCH: shifts `(x + n, cols)` of row `y` left onto `x`, filling the
    /// vacated tail.
    pub fn delete_chars_in_line(&mut self, y: usize, x: usize, n: usize, fill: Glyph) {
        if y >= self.rows || x >= self.cols || n == 0 {
            return;
        }
        let cols = self.cols;
        let count = n.min(cols - x);
        let row = &mut self.active_grid_mut()[y];
        row[x..].rotate_left(count);
        for cell in &mut row[cols - count..] {
            *cell = fill;
        }
        self.mark_line_dirty(y);
    }

    /// Exchanges the active grid. O(1): the inactive grid is preserved
    /// verbatim for the next swap.
    pub fn swap_screen(&mut self) {
        self.alt_active = !self.alt_active;
        self.mark_all_dirty();
    }

    /// DECSTBM, 0-based. Margins are clamped to the grid and swapped if
    /// given out of order.
    pub fn set_scrolling_region(&mut self, top: usize, bot: usize) {
        let mut top = top.min(self.rows - 1);
        let mut bot = bot.min(self.rows - 1);
        if top > bot {
            std::mem::swap(&mut top, &mut bot);
        }
        self.scroll_top = top;
        self.scroll_bot = bot;
    }

    pub fn reset_scrolling_region(&mut self) {
        self.scroll_top = 0;
        self.scroll_bot = self.rows - 1;
    }

    // --- Tab stops ---

    pub fn is_tabstop(&self, x: usize) -> bool {
        self.tabs.get(x).copied().unwrap_or(false)
    }

    pub fn set_tabstop(&mut self, x: usize) {
        if let Some(stop) = self.tabs.get_mut(x) {
            *stop = true;
        }
    }

    pub fn clear_tabstop(&mut self, x: usize) {
        if let Some(stop) = self.tabs.get_mut(x) {
            *stop = false;
        }
    }

    pub fn clear_all_tabstops(&mut self) {
        self.tabs.fill(false);
    }

    /// Restores the default stops: every `tab_interval` columns starting
    /// at `tab_interval`.
    pub fn init_tabstops(&mut self, tab_interval: usize) {
        self.tabs.fill(false);
        let mut x = tab_interval.max(1);
        while x < self.cols {
            self.tabs[x] = true;
            x += tab_interval.max(1);
        }
    }

    // --- Dirty-row tracking ---

    pub fn line_dirty(&self, y: usize) -> bool {
        self.dirty.get(y).copied().unwrap_or(false)
    }

    pub fn mark_line_dirty(&mut self, y: usize) {
        if let Some(flag) = self.dirty.get_mut(y) {
            *flag = true;
        }
    }

    pub fn mark_all_dirty(&mut self) {
        self.dirty.fill(true);
    }

    pub fn mark_all_clean(&mut self) {
        self.dirty.fill(false);
    }

    // --- Resize ---

    /// Drops `n` rows off the top of both grids and appends blank rows at
    /// the bottom, keeping the row count; used to keep the cursor on
    /// screen before a shrink.
    pub fn slide_up(&mut self, n: usize, fill: Glyph) {
        let n = n.min(self.rows);
        for grid in [&mut self.grid, &mut self.alt_grid] {
            for _ in 0..n {
                let _ = grid.pop_front();
                grid.push_back(vec![fill; self.cols]);
            }
        }
        self.mark_all_dirty();
    }

    /// Reallocates both grids to the new dimensions, copying the overlap
    /// and filling newly exposed cells with `fill`. Tab stops keep their
    /// old positions up to the overlap and extend at `tab_interval` past
    /// the previous last stop. The scroll region resets to the full
    /// screen and every row is marked dirty.
    pub fn resize(&mut self, new_cols: usize, new_rows: usize, fill: Glyph, tab_interval: usize) {
        let new_cols = new_cols.max(1);
        let new_rows = new_rows.max(1);
        let old_cols = self.cols;

        for grid in [&mut self.grid, &mut self.alt_grid] {
            let mut new_grid: Grid = (0..new_rows).map(|_| vec![fill; new_cols]).collect();
            for (new_row, old_row) in new_grid.iter_mut().zip(grid.iter()) {
                let overlap = old_row.len().min(new_cols);
                new_row[..overlap].copy_from_slice(&old_row[..overlap]);
            }
            *grid = new_grid;
        }

        let mut tabs = vec![false; new_cols];
        let overlap = old_cols.min(new_cols);
        tabs[..overlap].copy_from_slice(&self.tabs[..overlap]);
        if new_cols > old_cols {
            let interval = tab_interval.max(1);
            let last = (0..overlap).rev().find(|&x| self.tabs[x]).unwrap_or(0);
            let mut x = last + interval;
            while x < new_cols {
                tabs[x] = true;
                x += interval;
            }
        }
        self.tabs = tabs;

        self.cols = new_cols;
        self.rows = new_rows;
        self.scroll_top = 0;
        self.scroll_bot = new_rows - 1;
        self.dirty = vec![true; new_rows];
    }
}
