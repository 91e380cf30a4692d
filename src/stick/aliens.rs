//! Foreign material around a stick.
//!
//! Alien pixels are foreground pixels of sections that do not belong to the
//! stick, counted inside a rectangle near one of its ends. Stuck pixels are
//! pixels of adjacent sections that physically touch the first or last run of
//! a member section. High counts mean the stick end is not a clean terminus
//! (a stem touching a beam or a note head, a staff line crossed by a bar line).
//!
//! The `at_start*` / `at_stop*` windows are anchored on the stick end along
//! `coord` and on the starting/stopping position across it:
//!
//! ```text
//!  first  +-------+                                  +-------+
//!         |       |                                  |       |
//!         +=======+===========  stick  =============+=======+
//!  last   |       |                                  |       |
//!         +-------+                                  +-------+
//!          dCoord                                      dCoord
//! ```
use super::Stick;
use crate::error::Result;
use crate::glyph::Glyph;
use crate::types::Rect;
use log::debug;

impl<'a> Stick<'a> {
    /// Number of foreground pixels inside `area` that belong to other glyphs.
    ///
    /// `area` is in (coord, pos) form. Empty or out-of-range areas give 0.
    pub fn alien_pixels_in(&self, area: &Rect) -> usize {
        if area.is_empty() {
            return 0;
        }
        let pos_min = area.y;
        let pos_max = area.max_y();
        let mut count = 0usize;
        for section in self.lag().sections_in(area) {
            if self.contains_section(section.id()) {
                continue;
            }
            for (pos, run) in (section.first_pos()..).zip(section.runs()) {
                if pos > pos_max {
                    break;
                }
                if pos < pos_min {
                    continue;
                }
                count += run.clipped_length(area.x, area.max_x()) as usize;
            }
        }
        debug!("Stick#{} {:?} alien_pixels_in={}", self.id().0, area, count);
        count
    }

    /// Aliens on both sides of the start: `dcoord` long, `dpos` on each side.
    pub fn aliens_at_start(&self, dcoord: i32, dpos: i32) -> Result<usize> {
        let start = self.start()?;
        let pos = self.starting_pos()?;
        Ok(self.alien_pixels_in(&Rect::new(start, pos - dpos, dcoord, 2 * dpos)))
    }

    /// Aliens on the first-position side of the start.
    pub fn aliens_at_start_first(&self, dcoord: i32, dpos: i32) -> Result<usize> {
        let start = self.start()?;
        let pos = self.starting_pos()?;
        Ok(self.alien_pixels_in(&Rect::new(start, pos - dpos, dcoord, dpos)))
    }

    /// Aliens on the last-position side of the start.
    pub fn aliens_at_start_last(&self, dcoord: i32, dpos: i32) -> Result<usize> {
        let start = self.start()?;
        let pos = self.starting_pos()?;
        Ok(self.alien_pixels_in(&Rect::new(start, pos, dcoord, dpos)))
    }

    /// Aliens on both sides of the stop: `dcoord` long, `dpos` on each side.
    pub fn aliens_at_stop(&self, dcoord: i32, dpos: i32) -> Result<usize> {
        let stop = self.stop()?;
        let pos = self.stopping_pos()?;
        Ok(self.alien_pixels_in(&Rect::new(stop - dcoord, pos - dpos, dcoord, 2 * dpos)))
    }

    /// Aliens on the first-position side of the stop.
    pub fn aliens_at_stop_first(&self, dcoord: i32, dpos: i32) -> Result<usize> {
        let stop = self.stop()?;
        let pos = self.stopping_pos()?;
        Ok(self.alien_pixels_in(&Rect::new(stop - dcoord, pos - dpos, dcoord, dpos)))
    }

    /// Aliens on the last-position side of the stop.
    pub fn aliens_at_stop_last(&self, dcoord: i32, dpos: i32) -> Result<usize> {
        let stop = self.stop()?;
        let pos = self.stopping_pos()?;
        Ok(self.alien_pixels_in(&Rect::new(stop - dcoord, pos, dcoord, dpos)))
    }

    /// Pixels of foreign sections touching the first side of the stick.
    ///
    /// For each member, the first run is compared with the last run of every
    /// source section that is not a member.
    pub fn first_stuck(&self) -> usize {
        let lag = self.lag();
        let mut stuck = 0usize;
        for section in self.members().filter_map(|id| lag.section(id)) {
            let run = section.first_run();
            for source in section.sources() {
                if self.contains_section(*source) {
                    continue;
                }
                if let Some(other) = lag.section(*source) {
                    stuck += run.common_length(other.last_run()) as usize;
                }
            }
        }
        stuck
    }

    /// Pixels of foreign sections touching the last side of the stick.
    pub fn last_stuck(&self) -> usize {
        let lag = self.lag();
        let mut stuck = 0usize;
        for section in self.members().filter_map(|id| lag.section(id)) {
            let run = section.last_run();
            for target in section.targets() {
                if self.contains_section(*target) {
                    continue;
                }
                if let Some(other) = lag.section(*target) {
                    stuck += run.common_length(other.first_run()) as usize;
                }
            }
        }
        stuck
    }
}
