//! Sticks: aggregates of sections approximated by a fitted line.
//!
//! A stick gathers sections of one lag that together form a linear
//! structure: staff lines and ledgers in a horizontal lag, stems and bar lines
//! in a vertical lag. Besides its bounds and weight, a stick exposes the
//! least-squares line fitted on all its pixels, obtained by merging the local
//! lines of its members.
//!
//! All geometry is expressed in lag-local axes: `start`/`stop` bound the
//! stick along `coord`, `first_pos`/`last_pos` across its thickness.
//!
//! Caching
//! - The line is memoized in a `OnceCell`. Adding one section merges the
//!   section line into a cached line; absorbing a whole stick drops the cache
//!   so the next query refits from the member lines.
//! - Other derived values (mid position, end positions) are computed from the
//!   bounds and the line on every call and so can never be stale.
//!
//! Queries on a stick without members fail with
//! [`GeometryError::InsufficientData`]; area queries (alien pixels) never
//! fail.
mod aliens;
mod extension;
mod set;

pub use extension::ExtensionTolerance;
pub use set::StickSet;

use crate::error::{GeometryError, Result};
use crate::glyph::{Fitted, Glyph};
use crate::lag::{Lag, SectionId};
use crate::line::Line;
use crate::types::Rect;
use log::debug;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use std::cell::OnceCell;
use std::collections::BTreeSet;

/// Identifier of a stick inside its [`StickSet`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StickId(pub u32);

#[derive(Clone, Debug)]
pub struct Stick<'a> {
    id: StickId,
    interline: i32,
    lag: &'a Lag,
    members: BTreeSet<SectionId>,
    bounds: Rect,
    weight: usize,
    line: OnceCell<Line>,
}

impl<'a> Stick<'a> {
    /// Empty stick bound to `lag`, scaled by the page interline.
    pub fn new(id: StickId, interline: i32, lag: &'a Lag) -> Self {
        Self {
            id,
            interline,
            lag,
            members: BTreeSet::new(),
            bounds: Rect::default(),
            weight: 0,
            line: OnceCell::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> StickId {
        self.id
    }

    #[inline]
    pub fn lag(&self) -> &'a Lag {
        self.lag
    }

    pub fn members(&self) -> impl Iterator<Item = SectionId> + '_ {
        self.members.iter().copied()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    #[inline]
    pub fn section_count(&self) -> usize {
        self.members.len()
    }

    /// Add a section of the lag as a member.
    ///
    /// Re-adding a member is a no-op.
    pub fn add_section(&mut self, id: SectionId) -> Result<()> {
        let section = self
            .lag
            .section(id)
            .ok_or(GeometryError::UnknownSection(id))?;
        if !self.members.insert(id) {
            return Ok(());
        }
        self.bounds = self.bounds.union(&section.bounds());
        self.weight += section.weight();
        if let Some(line) = self.line.get_mut() {
            line.include_line(section.local_line())?;
        }
        Ok(())
    }

    /// Take over all sections of `other`.
    ///
    /// `other` is consumed, so no section can remain shared between the two
    /// sticks. The cached line is dropped. Both sticks must be built over the
    /// same lag.
    pub fn absorb(&mut self, other: Stick<'a>) -> Result<()> {
        if !std::ptr::eq(self.lag, other.lag) {
            return Err(GeometryError::ForeignLag { stick: other.id });
        }
        debug!(
            "Stick#{} absorbs Stick#{} ({} sections)",
            self.id.0,
            other.id.0,
            other.members.len()
        );
        for id in other.members {
            if self.members.insert(id) {
                let section = self.lag.section(id).ok_or(GeometryError::UnknownSection(id))?;
                self.bounds = self.bounds.union(&section.bounds());
                self.weight += section.weight();
            }
        }
        self.line = OnceCell::new();
        Ok(())
    }

    /// Least-squares line over all member pixels, computed on first access.
    pub fn line(&self) -> Result<&Line> {
        if let Some(line) = self.line.get() {
            return Ok(line);
        }
        let line = self.compute_line()?;
        Ok(self.line.get_or_init(|| line))
    }

    fn compute_line(&self) -> Result<Line> {
        if self.members.is_empty() {
            return Err(GeometryError::InsufficientData { points: 0 });
        }
        let mut line = Line::new();
        for &id in &self.members {
            let section = self.lag.section(id).ok_or(GeometryError::UnknownSection(id))?;
            line.include_line(section.fitted_line()?)?;
        }
        if line.is_empty() {
            return Err(GeometryError::InsufficientData { points: 0 });
        }
        debug!(
            "Stick#{} line {} pointNb={} meanDistance={:.3}",
            self.id.0,
            line,
            line.number_of_points(),
            line.mean_distance().unwrap_or(f64::NAN)
        );
        Ok(line)
    }

    fn checked_bounds(&self) -> Result<Rect> {
        if self.members.is_empty() {
            Err(GeometryError::InsufficientData { points: 0 })
        } else {
            Ok(self.bounds)
        }
    }

    /// First coordinate (xmin for a horizontal lag, ymin for a vertical one).
    pub fn start(&self) -> Result<i32> {
        Ok(self.checked_bounds()?.x)
    }

    /// Last coordinate.
    pub fn stop(&self) -> Result<i32> {
        Ok(self.checked_bounds()?.max_x())
    }

    /// First position across the thickness.
    pub fn first_pos(&self) -> Result<i32> {
        Ok(self.checked_bounds()?.y)
    }

    pub fn last_pos(&self) -> Result<i32> {
        Ok(self.checked_bounds()?.max_y())
    }

    /// `stop - start + 1`.
    pub fn length(&self) -> Result<i32> {
        Ok(self.checked_bounds()?.width)
    }

    pub fn thickness(&self) -> Result<i32> {
        Ok(self.checked_bounds()?.height)
    }

    /// Position at the middle of the stick.
    ///
    /// Near-vertical lines (in lag-local axes) fall back to the geometric
    /// center of the thickness.
    pub fn mid_pos(&self) -> Result<i32> {
        let line = self.line()?;
        if line.is_vertical()? {
            let mid = (self.first_pos()? + self.last_pos()?) as f64 / 2.0;
            Ok(mid.round() as i32)
        } else {
            let mid = (self.start()? + self.stop()?) as f64 / 2.0;
            Ok(line.y_at(mid)?.round() as i32)
        }
    }

    /// Best position at the start of the stick.
    pub fn starting_pos(&self) -> Result<i32> {
        let start = self.start()?;
        self.pos_at(start)
    }

    /// Best position at the stop of the stick.
    pub fn stopping_pos(&self) -> Result<i32> {
        let stop = self.stop()?;
        self.pos_at(stop)
    }

    // Thin sticks give unstable extrapolations at their ends.
    fn pos_at(&self, coord: i32) -> Result<i32> {
        let thickness = self.thickness()?;
        let line = self.line()?;
        if thickness >= 2 && !line.is_vertical()? {
            line.y_at_int(coord)
        } else {
            Ok(self.first_pos()? + thickness / 2)
        }
    }

    /// Absolute pixel location of the line at the stick start.
    pub fn start_point(&self) -> Result<Point2<i32>> {
        let start = self.start()?;
        let pos = self.line()?.y_at_int(start)?;
        Ok(self.lag.switch_ref(Point2::new(start, pos)))
    }

    /// Absolute pixel location of the line at the stick stop.
    pub fn stop_point(&self) -> Result<Point2<i32>> {
        let stop = self.stop()?;
        let pos = self.line()?.y_at_int(stop)?;
        Ok(self.lag.switch_ref(Point2::new(stop, pos)))
    }
}

impl<'a> Glyph for Stick<'a> {
    fn interline(&self) -> i32 {
        self.interline
    }

    fn member_ids(&self) -> Vec<SectionId> {
        self.members.iter().copied().collect()
    }

    fn contains_section(&self, id: SectionId) -> bool {
        self.members.contains(&id)
    }

    fn bounds(&self) -> Result<Rect> {
        self.checked_bounds()
    }

    fn weight(&self) -> usize {
        self.weight
    }
}

impl<'a> Fitted for Stick<'a> {
    fn fitted_line(&self) -> Result<&Line> {
        self.line()
    }
}
