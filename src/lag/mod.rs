//! Run-length sections and their spatial index.
//!
//! A lag ("line adjacency graph") stores every section of one orientation in
//! an arena indexed by [`SectionId`]. Geometry inside a lag is expressed in
//! lag-local `(coord, pos)` axes: `coord` runs along the runs, `pos` across
//! them. [`Lag::switch_ref`] maps such a point to absolute pixel `(x, y)`:
//!
//! - horizontal lag: `coord = x`, `pos = y` (identity);
//! - vertical lag: `coord = y`, `pos = x` (axes swapped).
//!
//! Range queries are plain scans over the arena; a page holds a few thousand
//! sections at most.
mod builder;
mod run;
mod section;

pub use builder::{LagBuilder, LagOptions};
pub use run::Run;
pub use section::{Section, SectionId};

use crate::error::{GeometryError, Result};
use crate::types::{Orientation, Rect};
use nalgebra::Point2;

#[derive(Clone, Debug, Default)]
pub struct Lag {
    orientation: Orientation,
    sections: Vec<Section>,
}

impl Lag {
    pub fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            sections: Vec::new(),
        }
    }

    #[inline]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Register a section made of `runs` stacked from `first_pos` onward.
    pub fn add_section(&mut self, first_pos: i32, runs: Vec<Run>) -> Result<SectionId> {
        if runs.is_empty() {
            return Err(GeometryError::InsufficientData { points: 0 });
        }
        if runs.iter().any(|run| run.length() < 1) {
            return Err(GeometryError::DegenerateGeometry {
                reason: "run of non-positive length",
            });
        }
        let id = SectionId(self.sections.len() as u32);
        self.sections.push(Section::new(id, first_pos, runs));
        Ok(id)
    }

    /// Record that `source` touches `target` on the next position.
    pub fn link(&mut self, source: SectionId, target: SectionId) -> Result<()> {
        self.section(source)
            .ok_or(GeometryError::UnknownSection(source))?;
        self.section(target)
            .ok_or(GeometryError::UnknownSection(target))?;
        self.sections[source.0 as usize].add_target(target);
        self.sections[target.0 as usize].add_source(source);
        Ok(())
    }

    #[inline]
    pub fn section(&self, id: SectionId) -> Option<&Section> {
        self.sections.get(id.0 as usize)
    }

    pub(crate) fn section_mut(&mut self, id: SectionId) -> Option<&mut Section> {
        self.sections.get_mut(id.0 as usize)
    }

    #[inline]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Sections whose bounds intersect `area`. Empty when nothing is there.
    pub fn sections_in(&self, area: &Rect) -> Vec<&Section> {
        self.sections
            .iter()
            .filter(|section| section.bounds().intersects(area))
            .collect()
    }

    /// Convert a lag-local `(coord, pos)` point to absolute `(x, y)`.
    ///
    /// The mapping is an involution, so the same call converts back.
    pub fn switch_ref(&self, point: Point2<i32>) -> Point2<i32> {
        match self.orientation {
            Orientation::Horizontal => point,
            Orientation::Vertical => Point2::new(point.y, point.x),
        }
    }

    /// Union of all section bounds, in (coord, pos) form.
    pub fn bounds(&self) -> Rect {
        self.sections
            .iter()
            .fold(Rect::default(), |acc, s| acc.union(&s.bounds()))
    }
}
