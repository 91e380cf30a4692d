//! Capabilities shared by section aggregates.
//!
//! [`Glyph`] covers what any aggregate of sections has (bounds, weight,
//! members); [`Fitted`] adds an approximating line. A stick is both; a single
//! section is only fitted.
use crate::error::{GeometryError, Result};
use crate::lag::{Section, SectionId};
use crate::line::Line;
use crate::types::Rect;

pub trait Glyph {
    /// Staff interline, the scale hint of the page.
    fn interline(&self) -> i32;

    /// Member sections, in id order.
    fn member_ids(&self) -> Vec<SectionId>;

    fn contains_section(&self, id: SectionId) -> bool;

    /// Union of the member bounds in (coord, pos) form.
    fn bounds(&self) -> Result<Rect>;

    /// Total foreground pixel count of the members.
    fn weight(&self) -> usize;

    /// Length over thickness.
    fn aspect(&self) -> Result<f64> {
        let bounds = self.bounds()?;
        if bounds.height < 1 {
            return Err(GeometryError::DegenerateGeometry {
                reason: "aspect of a glyph with zero thickness",
            });
        }
        Ok(bounds.width as f64 / bounds.height as f64)
    }

    /// Weight over the pixel area of the bounding box, in (0, 1].
    fn density(&self) -> Result<f64> {
        let bounds = self.bounds()?;
        if bounds.is_empty() {
            return Err(GeometryError::DegenerateGeometry {
                reason: "density of a glyph with an empty bounding box",
            });
        }
        Ok(self.weight() as f64 / bounds.area() as f64)
    }
}

pub trait Fitted {
    fn fitted_line(&self) -> Result<&Line>;
}

impl Fitted for Section {
    fn fitted_line(&self) -> Result<&Line> {
        Ok(self.local_line())
    }
}
