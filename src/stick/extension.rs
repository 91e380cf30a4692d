use super::Stick;
use crate::error::Result;
use log::debug;
use serde::{Deserialize, Serialize};

/// Tolerances of the extension test, in pixels (and slope units).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExtensionTolerance {
    /// Max gap along `coord` between the facing ends.
    pub max_delta_coord: i32,
    /// Max gap along `pos` between the two lines at the facing end.
    pub max_delta_pos: i32,
    /// Max difference between the two slopes.
    pub max_delta_slope: f64,
}

impl<'a> Stick<'a> {
    /// Whether both sticks share some coordinate range.
    ///
    /// Strict: sticks whose extents merely touch (`stop == other.start`) do
    /// not overlap.
    pub fn overlap_with(&self, other: &Stick<'_>) -> Result<bool> {
        let lo = self.start()?.max(other.start()?);
        let hi = self.stop()?.min(other.stop()?);
        Ok(lo < hi)
    }

    /// Whether `other` looks like a fragment of the same broken line.
    ///
    /// Either stick may come first, and the test is symmetric. The coordinate
    /// gap between the facing ends must stay within `max_delta_coord`, the
    /// two lines must be within `max_delta_pos` of each other in the middle of
    /// that gap, and the slopes must agree within `max_delta_slope`. Merging
    /// is left to the caller.
    pub fn is_extension_of(&self, other: &Stick<'_>, tol: &ExtensionTolerance) -> Result<bool> {
        let line = self.line()?;
        let other_line = other.line()?;
        if line.is_vertical()? || other_line.is_vertical()? {
            debug!("is_extension_of: vertical line, no extension");
            return Ok(false);
        }

        let (start, stop) = (self.start()?, self.stop()?);
        let (other_start, other_stop) = (other.start()?, other.stop()?);

        let after = (other_start - stop).abs() <= tol.max_delta_coord;
        let before = (other_stop - start).abs() <= tol.max_delta_coord;
        if !after && !before {
            debug!("is_extension_of: incompatible coordinates");
            return Ok(false);
        }

        // Both lines are compared in the middle of the gap, so the answer
        // does not depend on which stick receives the call.
        let max_pos = tol.max_delta_pos as f64;
        let gap_at = |coord: f64| -> Result<f64> {
            Ok((other_line.y_at(coord)? - line.y_at(coord)?).abs())
        };
        let positions_ok = (after && gap_at((stop + other_start) as f64 / 2.0)? <= max_pos)
            || (before && gap_at((other_stop + start) as f64 / 2.0)? <= max_pos);
        if !positions_ok {
            debug!("is_extension_of: incompatible positions");
            return Ok(false);
        }

        if (other_line.slope()? - line.slope()?).abs() > tol.max_delta_slope {
            debug!("is_extension_of: incompatible slopes");
            return Ok(false);
        }
        Ok(true)
    }
}
