//! Incremental least-squares line fitting.
//!
//! A [`Line`] never stores points. It keeps the sufficient statistics of the
//! points seen so far (count, first and second order moments) and derives the
//! regression on demand:
//!
//! - With `hDen = n·Σx² − (Σx)²` and `vDen = n·Σy² − (Σy)²`, y is regressed on
//!   x when `hDen ≥ vDen`, otherwise x is regressed on y. This keeps the fit
//!   well conditioned for steep point sets.
//! - A single point (or a cloud of coincident points) yields the horizontal
//!   line through the centroid.
//! - The result is kept in normalized normal form `a·x + b·y + c = 0` with
//!   `a² + b² = 1`.
//!
//! Because the statistics are plain sums, [`Line::include_line`] merges two
//! fitted lines by adding them. The merged fit is the fit of the union of both
//! point sets, independent of the merge order. Sticks rely on this to refit in
//! O(sections) rather than O(pixels).
use crate::error::{GeometryError, Result};
use nalgebra::Vector3;

/// Absolute slope above which a line is reported as vertical.
pub const VERTICAL_SLOPE_LIMIT: f64 = 1e6;

const EPS: f64 = 1e-12;

/// Least-squares line over accumulated point statistics.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Line {
    n: usize,
    sum_x: f64,
    sum_y: f64,
    sum_xx: f64,
    sum_yy: f64,
    sum_xy: f64,
}

impl Line {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fit a line on the given points.
    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut line = Self::new();
        for (x, y) in points {
            line.include_point(x, y);
        }
        line
    }

    pub fn include_point(&mut self, x: f64, y: f64) {
        self.n += 1;
        self.sum_x += x;
        self.sum_y += y;
        self.sum_xx += x * x;
        self.sum_yy += y * y;
        self.sum_xy += x * y;
    }

    /// Merge the statistics of an already fitted line into this one.
    ///
    /// Fails only when both lines are empty.
    pub fn include_line(&mut self, other: &Line) -> Result<()> {
        if self.n == 0 && other.n == 0 {
            return Err(GeometryError::InsufficientData { points: 0 });
        }
        self.n += other.n;
        self.sum_x += other.sum_x;
        self.sum_y += other.sum_y;
        self.sum_xx += other.sum_xx;
        self.sum_yy += other.sum_yy;
        self.sum_xy += other.sum_xy;
        Ok(())
    }

    #[inline]
    pub fn number_of_points(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Normalized coefficients `[a, b, c]` of `a·x + b·y + c = 0`.
    pub fn coefficients(&self) -> Result<Vector3<f64>> {
        if self.n == 0 {
            return Err(GeometryError::InsufficientData { points: 0 });
        }
        let count = self.n as f64;
        let mx = self.sum_x / count;
        let my = self.sum_y / count;
        let cxx = self.sum_xx / count - mx * mx;
        let cyy = self.sum_yy / count - my * my;
        let cxy = self.sum_xy / count - mx * my;

        let (a, b, c) = if cxx >= cyy {
            if cxx <= EPS {
                (0.0, 1.0, -my)
            } else {
                // y = my + m·(x − mx)
                let m = cxy / cxx;
                (-m, 1.0, m * mx - my)
            }
        } else {
            // x = mx + m·(y − my)
            let m = cxy / cyy;
            (1.0, -m, m * my - mx)
        };
        let norm = (a * a + b * b).sqrt();
        Ok(Vector3::new(a / norm, b / norm, c / norm))
    }

    /// Slope dy/dx. Infinite for a perfectly vertical line.
    pub fn slope(&self) -> Result<f64> {
        let l = self.coefficients()?;
        Ok(-l[0] / l[1])
    }

    pub fn is_vertical(&self) -> Result<bool> {
        let l = self.coefficients()?;
        Ok(l[0].abs() > VERTICAL_SLOPE_LIMIT * l[1].abs())
    }

    pub fn is_horizontal(&self) -> Result<bool> {
        let l = self.coefficients()?;
        Ok(l[1].abs() > VERTICAL_SLOPE_LIMIT * l[0].abs())
    }

    /// Ordinate at abscissa `x`. Authoritative unless the line is vertical.
    pub fn y_at(&self, x: f64) -> Result<f64> {
        if self.is_vertical()? {
            return Err(GeometryError::DegenerateGeometry {
                reason: "y_at on a vertical line",
            });
        }
        let l = self.coefficients()?;
        Ok(-(l[0] * x + l[2]) / l[1])
    }

    /// Rounded ordinate at integer abscissa `x`.
    pub fn y_at_int(&self, x: i32) -> Result<i32> {
        Ok(self.y_at(x as f64)?.round() as i32)
    }

    /// Abscissa at ordinate `y`. Authoritative unless the line is horizontal.
    pub fn x_at(&self, y: f64) -> Result<f64> {
        if self.is_horizontal()? {
            return Err(GeometryError::DegenerateGeometry {
                reason: "x_at on a horizontal line",
            });
        }
        let l = self.coefficients()?;
        Ok(-(l[1] * y + l[2]) / l[0])
    }

    /// Signed perpendicular distance of `(x, y)` to the line.
    pub fn distance_of(&self, x: f64, y: f64) -> Result<f64> {
        let l = self.coefficients()?;
        Ok(l[0] * x + l[1] * y + l[2])
    }

    /// Root mean square perpendicular distance of the accumulated points.
    pub fn mean_distance(&self) -> Result<f64> {
        let l = self.coefficients()?;
        let (a, b, c) = (l[0], l[1], l[2]);
        let count = self.n as f64;
        let sum_sq = a * a * self.sum_xx
            + b * b * self.sum_yy
            + c * c * count
            + 2.0 * a * b * self.sum_xy
            + 2.0 * a * c * self.sum_x
            + 2.0 * b * c * self.sum_y;
        Ok((sum_sq / count).max(0.0).sqrt())
    }
}

impl std::fmt::Display for Line {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.coefficients() {
            Ok(l) => write!(
                f,
                "{{Line {:+.3}*x {:+.3}*y {:+.3} n={}}}",
                l[0], l[1], l[2], self.n
            ),
            Err(_) => write!(f, "{{Line empty}}"),
        }
    }
}
