use serde::{Deserialize, Serialize};

/// Maximal contiguous foreground interval along one scan line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Run {
    start: i32,
    length: i32,
}

impl Run {
    /// Build a run. Lags only accept runs of positive length.
    pub fn new(start: i32, length: i32) -> Self {
        Self { start, length }
    }

    /// Run covering `start ..= stop`.
    pub fn from_bounds(start: i32, stop: i32) -> Self {
        Self::new(start, stop - start + 1)
    }

    #[inline]
    pub fn start(&self) -> i32 {
        self.start
    }

    /// Last covered coordinate.
    #[inline]
    pub fn stop(&self) -> i32 {
        self.start + self.length - 1
    }

    #[inline]
    pub fn length(&self) -> i32 {
        self.length
    }

    /// Number of coordinates shared with `other`; zero when disjoint.
    pub fn common_length(&self, other: &Run) -> i32 {
        let lo = self.start.max(other.start);
        let hi = self.stop().min(other.stop());
        (hi - lo + 1).max(0)
    }

    /// Length of this run once clipped to `min ..= max`.
    pub fn clipped_length(&self, min: i32, max: i32) -> i32 {
        let lo = self.start.max(min);
        let hi = self.stop().min(max);
        (hi - lo + 1).max(0)
    }
}
