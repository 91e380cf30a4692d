#![doc = include_str!("../README.md")]

// Core geometry
pub mod error;
pub mod glyph;
pub mod lag;
pub mod line;
pub mod stick;
pub mod types;

// Input, reporting and tool configuration
pub mod config;
pub mod diagnostics;
pub mod image;

// --- High-level re-exports -------------------------------------------------

pub use crate::error::GeometryError;
pub use crate::glyph::{Fitted, Glyph};
pub use crate::lag::{Lag, LagBuilder, LagOptions, Run, Section, SectionId};
pub use crate::line::Line;
pub use crate::stick::{ExtensionTolerance, Stick, StickId, StickSet};
pub use crate::types::{Orientation, Rect};

pub use crate::diagnostics::{StickReport, SticksReport};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```
/// use omr_sticks::prelude::*;
///
/// let mut mask = BinaryMask::empty(40, 10);
/// mask.fill(2, 4, 37, 5);
///
/// let lag = LagBuilder::new(Orientation::Horizontal, LagOptions::default())
///     .build(&mask)
///     .unwrap();
/// let mut sticks = StickSet::new(&lag);
/// sticks.seed_from_sections(20, 1).unwrap();
///
/// let stick = sticks.iter().next().unwrap();
/// assert_eq!(stick.length().unwrap(), 36);
/// assert_eq!(stick.mid_pos().unwrap(), 5);
/// ```
pub mod prelude {
    pub use crate::image::{BinaryMask, ImageU8};
    pub use crate::{
        ExtensionTolerance, Fitted, GeometryError, Glyph, Lag, LagBuilder, LagOptions, Line,
        Orientation, Stick, StickSet,
    };
}
