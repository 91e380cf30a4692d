//! Error kinds raised by stick and line geometry.
//!
//! Every variant is a precondition violation on the caller's side: geometry
//! was requested before any data was accumulated, or ids were mixed up
//! between lags and stick sets. Spatial range queries never fail.
use crate::lag::SectionId;
use crate::stick::StickId;

/// Reasons why a geometric query may fail.
#[derive(Clone, Debug, PartialEq)]
pub enum GeometryError {
    /// Geometry requested on zero accumulated points.
    InsufficientData { points: usize },
    /// A denominator vanished (zero thickness, or evaluation along the
    /// degenerate axis of a line).
    DegenerateGeometry { reason: &'static str },
    /// The section id is not part of the lag the stick is bound to.
    UnknownSection(SectionId),
    /// The section already belongs to another stick.
    SectionAlreadyAssigned { section: SectionId, owner: StickId },
    /// The stick id is not part of the stick set.
    UnknownStick(StickId),
    /// The stick was built over another lag.
    ForeignLag { stick: StickId },
}

impl std::fmt::Display for GeometryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeometryError::InsufficientData { points } => {
                write!(f, "insufficient data ({points} points)")
            }
            GeometryError::DegenerateGeometry { reason } => {
                write!(f, "degenerate geometry: {reason}")
            }
            GeometryError::UnknownSection(id) => write!(f, "unknown section #{}", id.0),
            GeometryError::SectionAlreadyAssigned { section, owner } => write!(
                f,
                "section #{} already belongs to stick #{}",
                section.0, owner.0
            ),
            GeometryError::UnknownStick(id) => write!(f, "unknown stick #{}", id.0),
            GeometryError::ForeignLag { stick } => {
                write!(f, "stick #{} belongs to another lag", stick.0)
            }
        }
    }
}

impl std::error::Error for GeometryError {}

pub type Result<T> = std::result::Result<T, GeometryError>;
