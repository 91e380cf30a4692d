//! Serializable reports describing a lag and the sticks built over it.
//!
//! Reports are plain data, detached from the lag lifetime, so a tool can
//! collect them and write them out as JSON in one go.
use crate::glyph::Glyph;
use crate::lag::Lag;
use crate::stick::{Stick, StickSet};
use crate::types::{Orientation, Rect};
use nalgebra::Point2;
use serde::Serialize;
use std::fmt;

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LagReport {
    pub orientation: Orientation,
    pub sections: usize,
    pub weight: usize,
    pub bounds: Rect,
}

impl LagReport {
    pub fn from_lag(lag: &Lag) -> Self {
        Self {
            orientation: lag.orientation(),
            sections: lag.len(),
            weight: lag.sections().iter().map(|s| s.weight()).sum(),
            bounds: lag.bounds(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineReport {
    pub points: usize,
    pub slope: f64,
    pub mean_distance: f64,
    pub vertical: bool,
}

/// Alien pixel counts around both stick ends.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlienReport {
    pub delta_coord: i32,
    pub delta_pos: i32,
    pub at_start: usize,
    pub at_stop: usize,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StickReport {
    pub id: u32,
    pub interline: i32,
    pub sections: usize,
    pub start: i32,
    pub stop: i32,
    pub first_pos: i32,
    pub last_pos: i32,
    pub length: i32,
    pub thickness: i32,
    pub weight: usize,
    pub aspect: Option<f64>,
    pub density: Option<f64>,
    pub mid_pos: Option<i32>,
    pub first_stuck: usize,
    pub last_stuck: usize,
    /// Absolute pixel coordinates.
    pub start_point: Option<Point2<i32>>,
    pub stop_point: Option<Point2<i32>>,
    pub line: Option<LineReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aliens: Option<AlienReport>,
}

impl StickReport {
    /// Snapshot of a stick; `None` for a stick without members.
    ///
    /// `aliens` is the `(dcoord, dpos)` window, in pixels, used for the
    /// end counts.
    pub fn from_stick(stick: &Stick<'_>, aliens: Option<(i32, i32)>) -> Option<Self> {
        let bounds = stick.bounds().ok()?;
        let line = stick.line().ok().and_then(|line| {
            Some(LineReport {
                points: line.number_of_points(),
                slope: line.slope().ok()?,
                mean_distance: line.mean_distance().ok()?,
                vertical: line.is_vertical().ok()?,
            })
        });
        let aliens = match aliens {
            Some((dcoord, dpos)) => Some(AlienReport {
                delta_coord: dcoord,
                delta_pos: dpos,
                at_start: stick.aliens_at_start(dcoord, dpos).ok()?,
                at_stop: stick.aliens_at_stop(dcoord, dpos).ok()?,
            }),
            None => None,
        };
        Some(Self {
            id: stick.id().0,
            interline: stick.interline(),
            sections: stick.section_count(),
            start: bounds.x,
            stop: bounds.max_x(),
            first_pos: bounds.y,
            last_pos: bounds.max_y(),
            length: bounds.width,
            thickness: bounds.height,
            weight: stick.weight(),
            aspect: stick.aspect().ok(),
            density: stick.density().ok(),
            mid_pos: stick.mid_pos().ok(),
            first_stuck: stick.first_stuck(),
            last_stuck: stick.last_stuck(),
            start_point: stick.start_point().ok(),
            stop_point: stick.stop_point().ok(),
            line,
            aliens,
        })
    }
}

/// Full output of one stick extraction run.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SticksReport {
    pub lag: LagReport,
    pub merges: usize,
    pub sticks: Vec<StickReport>,
}

impl SticksReport {
    pub fn from_set(set: &StickSet<'_>, merges: usize, aliens: Option<(i32, i32)>) -> Self {
        Self {
            lag: LagReport::from_lag(set.lag()),
            merges,
            sticks: set
                .iter()
                .filter_map(|stick| StickReport::from_stick(stick, aliens))
                .collect(),
        }
    }
}

impl<'a> fmt::Display for Stick<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Stick#{}", self.id().0)?;
        let Ok(bounds) = self.bounds() else {
            return write!(f, " empty");
        };
        write!(f, " th={} lg={}", bounds.height, bounds.width)?;
        if let Ok(aspect) = self.aspect() {
            write!(f, " l/t={aspect:.1}")?;
        }
        write!(f, " fs={} ls={}", self.first_stuck(), self.last_stuck())?;
        if let (Ok(start), Ok(stop)) = (self.start_point(), self.stop_point()) {
            write!(f, " start[{},{}] stop[{},{}]", start.x, start.y, stop.x, stop.y)?;
        }
        Ok(())
    }
}
