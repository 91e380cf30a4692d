use super::run::Run;
use super::section::SectionId;
use super::Lag;
use crate::error::{GeometryError, Result};
use crate::image::BinaryMask;
use crate::types::Orientation;
use log::debug;
use serde::{Deserialize, Serialize};

/// Options controlling how runs are chained into sections.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LagOptions {
    /// Break a section when consecutive runs differ in length by more than
    /// this ratio (longest / shortest). `None` keeps chaining regardless.
    pub max_length_ratio: Option<f32>,
}

/// Builds a [`Lag`] from a binary mask.
///
/// A run extends the section of the run it overlaps on the previous position
/// only when the overlap is one-to-one in both directions. Any junction
/// (split, join, or a length jump above `max_length_ratio`) starts new
/// sections, and the sections on the previous position that touch the new
/// run become its sources.
pub struct LagBuilder {
    orientation: Orientation,
    options: LagOptions,
}

impl LagBuilder {
    pub fn new(orientation: Orientation, options: LagOptions) -> Self {
        Self {
            orientation,
            options,
        }
    }

    /// Scan `mask` into a new lag.
    pub fn build(&self, mask: &BinaryMask) -> Result<Lag> {
        let mut lag = Lag::new(self.orientation);
        let positions = match self.orientation {
            Orientation::Horizontal => mask.height(),
            Orientation::Vertical => mask.width(),
        };

        let mut previous: Vec<(Run, SectionId)> = Vec::new();
        for pos in 0..positions {
            let runs = self.runs_at(mask, pos);
            previous = self.chain_runs(&mut lag, pos as i32, &previous, runs)?;
        }
        debug!(
            "LagBuilder::build {:?} lag: {} sections over {} positions",
            self.orientation,
            lag.len(),
            positions
        );
        Ok(lag)
    }

    /// Foreground runs on scan line `pos`, sorted by start.
    fn runs_at(&self, mask: &BinaryMask, pos: usize) -> Vec<Run> {
        let extent = match self.orientation {
            Orientation::Horizontal => mask.width(),
            Orientation::Vertical => mask.height(),
        };
        let is_set = |coord: usize| match self.orientation {
            Orientation::Horizontal => mask.get(coord, pos),
            Orientation::Vertical => mask.get(pos, coord),
        };
        let mut runs = Vec::new();
        let mut start: Option<usize> = None;
        for coord in 0..extent {
            match (is_set(coord), start) {
                (true, None) => start = Some(coord),
                (false, Some(s)) => {
                    runs.push(Run::from_bounds(s as i32, coord as i32 - 1));
                    start = None;
                }
                _ => {}
            }
        }
        if let Some(s) = start {
            runs.push(Run::from_bounds(s as i32, extent as i32 - 1));
        }
        runs
    }

    fn chain_runs(
        &self,
        lag: &mut Lag,
        pos: i32,
        previous: &[(Run, SectionId)],
        runs: Vec<Run>,
    ) -> Result<Vec<(Run, SectionId)>> {
        let overlaps: Vec<Vec<usize>> = runs
            .iter()
            .map(|run| {
                previous
                    .iter()
                    .enumerate()
                    .filter(|(_, (prev, _))| prev.common_length(run) > 0)
                    .map(|(j, _)| j)
                    .collect()
            })
            .collect();
        let mut fan_out = vec![0usize; previous.len()];
        for js in &overlaps {
            for &j in js {
                fan_out[j] += 1;
            }
        }

        let mut current = Vec::with_capacity(runs.len());
        for (run, js) in runs.into_iter().zip(overlaps) {
            let continued = match js.as_slice() {
                [j] if fan_out[*j] == 1 && self.lengths_compatible(&previous[*j].0, &run) => {
                    Some(previous[*j].1)
                }
                _ => None,
            };
            let id = match continued {
                Some(id) => {
                    lag.section_mut(id)
                        .ok_or(GeometryError::UnknownSection(id))?
                        .append_run(run);
                    id
                }
                None => self.open_section(lag, pos, run, &js, previous)?,
            };
            current.push((run, id));
        }
        Ok(current)
    }

    fn open_section(
        &self,
        lag: &mut Lag,
        pos: i32,
        run: Run,
        touching: &[usize],
        previous: &[(Run, SectionId)],
    ) -> Result<SectionId> {
        let id = lag.add_section(pos, vec![run])?;
        for &j in touching {
            lag.link(previous[j].1, id)?;
        }
        Ok(id)
    }

    fn lengths_compatible(&self, a: &Run, b: &Run) -> bool {
        match self.options.max_length_ratio {
            Some(ratio) => {
                let (lo, hi) = if a.length() <= b.length() {
                    (a.length(), b.length())
                } else {
                    (b.length(), a.length())
                };
                hi as f32 <= ratio * lo as f32
            }
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rect;

    fn mask_from_rows(rows: &[&str]) -> BinaryMask {
        let height = rows.len();
        let width = rows[0].len();
        let bits = rows
            .iter()
            .flat_map(|row| row.bytes().map(|b| b == b'#'))
            .collect();
        BinaryMask::new(width, height, bits)
    }

    #[test]
    fn straight_bar_is_a_single_section() {
        let mask = mask_from_rows(&["......", ".####.", ".####.", "......"]);
        let lag = LagBuilder::new(Orientation::Horizontal, LagOptions::default())
            .build(&mask)
            .unwrap();
        assert_eq!(lag.len(), 1);
        let section = &lag.sections()[0];
        assert_eq!(section.first_pos(), 1);
        assert_eq!(section.bounds(), Rect::new(1, 1, 4, 2));
        assert_eq!(section.weight(), 8);
    }

    #[test]
    fn junction_splits_sections_and_links_them() {
        // Two legs joining into one bar.
        let mask = mask_from_rows(&["#..#", "#..#", "####"]);
        let lag = LagBuilder::new(Orientation::Horizontal, LagOptions::default())
            .build(&mask)
            .unwrap();
        assert_eq!(lag.len(), 3);
        let bar = lag
            .sections()
            .iter()
            .find(|s| s.first_pos() == 2)
            .expect("bottom bar section");
        assert_eq!(bar.sources().len(), 2);
        for leg in bar.sources() {
            assert_eq!(lag.section(*leg).unwrap().targets(), &[bar.id()]);
        }
    }

    #[test]
    fn vertical_lag_scans_columns() {
        let mask = mask_from_rows(&[".#.", ".#.", ".#.", ".#."]);
        let lag = LagBuilder::new(Orientation::Vertical, LagOptions::default())
            .build(&mask)
            .unwrap();
        assert_eq!(lag.len(), 1);
        let section = &lag.sections()[0];
        assert_eq!(section.first_pos(), 1);
        assert_eq!(section.runs(), &[Run::new(0, 4)]);
    }

    #[test]
    fn length_ratio_breaks_sections() {
        let mask = mask_from_rows(&["..##....", "########"]);
        let chained = LagBuilder::new(Orientation::Horizontal, LagOptions::default())
            .build(&mask)
            .unwrap();
        assert_eq!(chained.len(), 1);

        let options = LagOptions {
            max_length_ratio: Some(2.0),
        };
        let broken = LagBuilder::new(Orientation::Horizontal, options)
            .build(&mask)
            .unwrap();
        assert_eq!(broken.len(), 2);
        assert_eq!(broken.sections()[0].targets(), &[broken.sections()[1].id()]);
    }
}
