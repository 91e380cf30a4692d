use super::{ExtensionTolerance, Stick, StickId};
use crate::error::{GeometryError, Result};
use crate::lag::{Lag, SectionId};
use log::{debug, warn};
use std::collections::{BTreeMap, HashMap};

/// All sticks built over one lag.
///
/// The set owns the section → stick assignment: a section belongs to at most
/// one stick, and merging two sticks moves their sections in one call, so no
/// intermediate state is observable.
#[derive(Debug)]
pub struct StickSet<'a> {
    lag: &'a Lag,
    sticks: BTreeMap<StickId, Stick<'a>>,
    owners: HashMap<SectionId, StickId>,
    next_id: u32,
}

impl<'a> StickSet<'a> {
    pub fn new(lag: &'a Lag) -> Self {
        Self {
            lag,
            sticks: BTreeMap::new(),
            owners: HashMap::new(),
            next_id: 0,
        }
    }

    #[inline]
    pub fn lag(&self) -> &'a Lag {
        self.lag
    }

    /// Create an empty stick and return its id.
    pub fn create(&mut self, interline: i32) -> StickId {
        let id = StickId(self.next_id);
        self.next_id += 1;
        self.sticks.insert(id, Stick::new(id, interline, self.lag));
        id
    }

    /// One stick per section of at least `min_weight` pixels.
    pub fn seed_from_sections(&mut self, interline: i32, min_weight: usize) -> Result<usize> {
        let lag = self.lag;
        let mut created = 0;
        for section in lag.sections() {
            if section.weight() < min_weight || self.owners.contains_key(&section.id()) {
                continue;
            }
            let id = self.create(interline);
            self.assign(id, section.id())?;
            created += 1;
        }
        debug!("StickSet seeded {created} sticks from {} sections", lag.len());
        Ok(created)
    }

    /// Make `section` a member of `stick`.
    pub fn assign(&mut self, stick: StickId, section: SectionId) -> Result<()> {
        match self.owners.get(&section) {
            Some(&owner) if owner == stick => {
                warn!("section #{} already in stick #{}", section.0, stick.0);
                return Ok(());
            }
            Some(&owner) => return Err(GeometryError::SectionAlreadyAssigned { section, owner }),
            None => {}
        }
        let target = self
            .sticks
            .get_mut(&stick)
            .ok_or(GeometryError::UnknownStick(stick))?;
        target.add_section(section)?;
        self.owners.insert(section, stick);
        Ok(())
    }

    pub fn get(&self, id: StickId) -> Option<&Stick<'a>> {
        self.sticks.get(&id)
    }

    pub fn owner_of(&self, section: SectionId) -> Option<StickId> {
        self.owners.get(&section).copied()
    }

    /// Remove a stick and release its sections.
    pub fn remove(&mut self, id: StickId) -> Option<Stick<'a>> {
        let stick = self.sticks.remove(&id)?;
        for section in stick.members() {
            self.owners.remove(&section);
        }
        Some(stick)
    }

    /// Move every section of `from` into `into`; `from` disappears.
    pub fn merge(&mut self, into: StickId, from: StickId) -> Result<()> {
        if into == from {
            return Ok(());
        }
        if !self.sticks.contains_key(&into) {
            return Err(GeometryError::UnknownStick(into));
        }
        let absorbed = self
            .sticks
            .remove(&from)
            .ok_or(GeometryError::UnknownStick(from))?;
        let moved: Vec<SectionId> = absorbed.members().collect();
        let target = self
            .sticks
            .get_mut(&into)
            .ok_or(GeometryError::UnknownStick(into))?;
        target.absorb(absorbed)?;
        for section in moved {
            self.owners.insert(section, into);
        }
        Ok(())
    }

    /// Merge pairs of sticks passing the extension test until none is left.
    ///
    /// Sticks are swept by increasing start. Only sticks whose facing end
    /// lies within `max_delta_coord` are tested, and overlapping sticks are
    /// never merged. A merged stick keeps the lower id and is tested again
    /// with its new extent. Returns the number of merges.
    pub fn merge_extensions(&mut self, tol: &ExtensionTolerance) -> Result<usize> {
        let mut order = self
            .sticks
            .values()
            .filter(|s| !s.is_empty())
            .map(Extent::of)
            .collect::<Result<Vec<_>>>()?;
        order.sort_by_key(|e| (e.start, e.id));

        let mut merges = 0;
        let mut i = 0;
        while i < order.len() {
            let current = order[i].id;
            let Some(partner) = self.find_extension(&order, i, tol)? else {
                i += 1;
                continue;
            };
            let (into, from) = (current.min(partner), current.max(partner));
            debug!("StickSet merging stick #{} into #{}", from.0, into.0);
            self.merge(into, from)?;
            merges += 1;

            order.retain(|e| e.id != from);
            let merged = self
                .sticks
                .get(&into)
                .ok_or(GeometryError::UnknownStick(into))
                .and_then(Extent::of)?;
            if let Some(entry) = order.iter_mut().find(|e| e.id == into) {
                *entry = merged;
            }
            order.sort_by_key(|e| (e.start, e.id));
            i = order.iter().position(|e| e.id == into).unwrap_or(0);
        }
        debug!("StickSet merge_extensions: {merges} merges, {} sticks", self.len());
        Ok(merges)
    }

    /// First stick passing the extension test against `order[i]`.
    ///
    /// Candidates either start near its stop or stop near its start; `order`
    /// is sorted by start, so both ranges are found by bisection.
    fn find_extension(
        &self,
        order: &[Extent],
        i: usize,
        tol: &ExtensionTolerance,
    ) -> Result<Option<StickId>> {
        let current = order[i];
        let stick = self
            .sticks
            .get(&current.id)
            .ok_or(GeometryError::UnknownStick(current.id))?;
        let reach = tol.max_delta_coord.max(0);

        let after_lo = order.partition_point(|e| e.start < current.stop - reach);
        let after_hi = order.partition_point(|e| e.start <= current.stop + reach);
        let before_hi = order.partition_point(|e| e.start <= current.start + reach);
        let after = order[after_lo..after_hi].iter();
        let before = order[..before_hi]
            .iter()
            .filter(|e| (e.stop - current.start).abs() <= reach);

        for candidate in after.chain(before) {
            if candidate.id == current.id {
                continue;
            }
            let other = self
                .sticks
                .get(&candidate.id)
                .ok_or(GeometryError::UnknownStick(candidate.id))?;
            if !stick.overlap_with(other)? && stick.is_extension_of(other, tol)? {
                return Ok(Some(candidate.id));
            }
        }
        Ok(None)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sticks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sticks.is_empty()
    }

    /// Sticks in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Stick<'a>> {
        self.sticks.values()
    }
}

/// Coordinate extent of a stick, used to sweep the set.
#[derive(Clone, Copy, Debug)]
struct Extent {
    start: i32,
    stop: i32,
    id: StickId,
}

impl Extent {
    fn of(stick: &Stick<'_>) -> Result<Self> {
        Ok(Self {
            start: stick.start()?,
            stop: stick.stop()?,
            id: stick.id(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyph::Glyph;
    use crate::lag::Run;
    use crate::types::Orientation;

    /// Three fragments of one staff line at pos 4, with 2-pixel gaps, and a
    /// far away blob.
    fn broken_line_lag() -> Lag {
        let mut lag = Lag::new(Orientation::Horizontal);
        for start in [0, 12, 24] {
            lag.add_section(4, vec![Run::new(start, 10)]).unwrap();
        }
        lag.add_section(40, vec![Run::new(0, 3), Run::new(0, 3)])
            .unwrap();
        lag
    }

    fn tolerance() -> ExtensionTolerance {
        ExtensionTolerance {
            max_delta_coord: 3,
            max_delta_pos: 1,
            max_delta_slope: 0.05,
        }
    }

    #[test]
    fn a_section_belongs_to_one_stick() {
        let lag = broken_line_lag();
        let mut set = StickSet::new(&lag);
        let a = set.create(20);
        let b = set.create(20);
        set.assign(a, SectionId(0)).unwrap();
        set.assign(a, SectionId(0)).unwrap();
        assert_eq!(
            set.assign(b, SectionId(0)),
            Err(GeometryError::SectionAlreadyAssigned {
                section: SectionId(0),
                owner: a
            })
        );
        assert_eq!(
            set.assign(StickId(99), SectionId(1)),
            Err(GeometryError::UnknownStick(StickId(99)))
        );
        assert_eq!(set.owner_of(SectionId(0)), Some(a));
        assert_eq!(set.owner_of(SectionId(1)), None);
    }

    #[test]
    fn merge_moves_ownership_in_one_step() {
        let lag = broken_line_lag();
        let mut set = StickSet::new(&lag);
        assert_eq!(set.seed_from_sections(20, 1).unwrap(), 4);
        let (a, b) = (StickId(0), StickId(1));
        set.get(a).unwrap().line().unwrap();

        set.merge(a, b).unwrap();
        assert!(set.get(b).is_none());
        assert_eq!(set.owner_of(SectionId(1)), Some(a));
        let merged = set.get(a).unwrap();
        assert_eq!(merged.section_count(), 2);
        assert_eq!(merged.line().unwrap().number_of_points(), 20);
        assert_eq!(set.merge(a, b), Err(GeometryError::UnknownStick(b)));
        assert_eq!(
            set.merge(StickId(42), StickId(2)),
            Err(GeometryError::UnknownStick(StickId(42)))
        );
        assert!(set.get(StickId(2)).is_some());
    }

    #[test]
    fn extensions_are_merged_until_stable() {
        let lag = broken_line_lag();
        let mut set = StickSet::new(&lag);
        set.seed_from_sections(20, 1).unwrap();
        assert_eq!(set.merge_extensions(&tolerance()).unwrap(), 2);
        assert_eq!(set.len(), 2);

        let line = set.owner_of(SectionId(0)).and_then(|id| set.get(id)).unwrap();
        assert_eq!(line.start().unwrap(), 0);
        assert_eq!(line.stop().unwrap(), 33);
        assert_eq!(line.weight(), 30);
        assert_eq!(set.owner_of(SectionId(2)), Some(line.id()));
        assert_ne!(set.owner_of(SectionId(3)), Some(line.id()));
    }

    #[test]
    fn seeding_skips_light_and_assigned_sections() {
        let lag = broken_line_lag();
        let mut set = StickSet::new(&lag);
        let manual = set.create(20);
        set.assign(manual, SectionId(0)).unwrap();
        assert_eq!(set.seed_from_sections(20, 8).unwrap(), 2);
        assert_eq!(set.len(), 3);

        let removed = set.remove(manual).unwrap();
        assert!(removed.contains_section(SectionId(0)));
        assert_eq!(set.owner_of(SectionId(0)), None);
    }

    #[test]
    fn merging_does_not_depend_on_stick_ids() {
        // Flat fragment and a tilted staircase; tested both ways round.
        let flat = vec![Run::new(0, 10)];
        let stairs = vec![Run::new(13, 2), Run::new(15, 2), Run::new(17, 2), Run::new(19, 2)];
        let tol = ExtensionTolerance {
            max_delta_coord: 4,
            max_delta_pos: 2,
            max_delta_slope: 0.5,
        };

        let mut flat_first = Lag::new(Orientation::Horizontal);
        flat_first.add_section(0, flat.clone()).unwrap();
        flat_first.add_section(3, stairs.clone()).unwrap();
        let mut stairs_first = Lag::new(Orientation::Horizontal);
        stairs_first.add_section(3, stairs).unwrap();
        stairs_first.add_section(0, flat).unwrap();

        for lag in [&flat_first, &stairs_first] {
            let mut set = StickSet::new(lag);
            set.seed_from_sections(20, 1).unwrap();
            assert_eq!(set.merge_extensions(&tol).unwrap(), 1);
            assert_eq!(set.len(), 1);
            assert!(set.get(StickId(0)).is_some());
        }
    }

    #[test]
    fn long_broken_line_collapses_whatever_the_seed_order() {
        // 60 fragments of 8 pixels with 2-pixel gaps, registered right to left,
        // above a long unbroken line that overlaps all of them.
        let mut lag = Lag::new(Orientation::Horizontal);
        lag.add_section(20, vec![Run::new(0, 600)]).unwrap();
        for k in (0..60).rev() {
            lag.add_section(4, vec![Run::new(k * 10, 8)]).unwrap();
        }
        let mut set = StickSet::new(&lag);
        assert_eq!(set.seed_from_sections(20, 1).unwrap(), 61);
        assert_eq!(set.merge_extensions(&tolerance()).unwrap(), 59);
        assert_eq!(set.len(), 2);

        let broken = set.get(StickId(1)).unwrap();
        assert_eq!(broken.start().unwrap(), 0);
        assert_eq!(broken.stop().unwrap(), 597);
        assert_eq!(broken.weight(), 480);
        assert_eq!(set.owner_of(SectionId(60)), Some(StickId(1)));
        assert_eq!(set.get(StickId(0)).unwrap().section_count(), 1);
    }

    #[test]
    fn merging_a_stick_into_itself_changes_nothing() {
        let lag = broken_line_lag();
        let mut set = StickSet::new(&lag);
        set.seed_from_sections(20, 1).unwrap();
        set.merge(StickId(2), StickId(2)).unwrap();
        assert_eq!(set.len(), 4);
        assert_eq!(set.owner_of(SectionId(2)), Some(StickId(2)));
    }
}
