use super::run::Run;
use crate::line::Line;
use crate::types::Rect;
use serde::{Deserialize, Serialize};

/// Identifier of a section inside its lag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(pub u32);

/// Runs stacked on consecutive positions, starting at `first_pos`.
///
/// The local line is fitted once, at construction, on every pixel of the
/// section in lag-local (coord, pos) coordinates.
#[derive(Clone, Debug)]
pub struct Section {
    id: SectionId,
    first_pos: i32,
    runs: Vec<Run>,
    sources: Vec<SectionId>,
    targets: Vec<SectionId>,
    bounds: Rect,
    weight: usize,
    line: Line,
}

impl Section {
    pub(crate) fn new(id: SectionId, first_pos: i32, runs: Vec<Run>) -> Self {
        debug_assert!(!runs.is_empty(), "a section holds at least one run");
        let mut line = Line::new();
        let mut weight = 0usize;
        let mut bounds = Rect::default();
        for (pos, run) in (first_pos..).zip(runs.iter()) {
            for coord in run.start()..=run.stop() {
                line.include_point(coord as f64, pos as f64);
            }
            weight += run.length() as usize;
            bounds = bounds.union(&Rect::new(run.start(), pos, run.length(), 1));
        }
        Self {
            id,
            first_pos,
            runs,
            sources: Vec::new(),
            targets: Vec::new(),
            bounds,
            weight,
            line,
        }
    }

    #[inline]
    pub fn id(&self) -> SectionId {
        self.id
    }

    #[inline]
    pub fn first_pos(&self) -> i32 {
        self.first_pos
    }

    #[inline]
    pub fn last_pos(&self) -> i32 {
        self.first_pos + self.runs.len() as i32 - 1
    }

    #[inline]
    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    pub fn first_run(&self) -> &Run {
        &self.runs[0]
    }

    pub fn last_run(&self) -> &Run {
        &self.runs[self.runs.len() - 1]
    }

    /// Sections touching this one on the preceding position.
    #[inline]
    pub fn sources(&self) -> &[SectionId] {
        &self.sources
    }

    /// Sections touching this one on the following position.
    #[inline]
    pub fn targets(&self) -> &[SectionId] {
        &self.targets
    }

    #[inline]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Foreground pixel count.
    #[inline]
    pub fn weight(&self) -> usize {
        self.weight
    }

    #[inline]
    pub fn local_line(&self) -> &Line {
        &self.line
    }

    pub(crate) fn add_source(&mut self, source: SectionId) {
        if !self.sources.contains(&source) {
            self.sources.push(source);
        }
    }

    pub(crate) fn add_target(&mut self, target: SectionId) {
        if !self.targets.contains(&target) {
            self.targets.push(target);
        }
    }

    /// Append a run on the position following the last one.
    pub(crate) fn append_run(&mut self, run: Run) {
        let pos = self.last_pos() + 1;
        for coord in run.start()..=run.stop() {
            self.line.include_point(coord as f64, pos as f64);
        }
        self.weight += run.length() as usize;
        self.bounds = self
            .bounds
            .union(&Rect::new(run.start(), pos, run.length(), 1));
        self.runs.push(run);
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{Section#{} pos={}..{} runs={} weight={}}}",
            self.id.0,
            self.first_pos,
            self.last_pos(),
            self.runs.len(),
            self.weight
        )
    }
}
