use super::grid::GainValueGenerator;
use super::models::combination::Combination;
use super::models::gain::{GainRange, Stage};
use std::ops::Range;
use thiserror::Error;
use tracing::debug;

/// Upper bound on the candidate ranges materialized for one stage.
pub const MAX_STAGE_CANDIDATES: u64 = 50_000_000;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum SearchSpaceError {
    #[error("{stage} would need {count} candidate ranges (limit {limit}); use a coarser step")]
    TooManyCandidates { stage: Stage, count: u64, limit: u64 },

    #[error("Combination count {stage1} x {stage2} overflows the index space")]
    IndexOverflow { stage1: u64, stage2: u64 },
}

/// Stage 2 candidates: either their own list or the stage 1 list re-tagged on access.
#[derive(Debug, Clone)]
enum SecondStage {
    SharedGrid,
    Own(Vec<GainRange>),
}

/// The index-addressable cross product of stage1 and stage2 candidate ranges.
///
/// Index `i` addresses `(stage1[i / n2], stage2[i % n2])`. The space is built once and
/// never mutated, so workers read it concurrently without synchronization. When both
/// stages come from the same grid only one candidate list is kept in memory.
#[derive(Debug, Clone)]
pub struct SearchSpace {
    step: f64,
    stage1: Vec<GainRange>,
    stage2: SecondStage,
    total: u64,
}

impl SearchSpace {
    /// Builds both stages from the same gain grid.
    pub fn build(x_bound: f64, v_max: f64, step: f64) -> Result<Self, SearchSpaceError> {
        let generator = GainValueGenerator::new(x_bound, v_max, step);
        let pair_count = generator
            .pair_count()
            .filter(|&count| count <= MAX_STAGE_CANDIDATES);
        let Some(pair_count) = pair_count else {
            return Err(SearchSpaceError::TooManyCandidates {
                stage: Stage::First,
                count: generator.pair_count().unwrap_or(u64::MAX),
                limit: MAX_STAGE_CANDIDATES,
            });
        };

        debug!(
            magnitudes = generator.magnitude_count(),
            pairs_per_stage = pair_count,
            "Generated gain grid."
        );

        let candidates = generator.pairs(Stage::First);
        let n = candidates.len() as u64;
        let total = Self::checked_total(n, n)?;
        let space = Self {
            step,
            stage1: candidates,
            stage2: SecondStage::SharedGrid,
            total,
        };
        debug!(combinations = space.len(), "Built search space.");
        Ok(space)
    }

    pub fn from_candidates(
        step: f64,
        stage1: Vec<GainRange>,
        stage2: Vec<GainRange>,
    ) -> Result<Self, SearchSpaceError> {
        for (stage, candidates) in [(Stage::First, &stage1), (Stage::Second, &stage2)] {
            let count = candidates.len() as u64;
            if count > MAX_STAGE_CANDIDATES {
                return Err(SearchSpaceError::TooManyCandidates {
                    stage,
                    count,
                    limit: MAX_STAGE_CANDIDATES,
                });
            }
        }
        let total = Self::checked_total(stage1.len() as u64, stage2.len() as u64)?;
        Ok(Self {
            step,
            stage1,
            stage2: SecondStage::Own(stage2),
            total,
        })
    }

    fn checked_total(n1: u64, n2: u64) -> Result<u64, SearchSpaceError> {
        n1.checked_mul(n2).ok_or(SearchSpaceError::IndexOverflow {
            stage1: n1,
            stage2: n2,
        })
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn candidate_count(&self, stage: Stage) -> usize {
        match (stage, &self.stage2) {
            (Stage::First, _) | (Stage::Second, SecondStage::SharedGrid) => self.stage1.len(),
            (Stage::Second, SecondStage::Own(stage2)) => stage2.len(),
        }
    }

    /// The `index`-th candidate of `stage`, tagged with that stage.
    pub fn candidate(&self, stage: Stage, index: usize) -> Option<GainRange> {
        match (stage, &self.stage2) {
            (Stage::First, _) => self.stage1.get(index).copied(),
            (Stage::Second, SecondStage::SharedGrid) => self
                .stage1
                .get(index)
                .map(|range| range.with_stage(Stage::Second)),
            (Stage::Second, SecondStage::Own(stage2)) => stage2.get(index).copied(),
        }
    }

    pub fn candidates(&self, stage: Stage) -> impl Iterator<Item = GainRange> + '_ {
        (0..self.candidate_count(stage)).filter_map(move |i| self.candidate(stage, i))
    }

    pub fn len(&self) -> u64 {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn get(&self, index: u64) -> Option<Combination> {
        if index >= self.total {
            return None;
        }
        let n2 = self.candidate_count(Stage::Second) as u64;
        let stage1 = self.candidate(Stage::First, (index / n2) as usize)?;
        let stage2 = self.candidate(Stage::Second, (index % n2) as usize)?;
        Some(Combination::new(stage1, stage2))
    }

    pub fn iter(&self) -> Combinations<'_> {
        self.range(0..self.total)
    }

    /// Iterates a contiguous slice of the index space; out-of-range ends are clamped.
    pub fn range(&self, range: Range<u64>) -> Combinations<'_> {
        let end = range.end.min(self.total);
        Combinations {
            space: self,
            next: range.start.min(end),
            end,
        }
    }
}

impl<'a> IntoIterator for &'a SearchSpace {
    type Item = Combination;
    type IntoIter = Combinations<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug, Clone)]
pub struct Combinations<'a> {
    space: &'a SearchSpace,
    next: u64,
    end: u64,
}

impl Iterator for Combinations<'_> {
    type Item = Combination;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        let combination = self.space.get(self.next);
        self.next += 1;
        combination
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.end - self.next).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Combinations<'_> {}
