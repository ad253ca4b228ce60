use super::combination::{COMPOSITE_GAIN_COUNT, Combination};
use super::gain::GainRange;
use crate::core::EPSILON;
use std::cmp::Ordering;
use std::fmt;

pub const ZONE_COUNT: usize = COMPOSITE_GAIN_COUNT;
pub const BREAKPOINT_COUNT: usize = ZONE_COUNT - 1;

/// An ordering of the composite gains onto the zones, left to right across the input.
///
/// Entry `z` holds the index (into [`Combination::composite_gains`]) of the gain serving zone `z`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Assignment([usize; ZONE_COUNT]);

impl Assignment {
    pub const IDENTITY: Assignment = Assignment([0, 1, 2, 3]);

    /// Returns `None` unless `order` is a permutation of `0..ZONE_COUNT`.
    pub fn from_order(order: [usize; ZONE_COUNT]) -> Option<Self> {
        let mut seen = [false; ZONE_COUNT];
        for &idx in &order {
            if idx >= ZONE_COUNT || seen[idx] {
                return None;
            }
            seen[idx] = true;
        }
        Some(Self(order))
    }

    /// All 24 assignments in lexicographic order, starting at [`Assignment::IDENTITY`].
    pub fn all() -> impl Iterator<Item = Assignment> {
        std::iter::successors(Some(Self::IDENTITY.0), |current| next_permutation(*current))
            .map(Assignment)
    }

    /// The canonical monotone ordering: largest gain on the lowest-input zone.
    pub fn sorted_descending(gains: &[f64; ZONE_COUNT]) -> Self {
        let mut order = Self::IDENTITY.0;
        order.sort_by(|&a, &b| gains[b].total_cmp(&gains[a]));
        Self(order)
    }

    pub fn order(&self) -> [usize; ZONE_COUNT] {
        self.0
    }

    pub fn gain_index(&self, zone: usize) -> usize {
        self.0[zone]
    }

    /// Rearranges composite gains into zone order.
    pub fn apply(&self, gains: &[f64; ZONE_COUNT]) -> [f64; ZONE_COUNT] {
        self.0.map(|idx| gains[idx])
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.0;
        write!(f, "({a} {b} {c} {d})")
    }
}

fn next_permutation(mut order: [usize; ZONE_COUNT]) -> Option<[usize; ZONE_COUNT]> {
    let pivot = (0..ZONE_COUNT - 1).rev().find(|&i| order[i] < order[i + 1])?;
    let successor = (pivot + 1..ZONE_COUNT)
        .rev()
        .find(|&j| order[j] > order[pivot])?;
    order.swap(pivot, successor);
    order[pivot + 1..].reverse();
    Some(order)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub lo: f64,
    pub hi: f64,
}

impl Interval {
    pub fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    pub fn width(&self) -> f64 {
        self.hi - self.lo
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.lo * factor, self.hi * factor)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:5.3}, {:5.3}]", self.lo, self.hi)
    }
}

/// One contiguous slice of the input interval and the gain serving it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zone {
    pub gain: f64,
    pub input: Interval,
    pub output: Interval, // `input` scaled by `gain`
}

impl Zone {
    pub fn new(gain: f64, input: Interval) -> Self {
        Self {
            gain,
            input,
            output: input.scaled(gain),
        }
    }

    pub fn output_within(&self, v_min: f64, v_max: f64) -> bool {
        self.output.lo >= v_min - EPSILON && self.output.hi <= v_max + EPSILON
    }
}

/// A feasible (combination, assignment, breakpoints) triple.
///
/// Only the feasibility solver constructs solutions; once built they are read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    combination: Combination,
    assignment: Assignment,
    zones: [Zone; ZONE_COUNT],
}

impl Solution {
    pub(crate) fn new(
        combination: Combination,
        assignment: Assignment,
        zones: [Zone; ZONE_COUNT],
    ) -> Self {
        Self {
            combination,
            assignment,
            zones,
        }
    }

    pub fn combination(&self) -> &Combination {
        &self.combination
    }

    pub fn stage1(&self) -> &GainRange {
        self.combination.stage1()
    }

    pub fn stage2(&self) -> &GainRange {
        self.combination.stage2()
    }

    pub fn assignment(&self) -> Assignment {
        self.assignment
    }

    pub fn zones(&self) -> &[Zone; ZONE_COUNT] {
        &self.zones
    }

    /// Composite gains in zone order.
    pub fn gains(&self) -> [f64; ZONE_COUNT] {
        self.zones.map(|zone| zone.gain)
    }

    /// Interior boundaries between adjacent zones.
    pub fn breakpoints(&self) -> [f64; BREAKPOINT_COUNT] {
        [
            self.zones[0].input.hi,
            self.zones[1].input.hi,
            self.zones[2].input.hi,
        ]
    }

    pub fn input_range(&self) -> Interval {
        Interval::new(self.zones[0].input.lo, self.zones[ZONE_COUNT - 1].input.hi)
    }

    /// Ordering by stage1 range, then stage2 range, then assignment.
    pub fn cmp_by_key(&self, other: &Self) -> Ordering {
        let key = |s: &Self| {
            [
                s.stage1().min(),
                s.stage1().max(),
                s.stage2().min(),
                s.stage2().max(),
            ]
        };
        key(self)
            .iter()
            .zip(key(other).iter())
            .map(|(a, b)| a.total_cmp(b))
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal)
            .then_with(|| self.assignment.cmp(&other.assignment))
    }
}

/// Applies the stable ordering used for reporting; storage order after a run is arbitrary.
pub fn sort_solutions(solutions: &mut [Solution]) {
    solutions.sort_by(Solution::cmp_by_key);
}
