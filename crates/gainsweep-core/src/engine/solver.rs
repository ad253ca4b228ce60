use crate::core::EPSILON;
use crate::core::models::combination::{Combination, has_degenerate_gain, has_tied_gains};
use crate::core::models::solution::{Assignment, Interval, Solution, ZONE_COUNT, Zone};
use crate::engine::config::{AssignmentMode, MatchPolicy, SearchConfig};
use tracing::trace;

/// Evaluates one combination at a time against a fixed configuration.
///
/// Infeasibility is the common outcome and is never an error: a rejected combination
/// or assignment simply contributes no solution.
#[derive(Debug, Clone, Copy)]
pub struct FeasibilitySolver<'a> {
    config: &'a SearchConfig,
}

impl<'a> FeasibilitySolver<'a> {
    pub fn new(config: &'a SearchConfig) -> Self {
        Self { config }
    }

    /// Every feasible assignment of `combination`, one solution each.
    pub fn evaluate(&self, combination: &Combination) -> Vec<Solution> {
        let gains = combination.composite_gains();
        if has_degenerate_gain(&gains) || has_tied_gains(&gains) {
            trace!(?gains, "Pruned combination with tied or degenerate gains.");
            return Vec::new();
        }

        let mut solutions = Vec::new();
        let mut accept = |assignment: Assignment| {
            let Some(zones) = self.layout(&assignment.apply(&gains)) else {
                return false;
            };
            solutions.push(Solution::new(*combination, assignment, zones));
            self.config.match_policy() == MatchPolicy::FirstMatch
        };

        match self.config.assignment_mode() {
            AssignmentMode::Exhaustive => {
                for assignment in Assignment::all() {
                    if accept(assignment) {
                        break;
                    }
                }
            }
            AssignmentMode::SortedDescending => {
                accept(Assignment::sorted_descending(&gains));
            }
        }
        solutions
    }

    /// Lays out zones for gains already in zone order, or `None` if no partition of
    /// the input keeps every zone's output inside the allowed interval.
    ///
    /// Each interior breakpoint sits where its zone's output reaches `v_max`, which is
    /// the furthest a zone can extend and so leaves the most room for the next one.
    pub fn layout(&self, zone_gains: &[f64; ZONE_COUNT]) -> Option<[Zone; ZONE_COUNT]> {
        let (x1, x2) = self.config.input_range();
        let (v_min, v_max) = self.config.output_range();
        let last = ZONE_COUNT - 1;

        if zone_gains[0] * x1 < v_min - EPSILON {
            trace!(gain = zone_gains[0], "Zone covering x1 cannot reach Vmin.");
            return None;
        }
        if zone_gains[last] * x2 > v_max + EPSILON {
            trace!(gain = zone_gains[last], "Zone covering x2 exceeds Vmax.");
            return None;
        }

        let mut bounds = [x1; ZONE_COUNT + 1];
        for (i, &gain) in zone_gains.iter().enumerate() {
            if gain <= EPSILON {
                return None;
            }
            let previous_upper = bounds[i];
            let lower = previous_upper.max(v_min / gain);
            if lower > previous_upper + EPSILON {
                // Gap between zones: the previous zone stops before this gain reaches Vmin.
                return None;
            }
            let upper = if i < last { v_max / gain } else { x2 };
            if previous_upper > upper + EPSILON || upper > x2 + EPSILON {
                return None;
            }
            bounds[i + 1] = upper.clamp(previous_upper, x2);
        }

        let zones: [Zone; ZONE_COUNT] = std::array::from_fn(|i| {
            Zone::new(zone_gains[i], Interval::new(bounds[i], bounds[i + 1]))
        });
        zones
            .iter()
            .all(|zone| zone.output_within(v_min, v_max))
            .then_some(zones)
    }
}
