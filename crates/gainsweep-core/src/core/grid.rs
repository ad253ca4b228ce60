use super::EPSILON;
use super::models::gain::{GainRange, Stage};
use tracing::warn;

/// Produces the quantized gain candidates for one amplifier stage.
///
/// Magnitudes are the multiples `k * step` (k >= 1) that do not exceed `v_max / x_bound`.
/// Every strictly increasing pair of magnitudes is one candidate `[min, max]` range.
/// The output floor plays no part here; it only matters to the feasibility solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GainValueGenerator {
    x_bound: f64, // Representative input scale (the low end of the input interval)
    v_max: f64,   // Output ceiling
    step: f64,    // Grid quantum
}

impl GainValueGenerator {
    pub fn new(x_bound: f64, v_max: f64, step: f64) -> Self {
        Self {
            x_bound,
            v_max,
            step,
        }
    }

    /// Largest gain the grid may reach, or `None` when the bound is degenerate.
    pub fn ceiling(&self) -> Option<f64> {
        if self.x_bound <= EPSILON || self.v_max <= EPSILON || self.step <= EPSILON {
            return None;
        }
        let ceiling = self.v_max / self.x_bound;
        ceiling.is_finite().then_some(ceiling)
    }

    /// Number of grid magnitudes, computed without materializing them.
    pub fn magnitude_count(&self) -> u64 {
        match self.ceiling() {
            // `as` saturates, so an absurdly fine grid reports u64::MAX instead of wrapping.
            Some(ceiling) => ((ceiling + EPSILON) / self.step).floor() as u64,
            None => 0,
        }
    }

    /// Number of candidate ranges, `n * (n - 1) / 2` for `n` magnitudes.
    pub fn pair_count(&self) -> Option<u64> {
        let n = self.magnitude_count();
        n.checked_mul(n.saturating_sub(1)).map(|p| p / 2)
    }

    pub fn magnitudes(&self) -> Vec<f64> {
        let Some(ceiling) = self.ceiling() else {
            warn!(
                x_bound = self.x_bound,
                v_max = self.v_max,
                "Degenerate gain ceiling; the gain grid is empty."
            );
            return Vec::new();
        };
        (1..=self.magnitude_count())
            .map(|k| k as f64 * self.step)
            .filter(|&gain| gain <= ceiling + EPSILON)
            .collect()
    }

    /// All `(low, high)` pairs with `low < high`, ordered by `low` then `high`.
    pub fn pairs(&self, stage: Stage) -> Vec<GainRange> {
        let magnitudes = self.magnitudes();
        magnitudes
            .iter()
            .enumerate()
            .flat_map(|(i, &low)| {
                magnitudes[i + 1..]
                    .iter()
                    .filter_map(move |&high| GainRange::new(stage, low, high))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "expected {b}, got {a}");
    }

    #[test]
    fn magnitudes_are_multiples_of_step_up_to_ceiling() {
        let generator = GainValueGenerator::new(2.0, 8.0, 1.0);
        assert_eq!(generator.ceiling(), Some(4.0));
        assert_eq!(generator.magnitudes(), vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(generator.magnitude_count(), 4);
    }

    #[test]
    fn fractional_step_does_not_accumulate_drift() {
        let generator = GainValueGenerator::new(1.0, 1.0, 0.1);
        let magnitudes = generator.magnitudes();
        assert_eq!(magnitudes.len(), 10);
        assert_close(magnitudes[2], 0.3);
        assert_close(magnitudes[9], 1.0);
    }

    #[test]
    fn ceiling_within_tolerance_includes_boundary_magnitude() {
        let generator = GainValueGenerator::new(3.0, 9.0 - 1e-9, 1.0);
        assert_eq!(generator.magnitudes().last().copied(), Some(3.0));
    }

    #[test]
    fn pairs_are_strictly_increasing_and_exhaustive() {
        let generator = GainValueGenerator::new(1.0, 4.0, 1.0);
        let pairs = generator.pairs(Stage::Second);
        let extremes: Vec<[f64; 2]> = pairs.iter().map(|p| p.extremes()).collect();
        assert_eq!(
            extremes,
            vec![
                [1.0, 2.0],
                [1.0, 3.0],
                [1.0, 4.0],
                [2.0, 3.0],
                [2.0, 4.0],
                [3.0, 4.0],
            ]
        );
        assert!(pairs.iter().all(|p| p.stage() == Stage::Second));
        assert_eq!(generator.pair_count(), Some(6));
    }

    #[test]
    fn ceiling_below_step_yields_no_magnitudes() {
        let generator = GainValueGenerator::new(10.0, 5.0, 1.0);
        assert!(generator.magnitudes().is_empty());
        assert!(generator.pairs(Stage::First).is_empty());
        assert_eq!(generator.pair_count(), Some(0));
    }

    #[test]
    fn single_magnitude_yields_no_pairs() {
        let generator = GainValueGenerator::new(1.0, 1.5, 1.0);
        assert_eq!(generator.magnitudes(), vec![1.0]);
        assert!(generator.pairs(Stage::First).is_empty());
    }

    #[test]
    fn degenerate_bounds_produce_empty_grid() {
        assert_eq!(GainValueGenerator::new(0.0, 5.0, 1.0).ceiling(), None);
        assert_eq!(GainValueGenerator::new(-1.0, 5.0, 1.0).magnitude_count(), 0);
        assert!(GainValueGenerator::new(1.0, -5.0, 1.0).magnitudes().is_empty());
    }
}
