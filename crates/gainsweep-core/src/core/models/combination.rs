use super::gain::GainRange;
use crate::core::EPSILON;

pub const COMPOSITE_GAIN_COUNT: usize = 4;

/// One stage1 x stage2 candidate under evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Combination {
    stage1: GainRange,
    stage2: GainRange,
}

impl Combination {
    pub fn new(stage1: GainRange, stage2: GainRange) -> Self {
        Self { stage1, stage2 }
    }

    pub fn stage1(&self) -> &GainRange {
        &self.stage1
    }

    pub fn stage2(&self) -> &GainRange {
        &self.stage2
    }

    /// Products of every stage1 extreme with every stage2 extreme, in the order
    /// `[min*min, min*max, max*min, max*max]`.
    pub fn composite_gains(&self) -> [f64; COMPOSITE_GAIN_COUNT] {
        let (a, b) = (self.stage1.min(), self.stage1.max());
        let (c, d) = (self.stage2.min(), self.stage2.max());
        [a * c, a * d, b * c, b * d]
    }
}

/// True when two gains coincide within tolerance, which leaves the zone boundary ambiguous.
pub fn has_tied_gains(gains: &[f64]) -> bool {
    gains.iter().enumerate().any(|(i, &g)| {
        gains[i + 1..]
            .iter()
            .any(|&other| (g - other).abs() <= EPSILON)
    })
}

pub fn has_degenerate_gain(gains: &[f64]) -> bool {
    gains.iter().any(|&g| !g.is_finite() || g <= EPSILON)
}
