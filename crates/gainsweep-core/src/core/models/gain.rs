use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
    First,  // Input-side gain block
    Second, // Output-side gain block
}

impl Stage {
    pub fn number(self) -> u8 {
        match self {
            Stage::First => 1,
            Stage::Second => 2,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Stage {}", self.number())
    }
}

/// The two switchable extremes of one amplifier stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GainRange {
    stage: Stage, // Stage this range belongs to
    min: f64,     // Low gain setting
    max: f64,     // High gain setting, strictly above `min`
}

impl GainRange {
    /// Returns `None` unless both gains are finite and `min < max`.
    pub fn new(stage: Stage, min: f64, max: f64) -> Option<Self> {
        if min.is_finite() && max.is_finite() && min < max {
            Some(Self { stage, min, max })
        } else {
            None
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn extremes(&self) -> [f64; 2] {
        [self.min, self.max]
    }

    /// The same extremes attributed to another stage.
    pub fn with_stage(self, stage: Stage) -> Self {
        Self { stage, ..self }
    }
}

impl fmt::Display for GainRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} ~ {}]", self.min, self.max)
    }
}
