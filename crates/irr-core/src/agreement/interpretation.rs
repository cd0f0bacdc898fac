//! Qualitative labels for kappa-style coefficients.

use serde::{Deserialize, Serialize};

/// Strength-of-agreement band for a kappa or ICC value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum KappaInterpretation {
    Slight,
    Fair,
    Moderate,
    Substantial,
    #[serde(rename = "Almost Perfect")]
    AlmostPerfect,
}

impl KappaInterpretation {
    /// Classify `value`. Bounds are exclusive: 0.81 itself is Substantial.
    pub fn from_value(value: f64) -> Self {
        if value > 0.81 {
            Self::AlmostPerfect
        } else if value > 0.61 {
            Self::Substantial
        } else if value > 0.41 {
            Self::Moderate
        } else if value > 0.21 {
            Self::Fair
        } else {
            Self::Slight
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Slight => "Slight",
            Self::Fair => "Fair",
            Self::Moderate => "Moderate",
            Self::Substantial => "Substantial",
            Self::AlmostPerfect => "Almost Perfect",
        }
    }
}

impl std::fmt::Display for KappaInterpretation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Label for an optional coefficient; undefined stays undefined.
pub fn interpret(value: Option<f64>) -> Option<KappaInterpretation> {
    value.map(KappaInterpretation::from_value)
}
