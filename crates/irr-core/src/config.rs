//! Engine configuration: the rubric plus every classification threshold.
//!
//! Every section is optional in TOML and falls back to the reference
//! values, so an empty file yields [`EngineConfig::default`].
//!
//! ```toml
//! [rubric]
//! categories = [0, 1, 2]
//!
//! [[rubric.items]]
//! id = "q1"
//! label = "Research question clearly stated"
//!
//! [tiers]
//! high = 17
//! moderate = 11
//!
//! [consensus]
//! consensus_max_spread = 3
//! moderate_max_spread = 6
//!
//! [profiles]
//! bias_threshold_pct = 5.0
//!
//! [histogram]
//! bin_width = 2
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::distribution::QualityTier;
use crate::domain::{IrrError, Result, Rubric};

/// Upper bound on the number of histogram bins a config may produce.
pub const MAX_HISTOGRAM_BINS: i64 = 1_000;

/// Total-score cut-offs for quality tiers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TierThresholds {
    /// Minimum total for [`QualityTier::High`].
    pub high: f64,
    /// Minimum total for [`QualityTier::Moderate`].
    pub moderate: f64,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            high: 17.0,
            moderate: 11.0,
        }
    }
}

impl TierThresholds {
    pub fn classify(&self, total: f64) -> QualityTier {
        if total >= self.high {
            QualityTier::High
        } else if total >= self.moderate {
            QualityTier::Moderate
        } else {
            QualityTier::Low
        }
    }
}

/// Spread limits (max − min total) for article consensus status.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ConsensusThresholds {
    pub consensus_max_spread: i64,
    pub moderate_max_spread: i64,
}

impl Default for ConsensusThresholds {
    fn default() -> Self {
        Self {
            consensus_max_spread: 3,
            moderate_max_spread: 6,
        }
    }
}

/// Reviewer profiling settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ProfileSettings {
    /// Deviation from the global mean (percent) beyond which a reviewer is
    /// labelled as scoring higher or lower.
    pub bias_threshold_pct: f64,
}

impl Default for ProfileSettings {
    fn default() -> Self {
        Self {
            bias_threshold_pct: 5.0,
        }
    }
}

/// Total-score histogram settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct HistogramSettings {
    pub bin_width: i64,
}

impl Default for HistogramSettings {
    fn default() -> Self {
        Self { bin_width: 2 }
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub rubric: Rubric,
    pub tiers: TierThresholds,
    pub consensus: ConsensusThresholds,
    pub profiles: ProfileSettings,
    pub histogram: HistogramSettings,
}

impl EngineConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(
            event = "config.loaded",
            path = %path.display(),
            items = config.rubric.item_count(),
            categories = config.rubric.category_count(),
        );
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.rubric.validate()?;
        if self.tiers.high <= self.tiers.moderate {
            return Err(IrrError::InvalidConfig(
                "tiers.high must be greater than tiers.moderate".to_string(),
            ));
        }
        if self.consensus.consensus_max_spread < 0
            || self.consensus.moderate_max_spread < self.consensus.consensus_max_spread
        {
            return Err(IrrError::InvalidConfig(
                "consensus spreads must satisfy 0 <= consensus_max_spread <= moderate_max_spread"
                    .to_string(),
            ));
        }
        if self.profiles.bias_threshold_pct.is_nan() || self.profiles.bias_threshold_pct < 0.0 {
            return Err(IrrError::InvalidConfig(
                "profiles.bias_threshold_pct must be non-negative".to_string(),
            ));
        }
        if self.histogram.bin_width < 1 {
            return Err(IrrError::InvalidConfig(
                "histogram.bin_width must be at least 1".to_string(),
            ));
        }
        let bins = self.rubric.max_total() / self.histogram.bin_width;
        if bins > MAX_HISTOGRAM_BINS {
            return Err(IrrError::InvalidConfig(format!(
                "histogram would need {bins} bins (max {MAX_HISTOGRAM_BINS}); \
                 raise histogram.bin_width"
            )));
        }
        Ok(())
    }
}
