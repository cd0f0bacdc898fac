//! Per-reviewer profiles: volume, scoring level, time spent, and tendency
//! relative to everyone else.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::agreement::cohen::display_name;
use crate::config::{ProfileSettings, TierThresholds};
use crate::distribution::{item_category_counts, QualityTier};
use crate::domain::{RaterInfo, Rubric, ScoreRecord};
use crate::stats::{mean, round_to};

/// Raw category counts for one rubric item, indexed like the rubric's
/// category set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemResponseCounts {
    pub item_id: String,
    pub counts: Vec<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReviewerProfile {
    pub rater_id: String,
    pub name: String,
    pub articles: usize,
    pub mean_total: f64,
    pub tier: QualityTier,
    /// `None` when none of the reviewer's scores recorded a duration.
    pub mean_duration_seconds: Option<f64>,
    /// Percent deviation of `mean_total` from the global mean; `None` when
    /// the global mean is 0.
    pub deviation_pct: Option<f64>,
    pub bias: String,
    pub item_counts: Vec<ItemResponseCounts>,
}

/// "tends N% higher", "tends N% lower", or "Consistent". N rounds half away
/// from zero.
pub fn bias_label(deviation_pct: Option<f64>, threshold_pct: f64) -> String {
    match deviation_pct {
        Some(d) if d > threshold_pct => format!("tends {}% higher", d.abs().round()),
        Some(d) if d < -threshold_pct => format!("tends {}% lower", d.abs().round()),
        _ => "Consistent".to_string(),
    }
}

/// Build one profile per reviewer, sorted by rater id.
///
/// The global mean is taken over every record in `records`, which should be
/// the deduplicated ingestion output.
pub fn reviewer_profiles(
    records: &[ScoreRecord],
    rubric: &Rubric,
    raters: &BTreeMap<String, RaterInfo>,
    tiers: &TierThresholds,
    settings: &ProfileSettings,
) -> Vec<ReviewerProfile> {
    let all_totals: Vec<f64> = records.iter().map(|r| r.total(rubric) as f64).collect();
    let global_mean = mean(&all_totals);

    let mut by_rater: BTreeMap<&str, Vec<&ScoreRecord>> = BTreeMap::new();
    for record in records {
        by_rater.entry(record.rater_id.as_str()).or_default().push(record);
    }

    by_rater
        .into_iter()
        .map(|(rater_id, scored)| {
            let totals: Vec<f64> = scored.iter().map(|r| r.total(rubric) as f64).collect();
            let rater_mean = mean(&totals).unwrap_or(0.0);
            let durations: Vec<f64> = scored
                .iter()
                .filter_map(|r| r.duration_seconds.map(|d| d as f64))
                .collect();

            let deviation = global_mean
                .filter(|g| *g != 0.0)
                .map(|g| (rater_mean - g) / g * 100.0);

            ReviewerProfile {
                rater_id: rater_id.to_string(),
                name: display_name(raters, rater_id),
                articles: scored.len(),
                mean_total: round_to(rater_mean, 2),
                tier: tiers.classify(rater_mean),
                mean_duration_seconds: mean(&durations).map(|d| round_to(d, 1)),
                deviation_pct: deviation.map(|d| round_to(d, 1)),
                bias: bias_label(deviation, settings.bias_threshold_pct),
                item_counts: rubric
                    .item_ids()
                    .map(|item_id| ItemResponseCounts {
                        item_id: item_id.to_string(),
                        counts: item_category_counts(&scored, rubric, item_id),
                    })
                    .collect(),
            }
        })
        .collect()
}
