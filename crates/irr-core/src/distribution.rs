//! Score distributions: total-score histogram, quality tiers, and per-item
//! category counts.

use serde::{Deserialize, Serialize};

use crate::config::{HistogramSettings, TierThresholds};
use crate::domain::{Rubric, ScoreRecord};
use crate::stats::{mean, percent, round_to};

/// Quality band of a total score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QualityTier {
    High,
    Moderate,
    Low,
}

impl QualityTier {
    pub const ALL: [QualityTier; 3] = [Self::High, Self::Moderate, Self::Low];

    pub fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Moderate => "Moderate",
            Self::Low => "Low",
        }
    }
}

impl std::fmt::Display for QualityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One inclusive histogram bin.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistogramBin {
    pub label: String,
    pub lower: i64,
    pub upper: i64,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TierCount {
    pub tier: QualityTier,
    pub count: usize,
    pub percent: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryCount {
    pub category: i64,
    pub count: usize,
    pub percent: f64,
}

/// Response distribution for one rubric item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemDistribution {
    pub item_id: String,
    /// Valid responses counted for this item.
    pub responses: usize,
    pub categories: Vec<CategoryCount>,
    /// Category-weighted mean on the rubric's scale; `None` without responses.
    pub mean: Option<f64>,
}

/// Histogram, tiers and per-item distributions over a set of scores.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DistributionSummary {
    pub total_scores: usize,
    pub mean_total: Option<f64>,
    pub histogram: Vec<HistogramBin>,
    pub tiers: Vec<TierCount>,
    pub items: Vec<ItemDistribution>,
}

/// Empty bins from 0 to `max_total` in steps of `bin_width`. The last bin
/// absorbs the remainder up to `max_total`.
pub fn histogram_bins(max_total: i64, bin_width: i64) -> Vec<HistogramBin> {
    let width = bin_width.max(1);
    let bin_count = (max_total / width).max(1);
    (0..bin_count)
        .map(|i| {
            let lower = i * width;
            let upper = if i == bin_count - 1 {
                max_total.max(lower)
            } else {
                lower + width - 1
            };
            HistogramBin {
                label: format!("{lower}-{upper}"),
                lower,
                upper,
                count: 0,
            }
        })
        .collect()
}

fn bin_index(total: i64, bin_width: i64, bin_count: usize) -> usize {
    let idx = (total.max(0) / bin_width.max(1)) as usize;
    idx.min(bin_count.saturating_sub(1))
}

/// Build the distribution summary for `records`.
pub fn analyze(
    records: &[ScoreRecord],
    rubric: &Rubric,
    tiers: &TierThresholds,
    histogram: &HistogramSettings,
) -> DistributionSummary {
    let totals: Vec<i64> = records.iter().map(|r| r.total(rubric)).collect();

    let mut bins = histogram_bins(rubric.max_total(), histogram.bin_width);
    let bin_count = bins.len();
    for &total in &totals {
        bins[bin_index(total, histogram.bin_width, bin_count)].count += 1;
    }

    let tier_counts = QualityTier::ALL
        .iter()
        .map(|&tier| {
            let count = totals
                .iter()
                .filter(|&&t| tiers.classify(t as f64) == tier)
                .count();
            TierCount {
                tier,
                count,
                percent: round_to(percent(count, totals.len()), 1),
            }
        })
        .collect();

    let items = rubric
        .item_ids()
        .map(|item_id| item_distribution(records, rubric, item_id))
        .collect();

    let as_f64: Vec<f64> = totals.iter().map(|&t| t as f64).collect();
    DistributionSummary {
        total_scores: records.len(),
        mean_total: mean(&as_f64).map(|m| round_to(m, 2)),
        histogram: bins,
        tiers: tier_counts,
        items,
    }
}

/// Raw category counts for one item, indexed like `rubric.categories`.
pub fn item_category_counts(
    records: &[&ScoreRecord],
    rubric: &Rubric,
    item_id: &str,
) -> Vec<usize> {
    let mut counts = vec![0usize; rubric.category_count()];
    for record in records {
        if let Some(idx) = record.item_category(rubric, item_id) {
            counts[idx] += 1;
        }
    }
    counts
}

fn item_distribution(records: &[ScoreRecord], rubric: &Rubric, item_id: &str) -> ItemDistribution {
    let refs: Vec<&ScoreRecord> = records.iter().collect();
    let counts = item_category_counts(&refs, rubric, item_id);
    let responses: usize = counts.iter().sum();

    let weighted: f64 = counts
        .iter()
        .zip(&rubric.categories)
        .map(|(&c, &value)| c as f64 * value as f64)
        .sum();

    ItemDistribution {
        item_id: item_id.to_string(),
        responses,
        categories: counts
            .iter()
            .zip(&rubric.categories)
            .map(|(&count, &category)| CategoryCount {
                category,
                count,
                percent: round_to(percent(count, responses), 1),
            })
            .collect(),
        mean: (responses > 0).then(|| round_to(weighted / responses as f64, 2)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_bins() {
        let bins = histogram_bins(22, 2);
        assert_eq!(bins.len(), 11);
        assert_eq!(bins[0].label, "0-1");
        assert_eq!(bins[9].label, "18-19");
        assert_eq!(bins[10].label, "20-22");
    }

    #[test]
    fn test_odd_max_total_bins() {
        let bins = histogram_bins(21, 2);
        assert_eq!(bins.len(), 10);
        assert_eq!(bins.last().map(|b| b.upper), Some(21));
    }

    #[test]
    fn test_tiny_range_single_bin() {
        let bins = histogram_bins(1, 2);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].label, "0-1");
    }

    #[test]
    fn test_bin_index_clamps() {
        assert_eq!(bin_index(22, 2, 11), 10);
        assert_eq!(bin_index(21, 2, 11), 10);
        assert_eq!(bin_index(20, 2, 11), 10);
        assert_eq!(bin_index(19, 2, 11), 9);
        assert_eq!(bin_index(40, 2, 11), 10);
        assert_eq!(bin_index(-3, 2, 11), 0);
    }
}
