//! Per-article consensus summaries.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::{ConsensusThresholds, TierThresholds};
use crate::distribution::QualityTier;
use crate::domain::{Rubric, ScoreRecord};
use crate::grouping::ArticleGroups;
use crate::stats::round_to;

/// How closely an article's reviewers agree on the total score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsensusStatus {
    Pending,
    #[serde(rename = "Single Reviewer")]
    SingleReviewer,
    Consensus,
    #[serde(rename = "Moderate Spread")]
    ModerateSpread,
    Conflicted,
}

impl ConsensusStatus {
    /// Classify from the reviewer count and the total-score spread.
    pub fn classify(reviewers: usize, spread: i64, thresholds: &ConsensusThresholds) -> Self {
        match reviewers {
            0 => Self::Pending,
            1 => Self::SingleReviewer,
            _ if spread <= thresholds.consensus_max_spread => Self::Consensus,
            _ if spread <= thresholds.moderate_max_spread => Self::ModerateSpread,
            _ => Self::Conflicted,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::SingleReviewer => "Single Reviewer",
            Self::Consensus => "Consensus",
            Self::ModerateSpread => "Moderate Spread",
            Self::Conflicted => "Conflicted",
        }
    }
}

impl std::fmt::Display for ConsensusStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RaterTotal {
    pub rater_id: String,
    pub total: i64,
}

/// Consensus view of one article.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArticleSummary {
    pub article_id: String,
    pub reviewer_count: usize,
    pub totals: Vec<RaterTotal>,
    pub mean_total: Option<f64>,
    pub min_total: Option<i64>,
    pub max_total: Option<i64>,
    pub spread: Option<i64>,
    pub tier: Option<QualityTier>,
    pub status: ConsensusStatus,
}

/// Summarise every scored article plus any `known_articles` without scores.
///
/// `groups` must come from ingestion, which already keeps one record per
/// reviewer; each record here is one unique reviewer.
pub fn article_summaries(
    groups: &ArticleGroups,
    known_articles: &[String],
    rubric: &Rubric,
    tiers: &TierThresholds,
    thresholds: &ConsensusThresholds,
) -> Vec<ArticleSummary> {
    let mut all: BTreeMap<&str, &[ScoreRecord]> = groups
        .iter()
        .map(|(id, scores)| (id.as_str(), scores.as_slice()))
        .collect();
    for id in known_articles {
        if !id.trim().is_empty() {
            all.entry(id.as_str()).or_insert(&[]);
        }
    }

    all.into_iter()
        .map(|(article_id, scores)| summarize(article_id, scores, rubric, tiers, thresholds))
        .collect()
}

fn summarize(
    article_id: &str,
    scores: &[ScoreRecord],
    rubric: &Rubric,
    tiers: &TierThresholds,
    thresholds: &ConsensusThresholds,
) -> ArticleSummary {
    let totals: Vec<RaterTotal> = scores
        .iter()
        .map(|r| RaterTotal {
            rater_id: r.rater_id.clone(),
            total: r.total(rubric),
        })
        .collect();

    let min_total = totals.iter().map(|t| t.total).min();
    let max_total = totals.iter().map(|t| t.total).max();
    let spread = min_total.zip(max_total).map(|(lo, hi)| hi - lo);
    let mean_total = (!totals.is_empty())
        .then(|| totals.iter().map(|t| t.total as f64).sum::<f64>() / totals.len() as f64);

    ArticleSummary {
        article_id: article_id.to_string(),
        reviewer_count: totals.len(),
        status: ConsensusStatus::classify(totals.len(), spread.unwrap_or(0), thresholds),
        totals,
        mean_total: mean_total.map(|m| round_to(m, 2)),
        min_total,
        max_total,
        spread,
        tier: mean_total.map(|m| tiers.classify(m)),
    }
}
