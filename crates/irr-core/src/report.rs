//! Report assembly: ingest once, run every estimator, and bundle the results.
//!
//! The computation is a pure function of its input and config. Running it
//! twice on the same input yields byte-identical JSON and therefore the same
//! [`AgreementReport::digest`].

use std::collections::BTreeMap;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::agreement::{group_agreement, pairwise_agreement, FleissResult, PairwiseAgreement};
use crate::config::EngineConfig;
use crate::distribution::{analyze, DistributionSummary};
use crate::domain::{RaterInfo, Result, ScoreRecord};
use crate::grouping::{dedup_latest_per_rater, group_by_article};
use crate::icc::{consistency, IccResult};
use crate::obs;
use crate::summary::{article_summaries, reviewer_profiles, ArticleSummary, ReviewerProfile};

/// Everything the engine needs from its collaborators.
#[derive(Debug, Clone, Default)]
pub struct ReportInput {
    /// Score records as supplied by the score-retrieval collaborator.
    pub records: Vec<ScoreRecord>,
    /// Rater id → display metadata from the user directory.
    pub raters: BTreeMap<String, RaterInfo>,
    /// Article ids known to the metadata collaborator; unscored ones are
    /// reported as pending.
    pub known_articles: Vec<String>,
}

impl ReportInput {
    pub fn new(records: Vec<ScoreRecord>) -> Self {
        Self {
            records,
            ..Self::default()
        }
    }

    pub fn with_raters(mut self, raters: BTreeMap<String, RaterInfo>) -> Self {
        self.raters = raters;
        self
    }

    pub fn with_known_articles(mut self, articles: Vec<String>) -> Self {
        self.known_articles = articles;
        self
    }
}

/// The composite agreement report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgreementReport {
    pub rubric_items: Vec<String>,
    pub categories: Vec<i64>,
    /// Records handed to the engine.
    pub records_received: usize,
    /// Records left after most-recent-per-rater dedup.
    pub records_effective: usize,
    pub pairwise: Vec<PairwiseAgreement>,
    pub fleiss: FleissResult,
    pub icc: Option<IccResult>,
    pub distribution: DistributionSummary,
    pub articles: Vec<ArticleSummary>,
    pub reviewers: Vec<ReviewerProfile>,
}

impl AgreementReport {
    /// SHA-256 hex digest of the report's JSON encoding.
    pub fn digest(&self) -> Result<String> {
        let bytes = serde_json::to_vec(self)?;
        Ok(hex::encode(Sha256::digest(&bytes)))
    }
}

/// Compute the full agreement report.
///
/// Fails only when the config is invalid or a record lacks an identifier.
pub fn compute_report(input: &ReportInput, config: &EngineConfig) -> Result<AgreementReport> {
    let _span = obs::ComputationSpan::enter(input.records.len());
    let started = Instant::now();
    config.validate()?;

    let records = match dedup_latest_per_rater(&input.records) {
        Ok(records) => records,
        Err(e) => {
            obs::emit_input_rejected(&e);
            return Err(e);
        }
    };
    let groups = group_by_article(&records)?;
    obs::emit_report_started(input.records.len(), records.len(), groups.len());

    let rubric = &config.rubric;
    for record in &records {
        for (item_id, score) in record.malformed_items(rubric) {
            obs::emit_score_excluded(&record.article_id, &record.rater_id, item_id, score);
        }
    }
    let pairwise = pairwise_agreement(&groups, rubric, &input.raters);
    let fleiss = group_agreement(&groups, rubric);
    let icc = consistency(&groups, rubric);
    let distribution = analyze(&records, rubric, &config.tiers, &config.histogram);
    let articles = article_summaries(
        &groups,
        &input.known_articles,
        rubric,
        &config.tiers,
        &config.consensus,
    );
    let reviewers = reviewer_profiles(
        &records,
        rubric,
        &input.raters,
        &config.tiers,
        &config.profiles,
    );

    obs::emit_estimator_outcome("fleiss", fleiss.overall_kappa);
    obs::emit_estimator_outcome("icc", icc.as_ref().map(|r| r.icc));

    let report = AgreementReport {
        rubric_items: rubric.item_ids().map(str::to_string).collect(),
        categories: rubric.categories.clone(),
        records_received: input.records.len(),
        records_effective: records.len(),
        pairwise,
        fleiss,
        icc,
        distribution,
        articles,
        reviewers,
    };

    obs::emit_report_finished(
        started.elapsed().as_millis() as u64,
        report.pairwise.len(),
        report.reviewers.len(),
        &report.digest()?,
    );
    Ok(report)
}

/// Render an optional statistic, using "N/A" for undefined values.
pub fn display_or_na(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{v:.decimals$}"),
        None => "N/A".to_string(),
    }
}
