//! Rater agreement engine.
//!
//! Computes inter-rater reliability statistics for rubric-scored reviews:
//! Cohen's kappa and PABAK per rater pair, Fleiss' kappa per rubric item,
//! ICC(2,1) on total scores, score distributions, and article/reviewer
//! summaries. [`compute_report`] runs everything in one pass.

pub mod agreement;
pub mod config;
pub mod distribution;
pub mod domain;
pub mod grouping;
pub mod icc;
pub mod obs;
pub mod report;
pub mod stats;
pub mod summary;
pub mod telemetry;

pub use agreement::{
    cohen_kappa, fleiss_from_counts, group_agreement, pairwise_agreement, CohenStats, FleissItem,
    FleissResult, ItemKappa, KappaInterpretation, PairwiseAgreement,
};
pub use config::{
    ConsensusThresholds, EngineConfig, HistogramSettings, ProfileSettings, TierThresholds,
    MAX_HISTOGRAM_BINS,
};
pub use distribution::{
    analyze, histogram_bins, CategoryCount, DistributionSummary, HistogramBin, ItemDistribution,
    QualityTier, TierCount,
};
pub use domain::{IrrError, RaterInfo, RecordField, Result, Rubric, RubricItem, ScoreRecord};
pub use grouping::{dedup_latest_per_rater, group_by_article, ArticleGroups};
pub use icc::{consistency, icc_2_1, IccResult};
pub use obs::{
    emit_estimator_outcome, emit_input_rejected, emit_report_finished, emit_report_started,
    emit_score_excluded, ComputationSpan,
};
pub use report::{compute_report, display_or_na, AgreementReport, ReportInput};
pub use summary::{
    article_summaries, reviewer_profiles, ArticleSummary, ConsensusStatus, ReviewerProfile,
};
pub use telemetry::init_tracing;

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
