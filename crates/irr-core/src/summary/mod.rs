//! Human-facing summaries derived from ingested scores.

pub mod article;
pub mod reviewer;

pub use article::{article_summaries, ArticleSummary, ConsensusStatus, RaterTotal};
pub use reviewer::{bias_label, reviewer_profiles, ItemResponseCounts, ReviewerProfile};
