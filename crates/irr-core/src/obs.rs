//! Structured observability hooks for agreement computations.
//!
//! This module provides:
//! - A computation-scoped tracing span via the `ComputationSpan` RAII guard
//! - Emission functions for the report lifecycle: start, excluded scores,
//!   estimator outcome, rejected input, finish
//!
//! Events carry an `event` field so log pipelines can filter on it. Level and
//! format are chosen by the binary through [`crate::telemetry::init_tracing`].

use tracing::info;

/// RAII guard that enters a span for the duration of one report computation.
///
/// # Example
///
/// ```ignore
/// let _span = ComputationSpan::enter(records.len());
/// // every event emitted until drop carries `records = <n>`
/// ```
pub struct ComputationSpan {
    _span: tracing::span::EnteredSpan,
}

impl ComputationSpan {
    /// Create and enter a span tagged with the input size.
    pub fn enter(records: usize) -> Self {
        let span = tracing::info_span!("irr.report", records = records);
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: computation started after ingestion.
pub fn emit_report_started(received: usize, effective: usize, articles: usize) {
    info!(
        event = "report.started",
        received = received,
        effective = effective,
        articles = articles,
    );
}

/// Emit event: an item score outside the rubric's categories was excluded.
pub fn emit_score_excluded(article_id: &str, rater_id: &str, item_id: &str, score: i64) {
    tracing::debug!(
        event = "ingest.score_excluded",
        article_id = %article_id,
        rater_id = %rater_id,
        item_id = %item_id,
        score = score,
    );
}

/// Emit event: an estimator finished, with `None` meaning undefined.
pub fn emit_estimator_outcome(estimator: &str, value: Option<f64>) {
    match value {
        Some(v) => info!(event = "estimator.computed", estimator = %estimator, value = v),
        None => info!(event = "estimator.undefined", estimator = %estimator),
    }
}

/// Emit event: input rejected (warning level).
pub fn emit_input_rejected(error: &dyn std::fmt::Display) {
    tracing::warn!(event = "report.input_rejected", error = %error);
}

/// Emit event: report assembled.
pub fn emit_report_finished(duration_ms: u64, pairs: usize, reviewers: usize, digest: &str) {
    info!(
        event = "report.finished",
        duration_ms = duration_ms,
        pairs = pairs,
        reviewers = reviewers,
        digest = %digest,
    );
}
