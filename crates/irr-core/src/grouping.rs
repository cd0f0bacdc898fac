//! Ingestion: identifier validation, most-recent-per-rater dedup, and
//! grouping of score records by article.

use std::collections::{BTreeMap, HashMap};

use crate::domain::{Result, ScoreRecord};

/// Article id → that article's score records, input order preserved.
pub type ArticleGroups = BTreeMap<String, Vec<ScoreRecord>>;

/// Partition `records` by `article_id`.
///
/// No filtering is applied. Fails on the first record with a blank
/// `article_id` or `rater_id`.
pub fn group_by_article(records: &[ScoreRecord]) -> Result<ArticleGroups> {
    let mut groups = ArticleGroups::new();
    for (index, record) in records.iter().enumerate() {
        record.validate_ids(index)?;
        groups
            .entry(record.article_id.clone())
            .or_default()
            .push(record.clone());
    }
    Ok(groups)
}

/// Keep one record per (article, rater): the one with the latest
/// `created_at`. On equal timestamps the later record in input order wins.
///
/// The surviving record takes the position of the pair's first occurrence,
/// so downstream grouping order does not depend on resubmission order.
pub fn dedup_latest_per_rater(records: &[ScoreRecord]) -> Result<Vec<ScoreRecord>> {
    let mut slots: HashMap<(&str, &str), usize> = HashMap::new();
    let mut kept: Vec<ScoreRecord> = Vec::with_capacity(records.len());

    for (index, record) in records.iter().enumerate() {
        record.validate_ids(index)?;
        let key = (record.article_id.as_str(), record.rater_id.as_str());
        match slots.get(&key) {
            Some(&slot) => {
                if record.created_at >= kept[slot].created_at {
                    kept[slot] = record.clone();
                }
            }
            None => {
                slots.insert(key, kept.len());
                kept.push(record.clone());
            }
        }
    }

    let dropped = records.len() - kept.len();
    if dropped > 0 {
        tracing::debug!(
            event = "ingest.deduplicated",
            received = records.len(),
            kept = kept.len(),
            dropped = dropped,
        );
    }
    Ok(kept)
}

/// Articles with at least two scores.
pub fn eligible_articles(
    groups: &ArticleGroups,
) -> impl Iterator<Item = (&String, &Vec<ScoreRecord>)> {
    groups.iter().filter(|(_, scores)| scores.len() >= 2)
}
