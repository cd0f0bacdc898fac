//! Score records: one reviewer's scoring of one article.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::{IrrError, RecordField, Result};
use super::rubric::Rubric;

/// A single reviewer's rubric scores for one article.
///
/// Identifier fields default to empty when absent from the input so that a
/// missing id surfaces as [`IrrError::InvalidInput`] rather than a parse error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoreRecord {
    /// Identifier of the scored article.
    #[serde(default)]
    pub article_id: String,

    /// Pseudonymous reviewer handle.
    #[serde(default)]
    pub rater_id: String,

    /// Rubric item id → score. Out-of-range values are kept but never counted;
    /// non-integer values (`null`, fractions, strings) are dropped on input.
    #[serde(default, deserialize_with = "lenient_items::deserialize")]
    pub items: BTreeMap<String, i64>,

    /// Time spent producing the score.
    #[serde(default)]
    pub duration_seconds: Option<u64>,

    /// Submission time, used to pick the most recent score per rater.
    pub created_at: DateTime<Utc>,
}

impl ScoreRecord {
    /// Create a record with no item scores.
    pub fn new(
        article_id: impl Into<String>,
        rater_id: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            article_id: article_id.into(),
            rater_id: rater_id.into(),
            items: BTreeMap::new(),
            duration_seconds: None,
            created_at,
        }
    }

    /// Set one item score.
    pub fn with_item(mut self, item_id: impl Into<String>, score: i64) -> Self {
        self.items.insert(item_id.into(), score);
        self
    }

    /// Assign `scores` positionally to the rubric's items.
    pub fn with_scores(mut self, rubric: &Rubric, scores: &[i64]) -> Self {
        for (item_id, score) in rubric.item_ids().zip(scores) {
            self.items.insert(item_id.to_string(), *score);
        }
        self
    }

    pub fn with_duration(mut self, seconds: u64) -> Self {
        self.duration_seconds = Some(seconds);
        self
    }

    /// Score for `item_id` if present and a valid category of `rubric`.
    pub fn item_score(&self, rubric: &Rubric, item_id: &str) -> Option<i64> {
        self.items
            .get(item_id)
            .copied()
            .filter(|s| rubric.is_valid_score(*s))
    }

    /// Category position for `item_id`, `None` when missing or malformed.
    pub fn item_category(&self, rubric: &Rubric, item_id: &str) -> Option<usize> {
        self.items
            .get(item_id)
            .and_then(|s| rubric.category_index(*s))
    }

    /// Rubric items whose score is present but not an admissible category.
    pub fn malformed_items<'a>(
        &'a self,
        rubric: &'a Rubric,
    ) -> impl Iterator<Item = (&'a str, i64)> + 'a {
        rubric.item_ids().filter_map(move |item_id| {
            self.items
                .get(item_id)
                .copied()
                .filter(|s| !rubric.is_valid_score(*s))
                .map(|s| (item_id, s))
        })
    }

    /// Sum of the valid rubric item scores.
    pub fn total(&self, rubric: &Rubric) -> i64 {
        rubric
            .item_ids()
            .filter_map(|id| self.item_score(rubric, id))
            .sum()
    }

    /// Fail fast if either identifier is blank. `index` is the record's
    /// position in the caller's collection.
    pub fn validate_ids(&self, index: usize) -> Result<()> {
        if self.article_id.trim().is_empty() {
            return Err(IrrError::InvalidInput {
                index,
                field: RecordField::ArticleId,
            });
        }
        if self.rater_id.trim().is_empty() {
            return Err(IrrError::InvalidInput {
                index,
                field: RecordField::RaterId,
            });
        }
        Ok(())
    }
}

/// Item maps where an unanswered or garbled entry drops out instead of
/// failing the whole record.
mod lenient_items {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BTreeMap<String, i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<BTreeMap<String, Value>>::deserialize(deserializer)?;
        Ok(raw
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(item_id, value)| match value.as_i64() {
                Some(score) => Some((item_id, score)),
                None => {
                    tracing::debug!(
                        event = "ingest.item_dropped",
                        item_id = %item_id,
                        value = %value,
                    );
                    None
                }
            })
            .collect())
    }
}

/// Display metadata for a reviewer, supplied by the user directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RaterInfo {
    pub name: String,
}

impl RaterInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}
