//! Rubric descriptor: the ordered item ids and the ordinal category set.
//!
//! Every estimator receives the rubric explicitly, so chance-agreement math
//! follows the configured category count rather than a fixed `{0, 1, 2}`.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::error::{IrrError, Result};

/// A single rubric question.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RubricItem {
    /// Key used in [`ScoreRecord::items`](super::ScoreRecord::items).
    pub id: String,

    /// Human-readable label (optional in config files).
    #[serde(default)]
    pub label: String,
}

impl RubricItem {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// Ordered rubric items plus the ordered set of admissible scores.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Rubric {
    pub items: Vec<RubricItem>,

    /// Admissible item scores, strictly ascending.
    pub categories: Vec<i64>,
}

impl Default for Rubric {
    /// The reference 11-item rubric scored 0/1/2.
    fn default() -> Self {
        let labels = [
            "Research question clearly stated",
            "Study design appropriate",
            "Sample described",
            "Sample size justified",
            "Measures valid and reliable",
            "Intervention described",
            "Analysis appropriate",
            "Confounders addressed",
            "Results clearly reported",
            "Limitations discussed",
            "Conclusions supported by data",
        ];
        Self {
            items: labels
                .iter()
                .enumerate()
                .map(|(i, label)| RubricItem::new(format!("q{}", i + 1), *label))
                .collect(),
            categories: vec![0, 1, 2],
        }
    }
}

impl Rubric {
    /// Build a rubric from item ids and categories, validating both.
    pub fn new<I, S>(item_ids: I, categories: Vec<i64>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let rubric = Self {
            items: item_ids
                .into_iter()
                .map(|id| RubricItem::new(id, ""))
                .collect(),
            categories,
        };
        rubric.validate()?;
        Ok(rubric)
    }

    /// Check structural invariants: at least one item, unique non-blank ids,
    /// at least two strictly ascending non-negative categories.
    pub fn validate(&self) -> Result<()> {
        if self.items.is_empty() {
            return Err(IrrError::InvalidRubric("rubric has no items".to_string()));
        }
        let mut seen = HashSet::new();
        for item in &self.items {
            if item.id.trim().is_empty() {
                return Err(IrrError::InvalidRubric("item id must not be empty".to_string()));
            }
            if !seen.insert(item.id.as_str()) {
                return Err(IrrError::InvalidRubric(format!(
                    "duplicate item id '{}'",
                    item.id
                )));
            }
        }
        if self.categories.len() < 2 {
            return Err(IrrError::InvalidRubric(
                "at least two score categories are required".to_string(),
            ));
        }
        if self.categories[0] < 0 {
            return Err(IrrError::InvalidRubric(
                "score categories must be non-negative".to_string(),
            ));
        }
        if self.categories.windows(2).any(|w| w[0] >= w[1]) {
            return Err(IrrError::InvalidRubric(
                "score categories must be strictly ascending".to_string(),
            ));
        }
        if self.checked_max_total().is_none() {
            return Err(IrrError::InvalidRubric(
                "highest category times item count overflows the total score".to_string(),
            ));
        }
        Ok(())
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    pub fn item_ids(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|i| i.id.as_str())
    }

    /// Position of `score` in the category set, or `None` if malformed.
    pub fn category_index(&self, score: i64) -> Option<usize> {
        self.categories.binary_search(&score).ok()
    }

    pub fn is_valid_score(&self, score: i64) -> bool {
        self.category_index(score).is_some()
    }

    /// Highest achievable total.
    ///
    /// Saturates on overflow; [`Rubric::validate`] rejects such rubrics.
    pub fn max_total(&self) -> i64 {
        self.checked_max_total().unwrap_or(i64::MAX)
    }

    fn checked_max_total(&self) -> Option<i64> {
        let top = self.categories.last().copied().unwrap_or(0);
        i64::try_from(self.items.len())
            .ok()
            .and_then(|n| top.checked_mul(n))
    }
}
