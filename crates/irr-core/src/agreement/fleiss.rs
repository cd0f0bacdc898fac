//! Group agreement: Fleiss' kappa per rubric item and overall.
//!
//! Only articles with two or more scores take part. Each article contributes
//! equally to `P̄` regardless of how many raters it has.

use serde::{Deserialize, Serialize};

use super::interpretation::{interpret, KappaInterpretation};
use crate::domain::{Rubric, ScoreRecord};
use crate::grouping::{eligible_articles, ArticleGroups};
use crate::stats::{chance_corrected, mean, percent, round_to};

/// Fleiss' kappa for a single rubric item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FleissItem {
    pub item_id: String,
    /// Articles with at least two valid ratings for this item.
    pub articles: usize,
    pub kappa: Option<f64>,
    pub interpretation: Option<KappaInterpretation>,
    /// Agreeing rater pairs / possible rater pairs × 100.
    pub percent_agreement: Option<f64>,
}

/// Per-item Fleiss' kappa plus the unweighted mean across items.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FleissResult {
    pub eligible_articles: usize,
    pub items: Vec<FleissItem>,
    /// Mean of the defined per-item kappas; `None` without eligible articles.
    pub overall_kappa: Option<f64>,
    pub overall_interpretation: Option<KappaInterpretation>,
}

/// Fleiss' kappa from per-subject category counts.
///
/// Each row holds the number of raters choosing each category for one
/// subject. Rows with fewer than two ratings are ignored. Returns `None`
/// when no row qualifies.
pub fn fleiss_from_counts(rows: &[Vec<usize>]) -> Option<FleissTally> {
    let category_count = rows.first().map_or(0, Vec::len);
    let mut category_totals = vec![0usize; category_count];
    let mut total_ratings = 0usize;
    let mut p_i = Vec::with_capacity(rows.len());
    let mut agreeing_pairs = 0usize;
    let mut possible_pairs = 0usize;

    for row in rows {
        let n: usize = row.iter().sum();
        if n < 2 {
            continue;
        }
        let agreeing: usize = row.iter().map(|&c| c * c.saturating_sub(1)).sum();
        let possible = n * (n - 1);
        p_i.push(agreeing as f64 / possible as f64);
        agreeing_pairs += agreeing / 2;
        possible_pairs += possible / 2;

        for (total, &c) in category_totals.iter_mut().zip(row) {
            *total += c;
        }
        total_ratings += n;
    }

    let p_bar = mean(&p_i)?;
    let expected: f64 = category_totals
        .iter()
        .map(|&c| {
            let share = c as f64 / total_ratings as f64;
            share * share
        })
        .sum();

    Some(FleissTally {
        kappa: chance_corrected(p_bar, expected),
        agreeing_pairs,
        possible_pairs,
        subjects: p_i.len(),
    })
}

/// Intermediate Fleiss tallies for one item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FleissTally {
    pub kappa: f64,
    pub agreeing_pairs: usize,
    pub possible_pairs: usize,
    pub subjects: usize,
}

/// Compute Fleiss' kappa for each rubric item over eligible articles.
pub fn group_agreement(groups: &ArticleGroups, rubric: &Rubric) -> FleissResult {
    let eligible: Vec<&Vec<ScoreRecord>> = eligible_articles(groups).map(|(_, s)| s).collect();

    let tallies: Vec<(&str, Option<FleissTally>)> = rubric
        .item_ids()
        .map(|item_id| {
            let rows: Vec<Vec<usize>> = eligible
                .iter()
                .map(|scores| category_counts(scores, rubric, item_id))
                .collect();
            (item_id, fleiss_from_counts(&rows))
        })
        .collect();

    let items = tallies
        .iter()
        .map(|(item_id, tally)| {
            let kappa = tally.map(|t| t.kappa);
            FleissItem {
                item_id: item_id.to_string(),
                articles: tally.map_or(0, |t| t.subjects),
                kappa: kappa.map(|k| round_to(k, 3)),
                interpretation: interpret(kappa),
                percent_agreement: tally
                    .map(|t| round_to(percent(t.agreeing_pairs, t.possible_pairs), 1)),
            }
        })
        .collect();

    // Unweighted mean of the unrounded per-item values.
    let overall_kappa = if eligible.is_empty() {
        None
    } else {
        let per_item: Vec<f64> = tallies.iter().filter_map(|(_, t)| t.map(|t| t.kappa)).collect();
        mean(&per_item)
    };

    FleissResult {
        eligible_articles: eligible.len(),
        items,
        overall_kappa: overall_kappa.map(|k| round_to(k, 3)),
        overall_interpretation: interpret(overall_kappa),
    }
}

fn category_counts(scores: &[ScoreRecord], rubric: &Rubric, item_id: &str) -> Vec<usize> {
    let mut counts = vec![0usize; rubric.category_count()];
    for record in scores {
        match record.item_category(rubric, item_id) {
            Some(idx) => counts[idx] += 1,
            None => tracing::debug!(
                event = "fleiss.rating_skipped",
                article_id = %record.article_id,
                rater_id = %record.rater_id,
                item_id = %item_id,
            ),
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unanimous_rows_kappa_one() {
        let rows = vec![vec![0, 0, 3], vec![3, 0, 0], vec![0, 2, 0]];
        let tally = fleiss_from_counts(&rows).expect("tally");
        assert_eq!(tally.kappa, 1.0);
        assert_eq!(tally.agreeing_pairs, tally.possible_pairs);
    }

    #[test]
    fn test_unanimous_single_category_everywhere() {
        let rows = vec![vec![0, 0, 3], vec![0, 0, 2]];
        let tally = fleiss_from_counts(&rows).expect("tally");
        assert_eq!(tally.kappa, 1.0);
    }

    #[test]
    fn test_hand_computed_split() {
        // One subject, ratings {2, 2, 0}: Pi = 2/6, Pe = (1/3)^2 + (2/3)^2 = 5/9
        // kappa = (1/3 - 5/9) / (4/9) = -0.5
        let rows = vec![vec![1, 0, 2]];
        let tally = fleiss_from_counts(&rows).expect("tally");
        assert!((tally.kappa + 0.5).abs() < 1e-12);
        assert_eq!(tally.agreeing_pairs, 1);
        assert_eq!(tally.possible_pairs, 3);
    }

    #[test]
    fn test_p_bar_is_unweighted_mean() {
        // Subject 1: 4 raters unanimous (Pi = 1); subject 2: 2 raters split (Pi = 0).
        // P̄ = 0.5, totals {0: 5, 1: 1} of 6 → Pe = 26/36
        let rows = vec![vec![4, 0, 0], vec![1, 1, 0]];
        let tally = fleiss_from_counts(&rows).expect("tally");
        let pe = 26.0 / 36.0;
        let expected = (0.5 - pe) / (1.0 - pe);
        assert!((tally.kappa - expected).abs() < 1e-12);
    }

    #[test]
    fn test_rows_below_two_ratings_ignored() {
        assert!(fleiss_from_counts(&[vec![1, 0, 0], vec![0, 0, 0]]).is_none());
        assert!(fleiss_from_counts(&[]).is_none());
    }
}
