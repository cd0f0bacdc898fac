//! Pairwise agreement: Cohen's kappa and PABAK for every pair of raters
//! that scored at least one common article.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::interpretation::{interpret, KappaInterpretation};
use crate::domain::{RaterInfo, Rubric, ScoreRecord};
use crate::grouping::ArticleGroups;
use crate::stats::{chance_corrected, percent, round_to};

/// Raw agreement tallies between two parallel category sequences.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CohenStats {
    /// Number of paired observations.
    pub comparisons: usize,
    /// Number of positions where both raters chose the same category.
    pub matches: usize,
    /// Observed agreement `Po`.
    pub observed: f64,
    /// Chance agreement `Pe`.
    pub expected: f64,
    /// `(Po − Pe) / (1 − Pe)`, or 1 when `Pe == 1`.
    pub kappa: f64,
}

impl CohenStats {
    /// Prevalence-adjusted bias-adjusted kappa, `2·Po − 1`.
    pub fn pabak(&self) -> f64 {
        2.0 * self.observed - 1.0
    }

    pub fn percent_agreement(&self) -> f64 {
        percent(self.matches, self.comparisons)
    }
}

/// Cohen's kappa over two equal-length sequences of category indices.
///
/// Returns `None` for empty input or mismatched lengths. Indices must be
/// below `category_count`; anything else is ignored in the marginals.
pub fn cohen_kappa(a: &[usize], b: &[usize], category_count: usize) -> Option<CohenStats> {
    if a.is_empty() || a.len() != b.len() {
        return None;
    }
    let n = a.len();
    let mut freq_a = vec![0usize; category_count];
    let mut freq_b = vec![0usize; category_count];
    let mut matches = 0usize;

    for (&x, &y) in a.iter().zip(b) {
        if x == y {
            matches += 1;
        }
        if let Some(slot) = freq_a.get_mut(x) {
            *slot += 1;
        }
        if let Some(slot) = freq_b.get_mut(y) {
            *slot += 1;
        }
    }

    let nf = n as f64;
    let observed = matches as f64 / nf;
    let expected: f64 = freq_a
        .iter()
        .zip(&freq_b)
        .map(|(&fa, &fb)| (fa as f64 / nf) * (fb as f64 / nf))
        .sum();

    Some(CohenStats {
        comparisons: n,
        matches,
        observed,
        expected,
        kappa: chance_corrected(observed, expected),
    })
}

/// Kappa for one rubric item within a rater pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemKappa {
    pub item_id: String,
    /// `None` when no shared article had a valid score from both raters.
    pub kappa: Option<f64>,
}

/// Agreement between two raters across the articles they both scored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PairwiseAgreement {
    pub rater_a: String,
    pub rater_a_name: String,
    pub rater_b: String,
    pub rater_b_name: String,
    pub shared_articles: usize,
    /// Paired item observations pooled across items and shared articles.
    pub comparisons: usize,
    pub kappa: Option<f64>,
    pub kappa_interpretation: Option<KappaInterpretation>,
    pub pabak: Option<f64>,
    pub pabak_interpretation: Option<KappaInterpretation>,
    pub percent_agreement: Option<f64>,
    pub item_kappas: Vec<ItemKappa>,
}

/// Compute Cohen's kappa and PABAK for every rater pair with shared articles.
///
/// Pairs are emitted in sorted rater-id order. `groups` is expected to hold
/// at most one record per (article, rater); if not, the last one wins.
pub fn pairwise_agreement(
    groups: &ArticleGroups,
    rubric: &Rubric,
    raters: &BTreeMap<String, RaterInfo>,
) -> Vec<PairwiseAgreement> {
    let mut by_rater: BTreeMap<&str, BTreeMap<&str, &ScoreRecord>> = BTreeMap::new();
    for (article_id, scores) in groups {
        for record in scores {
            by_rater
                .entry(record.rater_id.as_str())
                .or_default()
                .insert(article_id.as_str(), record);
        }
    }

    let rater_ids: Vec<&str> = by_rater.keys().copied().collect();
    let mut pairs = Vec::new();

    for (i, &rater_a) in rater_ids.iter().enumerate() {
        for &rater_b in &rater_ids[i + 1..] {
            let scored_a = &by_rater[rater_a];
            let scored_b = &by_rater[rater_b];
            let shared: Vec<(&ScoreRecord, &ScoreRecord)> = scored_a
                .iter()
                .filter_map(|(article, rec_a)| {
                    scored_b.get(article).map(|rec_b| (*rec_a, *rec_b))
                })
                .collect();

            if shared.is_empty() {
                continue;
            }
            pairs.push(compare_pair(rater_a, rater_b, &shared, rubric, raters));
        }
    }

    pairs
}

fn compare_pair(
    rater_a: &str,
    rater_b: &str,
    shared: &[(&ScoreRecord, &ScoreRecord)],
    rubric: &Rubric,
    raters: &BTreeMap<String, RaterInfo>,
) -> PairwiseAgreement {
    let categories = rubric.category_count();
    let mut pooled_a = Vec::new();
    let mut pooled_b = Vec::new();
    let mut item_kappas = Vec::with_capacity(rubric.item_count());

    for item_id in rubric.item_ids() {
        let mut seq_a = Vec::with_capacity(shared.len());
        let mut seq_b = Vec::with_capacity(shared.len());
        for (rec_a, rec_b) in shared {
            match (
                rec_a.item_category(rubric, item_id),
                rec_b.item_category(rubric, item_id),
            ) {
                (Some(x), Some(y)) => {
                    seq_a.push(x);
                    seq_b.push(y);
                }
                _ => tracing::debug!(
                    event = "pairwise.position_skipped",
                    article_id = %rec_a.article_id,
                    item_id = %item_id,
                ),
            }
        }
        let kappa = cohen_kappa(&seq_a, &seq_b, categories).map(|s| round_to(s.kappa, 3));
        item_kappas.push(ItemKappa {
            item_id: item_id.to_string(),
            kappa,
        });
        pooled_a.extend(seq_a);
        pooled_b.extend(seq_b);
    }

    let pooled = cohen_kappa(&pooled_a, &pooled_b, categories);
    let kappa = pooled.map(|s| s.kappa);
    let pabak = pooled.map(|s| s.pabak());

    PairwiseAgreement {
        rater_a: rater_a.to_string(),
        rater_a_name: display_name(raters, rater_a),
        rater_b: rater_b.to_string(),
        rater_b_name: display_name(raters, rater_b),
        shared_articles: shared.len(),
        comparisons: pooled.map_or(0, |s| s.comparisons),
        kappa: kappa.map(|k| round_to(k, 3)),
        kappa_interpretation: interpret(kappa),
        pabak: pabak.map(|p| round_to(p, 3)),
        pabak_interpretation: interpret(pabak),
        percent_agreement: pooled.map(|s| round_to(s.percent_agreement(), 1)),
        item_kappas,
    }
}

/// Directory name for `rater_id`, falling back to the id itself.
pub(crate) fn display_name(raters: &BTreeMap<String, RaterInfo>, rater_id: &str) -> String {
    raters
        .get(rater_id)
        .map(|info| info.name.trim())
        .filter(|name| !name.is_empty())
        .unwrap_or(rater_id)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_sequences_kappa_one() {
        let a = [0, 1, 2, 2, 1, 0];
        let stats = cohen_kappa(&a, &a, 3).expect("stats");
        assert_eq!(stats.kappa, 1.0);
        assert_eq!(stats.percent_agreement(), 100.0);
        assert_eq!(stats.pabak(), 1.0);
    }

    #[test]
    fn test_single_shared_category_is_perfect() {
        let a = [2, 2, 2];
        let stats = cohen_kappa(&a, &a, 3).expect("stats");
        assert_eq!(stats.expected, 1.0);
        assert_eq!(stats.kappa, 1.0);
    }

    #[test]
    fn test_complement_binary_sequences() {
        let a = [0, 1, 0, 1];
        let b = [1, 0, 1, 0];
        let stats = cohen_kappa(&a, &b, 3).expect("stats");
        assert_eq!(stats.observed, 0.0);
        assert!(stats.kappa <= 0.0);
        assert_eq!(stats.pabak(), -1.0);
    }

    #[test]
    fn test_hand_computed_kappa() {
        // Po = 3/4; freq_a = {0:2, 1:2}, freq_b = {0:1, 1:3}
        // Pe = (2/4)(1/4) + (2/4)(3/4) = 0.5 → kappa = 0.5
        let a = [0, 0, 1, 1];
        let b = [0, 1, 1, 1];
        let stats = cohen_kappa(&a, &b, 2).expect("stats");
        assert!((stats.observed - 0.75).abs() < 1e-12);
        assert!((stats.expected - 0.5).abs() < 1e-12);
        assert!((stats.kappa - 0.5).abs() < 1e-12);
        assert!((stats.pabak() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_empty_or_mismatched_is_none() {
        assert!(cohen_kappa(&[], &[], 3).is_none());
        assert!(cohen_kappa(&[0, 1], &[0], 3).is_none());
    }

    #[test]
    fn test_display_name_fallback() {
        let mut raters = BTreeMap::new();
        raters.insert("r1".to_string(), RaterInfo::new("Ada"));
        raters.insert("r2".to_string(), RaterInfo::new("  "));
        assert_eq!(display_name(&raters, "r1"), "Ada");
        assert_eq!(display_name(&raters, "r2"), "r2");
        assert_eq!(display_name(&raters, "r3"), "r3");
    }
}
