//! Consistency of total scores: two-way random-effects, single-measure,
//! absolute-agreement intraclass correlation, ICC(2,1).
//!
//! The ANOVA decomposition needs a balanced design, so only articles scored
//! by the modal number of raters are used. Columns are rater *slots*: the
//! same column need not be the same person across articles.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::agreement::KappaInterpretation;
use crate::domain::Rubric;
use crate::grouping::{eligible_articles, ArticleGroups};
use crate::stats::round_to;

/// ICC(2,1) over the balanced subset of articles.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IccResult {
    pub icc: f64,
    pub interpretation: KappaInterpretation,
    /// Articles in the balanced subset.
    pub articles: usize,
    /// Raters per article (`k`).
    pub raters_per_article: usize,
}

/// Modal rater count among `counts`; ties go to the larger count.
pub fn modal_rater_count(counts: impl IntoIterator<Item = usize>) -> Option<usize> {
    let mut frequency: BTreeMap<usize, usize> = BTreeMap::new();
    for k in counts {
        *frequency.entry(k).or_default() += 1;
    }
    frequency
        .into_iter()
        .max_by_key(|&(k, freq)| (freq, k))
        .map(|(k, _)| k)
}

/// ICC(2,1) for an `n × k` matrix.
///
/// Returns `None` when `n < 2`, `k < 2`, rows are ragged, or the
/// denominator vanishes (every value identical).
pub fn icc_2_1(matrix: &[Vec<f64>]) -> Option<f64> {
    let n = matrix.len();
    let k = matrix.first().map_or(0, Vec::len);
    if n < 2 || k < 2 || matrix.iter().any(|row| row.len() != k) {
        return None;
    }
    let nf = n as f64;
    let kf = k as f64;

    let grand_mean = matrix.iter().flatten().sum::<f64>() / (nf * kf);
    let row_means: Vec<f64> = matrix.iter().map(|row| row.iter().sum::<f64>() / kf).collect();
    let col_means: Vec<f64> = (0..k)
        .map(|j| matrix.iter().map(|row| row[j]).sum::<f64>() / nf)
        .collect();

    let ss_rows = kf * row_means.iter().map(|m| (m - grand_mean).powi(2)).sum::<f64>();
    let ss_cols = nf * col_means.iter().map(|m| (m - grand_mean).powi(2)).sum::<f64>();
    let ss_total: f64 = matrix.iter().flatten().map(|x| (x - grand_mean).powi(2)).sum();
    let ss_error = ss_total - ss_rows - ss_cols;

    let ms_rows = ss_rows / (nf - 1.0);
    let ms_cols = ss_cols / (kf - 1.0);
    let ms_error = ss_error / ((nf - 1.0) * (kf - 1.0));

    let denominator = ms_rows + (kf - 1.0) * ms_error + (kf / nf) * (ms_cols - ms_error);
    if denominator.abs() < 1e-12 {
        return None;
    }
    Some((ms_rows - ms_error) / denominator)
}

/// ICC(2,1) on article totals, restricted to the balanced design.
///
/// `None` when fewer than two articles share the modal rater count.
pub fn consistency(groups: &ArticleGroups, rubric: &Rubric) -> Option<IccResult> {
    let k = modal_rater_count(eligible_articles(groups).map(|(_, scores)| scores.len()))?;

    let matrix: Vec<Vec<f64>> = eligible_articles(groups)
        .filter(|(_, scores)| scores.len() == k)
        .map(|(_, scores)| scores.iter().map(|r| r.total(rubric) as f64).collect())
        .collect();

    if matrix.len() < 2 {
        tracing::debug!(
            event = "icc.undefined",
            raters_per_article = k,
            balanced_articles = matrix.len(),
        );
        return None;
    }

    let icc = icc_2_1(&matrix)?;
    Some(IccResult {
        icc: round_to(icc, 3),
        interpretation: KappaInterpretation::from_value(icc),
        articles: matrix.len(),
        raters_per_article: k,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modal_rater_count_prefers_larger_on_tie() {
        assert_eq!(modal_rater_count([2, 2, 3, 3]), Some(3));
        assert_eq!(modal_rater_count([2, 2, 2, 3]), Some(2));
        assert_eq!(modal_rater_count(Vec::<usize>::new()), None);
    }

    #[test]
    fn test_icc_hand_computed() {
        // SS_rows = 16, SS_cols = 1.5, SS_error = 0 → 8 / (8 + 2/3 · 1.5) = 8/9
        let matrix = vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]];
        let icc = icc_2_1(&matrix).expect("icc");
        assert!((icc - 8.0 / 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_icc_perfect_agreement() {
        let matrix = vec![vec![1.0, 1.0], vec![3.0, 3.0], vec![5.0, 5.0]];
        assert_eq!(icc_2_1(&matrix), Some(1.0));
    }

    #[test]
    fn test_icc_shrout_fleiss_reference() {
        // Shrout & Fleiss (1979) six targets, four judges: ICC(2,1) ≈ 0.29
        let matrix = vec![
            vec![9.0, 2.0, 5.0, 8.0],
            vec![6.0, 1.0, 3.0, 2.0],
            vec![8.0, 4.0, 6.0, 8.0],
            vec![7.0, 1.0, 2.0, 6.0],
            vec![10.0, 5.0, 6.0, 9.0],
            vec![6.0, 2.0, 4.0, 7.0],
        ];
        let icc = icc_2_1(&matrix).expect("icc");
        assert!((icc - 0.29).abs() < 0.005, "icc was {icc}");
    }

    #[test]
    fn test_icc_constant_matrix_undefined() {
        let matrix = vec![vec![4.0, 4.0], vec![4.0, 4.0]];
        assert_eq!(icc_2_1(&matrix), None);
    }

    #[test]
    fn test_icc_rejects_small_or_ragged() {
        assert_eq!(icc_2_1(&[vec![1.0, 2.0]]), None);
        assert_eq!(icc_2_1(&[vec![1.0], vec![2.0]]), None);
        assert_eq!(icc_2_1(&[vec![1.0, 2.0], vec![3.0]]), None);
    }
}
