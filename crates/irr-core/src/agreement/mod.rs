//! Chance-corrected agreement estimators.
//!
//! - [`cohen`]: Cohen's kappa and PABAK between rater pairs
//! - [`fleiss`]: Fleiss' kappa across all raters of each article
//! - [`interpretation`]: the shared strength-of-agreement bands

pub mod cohen;
pub mod fleiss;
pub mod interpretation;

pub use cohen::{cohen_kappa, pairwise_agreement, CohenStats, ItemKappa, PairwiseAgreement};
pub use fleiss::{fleiss_from_counts, group_agreement, FleissItem, FleissResult, FleissTally};
pub use interpretation::{interpret, KappaInterpretation};
