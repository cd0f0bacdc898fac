//! Rater agreement CLI
//!
//! The `irr` command computes inter-rater reliability reports from exported
//! rubric scores.
//!
//! ## Commands
//!
//! - `report`: Compute the full agreement report and print it as JSON
//! - `rubric`: Print the effective engine configuration as TOML

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use irr_core::{
    compute_report, display_or_na, AgreementReport, EngineConfig, RaterInfo, ReportInput,
    ScoreRecord,
};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "irr")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Inter-rater reliability for rubric-scored reviews", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the agreement report for a set of score records
    Report {
        /// Score records (JSON array)
        #[arg(short, long)]
        scores: PathBuf,

        /// Rater directory: JSON object of rater id to `{"name": ...}`
        #[arg(short, long)]
        raters: Option<PathBuf>,

        /// Known article ids (JSON array); unscored ones are reported as pending
        #[arg(short, long)]
        articles: Option<PathBuf>,

        /// Engine configuration (TOML)
        #[arg(short, long, env = "IRR_CONFIG")]
        config: Option<PathBuf>,

        /// Print single-line JSON instead of pretty output
        #[arg(long)]
        compact: bool,
    },

    /// Show the effective rubric, thresholds, and histogram settings
    Rubric {
        /// Engine configuration (TOML)
        #[arg(short, long, env = "IRR_CONFIG")]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    irr_core::init_tracing(cli.json, level);

    match cli.command {
        Commands::Report {
            scores,
            raters,
            articles,
            config,
            compact,
        } => cmd_report(
            &scores,
            raters.as_deref(),
            articles.as_deref(),
            config.as_deref(),
            compact,
        ),
        Commands::Rubric { config } => cmd_rubric(config.as_deref()),
    }
}

fn cmd_report(
    scores: &Path,
    raters: Option<&Path>,
    articles: Option<&Path>,
    config: Option<&Path>,
    compact: bool,
) -> Result<()> {
    let report = build_report(scores, raters, articles, config)?;

    info!(
        records = report.records_effective,
        pairs = report.pairwise.len(),
        fleiss = %display_or_na(report.fleiss.overall_kappa, 3),
        icc = %display_or_na(report.icc.as_ref().map(|r| r.icc), 3),
        "Agreement report computed"
    );

    let rendered = if compact {
        serde_json::to_string(&report)?
    } else {
        serde_json::to_string_pretty(&report)?
    };
    println!("{}", rendered);
    Ok(())
}

fn build_report(
    scores: &Path,
    raters: Option<&Path>,
    articles: Option<&Path>,
    config: Option<&Path>,
) -> Result<AgreementReport> {
    let config = load_config(config)?;
    let records: Vec<ScoreRecord> = read_json_file(scores)?;

    let mut input = ReportInput::new(records);
    if let Some(path) = raters {
        let directory: BTreeMap<String, RaterInfo> = read_json_file(path)?;
        input = input.with_raters(directory);
    }
    if let Some(path) = articles {
        let known: Vec<String> = read_json_file(path)?;
        input = input.with_known_articles(known);
    }

    compute_report(&input, &config).context("Failed to compute agreement report")
}

fn cmd_rubric(config: Option<&Path>) -> Result<()> {
    let config = load_config(config)?;
    print!("{}", config.to_toml_string()?);
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("Failed to load config: {:?}", path)),
        None => Ok(EngineConfig::default()),
    }
}

fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read JSON file: {:?}", path))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use irr_core::{ConsensusStatus, Rubric};

    fn write_scores(dir: &Path, records: &[ScoreRecord]) -> PathBuf {
        let path = dir.join("scores.json");
        std::fs::write(&path, serde_json::to_string(records).unwrap()).unwrap();
        path
    }

    fn sample_records() -> Vec<ScoreRecord> {
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        let rubric = Rubric::default();
        vec![
            ScoreRecord::new("a1", "r1", at).with_scores(&rubric, &[2; 11]),
            ScoreRecord::new("a1", "r2", at).with_scores(&rubric, &[2; 11]),
            ScoreRecord::new("a2", "r1", at).with_scores(&rubric, &[1; 11]),
            ScoreRecord::new("a2", "r2", at).with_scores(&rubric, &[0; 11]),
        ]
    }

    #[test]
    fn test_build_report_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let scores = write_scores(dir.path(), &sample_records());

        let raters = dir.path().join("raters.json");
        std::fs::write(&raters, r#"{"r1": {"name": "Dr. Alvarez"}}"#).unwrap();
        let articles = dir.path().join("articles.json");
        std::fs::write(&articles, r#"["a1", "a2", "a3"]"#).unwrap();

        let report = build_report(&scores, Some(&raters), Some(&articles), None).unwrap();

        assert_eq!(report.records_effective, 4);
        assert_eq!(report.pairwise.len(), 1);
        assert_eq!(report.pairwise[0].rater_a_name, "Dr. Alvarez");
        assert_eq!(report.pairwise[0].rater_b_name, "r2");
        assert_eq!(report.articles.len(), 3);
        assert_eq!(report.articles[2].status, ConsensusStatus::Pending);
    }

    #[test]
    fn test_build_report_with_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let scores = write_scores(dir.path(), &sample_records());
        let config = dir.path().join("irr.toml");
        std::fs::write(
            &config,
            "[consensus]\nconsensus_max_spread = 11\nmoderate_max_spread = 12\n",
        )
        .unwrap();

        let report = build_report(&scores, None, None, Some(&config)).unwrap();
        let a2 = &report.articles[1];
        assert_eq!(a2.spread, Some(11));
        assert_eq!(a2.status, ConsensusStatus::Consensus);
    }

    #[test]
    fn test_missing_identifier_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut records = sample_records();
        records[1].rater_id.clear();
        let scores = write_scores(dir.path(), &records);

        let err = build_report(&scores, None, None, None).unwrap_err();
        assert!(format!("{:#}", err).contains("score record 1 is missing rater_id"));
    }

    #[test]
    fn test_null_item_score_excluded_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let scores = dir.path().join("scores.json");
        std::fs::write(
            &scores,
            r#"[
                {"article_id": "a1", "rater_id": "r1", "items": {"q1": 2, "q2": null},
                 "created_at": "2026-03-01T09:00:00Z"},
                {"article_id": "a1", "rater_id": "r2", "items": {"q1": 2, "q2": 1},
                 "created_at": "2026-03-01T09:05:00Z"}
            ]"#,
        )
        .unwrap();

        let report = build_report(&scores, None, None, None).unwrap();

        let q2 = &report.distribution.items[1];
        assert_eq!(q2.item_id, "q2");
        assert_eq!(q2.responses, 1);
        assert_eq!(report.pairwise[0].comparisons, 1);
        assert_eq!(report.pairwise[0].item_kappas[1].kappa, None);
        assert_eq!(report.fleiss.items[1].kappa, None);
        assert_eq!(report.articles[0].totals[0].total, 2);
    }

    #[test]
    fn test_oversized_categories_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let scores = write_scores(dir.path(), &sample_records());
        let config = dir.path().join("irr.toml");
        std::fs::write(&config, "[rubric]\ncategories = [0, 1, 1000000000]\n").unwrap();

        let err = build_report(&scores, None, None, Some(&config)).unwrap_err();
        assert!(format!("{:#}", err).contains("histogram would need"));
    }

    #[test]
    fn test_invalid_json_has_context() {
        let dir = tempfile::tempdir().unwrap();
        let scores = dir.path().join("scores.json");
        std::fs::write(&scores, "not json").unwrap();

        let err = build_report(&scores, None, None, None).unwrap_err();
        assert!(err.to_string().contains("Invalid JSON"));
    }

    #[test]
    fn test_unknown_config_key_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("irr.toml");
        std::fs::write(&config, "[tiers]\nexcellent = 20.0\n").unwrap();

        assert!(load_config(Some(&config)).is_err());
    }

    #[test]
    fn test_default_config_without_path() {
        let config = load_config(None).unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_cli_parses_report_command() {
        let cli = Cli::try_parse_from([
            "irr", "--verbose", "report", "--scores", "s.json", "--compact",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Report {
                scores, compact, ..
            } => {
                assert_eq!(scores, PathBuf::from("s.json"));
                assert!(compact);
            }
            Commands::Rubric { .. } => panic!("expected report command"),
        }
    }
}
