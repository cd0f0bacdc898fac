//! Domain-level error taxonomy for the agreement engine.
//!
//! Only conditions that make the whole computation meaningless are errors.
//! Estimators that lack enough data report `None` instead.

/// Identifier fields a [`ScoreRecord`](super::ScoreRecord) must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordField {
    ArticleId,
    RaterId,
}

impl std::fmt::Display for RecordField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ArticleId => f.write_str("article_id"),
            Self::RaterId => f.write_str("rater_id"),
        }
    }
}

/// Agreement engine errors.
#[derive(Debug, thiserror::Error)]
pub enum IrrError {
    #[error("invalid input: score record {index} is missing {field}")]
    InvalidInput { index: usize, field: RecordField },

    #[error("invalid rubric: {0}")]
    InvalidRubric(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("config serialization error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for agreement engine operations.
pub type Result<T> = std::result::Result<T, IrrError>;
