//! Domain models for the agreement engine.
//!
//! - `ScoreRecord`: one reviewer's rubric scores for one article
//! - `Rubric`: ordered item ids plus the admissible score categories
//! - `IrrError`: the engine's error taxonomy

pub mod error;
pub mod rubric;
pub mod score;

pub use error::{IrrError, RecordField, Result};
pub use rubric::{Rubric, RubricItem};
pub use score::{RaterInfo, ScoreRecord};
