//! Error types for the substrate editor.

use std::fmt;

use thiserror::Error;

/// Top-level result type for document operations.
pub type Result<T> = std::result::Result<T, SbeError>;

/// Top-level error type for document operations.
#[derive(Debug, Error)]
pub enum SbeError {
    #[error("{0} not found")]
    NotFound(PathStage),

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// A step of the fixed `config.recipes[0].trays[0].positions[0].substrate1`
/// walk. Used to report exactly where a document falls short.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStage {
    Recipe,
    Tray,
    Position,
    Substrate,
}

impl PathStage {
    /// Human-facing name, as used in HTTP error bodies.
    pub fn label(self) -> &'static str {
        match self {
            Self::Recipe => "Recipe",
            Self::Tray => "Tray",
            Self::Position => "Position",
            Self::Substrate => "Substrate1",
        }
    }
}

impl fmt::Display for PathStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl SbeError {
    /// The traversal stage that was missing, if this is a not-found error.
    pub fn missing_stage(&self) -> Option<PathStage> {
        match self {
            Self::NotFound(stage) => Some(*stage),
            _ => None,
        }
    }
}
