//! Recipe document — a parsed configuration file.

use serde_json::Value;

use crate::error::{Result, SbeError};
use crate::locator;
use crate::record::SubstrateRecord;

/// A parsed recipe configuration file.
///
/// Object key order and number literals survive a parse/serialize cycle, so
/// content outside the substrate record is written back as it was read
/// (for files already in two-space pretty form, byte for byte).
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeDocument {
    root: Value,
}

impl RecipeDocument {
    /// Parse a document from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`SbeError::Parse`] if the text is not valid JSON.
    pub fn parse(text: &str) -> Result<Self> {
        let root = serde_json::from_str(text)?;
        Ok(Self { root })
    }

    /// The substrate record at the fixed path.
    ///
    /// # Errors
    ///
    /// Returns [`SbeError::NotFound`] naming the first missing step.
    pub fn substrate(&self) -> Result<&Value> {
        locator::extract_substrate(&self.root)
    }

    /// Replace the substrate record with a fresh `{thickness, material}`
    /// object.
    ///
    /// # Errors
    ///
    /// Returns [`SbeError::NotFound`] if the recipe, tray or position is
    /// missing.
    pub fn set_substrate(&mut self, record: &SubstrateRecord) -> Result<()> {
        let value =
            serde_json::to_value(record).map_err(|e| SbeError::Serialization(e.to_string()))?;
        locator::replace_substrate(&mut self.root, value)
    }

    /// Serialize with two-space indentation and no trailing newline.
    ///
    /// # Errors
    ///
    /// Returns [`SbeError::Serialization`] if the value cannot be written.
    pub fn to_pretty_string(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.root).map_err(|e| SbeError::Serialization(e.to_string()))
    }
}
