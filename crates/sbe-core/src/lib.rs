//! # sbe-core
//!
//! Document model for the substrate editor.
//!
//! - [`RecipeDocument`] — a parsed configuration file
//! - [`SubstrateRecord`] — the `{thickness, material}` pair users edit
//! - [`locator`] — fixed-path access to
//!   `config.recipes[0].trays[0].positions[0].substrate1`
//! - Error hierarchy ([`SbeError`], [`PathStage`])

pub mod document;
pub mod error;
pub mod locator;
pub mod record;

pub use document::RecipeDocument;
pub use error::{PathStage, Result, SbeError};
pub use record::SubstrateRecord;
