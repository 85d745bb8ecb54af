//! Order sheet generation.
//!
//! - `validation` - turns a loosely-typed item list into normalized rows
//! - `order_sheet` - lays the rows out into the fixed spreadsheet template
//! - `engine` - serializes the workbook and persists it atomically
//! - `retention` - optional cleanup of old artifacts

pub mod common;
pub mod engine;
pub mod labels;
pub mod models;
pub mod order_sheet;
pub mod retention;
pub mod style;
pub mod traits;
pub mod validation;

pub use engine::XlsxRenderEngine;
pub use labels::{Locale, ReportLabels};
pub use models::{OrderRequest, ReportMeta, ResolvedItem, ValidatedOrder};
pub use order_sheet::OrderSheetGenerator;
pub use traits::{Generator, Validator};
pub use validation::{CoercionWarning, ValidationError, ValidationMode, ValidationPolicy};

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during document generation.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to build workbook: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),
    #[error("failed to prepare scratch directory: {0}")]
    ScratchDir(#[source] std::io::Error),
    #[error("failed to create temporary file: {0}")]
    TempFile(#[source] std::io::Error),
    #[error("failed to write artifact: {0}")]
    WriteArtifact(#[source] std::io::Error),
    #[error("failed to persist artifact: {0}")]
    PersistArtifact(#[source] std::io::Error),
    #[error("no free artifact name for '{0}'")]
    NameExhausted(String),
    #[error("generation worker failed: {0}")]
    Worker(String),
}

/// Result of a successful document generation.
#[derive(Debug, Clone)]
pub struct GeneratedDocument {
    pub filename: String,
    pub path: PathBuf,
    pub total_quantity: f64,
    pub items_count: usize,
    /// Timestamp printed in the sheet.
    pub generated_at: String,
}
