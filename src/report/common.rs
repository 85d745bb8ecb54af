//! Common helpers for sheet generation: timestamps, titles and file names.

use chrono::NaiveDateTime;

/// Timestamp format written into the sheet.
pub const SHEET_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// Timestamp format embedded in artifact file names.
pub const FILE_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

pub const XLSX_EXTENSION: &str = "xlsx";
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Format a generation time for the sheet (e.g., "2025-01-31 14:05:09").
pub fn format_sheet_timestamp(at: &NaiveDateTime) -> String {
    at.format(SHEET_TIMESTAMP_FORMAT).to_string()
}

/// Build the artifact stem, e.g. `order_20250131_140509`.
pub fn artifact_stem(prefix: &str, at: &NaiveDateTime) -> String {
    format!("{}_{}", prefix, at.format(FILE_TIMESTAMP_FORMAT))
}

/// Sheet title, suffixed with the order id when one is present.
pub fn title_with_order(title: &str, order_id: Option<&str>) -> String {
    match order_id {
        Some(id) => format!("{} #{}", title, id),
        None => title.to_string(),
    }
}
