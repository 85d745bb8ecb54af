//! Generator for the order list spreadsheet.
//!
//! Layout, top to bottom: merged title, optional metadata rows followed by the
//! timestamp row, one blank row, the header, one row per item and the total.

use chrono::{Local, NaiveDateTime};
use rust_xlsxwriter::{Workbook, XlsxError};
use std::path::PathBuf;

use super::common::{artifact_stem, format_sheet_timestamp, title_with_order};
use super::engine::XlsxRenderEngine;
use super::labels::ReportLabels;
use super::models::{OrderRequest, ReportMeta, ValidatedOrder};
use super::style::{
    SheetFormats, COLUMN_COUNT, COLUMN_WIDTHS, COL_INDEX, COL_LABEL, COL_QUANTITY, COL_UNIT,
    PAPER_A4, TITLE_ROW_HEIGHT,
};
use super::traits::{Generator, Validator};
use super::validation::{
    check_cell_text, validate_items, ValidationError, ValidationMode, ValidationPolicy,
};
use super::{GeneratedDocument, ReportError};

impl Validator for OrderRequest {
    type Output = ValidatedOrder;

    fn validate(&self, policy: &ValidationPolicy) -> Result<ValidatedOrder, ValidationError> {
        let (items, warnings) = validate_items(self.items.as_ref(), policy)?;

        let meta_fields = [
            ("order_id", &self.order_id),
            ("category", &self.category),
            ("username", &self.username),
            ("filial", &self.filial),
        ];
        for (field, value) in meta_fields {
            if let Some(text) = value {
                check_cell_text(field, text)?;
            }
        }

        Ok(ValidatedOrder {
            items,
            meta: ReportMeta {
                order_id: self.order_id.clone(),
                category: self.category.clone(),
                requester: self.username.clone(),
                branch: self.filial.clone(),
            },
            warnings,
        })
    }
}

/// Generator for order list workbooks.
pub struct OrderSheetGenerator {
    labels: ReportLabels,
    scratch_dir: PathBuf,
}

impl OrderSheetGenerator {
    pub fn new(labels: ReportLabels, scratch_dir: impl Into<PathBuf>) -> Self {
        Self {
            labels,
            scratch_dir: scratch_dir.into(),
        }
    }

    pub fn labels(&self) -> &ReportLabels {
        &self.labels
    }

    /// Validation policy matching this generator's locale.
    pub fn policy(&self, mode: ValidationMode) -> ValidationPolicy {
        ValidationPolicy::new(mode, self.labels.default_unit)
    }

    /// Generate the artifact stamped with `at`.
    pub fn generate_at(
        &self,
        order: &ValidatedOrder,
        at: NaiveDateTime,
    ) -> Result<GeneratedDocument, ReportError> {
        let generated_at = format_sheet_timestamp(&at);
        let mut workbook = self.build_workbook(order, &generated_at)?;

        let stem = artifact_stem(self.labels.file_prefix, &at);
        let (path, filename) = XlsxRenderEngine::save(&mut workbook, &self.scratch_dir, &stem)?;

        log::info!(
            "order sheet written: {} ({} items)",
            path.display(),
            order.items.len()
        );

        Ok(GeneratedDocument {
            filename,
            path,
            total_quantity: order.total_quantity(),
            items_count: order.items.len(),
            generated_at,
        })
    }

    /// Lay the order out into a single-sheet workbook.
    pub fn build_workbook(
        &self,
        order: &ValidatedOrder,
        generated_at: &str,
    ) -> Result<Workbook, XlsxError> {
        let labels = &self.labels;
        let formats = SheetFormats::new();
        let last_col = COLUMN_COUNT - 1;

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name(labels.sheet_name)?;

        let title = title_with_order(labels.title, order.meta.order_id.as_deref());
        sheet.merge_range(0, 0, 0, last_col, &title, &formats.title)?;
        sheet.set_row_height(0, TITLE_ROW_HEIGHT)?;

        let mut row: u32 = 1;
        for (caption, value) in self.meta_rows(&order.meta, generated_at) {
            sheet.merge_range(row, COL_INDEX, row, COL_LABEL, caption, &formats.meta_label)?;
            sheet.merge_range(row, COL_UNIT, row, COL_QUANTITY, value, &formats.meta_value)?;
            row += 1;
        }

        // separator
        row += 1;

        let header_row = row;
        for (col, caption) in (0u16..).zip(labels.columns) {
            sheet.write_string_with_format(header_row, col, caption, &formats.header)?;
        }
        sheet.set_repeat_rows(header_row, header_row)?;
        row += 1;

        for (position, item) in order.items.iter().enumerate() {
            sheet.write_number_with_format(row, COL_INDEX, (position + 1) as f64, &formats.index)?;
            sheet.write_string_with_format(row, COL_LABEL, &item.label, &formats.label)?;
            sheet.write_string_with_format(row, COL_UNIT, &item.unit, &formats.unit)?;
            sheet.write_number_with_format(row, COL_QUANTITY, item.quantity, &formats.quantity)?;
            row += 1;
        }

        sheet.write_blank(row, COL_INDEX, &formats.total_fill)?;
        sheet.write_blank(row, COL_LABEL, &formats.total_fill)?;
        sheet.write_string_with_format(row, COL_UNIT, labels.total, &formats.total_label)?;
        sheet.write_number_with_format(
            row,
            COL_QUANTITY,
            order.total_quantity(),
            &formats.total_value,
        )?;

        for (col, width) in (0u16..).zip(COLUMN_WIDTHS) {
            sheet.set_column_width(col, width)?;
        }
        sheet.set_paper_size(PAPER_A4);
        sheet.set_portrait();
        sheet.set_print_fit_to_pages(1, 0);

        Ok(workbook)
    }

    fn meta_rows<'a>(&self, meta: &'a ReportMeta, generated_at: &'a str) -> Vec<(&'static str, &'a str)> {
        let labels = &self.labels;
        let optional = [
            (labels.category, meta.category.as_deref()),
            (labels.requester, meta.requester.as_deref()),
            (labels.branch, meta.branch.as_deref()),
        ];

        let mut rows: Vec<(&'static str, &'a str)> = optional
            .into_iter()
            .filter_map(|(caption, value)| value.map(|value| (caption, value)))
            .collect();
        rows.push((labels.generated_at, generated_at));
        rows
    }
}

impl Generator<ValidatedOrder> for OrderSheetGenerator {
    /// Generate the document stamped with the current local time.
    fn generate(&self, order: ValidatedOrder) -> Result<GeneratedDocument, ReportError> {
        self.generate_at(&order, Local::now().naive_local())
    }
}
