//! Fixed presentation constants for the order sheet.
//!
//! Fonts, fills, borders and column widths are not user-configurable.

use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder};

pub const FONT_NAME: &str = "Arial";
pub const HEADER_FILL: u32 = 0x4472C4;
pub const TOTAL_FILL: u32 = 0xD9E1F2;
pub const QUANTITY_FORMAT: &str = "0.00";

/// Number of table columns: index, label, unit, quantity.
pub const COLUMN_COUNT: u16 = 4;
pub const COLUMN_WIDTHS: [f64; COLUMN_COUNT as usize] = [6.0, 40.0, 14.0, 12.0];

pub const COL_INDEX: u16 = 0;
pub const COL_LABEL: u16 = 1;
pub const COL_UNIT: u16 = 2;
pub const COL_QUANTITY: u16 = 3;

pub const TITLE_ROW_HEIGHT: f64 = 24.0;

/// Excel paper size code for A4.
pub const PAPER_A4: u8 = 9;

/// Cell formats shared by every generated sheet.
pub struct SheetFormats {
    pub title: Format,
    pub meta_label: Format,
    pub meta_value: Format,
    pub header: Format,
    pub index: Format,
    pub label: Format,
    pub unit: Format,
    pub quantity: Format,
    pub total_fill: Format,
    pub total_label: Format,
    pub total_value: Format,
}

impl SheetFormats {
    pub fn new() -> Self {
        let base = Format::new().set_font_name(FONT_NAME).set_font_size(11);
        let cell = base.clone().set_border(FormatBorder::Thin);
        let total = Format::new()
            .set_font_name(FONT_NAME)
            .set_font_size(12)
            .set_bold()
            .set_background_color(Color::RGB(TOTAL_FILL))
            .set_border(FormatBorder::Thin);

        Self {
            title: Format::new()
                .set_font_name(FONT_NAME)
                .set_font_size(16)
                .set_bold()
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter),
            meta_label: base.clone().set_bold(),
            meta_value: base,
            header: Format::new()
                .set_font_name(FONT_NAME)
                .set_font_size(12)
                .set_bold()
                .set_font_color(Color::White)
                .set_background_color(Color::RGB(HEADER_FILL))
                .set_align(FormatAlign::Center)
                .set_border(FormatBorder::Thin),
            index: cell.clone().set_align(FormatAlign::Center),
            label: cell.clone(),
            unit: cell.clone().set_align(FormatAlign::Center),
            quantity: cell
                .set_align(FormatAlign::Center)
                .set_num_format(QUANTITY_FORMAT),
            total_fill: total.clone(),
            total_label: total.clone().set_align(FormatAlign::Right),
            total_value: total
                .set_align(FormatAlign::Center)
                .set_num_format(QUANTITY_FORMAT),
        }
    }
}

impl Default for SheetFormats {
    fn default() -> Self {
        Self::new()
    }
}
