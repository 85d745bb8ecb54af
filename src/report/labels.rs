//! Locale-dependent captions for the order sheet and response messages.

use std::fmt;
use std::str::FromStr;

/// Deployment locale for sheet captions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    En,
    Uz,
    Ru,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Self::En),
            "uz" => Ok(Self::Uz),
            "ru" => Ok(Self::Ru),
            other => Err(format!("unknown locale '{}' (expected en, uz or ru)", other)),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Self::En => "en",
            Self::Uz => "uz",
            Self::Ru => "ru",
        };
        f.write_str(code)
    }
}

/// Fixed captions used by the renderer and the print endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLabels {
    pub sheet_name: &'static str,
    pub title: &'static str,
    pub category: &'static str,
    pub requester: &'static str,
    pub branch: &'static str,
    pub generated_at: &'static str,
    /// Header captions: row index, item label, unit, quantity.
    pub columns: [&'static str; 4],
    pub total: &'static str,
    pub default_unit: &'static str,
    pub file_prefix: &'static str,
    pub print_sent: &'static str,
    pub print_failed: &'static str,
    pub print_unsupported: &'static str,
}

impl ReportLabels {
    pub fn for_locale(locale: Locale) -> Self {
        match locale {
            Locale::En => Self {
                sheet_name: "Order",
                title: "ORDER LIST",
                category: "Category:",
                requester: "Requester:",
                branch: "Branch:",
                generated_at: "Generated:",
                columns: ["No.", "Item", "Unit", "Quantity"],
                total: "TOTAL",
                default_unit: "pcs",
                file_prefix: "order",
                print_sent: "sent",
                print_failed: "print failed",
                print_unsupported: "printing not supported",
            },
            Locale::Uz => Self {
                sheet_name: "Buyurtma",
                title: "BUYURTMA RO'YXATI",
                category: "Kategoriya:",
                requester: "Buyurtmachi:",
                branch: "Filial:",
                generated_at: "Vaqt:",
                columns: ["№", "Mahsulot nomi", "O'lchov", "Soni"],
                total: "JAMI:",
                default_unit: "dona",
                file_prefix: "buyurtma",
                print_sent: "yuborildi",
                print_failed: "chop etishda xatolik",
                print_unsupported: "chop etish qo'llab-quvvatlanmaydi",
            },
            Locale::Ru => Self {
                sheet_name: "Заказ",
                title: "СПИСОК ЗАКАЗА",
                category: "Категория:",
                requester: "Клиент:",
                branch: "Филиал:",
                generated_at: "Время:",
                columns: ["№", "Наименование", "Ед. изм.", "Кол-во"],
                total: "ИТОГО:",
                default_unit: "шт",
                file_prefix: "zakaz",
                print_sent: "отправлено",
                print_failed: "ошибка печати",
                print_unsupported: "печать не поддерживается",
            },
        }
    }
}

impl Default for ReportLabels {
    fn default() -> Self {
        Self::for_locale(Locale::default())
    }
}
