//! Input validation for order item lists.
//!
//! Structural defects (missing list, non-object entry, missing label, text
//! longer than a cell holds, a total that overflows) always abort on the
//! first offending entry. Quantities that cannot be read as a
//! number either abort or degrade to zero depending on [`ValidationMode`].

use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use super::models::ResolvedItem;

/// Keys accepted for the item label, in priority order.
pub const LABEL_KEYS: [&str; 2] = ["product", "name"];
/// Keys accepted for the item quantity, in priority order.
pub const QUANTITY_KEYS: [&str; 2] = ["count", "quantity"];
/// Keys accepted for the item unit, in priority order.
pub const UNIT_KEYS: [&str; 2] = ["type", "unit"];
/// Longest text a single spreadsheet cell accepts.
pub const MAX_CELL_CHARS: usize = 32_767;

/// How non-numeric quantities are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    /// Reject the request with the offending index.
    Strict,
    /// Log, substitute zero and keep going.
    #[default]
    Lenient,
}

impl FromStr for ValidationMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "lenient" => Ok(Self::Lenient),
            other => Err(format!(
                "unknown validation mode '{}' (expected strict or lenient)",
                other
            )),
        }
    }
}

impl fmt::Display for ValidationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strict => f.write_str("strict"),
            Self::Lenient => f.write_str("lenient"),
        }
    }
}

/// Settings a validation pass runs under.
#[derive(Debug, Clone)]
pub struct ValidationPolicy {
    pub mode: ValidationMode,
    /// Unit written when an item does not carry one.
    pub default_unit: String,
}

impl ValidationPolicy {
    pub fn new(mode: ValidationMode, default_unit: impl Into<String>) -> Self {
        Self {
            mode,
            default_unit: default_unit.into(),
        }
    }
}

/// Validation error with a user-facing message.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Position of the offending entry in `items`, when the error is per item.
    pub index: Option<usize>,
    /// The field that failed validation
    pub field: String,
    pub message: String,
    /// Suggestion for how to fix the error
    pub suggestion: Option<String>,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            index: None,
            field: field.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn at(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn missing_items() -> Self {
        Self::new("items", "items list is required")
            .with_suggestion("Send a non-empty `items` array")
    }

    pub fn items_not_a_list() -> Self {
        Self::new("items", "items must be an array of objects")
    }

    pub fn empty_items() -> Self {
        Self::new("items", "items list is empty")
            .with_suggestion("Add at least one item to the order")
    }

    pub fn not_a_record(index: usize) -> Self {
        Self::new("items", "item must be an object").at(index)
    }

    pub fn missing_label(index: usize) -> Self {
        Self::new(LABEL_KEYS.join("|"), "item label is required")
            .at(index)
            .with_suggestion(format!("Provide one of: {}", LABEL_KEYS.join(", ")))
    }

    pub fn invalid_label(index: usize, key: &str) -> Self {
        Self::new(key, "item label must be text").at(index)
    }

    pub fn invalid_quantity(index: usize, key: &str, raw: &Value) -> Self {
        Self::new(key, format!("quantity {} is not a number", raw)).at(index)
    }

    pub fn text_too_long(field: &str, chars: usize) -> Self {
        Self::new(
            field,
            format!(
                "text is {} characters long, the limit is {}",
                chars, MAX_CELL_CHARS
            ),
        )
    }

    pub fn total_out_of_range() -> Self {
        Self::new("items", "total quantity is too large to represent")
    }

    pub fn unknown_printer(key: &str, known: &[&str]) -> Self {
        Self::new("printer", format!("printer '{}' not found", key))
            .with_suggestion(format!("Available printers: {}", known.join(", ")))
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(index) => write!(f, "items[{}].{}: {}", index, self.field, self.message)?,
            None => write!(f, "{}: {}", self.field, self.message)?,
        }
        if let Some(ref suggestion) = self.suggestion {
            write!(f, ". {}", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// A quantity that was replaced by zero in lenient mode.
#[derive(Debug, Clone, PartialEq)]
pub struct CoercionWarning {
    pub index: usize,
    pub field: String,
    pub raw: Value,
}

impl fmt::Display for CoercionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "items[{}].{}: {} is not a number, using 0",
            self.index, self.field, self.raw
        )
    }
}

/// A field located through its alias list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedField<'a> {
    pub key: &'static str,
    pub value: &'a Value,
}

/// Return the first alias present on `record` with a non-blank value.
pub fn resolve_field<'a>(
    record: &'a Map<String, Value>,
    aliases: &[&'static str],
) -> Option<ResolvedField<'a>> {
    aliases.iter().find_map(|key| {
        record
            .get(*key)
            .filter(|value| !is_blank(value))
            .map(|value| ResolvedField { key: *key, value })
    })
}

/// Return the first alias present on `record` with a non-null value. Blank
/// strings count as present.
pub fn resolve_present<'a>(
    record: &'a Map<String, Value>,
    aliases: &[&'static str],
) -> Option<ResolvedField<'a>> {
    aliases.iter().find_map(|key| {
        record
            .get(*key)
            .filter(|value| !value.is_null())
            .map(|value| ResolvedField { key: *key, value })
    })
}

/// Reject text that would not fit into one cell.
pub fn check_cell_text(field: &str, text: &str) -> Result<(), ValidationError> {
    let chars = text.chars().count();
    if chars > MAX_CELL_CHARS {
        return Err(ValidationError::text_too_long(field, chars));
    }
    Ok(())
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        _ => false,
    }
}

/// Read a JSON value as a finite number. Numeric strings are accepted.
pub fn coerce_quantity(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|quantity| quantity.is_finite())
}

fn label_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.trim().to_string()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Validate and normalize a raw `items` value.
pub fn validate_items(
    items: Option<&Value>,
    policy: &ValidationPolicy,
) -> Result<(Vec<ResolvedItem>, Vec<CoercionWarning>), ValidationError> {
    let entries = match items {
        None | Some(Value::Null) => return Err(ValidationError::missing_items()),
        Some(Value::Array(entries)) => entries,
        Some(_) => return Err(ValidationError::items_not_a_list()),
    };

    if entries.is_empty() {
        return Err(ValidationError::empty_items());
    }

    let mut resolved = Vec::with_capacity(entries.len());
    let mut warnings = Vec::new();

    for (index, entry) in entries.iter().enumerate() {
        let record = entry
            .as_object()
            .ok_or_else(|| ValidationError::not_a_record(index))?;

        let label_field =
            resolve_field(record, &LABEL_KEYS).ok_or_else(|| ValidationError::missing_label(index))?;
        let label = label_text(label_field.value)
            .ok_or_else(|| ValidationError::invalid_label(index, label_field.key))?;
        check_cell_text(label_field.key, &label).map_err(|e| e.at(index))?;

        let quantity = match resolve_present(record, &QUANTITY_KEYS) {
            None => 0.0,
            Some(field) => match coerce_quantity(field.value) {
                Some(quantity) => quantity,
                None if policy.mode == ValidationMode::Strict => {
                    return Err(ValidationError::invalid_quantity(
                        index,
                        field.key,
                        field.value,
                    ));
                }
                None => {
                    let warning = CoercionWarning {
                        index,
                        field: field.key.to_string(),
                        raw: field.value.clone(),
                    };
                    log::warn!("{}", warning);
                    warnings.push(warning);
                    0.0
                }
            },
        };

        let unit = resolve_field(record, &UNIT_KEYS)
            .and_then(|field| label_text(field.value))
            .unwrap_or_else(|| policy.default_unit.clone());
        check_cell_text("unit", &unit).map_err(|e| e.at(index))?;

        resolved.push(ResolvedItem {
            label,
            quantity,
            unit,
        });
    }

    let total: f64 = resolved.iter().map(|item| item.quantity).sum();
    if !total.is_finite() {
        return Err(ValidationError::total_out_of_range());
    }

    Ok((resolved, warnings))
}
