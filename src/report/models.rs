use serde::{Deserialize, Deserializer};
use serde_json::Value;
use utoipa::ToSchema;

use super::validation::CoercionWarning;

/// Inbound order body shared by `/print` and `/excel`.
///
/// `items` stays loosely typed so the validator can report the offending
/// entry index itself instead of failing inside serde.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct OrderRequest {
    #[serde(default, deserialize_with = "display_string")]
    #[schema(value_type = Option<String>, example = "p1")]
    pub printer: Option<String>,
    #[serde(default)]
    #[schema(value_type = Option<Vec<Object>>)]
    pub items: Option<Value>,
    #[serde(default, deserialize_with = "display_string")]
    #[schema(value_type = Option<String>, example = "John Doe")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "display_string")]
    #[schema(value_type = Option<String>, example = "Tashkent")]
    pub filial: Option<String>,
    #[serde(default, deserialize_with = "display_string")]
    #[schema(value_type = Option<String>, example = "ORD-1042")]
    pub order_id: Option<String>,
    #[serde(default, deserialize_with = "display_string")]
    #[schema(value_type = Option<String>, example = "Bakery")]
    pub category: Option<String>,
}

/// One normalized row of the sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedItem {
    pub label: String,
    pub quantity: f64,
    pub unit: String,
}

/// Optional display metadata printed above the table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportMeta {
    pub order_id: Option<String>,
    pub category: Option<String>,
    pub requester: Option<String>,
    pub branch: Option<String>,
}

/// Output of a successful validation pass.
#[derive(Debug, Clone, Default)]
pub struct ValidatedOrder {
    pub items: Vec<ResolvedItem>,
    pub meta: ReportMeta,
    /// Quantities that were coerced to zero in lenient mode.
    pub warnings: Vec<CoercionWarning>,
}

impl ValidatedOrder {
    pub fn total_quantity(&self) -> f64 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}

/// Coerce a free-form JSON scalar into display text. `null` and blank
/// strings are treated as absent.
pub fn coerce_display(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        other => Some(other.to_string()),
    }
}

fn display_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(coerce_display))
}
