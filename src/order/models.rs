use serde::Serialize;
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// Response of a successful `/print` call.
#[derive(Debug, Serialize, ToSchema)]
pub struct PrintResponse {
    pub success: bool,
    #[schema(example = "Order sheet created and sent to Canon LBP6030")]
    pub message: String,
    #[schema(example = "order_20250301_093000.xlsx")]
    pub filename: String,
    #[schema(example = "Canon LBP6030")]
    pub printer: String,
    pub items_count: usize,
    #[schema(example = 3.25)]
    pub total_quantity: f64,
    /// Advisory only; never affects `success`.
    #[schema(example = "sent")]
    pub print_status: String,
    pub file_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Service metadata served on `GET /`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceInfo {
    pub name: String,
    pub version: String,
    pub status: String,
    pub description: String,
    pub printers: BTreeMap<String, String>,
    pub features: Vec<String>,
    pub endpoints: BTreeMap<String, String>,
    #[schema(value_type = Object)]
    pub example: serde_json::Value,
}
