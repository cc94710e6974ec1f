use serde_json::Value;

use super::WorkplaceRecord;

/// Envelope of `GET /api/workplace?page&pageSize`: `{ total, page, data }`
#[derive(Debug, Clone, PartialEq)]
pub struct WorkplacePageResponse {
    /// Record count across all pages
    pub total: u64,
    /// Page echoed back by the backend, if any
    pub page: Option<u64>,
    /// Raw records, not yet normalized
    pub data: Vec<Value>,
}

impl WorkplacePageResponse {
    /// Read the envelope leniently: a missing or non-numeric `total` counts
    /// as zero and a missing `data` as an empty list.
    pub fn from_value(body: &Value) -> Self {
        let total = body
            .get("total")
            .and_then(|v| v.as_u64().or_else(|| v.as_f64().map(|f| f.max(0.0) as u64)))
            .unwrap_or(0);
        let page = body.get("page").and_then(Value::as_u64);
        let data = body
            .get("data")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        Self { total, page, data }
    }

    /// Normalized records; entries without a numeric id are dropped
    pub fn records(&self) -> Vec<WorkplaceRecord> {
        self.data.iter().filter_map(WorkplaceRecord::from_raw).collect()
    }
}
