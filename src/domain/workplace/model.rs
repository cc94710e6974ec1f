//! Workplace domain entity

use chrono::NaiveDateTime;
use serde_json::Value;

/// Textual format of `createdAt` as sent by the backend (7 fractional digits).
pub const CREATED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// An inventoried physical station (PC + peripherals)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkplaceRecord {
    /// Backend-assigned identifier, immutable
    pub id: i32,
    /// Unique name
    pub name: String,
    pub description: String,
    pub location: String,
    pub pc: String,
    pub monitor: String,
    pub telephone: String,
    /// Creation timestamp, `None` when absent or unparseable
    pub created_at: Option<NaiveDateTime>,
    /// Who created the record
    pub created_by: Option<String>,
    /// Base64-encoded QR image, when the backend includes it
    pub qr_code: Option<String>,
}

impl WorkplaceRecord {
    /// Normalize a raw JSON record.
    ///
    /// Returns `None` when the record has no usable numeric `workplaceID`;
    /// such a record cannot be addressed. Missing string fields become empty
    /// strings and a bad `createdAt` becomes `None`.
    pub fn from_raw(raw: &Value) -> Option<Self> {
        let id = raw.get("workplaceID").and_then(as_i32)?;

        Some(Self {
            id,
            name: string_field(raw, "name"),
            description: string_field(raw, "description"),
            location: string_field(raw, "location"),
            pc: string_field(raw, "pc"),
            monitor: string_field(raw, "monitor"),
            telephone: string_field(raw, "telephone"),
            created_at: raw
                .get("createdAt")
                .and_then(Value::as_str)
                .and_then(parse_created_at),
            created_by: optional_string(raw, "createdBy"),
            qr_code: optional_string(raw, "qrcode"),
        })
    }
}

/// Parse a `createdAt` value, yielding `None` on any format mismatch
pub fn parse_created_at(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, CREATED_AT_FORMAT).ok()
}

// JSON numbers may arrive as floats (`7.0`); integral ones are accepted.
fn as_i32(v: &Value) -> Option<i32> {
    if let Some(n) = v.as_i64() {
        return i32::try_from(n).ok();
    }
    let f = v.as_f64()?;
    if f.fract() == 0.0 && f >= i32::MIN as f64 && f <= i32::MAX as f64 {
        Some(f as i32)
    } else {
        None
    }
}

fn string_field(raw: &Value, key: &str) -> String {
    raw.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn optional_string(raw: &Value, key: &str) -> Option<String> {
    raw.get(key).and_then(Value::as_str).map(str::to_string)
}
