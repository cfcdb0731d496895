//! Record-set loading and shallow validation
//!
//! Only the top-level shape is checked. Nested entries are decoded leniently
//! so a malformed transaction degrades the aggregates instead of failing the upload.

use crate::error::DashboardError;
use crate::models::RecordSet;
use crate::Result;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::path::Path;
use tracing::{debug, warn};

/// Top-level fields every upload must carry, in the order they are checked
pub const REQUIRED_FIELDS: [&str; 4] = ["assets", "liabilities", "goals", "transactions"];

/// Parse uploaded text into a record set
pub fn load_record_set(text: &str) -> Result<RecordSet> {
    let data: Value = serde_json::from_str(text).map_err(DashboardError::ParseError)?;

    let Value::Object(object) = data else {
        return Err(DashboardError::ShapeError(
            "expected a JSON object with assets, liabilities, goals, transactions".to_string(),
        ));
    };

    for field in REQUIRED_FIELDS {
        if !object.get(field).map(Value::is_array).unwrap_or(false) {
            return Err(DashboardError::missing_field(field));
        }
    }

    let records = RecordSet {
        assets: lenient_entries(&object, "assets"),
        liabilities: lenient_entries(&object, "liabilities"),
        goals: lenient_entries(&object, "goals"),
        transactions: lenient_entries(&object, "transactions"),
        insights: object.get("insights").and_then(Value::as_array).map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        }),
    };

    debug!(
        assets = records.assets.len(),
        liabilities = records.liabilities.len(),
        goals = records.goals.len(),
        transactions = records.transactions.len(),
        "Record set loaded"
    );

    Ok(records)
}

/// Read a record-set file from disk and load it
pub fn load_record_set_from_path(path: impl AsRef<Path>) -> Result<RecordSet> {
    let text = std::fs::read_to_string(path.as_ref())?;
    load_record_set(&text)
}

/// SHA-256 of the uploaded text, hex encoded
pub fn upload_fingerprint(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}

/// Decode each array entry on its own; entries that are not objects are skipped
fn lenient_entries<T: DeserializeOwned>(object: &Map<String, Value>, field: &str) -> Vec<T> {
    let Some(items) = object.get(field).and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            if !item.is_object() {
                warn!("Skipping {}[{}]: entry is not an object", field, index);
                return None;
            }
            match serde_json::from_value(item.clone()) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Skipping {}[{}]: {}", field, index, e);
                    None
                }
            }
        })
        .collect()
}
