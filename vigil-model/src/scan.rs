use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ids::{AssetId, ScanId};

/// One completed scan run as stored by the fact store. Immutable once
/// created.
///
/// `parsed_result` stays semi-structured on the wire; [`PortReport`] is the
/// typed view the scoring engine extracts from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scan {
    pub id: ScanId,
    #[serde(default)]
    pub asset_id: Option<AssetId>,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub ended_at: Option<DateTime<Utc>>,
    pub command: String,
    #[serde(default)]
    pub raw_output_path: Option<String>,
    #[serde(default)]
    pub parsed_result: Option<Value>,
}

impl Scan {
    /// The scan payload the derivation consumer works from, or `None` when
    /// the scan carries nothing to derive (absent, null, or empty mapping).
    pub fn parsed_result(&self) -> Option<&Value> {
        match &self.parsed_result {
            Some(Value::Null) => None,
            Some(Value::Object(map)) if map.is_empty() => None,
            Some(value) => Some(value),
            None => None,
        }
    }
}

/// Create payload for a scan record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewScan {
    pub asset_id: AssetId,
    pub command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_output_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parsed_result: Option<Value>,
}

/// Typed view of the `ports` sequence inside a scan's `parsed_result`.
///
/// Extraction fails closed: a payload whose `ports` entries do not match
/// this shape is treated as malformed and the scan is skipped, never
/// coerced.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PortReport {
    #[serde(default)]
    pub ports: Vec<PortObservation>,
}

impl PortReport {
    pub fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value.clone())
    }
}

/// A single observed port within a scan result.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PortObservation {
    pub port: u16,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub protocol: Option<String>,
    #[serde(default)]
    pub service: Option<String>,
}

impl PortObservation {
    pub fn is_open(&self) -> bool {
        self.state == "open"
    }
}
