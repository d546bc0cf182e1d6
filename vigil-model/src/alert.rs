use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::explanation::Explanation;
use crate::ids::{AlertId, AssetId};
use crate::severity::Severity;

fn default_status() -> String {
    "open".to_string()
}

/// A derived risk alert. Immutable after creation; the pipeline never
/// updates one.
///
/// Two alerts with the same `(asset_id, summary)` pair are duplicates, and
/// the derivation consumer must not create both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: AlertId,
    #[serde(default)]
    pub asset_id: Option<AssetId>,
    pub created_at: DateTime<Utc>,
    pub severity: Severity,
    pub score: f64,
    pub summary: String,
    #[serde(default)]
    pub details: Option<Value>,
    #[serde(default)]
    pub explanation: Option<Explanation>,
    #[serde(default = "default_status")]
    pub status: String,
}

impl Alert {
    /// Duplicate-suppression key; `None` for alerts not tied to an asset.
    pub fn dedup_key(&self) -> Option<(AssetId, &str)> {
        self.asset_id.map(|asset_id| (asset_id, self.summary.as_str()))
    }

    /// The response target, when the triggering scan recorded one.
    pub fn target_ip(&self) -> Option<&str> {
        self.details.as_ref()?.get("ip")?.as_str()
    }
}

/// Create payload for an alert; `score` is already rounded for storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAlert {
    #[serde(default)]
    pub asset_id: Option<AssetId>,
    pub severity: Severity,
    pub score: f64,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<Explanation>,
}
