use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::AssetId;

/// A host known to the fact store.
///
/// Assets are upserted by `ip_address`: the first report creates the record,
/// later reports refresh `hostname`, `os` and `last_seen`. The pipeline
/// never deletes one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: AssetId,
    pub hostname: String,
    pub ip_address: String,
    #[serde(default)]
    pub os: Option<String>,
    pub last_seen: DateTime<Utc>,
}

/// Create/upsert payload for an asset, keyed by `ip_address`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAsset {
    pub hostname: String,
    pub ip_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os: Option<String>,
}
