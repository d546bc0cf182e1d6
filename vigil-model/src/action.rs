use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ids::{ActionId, AlertId};

/// The fact store's record of one applied response. Append-only.
///
/// `action_type` is the resulting status ("blocked", "emailed", "logged"),
/// not the policy action name that selected it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionLog {
    pub id: ActionId,
    pub alert_id: AlertId,
    pub action_type: String,
    pub executed_at: DateTime<Utc>,
    #[serde(default)]
    pub details: Option<Value>,
}

/// Create payload for an action log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewActionLog {
    pub alert_id: AlertId,
    pub action_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}
