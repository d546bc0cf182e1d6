use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::severity::Severity;

/// A response the policy can select for a severity.
///
/// Unrecognized values in a hand-edited policy file map to the fallback
/// variant, which behaves exactly like `AuditOnly` when applied.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ResponseAction {
    BlockIp,
    EmailOnly,
    AuditOnly,
    #[serde(other)]
    Unrecognized,
}

impl ResponseAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseAction::BlockIp => "block_ip",
            ResponseAction::EmailOnly => "email_only",
            ResponseAction::AuditOnly => "audit_only",
            ResponseAction::Unrecognized => "unrecognized",
        }
    }

    /// The status recorded once the action is applied.
    pub fn status(&self) -> ActionStatus {
        match self {
            ResponseAction::BlockIp => ActionStatus::Blocked,
            ResponseAction::EmailOnly => ActionStatus::Emailed,
            ResponseAction::AuditOnly | ResponseAction::Unrecognized => ActionStatus::Logged,
        }
    }
}

impl std::fmt::Display for ResponseAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome status recorded in both the action log and the response journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionStatus {
    Blocked,
    Emailed,
    Logged,
}

impl ActionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionStatus::Blocked => "blocked",
            ActionStatus::Emailed => "emailed",
            ActionStatus::Logged => "logged",
        }
    }
}

impl std::fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static severity-to-response mapping, loaded once at responder startup
/// and read-only for the rest of the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    pub thresholds: BTreeMap<Severity, ResponseAction>,
    pub email_recipients: Vec<String>,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            thresholds: BTreeMap::from([
                (Severity::Critical, ResponseAction::BlockIp),
                (Severity::High, ResponseAction::BlockIp),
                (Severity::Medium, ResponseAction::EmailOnly),
                (Severity::Low, ResponseAction::AuditOnly),
            ]),
            email_recipients: vec!["soc-ops@example.local".to_string()],
        }
    }
}

impl Policy {
    /// Resolve the response for a severity; anything the policy does not
    /// map falls back to audit-only.
    pub fn action_for(&self, severity: Severity) -> ResponseAction {
        self.thresholds
            .get(&severity)
            .copied()
            .unwrap_or(ResponseAction::AuditOnly)
    }
}
