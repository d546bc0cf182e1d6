use serde::{Deserialize, Serialize};

/// Alert severity as derived by the scoring engine and consumed by the
/// response policy.
///
/// Scoring only ever emits `Low`/`Medium`/`High`; `Critical` exists because
/// response policies may map it. Wire values this build does not recognize
/// land on `Unrecognized` and resolve to the audit-only action instead of
/// failing the record.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
    #[serde(other)]
    Unrecognized,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
            Severity::Unrecognized => "unrecognized",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
