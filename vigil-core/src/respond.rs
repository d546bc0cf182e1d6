//! Action consumer: applies the response policy to alerts from the
//! hand-off journal.
//!
//! Idempotency lives entirely in the checkpoint file. An alert is marked
//! processed only after its action log reaches the store, and the file is
//! flushed once per cycle, so the externally visible contract is
//! at-least-once: a crash in the window between marking and flushing
//! repeats the action, a report failure retries it, but nothing is ever
//! silently dropped. Effectors must stay safe under replay.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};
use vigil_model::{
    ActionStatus, Alert, AlertId, NewActionLog, Policy, ResponseAction,
};

use crate::error::{PipelineError, Result};
use crate::journal::{self, Checkpoint};
use crate::runtime::Cycle;
use crate::store::FactStore;

/// One response-journal line per applied action; also shipped verbatim as
/// the action log's `details`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseRecord {
    pub action: ResponseAction,
    pub alert_id: AlertId,
    #[serde(default)]
    pub target: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub status: ActionStatus,
}

/// Polls the hand-off journal and applies exactly one response per alert.
#[derive(Debug)]
pub struct ActionConsumer<S> {
    store: Arc<S>,
    policy: Policy,
    checkpoint: Checkpoint,
    handoff_log: PathBuf,
    response_log: PathBuf,
}

impl<S: FactStore> ActionConsumer<S> {
    /// Build the consumer: loads (or bootstraps) the policy and loads the
    /// checkpoint.
    pub fn new(
        store: Arc<S>,
        policy_path: &Path,
        checkpoint_path: impl Into<PathBuf>,
        handoff_log: PathBuf,
        response_log: PathBuf,
    ) -> Result<Self> {
        let policy = load_or_init_policy(policy_path)?;
        let checkpoint = Checkpoint::load(checkpoint_path);
        Ok(Self {
            store,
            policy,
            checkpoint,
            handoff_log,
            response_log,
        })
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    pub fn processed_count(&self) -> usize {
        self.checkpoint.len()
    }

    /// Run one full response pass over the journal.
    pub async fn process_alerts(&mut self) -> Result<usize> {
        let alerts: Vec<Alert> = journal::read_records(&self.handoff_log)?;
        let mut handled = 0usize;

        for alert in alerts {
            if self.checkpoint.contains(alert.id) {
                continue;
            }
            let action = self.policy.action_for(alert.severity);
            match self.apply_action(&alert, action).await {
                Ok(()) => {
                    self.checkpoint.mark(alert.id);
                    handled += 1;
                }
                // The id stays unmarked so a later cycle retries it.
                Err(err) => {
                    error!(alert = %alert.id, %err, "failed to report action, will retry");
                }
            }
        }

        if handled > 0 {
            self.checkpoint.persist()?;
        }
        Ok(handled)
    }

    async fn apply_action(&self, alert: &Alert, action: ResponseAction) -> Result<()> {
        let status = action.status();
        let target = alert.target_ip().map(str::to_string);

        match action {
            ResponseAction::BlockIp => {
                info!(alert = %alert.id, target = target.as_deref(), "simulating firewall block");
            }
            ResponseAction::EmailOnly => {
                info!(
                    alert = %alert.id,
                    recipients = self.policy.email_recipients.len(),
                    "simulating email notification"
                );
            }
            ResponseAction::AuditOnly | ResponseAction::Unrecognized => {
                debug!(alert = %alert.id, "audit-only response");
            }
        }

        let record = ResponseRecord {
            action,
            alert_id: alert.id,
            target,
            timestamp: Utc::now(),
            status,
        };
        // Local record first: a failed report leaves evidence of the
        // attempt, and the retry appends a second record.
        journal::append_record(&self.response_log, &record)?;

        let action_log = self
            .store
            .create_action(NewActionLog {
                alert_id: alert.id,
                action_type: status.as_str().to_string(),
                details: Some(serde_json::to_value(&record)?),
            })
            .await?;
        debug!(action_log = %action_log.id, alert = %alert.id, %status, "action reported");
        Ok(())
    }
}

/// Read the policy file, writing the built-in default first if it's absent.
pub fn load_or_init_policy(path: &Path) -> Result<Policy> {
    if !path.exists() {
        let default = Policy::default();
        std::fs::write(path, serde_json::to_string_pretty(&default)?)?;
        info!(path = %path.display(), "wrote default response policy");
        return Ok(default);
    }
    let raw = std::fs::read_to_string(path)?;
    serde_json::from_str(&raw).map_err(|err| PipelineError::InvalidPolicy {
        path: path.display().to_string(),
        message: err.to_string(),
    })
}

#[async_trait]
impl<S: FactStore> Cycle for ActionConsumer<S> {
    fn name(&self) -> &'static str {
        "responder"
    }

    async fn run_cycle(&mut self) -> Result<()> {
        let handled = self.process_alerts().await?;
        if handled > 0 {
            info!(handled, "response cycle complete");
        }
        Ok(())
    }
}
