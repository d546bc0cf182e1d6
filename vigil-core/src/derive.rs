//! Derivation consumer: turns raw scan facts into risk alerts.
//!
//! Each cycle works from a fresh snapshot of the store's scans and alerts.
//! Deduplication is best-effort by design: the snapshot plus the in-cycle
//! append below suppress duplicates within and across quiet cycles, but two
//! cycles racing each other (or two processes) can still double-emit. True
//! exactly-once creation needs a store-side unique constraint on
//! `(asset_id, summary)`; the [`FactStore`] trait is where such a backend
//! would slot in.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};
use vigil_model::{
    Alert, AlertId, AssetId, FeatureContribution, NewAlert, PortReport, Severity,
};

use crate::error::Result;
use crate::journal;
use crate::runtime::Cycle;
use crate::scoring::{self, RiskAssessment};
use crate::store::FactStore;

/// One audit-trail line per created alert.
#[derive(Debug, Serialize)]
struct AuditRecord<'a> {
    timestamp: DateTime<Utc>,
    action: &'static str,
    alert_id: AlertId,
    score: f64,
    severity: Severity,
    summary: &'a str,
    explanation: &'a [FeatureContribution],
}

/// Polls the fact store for scans and emits deduplicated alerts.
#[derive(Debug)]
pub struct DerivationConsumer<S> {
    store: Arc<S>,
    handoff_log: PathBuf,
    audit_log: PathBuf,
}

impl<S: FactStore> DerivationConsumer<S> {
    pub fn new(store: Arc<S>, handoff_log: PathBuf, audit_log: PathBuf) -> Self {
        Self {
            store,
            handoff_log,
            audit_log,
        }
    }

    /// Run one full derivation pass. A store error aborts the cycle (caller
    /// retries next interval); a bad scan only skips that scan.
    pub async fn process_scans(&self) -> Result<usize> {
        let scans = self.store.list_scans().await?;
        let mut known_alerts = self.store.list_alerts().await?;
        let mut created = 0usize;

        for scan in &scans {
            let Some(asset_id) = scan.asset_id else {
                debug!(scan = %scan.id, "scan has no asset, skipping");
                continue;
            };
            let Some(parsed) = scan.parsed_result() else {
                debug!(scan = %scan.id, "scan has no parsed result, skipping");
                continue;
            };

            let summary = summary_for(asset_id);
            if known_alerts
                .iter()
                .any(|alert| alert.dedup_key() == Some((asset_id, summary.as_str())))
            {
                debug!(asset = %asset_id, "alert already exists, skipping");
                continue;
            }

            let report = match PortReport::from_value(parsed) {
                Ok(report) => report,
                Err(err) => {
                    warn!(scan = %scan.id, %err, "malformed parsed result, skipping scan");
                    continue;
                }
            };

            let assessment = scoring::score_ports(&report);
            let alert = self
                .emit_alert(asset_id, &summary, &assessment, parsed)
                .await?;
            // Visible to the rest of this batch so one cycle never
            // double-emits for the same asset.
            known_alerts.push(alert);
            created += 1;
        }

        Ok(created)
    }

    async fn emit_alert(
        &self,
        asset_id: AssetId,
        summary: &str,
        assessment: &RiskAssessment,
        parsed: &Value,
    ) -> Result<Alert> {
        let alert = self
            .store
            .create_alert(NewAlert {
                asset_id: Some(asset_id),
                severity: assessment.severity,
                score: assessment.stored_score(),
                summary: summary.to_string(),
                details: Some(parsed.clone()),
                explanation: Some(assessment.explanation()),
            })
            .await?;

        journal::append_record(&self.handoff_log, &alert)?;
        journal::append_record(
            &self.audit_log,
            &AuditRecord {
                timestamp: Utc::now(),
                action: "alert_created",
                alert_id: alert.id,
                score: assessment.score,
                severity: assessment.severity,
                summary,
                explanation: &assessment.contributions,
            },
        )?;

        info!(
            alert = %alert.id,
            severity = %assessment.severity,
            score = assessment.stored_score(),
            "alert emitted"
        );
        Ok(alert)
    }
}

fn summary_for(asset_id: AssetId) -> String {
    format!("AI risk score for asset {asset_id}")
}

#[async_trait]
impl<S: FactStore> Cycle for DerivationConsumer<S> {
    fn name(&self) -> &'static str {
        "derivation"
    }

    async fn run_cycle(&mut self) -> Result<()> {
        let created = self.process_scans().await?;
        if created > 0 {
            info!(created, "derivation cycle complete");
        }
        Ok(())
    }
}
