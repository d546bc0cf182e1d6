//! Shared fixtures for the integration tests: an in-memory fact store and
//! record builders.

// Each test binary uses a different slice of this module.
#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Value, json};
use vigil_core::error::Result;
use vigil_core::store::FactStore;
use vigil_model::{
    ActionId, ActionLog, Alert, AlertId, Asset, AssetId, NewActionLog, NewAlert,
    NewAsset, NewScan, Scan, ScanId, Severity,
};

#[derive(Default)]
struct State {
    next_id: i64,
    scans: Vec<Scan>,
    alerts: Vec<Alert>,
    actions: Vec<ActionLog>,
    assets: Vec<Asset>,
}

impl State {
    fn assign_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory [`FactStore`] with store-style id assignment and an
/// injectable failure switch on the action-report path.
#[derive(Default)]
pub struct MemoryFactStore {
    state: Mutex<State>,
    fail_actions: AtomicBool,
}

impl MemoryFactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `create_action` call fail until switched back.
    pub fn fail_actions(&self, fail: bool) {
        self.fail_actions.store(fail, Ordering::SeqCst);
    }

    pub fn seed_scan(&self, asset_id: Option<AssetId>, parsed_result: Option<Value>) -> ScanId {
        let mut state = self.state.lock().unwrap();
        let id = ScanId(state.assign_id());
        state.scans.push(Scan {
            id,
            asset_id,
            started_at: Utc::now(),
            ended_at: Some(Utc::now()),
            command: "nmap -sV 192.168.1.0/24".into(),
            raw_output_path: None,
            parsed_result,
        });
        id
    }

    pub fn alerts(&self) -> Vec<Alert> {
        self.state.lock().unwrap().alerts.clone()
    }

    pub fn actions(&self) -> Vec<ActionLog> {
        self.state.lock().unwrap().actions.clone()
    }
}

#[async_trait]
impl FactStore for MemoryFactStore {
    async fn list_scans(&self) -> Result<Vec<Scan>> {
        Ok(self.state.lock().unwrap().scans.clone())
    }

    async fn list_alerts(&self) -> Result<Vec<Alert>> {
        // Most-recent-first, like the real store.
        let state = self.state.lock().unwrap();
        Ok(state.alerts.iter().rev().cloned().collect())
    }

    async fn create_alert(&self, alert: NewAlert) -> Result<Alert> {
        let mut state = self.state.lock().unwrap();
        let created = Alert {
            id: AlertId(state.assign_id()),
            asset_id: alert.asset_id,
            created_at: Utc::now(),
            severity: alert.severity,
            score: alert.score,
            summary: alert.summary,
            details: alert.details,
            explanation: alert.explanation,
            status: "open".into(),
        };
        state.alerts.push(created.clone());
        Ok(created)
    }

    async fn create_action(&self, action: NewActionLog) -> Result<ActionLog> {
        if self.fail_actions.load(Ordering::SeqCst) {
            return Err(std::io::Error::other("injected store failure").into());
        }
        let mut state = self.state.lock().unwrap();
        let created = ActionLog {
            id: ActionId(state.assign_id()),
            alert_id: action.alert_id,
            action_type: action.action_type,
            executed_at: Utc::now(),
            details: action.details,
        };
        state.actions.push(created.clone());
        Ok(created)
    }

    async fn create_scan(&self, scan: NewScan) -> Result<Scan> {
        let mut state = self.state.lock().unwrap();
        let created = Scan {
            id: ScanId(state.assign_id()),
            asset_id: Some(scan.asset_id),
            started_at: Utc::now(),
            ended_at: None,
            command: scan.command,
            raw_output_path: scan.raw_output_path,
            parsed_result: scan.parsed_result,
        };
        state.scans.push(created.clone());
        Ok(created)
    }

    async fn upsert_asset(&self, asset: NewAsset) -> Result<Asset> {
        let mut state = self.state.lock().unwrap();
        if let Some(existing) = state
            .assets
            .iter_mut()
            .find(|a| a.ip_address == asset.ip_address)
        {
            existing.hostname = asset.hostname;
            existing.os = asset.os;
            existing.last_seen = Utc::now();
            return Ok(existing.clone());
        }
        let created = Asset {
            id: AssetId(state.assign_id()),
            hostname: asset.hostname,
            ip_address: asset.ip_address,
            os: asset.os,
            last_seen: Utc::now(),
        };
        state.assets.push(created.clone());
        Ok(created)
    }
}

/// An alert in the shape the derivation side writes to the hand-off
/// journal.
pub fn handoff_alert(id: i64, severity: Severity, ip: Option<&str>) -> Alert {
    Alert {
        id: AlertId(id),
        asset_id: Some(AssetId(id)),
        created_at: Utc::now(),
        severity,
        score: 0.5,
        summary: format!("AI risk score for asset {id}"),
        details: ip.map(|ip| json!({"ip": ip, "ports": []})),
        explanation: None,
        status: "open".into(),
    }
}

/// A parsed-result payload in the scanner's shape.
pub fn parsed_ports(ip: &str, ports: &[(u16, &str)]) -> Value {
    let ports: Vec<Value> = ports
        .iter()
        .map(|(port, state)| {
            json!({"port": port, "protocol": "tcp", "state": state, "service": "unknown"})
        })
        .collect();
    json!({"ip": ip, "ports": ports})
}
