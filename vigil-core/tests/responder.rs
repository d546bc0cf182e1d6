//! Integration tests for the action consumer: policy resolution, the
//! processed-set checkpoint, and at-least-once reporting.

mod support;

use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use support::{MemoryFactStore, handoff_alert};
use tempfile::TempDir;
use vigil_core::journal::{self, Checkpoint};
use vigil_core::respond::{ActionConsumer, ResponseRecord, load_or_init_policy};
use vigil_model::{AlertId, Policy, ResponseAction, Severity};

struct Paths {
    dir: TempDir,
}

impl Paths {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn policy(&self) -> std::path::PathBuf {
        self.dir.path().join("policy.json")
    }

    fn checkpoint(&self) -> std::path::PathBuf {
        self.dir.path().join("responder_state.json")
    }

    fn handoff(&self) -> std::path::PathBuf {
        self.dir.path().join("alerts.jsonl")
    }

    fn responses(&self) -> std::path::PathBuf {
        self.dir.path().join("response.jsonl")
    }

    fn consumer(&self, store: &Arc<MemoryFactStore>) -> ActionConsumer<MemoryFactStore> {
        ActionConsumer::new(
            Arc::clone(store),
            &self.policy(),
            self.checkpoint(),
            self.handoff(),
            self.responses(),
        )
        .unwrap()
    }
}

#[tokio::test]
async fn high_severity_blocks_and_reports_once() {
    let paths = Paths::new();
    let store = Arc::new(MemoryFactStore::new());
    journal::append_record(
        &paths.handoff(),
        &handoff_alert(1, Severity::High, Some("192.168.1.10")),
    )
    .unwrap();

    let mut consumer = paths.consumer(&store);
    assert_eq!(consumer.process_alerts().await.unwrap(), 1);

    let actions = store.actions();
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].action_type, "blocked");
    assert_eq!(actions[0].alert_id, AlertId(1));

    let responses: Vec<ResponseRecord> =
        journal::read_records(&paths.responses()).unwrap();
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0].action, ResponseAction::BlockIp);
    assert_eq!(responses[0].target.as_deref(), Some("192.168.1.10"));
    assert_eq!(responses[0].status.as_str(), "blocked");

    let checkpoint = Checkpoint::load(paths.checkpoint());
    assert!(checkpoint.contains(AlertId(1)));
}

#[tokio::test]
async fn reprocessing_with_persisted_checkpoint_is_idempotent() {
    let paths = Paths::new();
    let store = Arc::new(MemoryFactStore::new());
    journal::append_record(
        &paths.handoff(),
        &handoff_alert(1, Severity::Medium, Some("10.0.0.1")),
    )
    .unwrap();

    let mut consumer = paths.consumer(&store);
    assert_eq!(consumer.process_alerts().await.unwrap(), 1);
    assert_eq!(consumer.process_alerts().await.unwrap(), 0);

    // Fresh consumer over the same files simulates a restart.
    let mut restarted = paths.consumer(&store);
    assert_eq!(restarted.process_alerts().await.unwrap(), 0);

    assert_eq!(store.actions().len(), 1, "one action across all passes");
}

#[tokio::test]
async fn failed_report_is_left_unprocessed_and_retried() {
    let paths = Paths::new();
    let store = Arc::new(MemoryFactStore::new());
    journal::append_record(
        &paths.handoff(),
        &handoff_alert(1, Severity::High, Some("10.0.0.2")),
    )
    .unwrap();

    let mut consumer = paths.consumer(&store);

    store.fail_actions(true);
    assert_eq!(consumer.process_alerts().await.unwrap(), 0);
    assert!(store.actions().is_empty());
    assert!(
        !Checkpoint::load(paths.checkpoint()).contains(AlertId(1)),
        "a failed report must not be marked processed"
    );

    store.fail_actions(false);
    assert_eq!(consumer.process_alerts().await.unwrap(), 1);
    assert_eq!(store.actions().len(), 1);

    // The retry leaves a duplicate local record; the store-side log stays
    // single. That asymmetry is the at-least-once contract.
    let responses: Vec<ResponseRecord> =
        journal::read_records(&paths.responses()).unwrap();
    assert_eq!(responses.len(), 2);
}

#[tokio::test]
async fn one_failing_report_does_not_starve_the_batch() {
    let paths = Paths::new();
    let store = Arc::new(MemoryFactStore::new());
    journal::append_record(
        &paths.handoff(),
        &handoff_alert(1, Severity::High, Some("10.0.0.1")),
    )
    .unwrap();
    journal::append_record(
        &paths.handoff(),
        &handoff_alert(2, Severity::Low, None),
    )
    .unwrap();

    // Both fail on the first pass, both land on the second.
    let mut consumer = paths.consumer(&store);
    store.fail_actions(true);
    assert_eq!(consumer.process_alerts().await.unwrap(), 0);
    store.fail_actions(false);
    assert_eq!(consumer.process_alerts().await.unwrap(), 2);
    assert_eq!(store.actions().len(), 2);
}

#[tokio::test]
async fn malformed_handoff_line_is_skipped() {
    let paths = Paths::new();
    let store = Arc::new(MemoryFactStore::new());
    journal::append_record(
        &paths.handoff(),
        &handoff_alert(1, Severity::Low, None),
    )
    .unwrap();
    std::fs::write(
        paths.handoff(),
        format!(
            "{}\nthis is not json\n",
            std::fs::read_to_string(paths.handoff()).unwrap().trim_end()
        ),
    )
    .unwrap();

    let mut consumer = paths.consumer(&store);
    assert_eq!(consumer.process_alerts().await.unwrap(), 1);
    assert_eq!(store.actions().len(), 1);
}

#[tokio::test]
async fn unknown_severity_resolves_to_audit_only() {
    let paths = Paths::new();
    let store = Arc::new(MemoryFactStore::new());
    // Severity value minted by some future scorer this build doesn't know.
    std::fs::write(
        paths.handoff(),
        r#"{"id": 8, "asset_id": 8, "created_at": "2025-11-02T10:00:00Z", "severity": "catastrophic", "score": 0.9, "summary": "AI risk score for asset 8"}"#,
    )
    .unwrap();

    let mut consumer = paths.consumer(&store);
    assert_eq!(consumer.process_alerts().await.unwrap(), 1);

    let actions = store.actions();
    assert_eq!(actions[0].action_type, "logged");
    let responses: Vec<ResponseRecord> =
        journal::read_records(&paths.responses()).unwrap();
    assert_eq!(responses[0].action, ResponseAction::AuditOnly);
    assert_eq!(responses[0].status.as_str(), "logged");
}

#[test]
fn absent_policy_file_is_bootstrapped_with_the_default() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("policy.json");

    let policy = load_or_init_policy(&path).unwrap();
    assert_eq!(policy, Policy::default());
    assert!(path.exists());

    // Second load reads the file it just wrote.
    let reread = load_or_init_policy(&path).unwrap();
    assert_eq!(reread, policy);

    let raw: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["thresholds"]["high"], "block_ip");
    assert_eq!(raw["email_recipients"][0], "soc-ops@example.local");
}

#[test]
fn invalid_policy_file_is_a_startup_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("policy.json");
    std::fs::write(&path, "{\"thresholds\": 42}").unwrap();

    assert!(load_or_init_policy(Path::new(&path)).is_err());
}

#[tokio::test]
async fn empty_or_missing_handoff_is_a_quiet_cycle() {
    let paths = Paths::new();
    let store = Arc::new(MemoryFactStore::new());

    let mut consumer = paths.consumer(&store);
    assert_eq!(consumer.process_alerts().await.unwrap(), 0);
    assert!(store.actions().is_empty());
    assert!(!paths.responses().exists());
}
