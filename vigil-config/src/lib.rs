//! Shared configuration loading for Vigil.
//!
//! Every pipeline process reads the same environment surface: the fact
//! store's base URL, its own polling interval, and the filesystem paths for
//! the durable artifacts it owns. All knobs default to something usable for
//! a local single-host deployment.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Full process configuration; each consumer picks the section it needs.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub store: StoreConfig,
    pub derivation: DerivationConfig,
    pub responder: ResponderConfig,
}

/// How to reach the fact store.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub base_url: String,
    pub timeout: Duration,
}

/// Settings for the derivation consumer.
#[derive(Debug, Clone, Deserialize)]
pub struct DerivationConfig {
    pub poll_interval: Duration,
    pub alerts_dir: PathBuf,
    pub audit_dir: PathBuf,
}

impl DerivationConfig {
    /// The append-only hand-off log bridging the two consumers.
    pub fn handoff_log(&self) -> PathBuf {
        self.alerts_dir.join("alerts.jsonl")
    }

    pub fn audit_log(&self) -> PathBuf {
        self.audit_dir.join("audit.jsonl")
    }
}

/// Settings for the action consumer.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponderConfig {
    pub poll_interval: Duration,
    pub handoff_log: PathBuf,
    pub policy_path: PathBuf,
    pub checkpoint_path: PathBuf,
    pub audit_dir: PathBuf,
}

impl ResponderConfig {
    pub fn response_log(&self) -> PathBuf {
        self.audit_dir.join("response.jsonl")
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let alerts_dir: PathBuf = env::var("ALERTS_DIR")
            .unwrap_or_else(|_| "./data/alerts".to_string())
            .into();
        let audit_dir: PathBuf = env::var("AUDIT_DIR")
            .unwrap_or_else(|_| "./data/audit".to_string())
            .into();

        let handoff_log = env::var("ALERTS_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| alerts_dir.join("alerts.jsonl"));

        Ok(Self {
            store: StoreConfig {
                base_url: env::var("FACT_STORE_URL")
                    .unwrap_or_else(|_| "http://localhost:8000".to_string()),
                timeout: Duration::from_secs(parse_secs("FACT_STORE_TIMEOUT_SECS", 30)),
            },
            derivation: DerivationConfig {
                poll_interval: Duration::from_secs(parse_secs("DERIVE_INTERVAL_SECS", 600)),
                alerts_dir: alerts_dir.clone(),
                audit_dir: audit_dir.clone(),
            },
            responder: ResponderConfig {
                poll_interval: Duration::from_secs(parse_secs("RESPOND_INTERVAL_SECS", 120)),
                handoff_log,
                policy_path: env::var("RESPONSE_POLICY")
                    .unwrap_or_else(|_| "./data/policy.json".to_string())
                    .into(),
                checkpoint_path: env::var("RESPONDER_STATE")
                    .unwrap_or_else(|_| "./data/responder_state.json".to_string())
                    .into(),
                audit_dir,
            },
        })
    }

    /// Create the data directories if they don't exist.
    pub fn ensure_directories(&self) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.derivation.alerts_dir)?;
        std::fs::create_dir_all(&self.derivation.audit_dir)?;
        std::fs::create_dir_all(&self.responder.audit_dir)?;
        if let Some(parent) = self.responder.policy_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        if let Some(parent) = self.responder.checkpoint_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

fn parse_secs(key: &str, default: u64) -> u64 {
    env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .unwrap_or(default)
}
