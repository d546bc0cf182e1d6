//! Pipeline engine for Vigil.
//!
//! Vigil coordinates a broker-less security-operations pipeline: the
//! derivation consumer turns scan facts from the fact store into risk
//! alerts, hands them to the action consumer through an append-only journal,
//! and the action consumer applies the response policy with a durable
//! processed-set checkpoint for idempotent restart. Both consumers share
//! the same fixed-interval, fail-soft polling loop.

pub mod derive;
pub mod error;
pub mod journal;
pub mod respond;
pub mod runtime;
pub mod scoring;
pub mod store;

pub use derive::DerivationConsumer;
pub use error::{PipelineError, Result};
pub use journal::Checkpoint;
pub use respond::{ActionConsumer, ResponseRecord, load_or_init_policy};
pub use runtime::Cycle;
pub use scoring::{HIGH_RISK_PORTS, RiskAssessment, score_ports};
pub use store::{FactStore, HttpFactStore};
