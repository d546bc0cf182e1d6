//! Client surface for the fact store.
//!
//! The store is an external collaborator: it owns record identity and
//! timestamps and is reached only through this request/response API. The
//! trait is the seam that lets the consumers run against a test double, and
//! the extension point for a backend that enforces alert uniqueness
//! server-side.

use async_trait::async_trait;
use vigil_model::{
    ActionLog, Alert, Asset, NewActionLog, NewAlert, NewAsset, NewScan, Scan,
};

use crate::error::Result;

mod http;

pub use http::HttpFactStore;

/// Abstracts the fact store consumed by both pipeline consumers.
#[async_trait]
pub trait FactStore: Send + Sync {
    /// Full current scan set, in the store's own listing order.
    async fn list_scans(&self) -> Result<Vec<Scan>>;

    /// Full current alert set, most-recent-first.
    async fn list_alerts(&self) -> Result<Vec<Alert>>;

    async fn create_alert(&self, alert: NewAlert) -> Result<Alert>;

    async fn create_action(&self, action: NewActionLog) -> Result<ActionLog>;

    async fn create_scan(&self, scan: NewScan) -> Result<Scan>;

    /// Upsert by `ip_address`: first report creates, later reports refresh.
    async fn upsert_asset(&self, asset: NewAsset) -> Result<Asset>;
}
