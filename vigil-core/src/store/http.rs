use std::time::Duration;

use async_trait::async_trait;
use vigil_model::{
    ActionLog, Alert, Asset, NewActionLog, NewAlert, NewAsset, NewScan, Scan,
};

use crate::error::Result;
use crate::store::FactStore;

/// JSON-over-HTTP implementation of [`FactStore`].
#[derive(Debug, Clone)]
pub struct HttpFactStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpFactStore {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl FactStore for HttpFactStore {
    async fn list_scans(&self) -> Result<Vec<Scan>> {
        let response = self.client.get(self.url("/api/v1/scans")).send().await?;
        Ok(response.error_for_status()?.json().await?)
    }

    async fn list_alerts(&self) -> Result<Vec<Alert>> {
        let response = self.client.get(self.url("/api/v1/alerts")).send().await?;
        Ok(response.error_for_status()?.json().await?)
    }

    async fn create_alert(&self, alert: NewAlert) -> Result<Alert> {
        let response = self
            .client
            .post(self.url("/api/v1/alerts"))
            .json(&alert)
            .send()
            .await?;
        Ok(response.error_for_status()?.json().await?)
    }

    async fn create_action(&self, action: NewActionLog) -> Result<ActionLog> {
        let response = self
            .client
            .post(self.url("/api/v1/actions"))
            .json(&action)
            .send()
            .await?;
        Ok(response.error_for_status()?.json().await?)
    }

    async fn create_scan(&self, scan: NewScan) -> Result<Scan> {
        let response = self
            .client
            .post(self.url("/api/v1/scans"))
            .json(&scan)
            .send()
            .await?;
        Ok(response.error_for_status()?.json().await?)
    }

    async fn upsert_asset(&self, asset: NewAsset) -> Result<Asset> {
        let response = self
            .client
            .post(self.url("/api/v1/assets"))
            .json(&asset)
            .send()
            .await?;
        Ok(response.error_for_status()?.json().await?)
    }
}
