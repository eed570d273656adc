use async_trait::async_trait;
use reqwest::Url;
use serde::Serialize;

use crate::dispatch::Sink;
use crate::error::{SinkError, StartupError};
use crate::system::snapshot::Snapshot;

/// JSON body posted for every snapshot.
#[derive(Debug, Serialize, PartialEq)]
pub struct UsagePayload {
    pub cpu: f64,
    pub ram_used: f64,
    pub total_ram: f64,
    pub disk_used: f64,
    pub total_disk: f64,
}

impl From<&Snapshot> for UsagePayload {
    fn from(snapshot: &Snapshot) -> Self {
        UsagePayload {
            cpu: snapshot.cpu_usage_percent,
            ram_used: snapshot.ram_used_mb,
            total_ram: snapshot.total_ram_mb,
            disk_used: snapshot.disk_used_mb,
            total_disk: snapshot.total_disk_mb,
        }
    }
}

/// POSTs each snapshot to a remote endpoint.
pub struct HttpSink {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpSink {
    /// Returns `Ok(None)` for a blank endpoint: the sink is disabled and no
    /// request will ever be made.
    pub fn from_endpoint(endpoint: &str) -> Result<Option<Self>, StartupError> {
        let endpoint = endpoint.trim();
        if endpoint.is_empty() {
            return Ok(None);
        }

        let endpoint = Url::parse(endpoint).map_err(|e| StartupError::Invalid {
            field: "api_endpoint",
            reason: format!("`{endpoint}` is not a valid URL: {e}"),
        })?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(StartupError::Invalid {
                field: "api_endpoint",
                reason: format!("unsupported scheme `{}`", endpoint.scheme()),
            });
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("hostwatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| StartupError::Invalid {
                field: "api_endpoint",
                reason: format!("cannot build HTTP client: {e}"),
            })?;

        Ok(Some(HttpSink { client, endpoint }))
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl Sink for HttpSink {
    fn name(&self) -> &str {
        "http"
    }

    async fn handle(&self, snapshot: &Snapshot) -> Result<(), SinkError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&UsagePayload::from(snapshot))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SinkError::Status(status.as_u16()));
        }
        Ok(())
    }
}
