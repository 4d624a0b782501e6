//! Position Sink publishing
//!
//! Each tracked device is mirrored by a node in an external mapping service.
//! Publishing a fix is a `PUT` of `{"id", "lat", "lng"}` to that service,
//! which answers with its JSON view of the updated node.

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use crate::error::TrackerError;

pub const DEFAULT_SINK_URL: &str = "http://localhost:3000/api/location";

/// Upper bound for a single publish request, connecting included
pub const PUBLISH_TIMEOUT: Duration = Duration::from_secs(5);

#[async_trait]
pub trait PositionSink: Send + Sync {
    /// Create or update node `node_id` at the given position.
    ///
    /// Returns the sink's acknowledged representation of the node as-is.
    /// There is no retry here; a failed update is simply tried again on the
    /// next polling pass.
    async fn upsert(&self, node_id: u32, lat: f64, lng: f64) -> Result<Value, TrackerError>;
}

#[derive(Debug, Serialize)]
struct NodePosition {
    id: u32,
    lat: f64,
    lng: f64,
}

/// Publishes positions to the sink over HTTP
pub struct HttpPositionPublisher {
    client: Client,
    url: Url,
}

impl HttpPositionPublisher {
    pub fn new(url: Url) -> reqwest::Result<Self> {
        Self::with_timeout(url, PUBLISH_TIMEOUT)
    }

    pub fn with_timeout(url: Url, timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;
        Ok(HttpPositionPublisher { client, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl PositionSink for HttpPositionPublisher {
    async fn upsert(&self, node_id: u32, lat: f64, lng: f64) -> Result<Value, TrackerError> {
        let failed = |e: reqwest::Error| TrackerError::PublishFailed {
            id: node_id,
            reason: e.to_string(),
        };

        let body = NodePosition {
            id: node_id,
            lat,
            lng,
        };
        log::trace!("PUT {} {:?}", self.url, body);

        let response = self
            .client
            .put(self.url.clone())
            .json(&body)
            .send()
            .await
            .map_err(failed)?
            .error_for_status()
            .map_err(failed)?;

        response.json::<Value>().await.map_err(failed)
    }
}
