//! Test doubles for the location store and the position sink.

use async_trait::async_trait;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::put;
use axum::{Json, Router};
use reqwest::Url;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tagtrack_core::Fix;

use crate::error::TrackerError;
use crate::publisher::PositionSink;
use crate::store::LocationStore;

/// What the fake store answers for one device
#[derive(Clone, Debug)]
pub enum StoreAnswer {
    Found(Fix),
    NotFound,
    Unavailable(&'static str),
    Malformed,
}

/// In-memory location store whose answers can be changed between polls
#[derive(Clone, Default)]
pub struct MockStore {
    answers: Arc<Mutex<HashMap<String, StoreAnswer>>>,
    queries: Arc<AtomicUsize>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, device: &str, answer: StoreAnswer) {
        self.answers
            .lock()
            .unwrap()
            .insert(device.to_string(), answer);
    }

    pub fn found(&self, device: &str, lat: f64, lng: f64) {
        let fix = Fix::from_epoch_millis(lat, lng, 10.0, 1_714_564_800_000).unwrap();
        self.set(device, StoreAnswer::Found(fix));
    }

    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LocationStore for MockStore {
    async fn query(&self, device: &str) -> Result<Option<Fix>, TrackerError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        let answer = self.answers.lock().unwrap().get(device).cloned();
        match answer {
            Some(StoreAnswer::Found(fix)) => Ok(Some(fix)),
            Some(StoreAnswer::NotFound) | None => Ok(None),
            Some(StoreAnswer::Unavailable(msg)) => {
                Err(TrackerError::StoreUnavailable(msg.to_string()))
            }
            Some(StoreAnswer::Malformed) => Err(TrackerError::malformed(
                device,
                tagtrack_core::RecordError::FieldCount(1),
            )),
        }
    }
}

/// Sink that records every upsert in memory and can refuse chosen nodes
#[derive(Clone, Default)]
pub struct RecordingSink {
    calls: Arc<Mutex<Vec<(u32, f64, f64)>>>,
    rejected: Arc<Mutex<Vec<u32>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reject(&self, node_id: u32) {
        self.rejected.lock().unwrap().push(node_id);
    }

    pub fn calls(&self) -> Vec<(u32, f64, f64)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PositionSink for RecordingSink {
    async fn upsert(&self, node_id: u32, lat: f64, lng: f64) -> Result<Value, TrackerError> {
        self.calls.lock().unwrap().push((node_id, lat, lng));
        if self.rejected.lock().unwrap().contains(&node_id) {
            return Err(TrackerError::PublishFailed {
                id: node_id,
                reason: "rejected".to_string(),
            });
        }
        Ok(json!({"id": node_id, "lat": lat, "lng": lng}))
    }
}

#[derive(Clone, Default)]
struct SinkState {
    requests: Arc<Mutex<Vec<Value>>>,
    rejected: Arc<Mutex<HashMap<u64, StatusCode>>>,
    delay: Arc<Mutex<Option<Duration>>>,
}

/// A position sink served over HTTP on an ephemeral local port
pub struct SinkServer {
    addr: std::net::SocketAddr,
    state: SinkState,
}

impl SinkServer {
    pub async fn start() -> Self {
        let state = SinkState::default();
        let app = Router::new()
            .route("/api/location", put(put_location))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        SinkServer { addr, state }
    }

    pub fn url(&self) -> Url {
        Url::parse(&format!("http://{}/api/location", self.addr)).unwrap()
    }

    pub fn reject(&self, node_id: u64, status: StatusCode) {
        self.state.rejected.lock().unwrap().insert(node_id, status);
    }

    pub fn delay(&self, delay: Duration) {
        *self.state.delay.lock().unwrap() = Some(delay);
    }

    pub fn requests(&self) -> Vec<Value> {
        self.state.requests.lock().unwrap().clone()
    }
}

async fn put_location(
    State(state): State<SinkState>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.requests.lock().unwrap().push(body.clone());

    let delay = *state.delay.lock().unwrap();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let id = body["id"].as_u64().unwrap_or_default();
    let rejected = state.rejected.lock().unwrap().get(&id).copied();
    if let Some(status) = rejected {
        return (status, Json(json!({"error": "Update node failed"})));
    }

    (
        StatusCode::OK,
        Json(json!({"id": id, "rssi": -60, "lat": body["lat"], "lng": body["lng"]})),
    )
}
