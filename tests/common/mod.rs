//! Shared utilities for integration testing: a scripted mock wave service.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use wave_client::ClientConfig;

/// What the mock service answers for every wave it starts.
#[derive(Clone)]
pub struct WaveScript {
    /// Status bodies served in order; the last one repeats.
    pub statuses: Vec<Value>,
    pub audit: Value,
    /// Replaces the default `{wave_id, status: running}` start body.
    pub start_response: Option<Value>,
}

impl WaveScript {
    pub fn new(statuses: Vec<Value>) -> Self {
        Self {
            statuses,
            audit: json!({
                "integrity_status": "VALID",
                "policy_hash": "v1",
                "agent_id": "openclaw_poc_agent_v1",
                "output_path": "./outputs/report.md",
                "events": [
                    {"node": "load_csv", "status": "ok"},
                    {"node": "commit_write_report", "status": "ok"}
                ]
            }),
            start_response: None,
        }
    }
}

pub struct MockState {
    script: WaveScript,
    next_id: AtomicU32,
    queues: Mutex<HashMap<String, VecDeque<Value>>>,
    /// Responses served before normal handling, one per request, on any route.
    injected: Mutex<VecDeque<(u16, String)>>,
    /// Responses served only to approval submissions.
    approve_injected: Mutex<VecDeque<(u16, String)>>,
    pub start_calls: AtomicU32,
    pub status_calls: Mutex<HashMap<String, u32>>,
    pub approvals: Mutex<Vec<(String, Value)>>,
    pub audit_calls: AtomicU32,
    pub request_ids: Mutex<Vec<String>>,
}

impl MockState {
    fn new(script: WaveScript) -> Self {
        Self {
            script,
            next_id: AtomicU32::new(0),
            queues: Mutex::new(HashMap::new()),
            injected: Mutex::new(VecDeque::new()),
            approve_injected: Mutex::new(VecDeque::new()),
            start_calls: AtomicU32::new(0),
            status_calls: Mutex::new(HashMap::new()),
            approvals: Mutex::new(Vec::new()),
            audit_calls: AtomicU32::new(0),
            request_ids: Mutex::new(Vec::new()),
        }
    }

    /// Queue raw responses to serve ahead of the script.
    pub fn inject(&self, responses: &[(u16, &str)]) {
        let mut injected = self.injected.lock().unwrap();
        for (status, body) in responses {
            injected.push_back((*status, body.to_string()));
        }
    }

    /// Queue raw responses for the approval route only.
    pub fn inject_on_approve(&self, responses: &[(u16, &str)]) {
        let mut injected = self.approve_injected.lock().unwrap();
        for (status, body) in responses {
            injected.push_back((*status, body.to_string()));
        }
    }

    pub fn status_calls_for(&self, wave_id: &str) -> u32 {
        self.status_calls.lock().unwrap().get(wave_id).copied().unwrap_or(0)
    }

    pub fn approved_ids(&self) -> Vec<String> {
        self.approvals.lock().unwrap().iter().map(|(id, _)| id.clone()).collect()
    }

    fn take_injected(&self) -> Option<Response> {
        let next = self.injected.lock().unwrap().pop_front();
        Self::raw_response(next)
    }

    fn take_approve_injected(&self) -> Option<Response> {
        let next = self.approve_injected.lock().unwrap().pop_front();
        Self::raw_response(next).or_else(|| self.take_injected())
    }

    fn raw_response(next: Option<(u16, String)>) -> Option<Response> {
        let (status, body) = next?;
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Some((status, body).into_response())
    }
}

pub struct MockWaveService {
    pub addr: SocketAddr,
    pub state: Arc<MockState>,
}

impl MockWaveService {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

/// Start the mock service on an ephemeral loopback port.
pub async fn start_mock_service(script: WaveScript) -> MockWaveService {
    let state = Arc::new(MockState::new(script));

    let app = Router::new()
        .route("/api/waves/run", post(start_wave))
        .route("/api/waves/{wave_id}/status", get(wave_status))
        .route("/api/approvals/{approval_request_id}", post(approve))
        .route("/api/waves/{wave_id}/audit/export", get(export_audit))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockWaveService { addr, state }
}

/// A loopback address with nothing listening on it.
pub async fn closed_address() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Client configuration with millisecond-scale timings.
pub fn fast_config(base_url: &str) -> ClientConfig {
    let mut config = ClientConfig::default();
    config.service.base_url = base_url.to_string();
    config.service.request_timeout_secs = 5;
    config.retries.max_retries = 4;
    config.retries.base_delay_ms = 10;
    config.retries.max_delay_ms = 80;
    config.polling.fast_interval_ms = 10;
    config.polling.slow_interval_ms = 20;
    config.polling.fast_poll_count = 5;
    config.polling.jitter_ms = 5;
    config.polling.deadline_ms = 5_000;
    config
}

async fn start_wave(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(_body): Json<Value>,
) -> Response {
    state.start_calls.fetch_add(1, Ordering::SeqCst);
    if let Some(id) = headers.get("x-request-id").and_then(|v| v.to_str().ok()) {
        state.request_ids.lock().unwrap().push(id.to_string());
    }
    if let Some(response) = state.take_injected() {
        return response;
    }
    if let Some(body) = &state.script.start_response {
        return Json(body.clone()).into_response();
    }

    let wave_id = format!("w{}", state.next_id.fetch_add(1, Ordering::SeqCst) + 1);
    state
        .queues
        .lock()
        .unwrap()
        .insert(wave_id.clone(), state.script.statuses.iter().cloned().collect());

    Json(json!({"wave_id": wave_id, "status": "running"})).into_response()
}

async fn wave_status(
    State(state): State<Arc<MockState>>,
    Path(wave_id): Path<String>,
) -> Response {
    *state
        .status_calls
        .lock()
        .unwrap()
        .entry(wave_id.clone())
        .or_insert(0) += 1;
    if let Some(response) = state.take_injected() {
        return response;
    }

    let mut queues = state.queues.lock().unwrap();
    let Some(queue) = queues.get_mut(&wave_id) else {
        return (StatusCode::NOT_FOUND, "unknown wave").into_response();
    };
    let body = if queue.len() > 1 {
        queue.pop_front()
    } else {
        queue.front().cloned()
    };

    match body {
        Some(mut body) => {
            body["wave_id"] = json!(wave_id);
            Json(body).into_response()
        }
        None => Json(json!({"wave_id": wave_id, "status": "running"})).into_response(),
    }
}

async fn approve(
    State(state): State<Arc<MockState>>,
    Path(approval_request_id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if let Some(response) = state.take_approve_injected() {
        return response;
    }
    state
        .approvals
        .lock()
        .unwrap()
        .push((approval_request_id.clone(), body.clone()));

    Json(json!({
        "status": "complete",
        "approval_request_id": approval_request_id,
        "approved_by": body["approved_by"],
        "note": body["note"],
    }))
    .into_response()
}

async fn export_audit(
    State(state): State<Arc<MockState>>,
    Path(wave_id): Path<String>,
) -> Response {
    state.audit_calls.fetch_add(1, Ordering::SeqCst);
    if let Some(response) = state.take_injected() {
        return response;
    }
    let mut audit = state.script.audit.clone();
    audit["wave_id"] = json!(wave_id);
    Json(audit).into_response()
}
