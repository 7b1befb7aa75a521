//! In-process stand-in for the job portal REST backend.

#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use job_portal::config::ApiConfig;
use serde_json::{json, Value};

pub const TOKEN: &str = "test-token";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub method: &'static str,
    pub path: String,
    pub body: Option<Value>,
}

#[derive(Default)]
pub struct StubState {
    pub applications: BTreeMap<u64, Value>,
    pub saved_jobs: Vec<Value>,
    pub failing_jobs: BTreeSet<u64>,
    pub calls: Vec<RecordedCall>,
}

pub type SharedState = Arc<Mutex<StubState>>;

pub fn application(id: u64, status: &str) -> Value {
    json!({
        "id": id,
        "jobId": 100 + id,
        "jobTitle": format!("Backend Engineer {id}"),
        "companyName": "TechCorp Inc.",
        "jobLocation": "Remote",
        "applicantName": "Jordan Lee",
        "applicantEmail": "jordan@example.com",
        "status": status,
        "applyDate": "2025-10-06T10:30:00Z",
        "lastUpdated": "2025-10-06T10:30:00Z",
    })
}

pub fn saved_job(id: u64, title: &str, remote: &str) -> Value {
    json!({
        "jobPostId": id,
        "jobTitle": title,
        "companyName": "Acme",
        "jobLocation": "Des Moines, IA",
        "jobType": "FULL_TIME",
        "remote": remote,
        "isApplied": false,
    })
}

pub struct StubBackend {
    pub addr: SocketAddr,
    pub state: SharedState,
    server: tokio::task::JoinHandle<()>,
}

impl StubBackend {
    pub async fn spawn(state: StubState) -> Self {
        let state = Arc::new(Mutex::new(state));
        let router = router(Arc::clone(&state));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub backend");
        let addr = listener.local_addr().expect("read stub address");
        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });
        Self {
            addr,
            state,
            server,
        }
    }

    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            base_url: format!("http://{}/api/", self.addr),
            token: Some(TOKEN.to_string()),
            timeout: Duration::from_secs(5),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().expect("stub state poisoned").calls.clone()
    }

    pub fn set_status(&self, id: u64, status: &str) {
        let mut state = self.state.lock().expect("stub state poisoned");
        if let Some(application) = state.applications.get_mut(&id) {
            application["status"] = json!(status);
        }
    }
}

impl Drop for StubBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

fn router(state: SharedState) -> Router {
    Router::new()
        .route("/api/applications/my-applications", get(my_applications))
        .route(
            "/api/applications/recruiter/applications",
            get(recruiter_applications),
        )
        .route("/api/applications/:id", get(application_by_id))
        .route("/api/applications/:id/status", put(update_status))
        .route("/api/applications/:id/withdraw", put(withdraw))
        .route("/api/saved-jobs", get(saved_jobs))
        .route("/api/saved-jobs/count", get(saved_jobs_count))
        .route("/api/jobs/:id/save", post(save_job))
        .route("/api/jobs/:id/unsave", delete(unsave_job))
        .route("/api/jobs/:id/apply", post(apply_job))
        .with_state(state)
}

fn authorize(headers: &HeaderMap) -> Result<(), Response> {
    let expected = format!("Bearer {TOKEN}");
    match headers.get("authorization").and_then(|value| value.to_str().ok()) {
        Some(value) if value == expected => Ok(()),
        _ => Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Authentication required" })),
        )
            .into_response()),
    }
}

fn record(state: &SharedState, method: &'static str, path: String, body: Option<Value>) {
    state
        .lock()
        .expect("stub state poisoned")
        .calls
        .push(RecordedCall { method, path, body });
}

fn not_found(message: &str) -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response()
}

async fn my_applications(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    if let Err(denied) = authorize(&headers) {
        return denied;
    }
    record(&state, "GET", "/applications/my-applications".into(), None);
    let guard = state.lock().expect("stub state poisoned");
    Json(guard.applications.values().cloned().collect::<Vec<_>>()).into_response()
}

async fn recruiter_applications(
    State(state): State<SharedState>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    if let Err(denied) = authorize(&headers) {
        return denied;
    }
    let filter = params.get("status").cloned();
    let path = match &filter {
        Some(status) => format!("/applications/recruiter/applications?status={status}"),
        None => "/applications/recruiter/applications".to_string(),
    };
    record(&state, "GET", path, None);
    let guard = state.lock().expect("stub state poisoned");
    let applications: Vec<Value> = guard
        .applications
        .values()
        .filter(|application| match &filter {
            Some(status) => application["status"] == json!(status),
            None => true,
        })
        .cloned()
        .collect();
    Json(applications).into_response()
}

async fn application_by_id(
    State(state): State<SharedState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> Response {
    if let Err(denied) = authorize(&headers) {
        return denied;
    }
    record(&state, "GET", format!("/applications/{id}"), None);
    let guard = state.lock().expect("stub state poisoned");
    match guard.applications.get(&id) {
        Some(application) => Json(application.clone()).into_response(),
        None => not_found("Application not found"),
    }
}

async fn update_status(
    State(state): State<SharedState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(denied) = authorize(&headers) {
        return denied;
    }
    record(
        &state,
        "PUT",
        format!("/applications/{id}/status"),
        Some(body.clone()),
    );
    let mut guard = state.lock().expect("stub state poisoned");
    let Some(application) = guard.applications.get_mut(&id) else {
        return not_found("Application not found");
    };
    application["status"] = body["status"].clone();
    if let Some(notes) = body.get("recruiterNotes") {
        application["recruiterNotes"] = notes.clone();
    }
    application["lastUpdated"] = json!("2025-10-07T09:00:00Z");
    Json(application.clone()).into_response()
}

async fn withdraw(
    State(state): State<SharedState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> Response {
    if let Err(denied) = authorize(&headers) {
        return denied;
    }
    record(&state, "PUT", format!("/applications/{id}/withdraw"), None);
    let mut guard = state.lock().expect("stub state poisoned");
    let Some(application) = guard.applications.get_mut(&id) else {
        return not_found("Application not found");
    };
    if application["status"] == json!("HIRED") {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Application cannot be withdrawn in current status: HIRED" })),
        )
            .into_response();
    }
    application["status"] = json!("WITHDRAWN");
    Json(application.clone()).into_response()
}

async fn saved_jobs(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    if let Err(denied) = authorize(&headers) {
        return denied;
    }
    record(&state, "GET", "/saved-jobs".into(), None);
    let guard = state.lock().expect("stub state poisoned");
    Json(json!({ "success": true, "data": guard.saved_jobs })).into_response()
}

async fn saved_jobs_count(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    if let Err(denied) = authorize(&headers) {
        return denied;
    }
    record(&state, "GET", "/saved-jobs/count".into(), None);
    let guard = state.lock().expect("stub state poisoned");
    Json(json!({ "success": true, "data": guard.saved_jobs.len() })).into_response()
}

async fn save_job(
    State(state): State<SharedState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> Response {
    if let Err(denied) = authorize(&headers) {
        return denied;
    }
    record(&state, "POST", format!("/jobs/{id}/save"), None);
    let mut guard = state.lock().expect("stub state poisoned");
    if guard
        .saved_jobs
        .iter()
        .any(|job| job["jobPostId"] == json!(id))
    {
        return Json(json!({ "success": false, "message": "Job already saved" })).into_response();
    }
    guard.saved_jobs.push(saved_job(id, "Saved role", "No"));
    Json(json!({ "success": true, "message": "Job saved successfully" })).into_response()
}

async fn unsave_job(
    State(state): State<SharedState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> Response {
    if let Err(denied) = authorize(&headers) {
        return denied;
    }
    record(&state, "DELETE", format!("/jobs/{id}/unsave"), None);
    let mut guard = state.lock().expect("stub state poisoned");
    if guard.failing_jobs.contains(&id) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "success": false, "message": "Failed to unsave job" })),
        )
            .into_response();
    }
    let before = guard.saved_jobs.len();
    guard.saved_jobs.retain(|job| job["jobPostId"] != json!(id));
    if guard.saved_jobs.len() == before {
        return not_found("Saved job not found");
    }
    Json(json!({ "success": true, "message": "Job removed from saved list" })).into_response()
}

async fn apply_job(
    State(state): State<SharedState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> Response {
    if let Err(denied) = authorize(&headers) {
        return denied;
    }
    record(&state, "POST", format!("/jobs/{id}/apply"), None);
    let mut guard = state.lock().expect("stub state poisoned");
    if guard.failing_jobs.contains(&id) {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "success": false, "message": "You have already applied to this job" })),
        )
            .into_response();
    }
    for job in guard.saved_jobs.iter_mut() {
        if job["jobPostId"] == json!(id) {
            job["isApplied"] = json!(true);
        }
    }
    Json(json!({ "success": true, "message": "Application submitted" })).into_response()
}
