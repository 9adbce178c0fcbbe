//! In-process mock of the ImagineAI API for integration tests.
//!
//! Binds to `127.0.0.1:0`, records every request's method, path, query and
//! headers, and counts refresh exchanges.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Multipart, Path, Query, Request, State};
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post, put};
use axum::{Json, Router};
use imagine_auth::{CredentialStore, MemoryStore, OrganizationContext, SessionStore};
use imagine_client::{ApiClient, MemoryNotifier};
use imagine_config::ApiConfig;
use imagine_core::entities::TokenPair;
use futures_util::{SinkExt as _, StreamExt as _};
use serde_json::{Value, json};
use tokio::sync::Notify;

pub const TIMESTAMP: &str = "2025-01-01T00:00:00Z";

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub organization: Option<String>,
    pub content_type: Option<String>,
}

pub struct MockState {
    pub requests: Mutex<Vec<Recorded>>,
    pub refresh_calls: AtomicUsize,
    pub refresh_succeeds: AtomicBool,
    /// Access token the server currently accepts.
    pub valid_token: Mutex<String>,
    pub ws_tokens: Mutex<Vec<String>>,
    /// Signalled when the client closes a `job-flood` socket.
    pub flood_closed: Notify,
    products: Mutex<HashMap<String, Value>>,
}

impl MockState {
    fn new() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            refresh_calls: AtomicUsize::new(0),
            refresh_succeeds: AtomicBool::new(true),
            valid_token: Mutex::new("access-1".into()),
            ws_tokens: Mutex::new(Vec::new()),
            flood_closed: Notify::new(),
            products: Mutex::new(HashMap::new()),
        }
    }

    pub fn requests_to(&self, path: &str) -> Vec<Recorded> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.path == path)
            .cloned()
            .collect()
    }

    /// The only request recorded for `path`.
    pub fn single_request_to(&self, path: &str) -> Recorded {
        let mut matching = self.requests_to(path);
        assert_eq!(matching.len(), 1, "expected one request to {path}: {matching:?}");
        matching.remove(0)
    }

    pub fn refresh_count(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    fn authorized(&self, headers: &HeaderMap) -> bool {
        let expected = format!("Bearer {}", self.valid_token.lock().unwrap());
        headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == expected)
    }
}

pub struct MockServer {
    pub addr: SocketAddr,
    pub state: Arc<MockState>,
}

impl MockServer {
    pub async fn start() -> Self {
        let state = Arc::new(MockState::new());
        let app = router(Arc::clone(&state));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self { addr, state }
    }

    pub fn config(&self) -> ApiConfig {
        ApiConfig {
            base_url: format!("http://{}/api/v1", self.addr),
            ..ApiConfig::default()
        }
    }
}

pub struct Harness {
    pub server: MockServer,
    pub client: ApiClient,
    pub store: Arc<dyn CredentialStore>,
    pub notifier: Arc<MemoryNotifier>,
}

impl Harness {
    /// Mock server plus a client whose session holds `access_token`.
    pub async fn with_token(access_token: &str) -> Self {
        let server = MockServer::start().await;
        let store: Arc<dyn CredentialStore> = Arc::new(MemoryStore::default());
        let session = Arc::new(SessionStore::new(Arc::clone(&store)));
        session
            .establish(&TokenPair {
                access_token: access_token.into(),
                refresh_token: "refresh-1".into(),
                token_type: "bearer".into(),
            })
            .unwrap();
        let organizations = Arc::new(OrganizationContext::new(Arc::clone(&store)));
        let notifier = Arc::new(MemoryNotifier::default());
        let client =
            ApiClient::new(server.config(), session, organizations, notifier.clone()).unwrap();
        Self {
            server,
            client,
            store,
            notifier,
        }
    }

    pub fn state(&self) -> &MockState {
        &self.server.state
    }
}

fn router(state: Arc<MockState>) -> Router {
    let api = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/refresh", post(refresh))
        .route("/auth/me", get(me))
        .route("/organizations/", get(organizations))
        .route("/products", get(list_products).post(create_product))
        .route("/products/:id", get(get_product))
        .route("/dashboard/stats", get(always_unauthorized))
        .route("/dashboard/recent", get(rate_limited_with_header))
        .route("/dashboard/category-distribution", get(rate_limited_bare))
        .route("/webhooks/", get(server_error).post(create_webhook))
        .route("/webhooks/:id", patch(update_webhook).delete(no_content))
        .route("/webhooks/:id/test", post(test_webhook))
        .route("/webhooks/:id/deliveries", get(webhook_deliveries))
        .route("/exports/", post(structured_validation_error))
        .route("/exports/:id", get(get_export).delete(no_content))
        .route("/uploads/presigned-url", post(presigned_url))
        .route("/uploads/confirm", post(confirm_upload))
        .route("/uploads/direct", post(direct_upload))
        .route("/analysis/:image_id", get(get_analysis))
        .route("/analysis/:image_id/retry", post(retry_analysis))
        .route("/batch", post(create_batch))
        .route("/batch/:id", get(get_job))
        .route("/jobs", get(list_jobs))
        .route("/jobs/:id", get(get_job))
        .route(
            "/admin/ab-testing/experiments",
            get(list_experiments).post(create_experiment),
        )
        .route(
            "/admin/ab-testing/experiments/:id",
            patch(update_experiment).delete(no_content),
        )
        .route("/admin/ab-testing/experiments/:id/results", get(experiment_results))
        .route("/admin/rate-limits/", get(list_rate_limits).post(create_rate_limit))
        .route("/admin/rate-limits/:id", patch(update_rate_limit).delete(no_content))
        .route("/organizations/:org_id/members", get(list_members).post(invite_member))
        .route(
            "/organizations/:org_id/members/:member_id",
            patch(update_member_role).delete(no_content),
        );

    Router::new()
        .nest("/api/v1", api)
        .route("/storage/:key", put(presigned_put))
        .route("/ws/processing/:job_id", get(processing_socket))
        .layer(middleware::from_fn_with_state(Arc::clone(&state), record))
        .with_state(state)
}

async fn record(State(state): State<Arc<MockState>>, request: Request, next: Next) -> Response {
    let recorded = {
        let header = |name: &str| {
            request
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        Recorded {
            method: request.method().to_string(),
            path: request.uri().path().to_string(),
            query: request.uri().query().map(str::to_string),
            authorization: header("authorization"),
            organization: header("x-organization-id"),
            content_type: header("content-type"),
        }
    };
    state.requests.lock().unwrap().push(recorded);
    next.run(request).await
}

fn user_json() -> Value {
    json!({
        "id": "u-1",
        "email": "owner@example.com",
        "full_name": "Owner",
        "is_active": true,
        "created_at": TIMESTAMP
    })
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"detail": "Could not validate credentials"})),
    )
        .into_response()
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["email"] == "bad@example.com" {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"detail": "Invalid email"})),
        )
            .into_response();
    }
    Json(json!({
        "access_token": "access-1",
        "refresh_token": "refresh-1",
        "token_type": "bearer"
    }))
    .into_response()
}

async fn register(Json(body): Json<Value>) -> Response {
    let mut user = user_json();
    user["email"] = body["email"].clone();
    (StatusCode::CREATED, Json(user)).into_response()
}

async fn refresh(State(state): State<Arc<MockState>>) -> Response {
    let n = state.refresh_calls.fetch_add(1, Ordering::SeqCst) + 1;
    // Slow enough for concurrent 401s to queue behind the first refresh.
    tokio::time::sleep(Duration::from_millis(50)).await;
    if !state.refresh_succeeds.load(Ordering::SeqCst) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Invalid refresh token"})),
        )
            .into_response();
    }
    let token = format!("access-{}", n + 1);
    state.valid_token.lock().unwrap().clone_from(&token);
    Json(json!({
        "access_token": token,
        "refresh_token": format!("refresh-{}", n + 1),
        "token_type": "bearer"
    }))
    .into_response()
}

async fn me(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    if !state.authorized(&headers) {
        return unauthorized();
    }
    Json(user_json()).into_response()
}

async fn organizations(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    if !state.authorized(&headers) {
        return unauthorized();
    }
    let org = |id: &str, slug: &str| {
        json!({
            "id": id,
            "name": slug.to_uppercase(),
            "slug": slug,
            "is_active": true,
            "plan": "free",
            "settings": {},
            "created_at": TIMESTAMP,
            "updated_at": TIMESTAMP
        })
    };
    Json(json!([org("org-1", "acme"), org("org-2", "globex")])).into_response()
}

async fn no_content() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn list_products(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    if !state.authorized(&headers) {
        return unauthorized();
    }
    let items: Vec<Value> = state.products.lock().unwrap().values().cloned().collect();
    let total = items.len();
    Json(json!({
        "items": items,
        "total": total,
        "page": 1,
        "page_size": 20,
        "pages": u64::from(total > 0)
    }))
    .into_response()
}

async fn create_product(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !state.authorized(&headers) {
        return unauthorized();
    }
    let mut products = state.products.lock().unwrap();
    let id = format!("p-{}", products.len() + 1);
    let org = headers
        .get("x-organization-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("org-1")
        .to_string();
    let product = json!({
        "id": id,
        "user_id": "u-1",
        "organization_id": org,
        "title": body["title"],
        "description": body.get("description").cloned().unwrap_or(Value::Null),
        "category": body.get("category").cloned().unwrap_or(Value::Null),
        "subcategory": null,
        "ai_description": null,
        "status": "draft",
        "metadata_": {},
        "images": [],
        "created_at": TIMESTAMP,
        "updated_at": TIMESTAMP
    });
    products.insert(id, product.clone());
    (StatusCode::CREATED, Json(product)).into_response()
}

async fn get_product(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if !state.authorized(&headers) {
        return unauthorized();
    }
    match state.products.lock().unwrap().get(&id) {
        Some(product) => Json(product.clone()).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"detail": "Product not found"})),
        )
            .into_response(),
    }
}

async fn always_unauthorized() -> Response {
    unauthorized()
}

async fn rate_limited_with_header() -> Response {
    (
        StatusCode::TOO_MANY_REQUESTS,
        [("Retry-After", "30")],
        Json(json!({"detail": "Too many requests"})),
    )
        .into_response()
}

async fn rate_limited_bare() -> Response {
    (
        StatusCode::TOO_MANY_REQUESTS,
        Json(json!({"detail": "Too many requests"})),
    )
        .into_response()
}

async fn server_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response()
}

async fn structured_validation_error() -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({"detail": [{"loc": ["body", "export_type"], "msg": "field required"}]})),
    )
        .into_response()
}

// ---------------------------------------------------------------------------
// Uploads, analysis and jobs
// ---------------------------------------------------------------------------

async fn presigned_url(headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let host = headers
        .get("host")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("127.0.0.1")
        .to_string();
    Json(json!({
        "upload_url": format!("http://{host}/storage/img-1"),
        "image_id": "img-1",
        "s3_key": format!("uploads/{}/{}", body["product_id"].as_str().unwrap_or(""), body["filename"].as_str().unwrap_or("")),
        "expires_in": 900
    }))
    .into_response()
}

async fn presigned_put(body: axum::body::Bytes) -> StatusCode {
    if body.is_empty() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::OK
    }
}

async fn confirm_upload(Json(body): Json<Value>) -> Response {
    Json(json!({
        "image_id": body["image_id"],
        "job_id": "job-confirm",
        "status": "queued",
        "message": "Processing started"
    }))
    .into_response()
}

/// Echoes the uploaded part as `field:file_name:len` in `message`.
async fn direct_upload(mut multipart: Multipart) -> Response {
    let mut parts = Vec::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().unwrap_or_default().to_string();
        let len = field.bytes().await.map(|b| b.len()).unwrap_or_default();
        parts.push(format!("{name}:{file_name}:{len}"));
    }
    (
        StatusCode::CREATED,
        Json(json!({
            "image_id": "img-direct",
            "job_id": "job-direct",
            "status": "queued",
            "message": parts.join(",")
        })),
    )
        .into_response()
}

async fn get_analysis(Path(image_id): Path<String>) -> Response {
    Json(json!({
        "id": "an-1",
        "product_image_id": image_id,
        "model_version": "1.2.0",
        "classification_label": "footwear",
        "classification_confidence": 0.93,
        "classification_scores": {"footwear": 0.93, "apparel": 0.05},
        "description_text": "Brown leather ankle boot",
        "description_model": "captioner-v1",
        "processing_time_ms": 1840,
        "status": "completed",
        "error_message": null,
        "experiment_id": null,
        "variant_id": null,
        "extracted_attributes": [
            {"id": "at-1", "attribute_name": "color", "attribute_value": "brown", "confidence": 0.9}
        ],
        "detected_defects": [],
        "created_at": TIMESTAMP,
        "updated_at": TIMESTAMP
    }))
    .into_response()
}

async fn retry_analysis(Path(image_id): Path<String>) -> Response {
    Json(json!({"job_id": format!("job-retry-{image_id}")})).into_response()
}

pub fn job_json(id: &str, job_type: &str, total: usize) -> Value {
    json!({
        "id": id,
        "user_id": "u-1",
        "job_type": job_type,
        "status": "queued",
        "total_images": total,
        "processed_images": 0,
        "failed_images": 0,
        "celery_task_id": null,
        "started_at": null,
        "completed_at": null,
        "error_message": null,
        "steps": [],
        "created_at": TIMESTAMP,
        "updated_at": TIMESTAMP
    })
}

async fn create_batch(Json(body): Json<Value>) -> Response {
    let total = body["image_ids"].as_array().map_or(0, Vec::len);
    (StatusCode::CREATED, Json(job_json("job-batch", "batch", total))).into_response()
}

async fn get_job(Path(id): Path<String>) -> Response {
    Json(job_json(&id, "single", 1)).into_response()
}

async fn list_jobs() -> Response {
    Json(json!({
        "items": [job_json("job-1", "batch", 3), job_json("job-2", "single", 1)],
        "total": 2
    }))
    .into_response()
}

// ---------------------------------------------------------------------------
// Webhooks and exports
// ---------------------------------------------------------------------------

fn webhook_json(id: &str, url: &Value, events: &Value) -> Value {
    json!({
        "id": id,
        "organization_id": "org-1",
        "url": url,
        "secret": "whsec_test",
        "is_active": true,
        "events": events,
        "description": null,
        "failure_count": 0,
        "last_triggered_at": null,
        "created_at": TIMESTAMP,
        "updated_at": TIMESTAMP
    })
}

async fn create_webhook(Json(body): Json<Value>) -> Response {
    (
        StatusCode::CREATED,
        Json(webhook_json("wh-1", &body["url"], &body["events"])),
    )
        .into_response()
}

async fn update_webhook(Path(id): Path<String>, Json(body): Json<Value>) -> Response {
    let url = body
        .get("url")
        .cloned()
        .unwrap_or_else(|| json!("https://hooks.example.com/in"));
    let mut hook = webhook_json(&id, &url, &json!(["job.completed"]));
    if let Some(active) = body.get("is_active") {
        hook["is_active"] = active.clone();
    }
    Json(hook).into_response()
}

async fn test_webhook(Path(id): Path<String>) -> Response {
    Json(json!({"status": "queued", "webhook_id": id})).into_response()
}

async fn webhook_deliveries(Path(id): Path<String>) -> Response {
    Json(json!([{
        "id": "d-1",
        "webhook_id": id,
        "event_type": "job.completed",
        "payload": {"job_id": "job-1"},
        "response_status": 200,
        "success": true,
        "attempt": 1,
        "error_message": null,
        "created_at": TIMESTAMP
    }]))
    .into_response()
}

async fn get_export(Path(id): Path<String>) -> Response {
    Json(json!({
        "id": id,
        "export_type": "analysis_csv",
        "status": "completed",
        "file_size_bytes": 2048,
        "row_count": 12,
        "expires_at": null,
        "download_url": format!("https://files.example.com/{id}.csv"),
        "created_at": TIMESTAMP
    }))
    .into_response()
}

// ---------------------------------------------------------------------------
// Admin
// ---------------------------------------------------------------------------

fn experiment_json(id: &str, name: &Value, active: bool) -> Value {
    json!({
        "id": id,
        "name": name,
        "model_type": "classification",
        "is_active": active,
        "start_date": null,
        "end_date": null,
        "variants": [
            {"id": "v-1", "model_version": "1.0", "weight": 50, "is_control": true},
            {"id": "v-2", "model_version": "2.0", "weight": 50, "is_control": false}
        ],
        "created_at": TIMESTAMP,
        "updated_at": TIMESTAMP
    })
}

async fn list_experiments() -> Response {
    Json(json!([experiment_json("exp-1", &json!("classifier-v2"), true)])).into_response()
}

async fn create_experiment(Json(body): Json<Value>) -> Response {
    (
        StatusCode::CREATED,
        Json(experiment_json("exp-2", &body["name"], true)),
    )
        .into_response()
}

async fn update_experiment(Path(id): Path<String>, Json(body): Json<Value>) -> Response {
    let active = body["is_active"].as_bool().unwrap_or(true);
    Json(experiment_json(&id, &json!("classifier-v2"), active)).into_response()
}

async fn experiment_results() -> Response {
    Json(json!([
        {"variant_id": "v-1", "model_version": "1.0", "sample_count": 120, "avg_confidence": 0.81, "avg_processing_time_ms": 900.0},
        {"variant_id": "v-2", "model_version": "2.0", "sample_count": 118, "avg_confidence": 0.87, "avg_processing_time_ms": null}
    ]))
    .into_response()
}

fn rate_limit_json(id: &str, pattern: &Value, per_minute: &Value, per_hour: &Value) -> Value {
    json!({
        "id": id,
        "organization_id": "org-1",
        "endpoint_pattern": pattern,
        "requests_per_minute": per_minute,
        "requests_per_hour": per_hour,
        "is_active": true
    })
}

async fn list_rate_limits() -> Response {
    Json(json!([rate_limit_json("rl-1", &json!("*"), &json!(60), &json!(1000))])).into_response()
}

async fn create_rate_limit(Json(body): Json<Value>) -> Response {
    (
        StatusCode::CREATED,
        Json(rate_limit_json(
            "rl-2",
            &body["endpoint_pattern"],
            &body["requests_per_minute"],
            &body["requests_per_hour"],
        )),
    )
        .into_response()
}

async fn update_rate_limit(Path(id): Path<String>, Json(body): Json<Value>) -> Response {
    let per_minute = body.get("requests_per_minute").cloned().unwrap_or(json!(60));
    Json(rate_limit_json(&id, &json!("*"), &per_minute, &json!(1000))).into_response()
}

// ---------------------------------------------------------------------------
// Organization members
// ---------------------------------------------------------------------------

fn member_json(org_id: &str, id: &str, email: &Value, role: &Value) -> Value {
    json!({
        "id": id,
        "organization_id": org_id,
        "user_id": format!("u-{id}"),
        "role": role,
        "user_email": email,
        "user_name": null,
        "created_at": TIMESTAMP
    })
}

async fn list_members(Path(org_id): Path<String>) -> Response {
    Json(json!([member_json(
        &org_id,
        "m-1",
        &json!("owner@example.com"),
        &json!("owner")
    )]))
    .into_response()
}

async fn invite_member(Path(org_id): Path<String>, Json(body): Json<Value>) -> Response {
    let role = body.get("role").cloned().unwrap_or(json!("member"));
    (
        StatusCode::CREATED,
        Json(member_json(&org_id, "m-2", &body["email"], &role)),
    )
        .into_response()
}

async fn update_member_role(
    Path((org_id, member_id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Response {
    Json(member_json(&org_id, &member_id, &json!("ops@example.com"), &body["role"])).into_response()
}

// ---------------------------------------------------------------------------
// WebSocket
// ---------------------------------------------------------------------------

pub fn step_update(job_id: &str, step: &str, status: &str, completed: u32) -> String {
    json!({
        "type": "step_update",
        "job_id": job_id,
        "step": step,
        "status": status,
        "progress": {"completed": completed, "total": 7},
        "timestamp": "2025-01-01T00:00:00"
    })
    .to_string()
}

pub fn job_event(kind: &str, job_id: &str) -> String {
    json!({
        "type": kind,
        "job_id": job_id,
        "status": if kind == "job_complete" { "completed" } else { "failed" },
        "timestamp": "2025-01-01T00:00:05"
    })
    .to_string()
}

async fn processing_socket(
    State(state): State<Arc<MockState>>,
    Path(job_id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    ws: WebSocketUpgrade,
) -> Response {
    if let Some(token) = params.get("token") {
        state.ws_tokens.lock().unwrap().push(token.clone());
    }
    ws.on_upgrade(move |socket| script(socket, job_id, state))
}

/// Scripted server behaviour, chosen by job id.
async fn script(mut socket: WebSocket, job_id: String, state: Arc<MockState>) {
    match job_id.as_str() {
        // Sends as fast as the client accepts and reports the client's close.
        "job-flood" => {
            let (mut sink, mut incoming) = socket.split();
            let mut n = 0u32;
            loop {
                let frame = step_update("job-flood", "classify", "running", n % 7);
                tokio::select! {
                    message = incoming.next() => match message {
                        Some(Ok(Message::Close(_)) | Err(_)) | None => break,
                        Some(Ok(_)) => {}
                    },
                    sent = sink.send(Message::Text(frame)) => {
                        if sent.is_err() {
                            break;
                        }
                        n = n.wrapping_add(1);
                    }
                }
            }
            state.flood_closed.notify_one();
        }
        // Streams step updates until the client goes away.
        "job-a" => {
            for i in 0..400 {
                let frame = step_update("job-a", "classify", "running", i);
                if socket.send(Message::Text(frame)).await.is_err() {
                    return;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        }
        // Terminal event followed by a frame that must never be delivered.
        "job-b" => {
            let _ = socket
                .send(Message::Text(step_update("job-b", "classify", "completed", 1)))
                .await;
            let _ = socket.send(Message::Text(job_event("job_complete", "job-b"))).await;
            let _ = socket
                .send(Message::Text(step_update("job-b", "describe", "running", 2)))
                .await;
            tokio::time::sleep(Duration::from_millis(200)).await;
        }
        // Garbage interleaved with valid frames.
        "job-malformed" => {
            let _ = socket.send(Message::Text("not json".into())).await;
            let _ = socket
                .send(Message::Text(r#"{"type":"bogus","job_id":"x"}"#.into()))
                .await;
            let _ = socket
                .send(Message::Text(step_update("job-malformed", "preprocess", "completed", 1)))
                .await;
            let _ = socket.send(Message::Text(job_event("job_failed", "job-malformed"))).await;
            tokio::time::sleep(Duration::from_millis(200)).await;
        }
        // Server-side failure close.
        "job-crash" => {
            let _ = socket
                .send(Message::Text(step_update("job-crash", "preprocess", "running", 0)))
                .await;
            let _ = socket
                .send(Message::Close(Some(CloseFrame {
                    code: 1011,
                    reason: "worker crashed".into(),
                })))
                .await;
        }
        // Normal close before any terminal event.
        "job-quiet" => {
            let _ = socket
                .send(Message::Text(step_update("job-quiet", "preprocess", "running", 0)))
                .await;
            let _ = socket
                .send(Message::Close(Some(CloseFrame {
                    code: 1000,
                    reason: "bye".into(),
                })))
                .await;
        }
        _ => {}
    }
}
