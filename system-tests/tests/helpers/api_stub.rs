// system-tests/tests/helpers/api_stub.rs
// ============================================================================
// Module: Strategic Plan API Stub
// Description: In-memory stand-in for the remote strategic-plan application.
// Purpose: Drive every scenario hermetically, with switchable contract breaks.
// Dependencies: axum, serde, serde_json, tokio, url
// ============================================================================

//! ## Overview
//! The stub serves the auth endpoints and the strategic-plan resource from an
//! in-memory store. By default it honors the full contract; [`StubBehavior`]
//! switches individual points off so the suites can confirm each break is
//! reported as the right error kind.

use std::collections::HashMap;
use std::collections::HashSet;
use std::net::TcpListener as StdTcpListener;
use std::sync::Arc;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::body::Bytes;
use axum::extract::Path;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::HeaderValue;
use axum::http::StatusCode;
use axum::http::header;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::get;
use axum::routing::post;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use serde_json::json;
use tokio::runtime::Builder;
use tokio::sync::oneshot;
use tokio::time::sleep;

/// Admin email accepted by the stub.
pub const STUB_ADMIN_EMAIL: &str = "admin@plans.test";
/// Admin password accepted by the stub.
pub const STUB_ADMIN_PASSWORD: &str = "stub-admin-password";

const CSRF_COOKIE: &str = "next-auth.csrf-token";
const SESSION_COOKIE: &str = "next-auth.session-token";
const CACHE_CONTROL_VALUE: &str = "public, max-age=300, stale-while-revalidate=60";
const PRIORITIES: [&str; 4] = ["LOW", "MEDIUM", "HIGH", "CRITICAL"];
const STATUSES: [&str; 5] = ["DRAFT", "UNDER_REVIEW", "APPROVED", "PUBLISHED", "ARCHIVED"];
const OTHER_PLAN: &str = "some-other-plan";

// ============================================================================
// SECTION: Behavior
// ============================================================================

/// Public lookup by id or slug.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LookupBehavior {
    /// Return the matching plan; unknown keys answer 404.
    #[default]
    Exact,
    /// Answer a lookup by id with a different plan.
    WrongPlanById,
    /// Answer a lookup by slug with a different plan.
    WrongPlanBySlug,
    /// Answer unknown keys with 200 and a null payload.
    UnknownAnswersOk,
}

/// Handling of PATCH bodies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PatchBehavior {
    /// Store and return the updated plan.
    #[default]
    Apply,
    /// Answer 200 with the stored plan unchanged.
    Ignore,
    /// Answer 200 with the updated plan but keep the stored one.
    EchoWithoutSaving,
}

/// Handling of DELETE.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeleteBehavior {
    /// Remove the plan; unknown ids answer 404.
    #[default]
    Remove,
    /// First DELETE answers 200 but the plan stays readable everywhere;
    /// a second DELETE removes it.
    StillVisible,
    /// Like `StillVisible`, but the admin read already misses.
    StillPublic,
    /// Unknown ids answer 200 as well.
    RepeatSucceeds,
}

/// Switches that make the stub break individual contract points.
#[derive(Debug, Clone)]
pub struct StubBehavior {
    /// Omit `Cache-Control` on the public listing.
    pub omit_cache_control: bool,
    /// Include non-PUBLISHED plans in the public listing.
    pub leak_drafts: bool,
    /// Accept duplicate slugs on create and update.
    pub allow_duplicate_slugs: bool,
    /// Answer slug conflicts without saying "unique" or "duplicate".
    pub vague_conflict_errors: bool,
    /// Answer validation failures with an HTML page.
    pub html_errors: bool,
    /// Answer a successful login with a 302 instead of 200.
    pub login_redirects: bool,
    /// Return payloads without the `{ "data": ... }` envelope.
    pub bare_responses: bool,
    /// Create plans even when required members are missing.
    pub accept_incomplete_creates: bool,
    /// Accept any priority and status value.
    pub skip_enum_validation: bool,
    /// Answer a create with only the identifier and slug.
    pub sparse_create_responses: bool,
    /// Public lookup handling.
    pub lookup: LookupBehavior,
    /// PATCH handling.
    pub patch: PatchBehavior,
    /// DELETE handling.
    pub delete: DeleteBehavior,
    /// Member name carrying the plan identifier.
    pub id_field: String,
    /// Delay applied to every strategic-plan route.
    pub response_delay: Duration,
}

impl Default for StubBehavior {
    fn default() -> Self {
        Self {
            omit_cache_control: false,
            leak_drafts: false,
            allow_duplicate_slugs: false,
            vague_conflict_errors: false,
            html_errors: false,
            login_redirects: false,
            bare_responses: false,
            accept_incomplete_creates: false,
            skip_enum_validation: false,
            sparse_create_responses: false,
            lookup: LookupBehavior::default(),
            patch: PatchBehavior::default(),
            delete: DeleteBehavior::default(),
            id_field: "id".to_string(),
            response_delay: Duration::ZERO,
        }
    }
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// A plan held by the stub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StubPlan {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub content: String,
    pub priority: String,
    pub status: String,
    /// Deleted once but still served.
    #[serde(skip)]
    pub tombstoned: bool,
}

#[derive(Debug, Default)]
struct StubStore {
    plans: Vec<StubPlan>,
    next_id: u64,
    csrf_tokens: HashSet<String>,
    sessions: HashSet<String>,
}

impl StubStore {
    fn next_token(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{:04}", self.next_id)
    }

    fn slug_taken(&self, slug: &str, except_id: Option<&str>) -> bool {
        self.plans.iter().any(|plan| plan.slug == slug && Some(plan.id.as_str()) != except_id)
    }

    fn insert(&mut self, mut plan: StubPlan) -> StubPlan {
        plan.id = self.next_token("plan");
        self.plans.push(plan.clone());
        plan
    }
}

#[derive(Clone)]
struct StubState {
    behavior: Arc<StubBehavior>,
    store: Arc<Mutex<StubStore>>,
}

impl StubState {
    fn with_store<T>(&self, action: impl FnOnce(&mut StubStore) -> T) -> T {
        let mut guard = match self.store.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        action(&mut guard)
    }

    /// Applies the configured delay, then checks the session when `admin`.
    async fn enter(&self, headers: Option<&HeaderMap>) -> Result<(), Response> {
        if !self.behavior.response_delay.is_zero() {
            sleep(self.behavior.response_delay).await;
        }
        let Some(headers) = headers else {
            return Ok(());
        };
        let authorized = cookie_value(headers, SESSION_COOKIE)
            .is_some_and(|session| self.with_store(|store| store.sessions.contains(&session)));
        if authorized {
            Ok(())
        } else {
            Err((StatusCode::UNAUTHORIZED, Json(json!({ "error": "Unauthorized" }))).into_response())
        }
    }

    fn render(&self, plan: &StubPlan) -> Value {
        let mut value = serde_json::to_value(plan).unwrap_or(Value::Null);
        if self.behavior.id_field != "id"
            && let Some(object) = value.as_object_mut()
            && let Some(id) = object.remove("id")
        {
            object.insert(self.behavior.id_field.clone(), id);
        }
        value
    }

    fn payload(&self, status: StatusCode, value: Value) -> Response {
        let body = if self.behavior.bare_responses { value } else { json!({ "data": value }) };
        (status, Json(body)).into_response()
    }

    fn failure(&self, status: StatusCode, value: Value) -> Response {
        if self.behavior.html_errors {
            let page = format!("<!DOCTYPE html><html><body><h1>{status}</h1></body></html>");
            return (status, [(header::CONTENT_TYPE, "text/html; charset=utf-8")], page)
                .into_response();
        }
        (status, Json(value)).into_response()
    }

    fn conflict(&self, status: StatusCode) -> Response {
        let message = if self.behavior.vague_conflict_errors {
            "A strategic plan with this slug already exists"
        } else {
            "Slug must be unique: a strategic plan with this slug already exists"
        };
        self.failure(status, json!({ "error": message }))
    }

    fn not_found(&self) -> Response {
        self.failure(StatusCode::NOT_FOUND, json!({ "error": "Strategic plan not found" }))
    }

    /// Collects Zod-style issues for a create or update body.
    fn validate(&self, fields: &Map<String, Value>, partial: bool) -> Result<(), Response> {
        let mut issues = Vec::new();
        if !(self.behavior.accept_incomplete_creates && !partial) {
            for name in ["title", "slug", "content"] {
                if !partial || fields.contains_key(name) {
                    required_string(fields, name, &mut issues);
                }
            }
        }
        if !self.behavior.skip_enum_validation {
            optional_enum(fields, "priority", &PRIORITIES, &mut issues);
            optional_enum(fields, "status", &STATUSES, &mut issues);
        }
        if issues.is_empty() {
            return Ok(());
        }
        Err(self.failure(
            StatusCode::BAD_REQUEST,
            json!({ "success": false, "error": { "name": "ZodError", "issues": issues } }),
        ))
    }
}

// ============================================================================
// SECTION: Handle
// ============================================================================

/// Handle for the stub server; shuts it down on drop.
pub struct ApiStubHandle {
    base_url: String,
    store: Arc<Mutex<StubStore>>,
    shutdown: Option<oneshot::Sender<()>>,
    join: Option<thread::JoinHandle<()>>,
}

impl ApiStubHandle {
    /// Returns the stub origin.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the stored plans.
    pub fn plans(&self) -> Vec<StubPlan> {
        self.store.lock().map_or_else(|_| Vec::new(), |store| store.plans.clone())
    }

    /// Returns the number of stored plans.
    pub fn plan_count(&self) -> usize {
        self.plans().len()
    }

    /// Inserts a plan directly, bypassing auth and validation.
    pub fn seed(&self, slug: &str, status: &str) -> StubPlan {
        let plan = StubPlan {
            id: String::new(),
            slug: slug.to_string(),
            title: format!("Seeded {slug}"),
            content: "Seeded content.".to_string(),
            priority: "MEDIUM".to_string(),
            status: status.to_string(),
            tombstoned: false,
        };
        match self.store.lock() {
            Ok(mut store) => store.insert(plan),
            Err(poisoned) => poisoned.into_inner().insert(plan),
        }
    }
}

impl Drop for ApiStubHandle {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

/// Spawns the stub on its own thread and runtime.
pub fn spawn_api_stub(behavior: StubBehavior) -> Result<ApiStubHandle, String> {
    let listener = StdTcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("api stub bind failed: {err}"))?;
    listener
        .set_nonblocking(true)
        .map_err(|err| format!("api stub listener nonblocking failed: {err}"))?;
    let addr = listener.local_addr().map_err(|err| format!("api stub local addr failed: {err}"))?;

    let store = Arc::new(Mutex::new(StubStore::default()));
    let state = StubState {
        behavior: Arc::new(behavior),
        store: Arc::clone(&store),
    };
    let app = Router::new()
        .route("/api/auth/csrf", get(csrf))
        .route("/api/auth/callback/credentials", post(credentials_callback))
        .route("/api/strategic-plan/public", get(list_public))
        .route("/api/strategic-plan/public/{key}", get(get_public))
        .route("/api/strategic-plan", get(list_admin).post(create_plan))
        .route("/api/strategic-plan/{id}", get(get_admin).patch(update_plan).delete(delete_plan))
        .with_state(state);

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let join = thread::spawn(move || {
        let Ok(runtime) = Builder::new_current_thread().enable_all().build() else {
            return;
        };
        runtime.block_on(async move {
            let Ok(listener) = tokio::net::TcpListener::from_std(listener) else {
                return;
            };
            let server = axum::serve(listener, app).with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            });
            let _ = server.await;
        });
    });
    Ok(ApiStubHandle {
        base_url: format!("http://{addr}"),
        store,
        shutdown: Some(shutdown_tx),
        join: Some(join),
    })
}

// ============================================================================
// SECTION: Auth Routes
// ============================================================================

async fn csrf(State(state): State<StubState>) -> Response {
    let token = state.with_store(|store| {
        let token = store.next_token("csrf");
        store.csrf_tokens.insert(token.clone());
        token
    });
    let cookie = format!("{CSRF_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax");
    (StatusCode::OK, [(header::SET_COOKIE, cookie)], Json(json!({ "csrfToken": token })))
        .into_response()
}

async fn credentials_callback(
    State(state): State<StubState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let form: HashMap<String, String> = url::form_urlencoded::parse(&body).into_owned().collect();
    let field = |name: &str| form.get(name).map_or("", String::as_str);

    let submitted = field("csrfToken");
    let csrf_ok = cookie_value(&headers, CSRF_COOKIE).as_deref() == Some(submitted)
        && state.with_store(|store| store.csrf_tokens.contains(submitted));
    if !csrf_ok {
        return Json(json!({ "url": "/api/auth/signin?csrf=true" })).into_response();
    }
    if field("email") != STUB_ADMIN_EMAIL || field("password") != STUB_ADMIN_PASSWORD {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "url": "/api/auth/error?error=CredentialsSignin" })),
        )
            .into_response();
    }

    let session = state.with_store(|store| {
        let session = store.next_token("session");
        store.sessions.insert(session.clone());
        session
    });
    let cookie = format!("{SESSION_COOKIE}={session}; Path=/; HttpOnly; SameSite=Lax");
    if state.behavior.login_redirects {
        return (StatusCode::FOUND, [(header::SET_COOKIE, cookie), (header::LOCATION, "/".to_string())])
            .into_response();
    }
    (StatusCode::OK, [(header::SET_COOKIE, cookie)], Json(json!({ "url": "/" }))).into_response()
}

// ============================================================================
// SECTION: Public Routes
// ============================================================================

async fn list_public(State(state): State<StubState>) -> Response {
    if let Err(refused) = state.enter(None).await {
        return refused;
    }
    let leak = state.behavior.leak_drafts;
    let plans: Vec<Value> = state.with_store(|store| {
        store
            .plans
            .iter()
            .filter(|plan| leak || plan.status == "PUBLISHED")
            .map(|plan| state.render(plan))
            .collect()
    });
    let mut response = state.payload(StatusCode::OK, Value::Array(plans));
    if !state.behavior.omit_cache_control {
        response.headers_mut().insert(header::CACHE_CONTROL, HeaderValue::from_static(CACHE_CONTROL_VALUE));
    }
    response
}

async fn get_public(State(state): State<StubState>, Path(key): Path<String>) -> Response {
    if let Err(refused) = state.enter(None).await {
        return refused;
    }
    let found = state
        .with_store(|store| store.plans.iter().find(|plan| plan.id == key || plan.slug == key).cloned());
    let Some(mut plan) = found else {
        if state.behavior.lookup == LookupBehavior::UnknownAnswersOk {
            return state.payload(StatusCode::OK, Value::Null);
        }
        return state.not_found();
    };
    let substitute = match state.behavior.lookup {
        LookupBehavior::WrongPlanById => plan.id == key,
        LookupBehavior::WrongPlanBySlug => plan.slug == key,
        LookupBehavior::Exact | LookupBehavior::UnknownAnswersOk => false,
    };
    if substitute {
        plan.id = OTHER_PLAN.to_string();
        plan.slug = OTHER_PLAN.to_string();
    }
    state.payload(StatusCode::OK, state.render(&plan))
}

// ============================================================================
// SECTION: Admin Routes
// ============================================================================

async fn list_admin(State(state): State<StubState>, headers: HeaderMap) -> Response {
    if let Err(refused) = state.enter(Some(&headers)).await {
        return refused;
    }
    let plans: Vec<Value> =
        state.with_store(|store| store.plans.iter().map(|plan| state.render(plan)).collect());
    state.payload(StatusCode::OK, Value::Array(plans))
}

async fn get_admin(
    State(state): State<StubState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if let Err(refused) = state.enter(Some(&headers)).await {
        return refused;
    }
    let hide_tombstones = state.behavior.delete == DeleteBehavior::StillPublic;
    let found = state.with_store(|store| {
        store.plans.iter().find(|plan| plan.id == id && !(hide_tombstones && plan.tombstoned)).cloned()
    });
    match found {
        Some(plan) => state.payload(StatusCode::OK, state.render(&plan)),
        None => state.not_found(),
    }
}

async fn create_plan(State(state): State<StubState>, headers: HeaderMap, body: Bytes) -> Response {
    if let Err(refused) = state.enter(Some(&headers)).await {
        return refused;
    }
    let Some(fields) = parse_object(&body) else {
        return state.failure(StatusCode::BAD_REQUEST, json!({ "error": "Invalid JSON body" }));
    };
    if let Err(rejected) = state.validate(&fields, false) {
        return rejected;
    }

    let text = |name: &str, fallback: &str| {
        fields.get(name).and_then(Value::as_str).unwrap_or(fallback).to_string()
    };
    let plan = StubPlan {
        id: String::new(),
        slug: text("slug", ""),
        title: text("title", ""),
        content: text("content", ""),
        priority: text("priority", "MEDIUM"),
        status: text("status", "DRAFT"),
        tombstoned: false,
    };
    let allow_duplicates = state.behavior.allow_duplicate_slugs;
    let created = state.with_store(|store| {
        (allow_duplicates || !store.slug_taken(&plan.slug, None)).then(|| store.insert(plan))
    });
    let Some(plan) = created else {
        return state.conflict(StatusCode::BAD_REQUEST);
    };
    let mut rendered = state.render(&plan);
    if state.behavior.sparse_create_responses
        && let Some(object) = rendered.as_object_mut()
    {
        object.retain(|name, _| *name == state.behavior.id_field || name == "slug");
    }
    state.payload(StatusCode::CREATED, rendered)
}

async fn update_plan(
    State(state): State<StubState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    body: Bytes,
) -> Response {
    if let Err(refused) = state.enter(Some(&headers)).await {
        return refused;
    }
    let Some(fields) = parse_object(&body) else {
        return state.failure(StatusCode::BAD_REQUEST, json!({ "error": "Invalid JSON body" }));
    };
    if let Err(rejected) = state.validate(&fields, true) {
        return rejected;
    }

    let allow_duplicates = state.behavior.allow_duplicate_slugs;
    let mode = state.behavior.patch;
    let outcome = state.with_store(|store| {
        if let Some(slug) = fields.get("slug").and_then(Value::as_str)
            && !allow_duplicates
            && store.slug_taken(slug, Some(id.as_str()))
        {
            return Err(UpdateRefusal::SlugTaken);
        }
        let stored =
            store.plans.iter_mut().find(|plan| plan.id == id).ok_or(UpdateRefusal::Missing)?;
        let mut updated = stored.clone();
        for (target, name) in [
            (&mut updated.title, "title"),
            (&mut updated.slug, "slug"),
            (&mut updated.content, "content"),
            (&mut updated.priority, "priority"),
            (&mut updated.status, "status"),
        ] {
            if let Some(value) = fields.get(name).and_then(Value::as_str) {
                *target = value.to_string();
            }
        }
        Ok(match mode {
            PatchBehavior::Apply => {
                *stored = updated.clone();
                updated
            }
            PatchBehavior::Ignore => stored.clone(),
            PatchBehavior::EchoWithoutSaving => updated,
        })
    });
    match outcome {
        Ok(plan) => state.payload(StatusCode::OK, state.render(&plan)),
        Err(UpdateRefusal::SlugTaken) => state.conflict(StatusCode::CONFLICT),
        Err(UpdateRefusal::Missing) => state.not_found(),
    }
}

enum UpdateRefusal {
    SlugTaken,
    Missing,
}

async fn delete_plan(
    State(state): State<StubState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if let Err(refused) = state.enter(Some(&headers)).await {
        return refused;
    }
    let mode = state.behavior.delete;
    let keep_tombstone = matches!(mode, DeleteBehavior::StillVisible | DeleteBehavior::StillPublic);
    let removed = state.with_store(|store| {
        let Some(index) = store.plans.iter().position(|plan| plan.id == id) else {
            return false;
        };
        if keep_tombstone && !store.plans[index].tombstoned {
            store.plans[index].tombstoned = true;
        } else {
            store.plans.remove(index);
        }
        true
    });
    if removed || mode == DeleteBehavior::RepeatSucceeds {
        return state.payload(StatusCode::OK, json!({ "id": id, "message": "Strategic plan deleted" }));
    }
    state.not_found()
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}

fn parse_object(body: &[u8]) -> Option<Map<String, Value>> {
    match serde_json::from_slice(body) {
        Ok(Value::Object(fields)) => Some(fields),
        _ => None,
    }
}

fn required_string(fields: &Map<String, Value>, name: &str, issues: &mut Vec<Value>) {
    let valid = fields.get(name).and_then(Value::as_str).is_some_and(|value| !value.trim().is_empty());
    if !valid {
        issues.push(json!({ "code": "invalid_type", "path": [name], "message": "Required" }));
    }
}

fn optional_enum(fields: &Map<String, Value>, name: &str, allowed: &[&str], issues: &mut Vec<Value>) {
    let Some(value) = fields.get(name) else {
        return;
    };
    if value.as_str().is_some_and(|raw| allowed.contains(&raw)) {
        return;
    }
    let expected = allowed.iter().map(|raw| format!("'{raw}'")).collect::<Vec<_>>().join(" | ");
    issues.push(json!({
        "code": "invalid_enum_value",
        "path": [name],
        "message": format!("Invalid enum value. Expected {expected}, received {value}"),
    }));
}
