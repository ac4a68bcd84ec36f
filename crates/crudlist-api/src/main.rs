//! crudlist-api: REST API server for crudlist
//!
//! Serves one in-memory store over HTTP. Mutations on an unknown ID keep
//! the store's no-op semantics and answer with `changed: false`.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use crudlist_core::{Collection, Config, Record, Store, parse_id, seed, validate_record_input};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

/// Shared application state
struct AppState {
    store: RwLock<Store>,
}

impl AppState {
    fn new(store: Store) -> Self {
        Self {
            store: RwLock::new(store),
        }
    }

    // Poisoning is ignored: writers only ever swap in complete snapshots.
    fn read(&self) -> RwLockReadGuard<'_, Store> {
        self.store.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Store> {
        self.store.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Request to create a record
#[derive(Debug, Deserialize)]
struct CreateRecordRequest {
    #[serde(alias = "todo")]
    title: String,
    #[serde(alias = "desc")]
    detail: String,
}

/// Request to replace every mutable field of a record
#[derive(Debug, Deserialize)]
struct UpdateRecordRequest {
    #[serde(alias = "todo")]
    title: String,
    #[serde(alias = "desc")]
    detail: String,
    #[serde(alias = "done")]
    flag: bool,
}

/// Query parameters for listing records
#[derive(Debug, Deserialize)]
struct ListQuery {
    #[serde(default)]
    flag: Option<bool>,
}

/// Result of delete, toggle and update
#[derive(Debug, Serialize)]
struct Mutation {
    changed: bool,
    records: Collection,
}

/// API response wrapper
#[derive(Debug, Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

type Reply<T> = (StatusCode, Json<ApiResponse<T>>);

fn fail<T>(status: StatusCode, message: impl Into<String>) -> Reply<T> {
    (status, Json(ApiResponse::err(message)))
}

fn mutation(changed: bool, records: Collection) -> Reply<Mutation> {
    (StatusCode::OK, Json(ApiResponse::ok(Mutation { changed, records })))
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// List records in display order
async fn list_records(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    let records: Vec<Record> = state
        .read()
        .records()
        .iter()
        .filter(|r| query.flag.is_none_or(|f| r.flag == f))
        .cloned()
        .collect();

    (StatusCode::OK, Json(ApiResponse::ok(records)))
}

/// Records as an object keyed by ID
async fn keyed_records(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.read().snapshot();
    (StatusCode::OK, Json(ApiResponse::ok(seed::to_keyed(&snapshot))))
}

/// Get a single record by ID
async fn get_record(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> impl IntoResponse {
    let id = match parse_id(&raw_id) {
        Ok(id) => id,
        Err(e) => return fail::<Record>(StatusCode::BAD_REQUEST, e.to_string()),
    };

    match state.read().require(id) {
        Ok(record) => (StatusCode::OK, Json(ApiResponse::ok(record.clone()))),
        Err(e) => fail(StatusCode::NOT_FOUND, e.to_string()),
    }
}

/// Create a new record
async fn create_record(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateRecordRequest>,
) -> impl IntoResponse {
    if let Err(e) = validate_record_input(&req.title, &req.detail) {
        return fail::<Record>(StatusCode::BAD_REQUEST, e.to_string());
    }

    let created = state.write().create(&req.title, &req.detail);
    match created {
        Ok(record) => {
            tracing::info!(id = record.id, "record created");
            (StatusCode::CREATED, Json(ApiResponse::ok(record)))
        }
        Err(e) => fail(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

/// Replace title, detail and flag of a record
async fn update_record(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
    Json(req): Json<UpdateRecordRequest>,
) -> impl IntoResponse {
    let id = match parse_id(&raw_id) {
        Ok(id) => id,
        Err(e) => return fail::<Mutation>(StatusCode::BAD_REQUEST, e.to_string()),
    };
    if let Err(e) = validate_record_input(&req.title, &req.detail) {
        return fail(StatusCode::BAD_REQUEST, e.to_string());
    }

    let mut store = state.write();
    let change = store.update(id, &req.title, &req.detail, req.flag);
    mutation(change.is_applied(), store.snapshot())
}

/// Flip the flag of a record
async fn toggle_record(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> impl IntoResponse {
    let id = match parse_id(&raw_id) {
        Ok(id) => id,
        Err(e) => return fail::<Mutation>(StatusCode::BAD_REQUEST, e.to_string()),
    };

    let mut store = state.write();
    let change = store.toggle_flag(id);
    mutation(change.is_applied(), store.snapshot())
}

/// Delete a record
async fn delete_record(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> impl IntoResponse {
    let id = match parse_id(&raw_id) {
        Ok(id) => id,
        Err(e) => return fail::<Mutation>(StatusCode::BAD_REQUEST, e.to_string()),
    };

    let mut store = state.write();
    let change = store.delete(id);
    if change.is_applied() {
        tracing::info!(id, "record deleted");
    }
    mutation(change.is_applied(), store.snapshot())
}

fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/records", get(list_records).post(create_record))
        .route("/records/keyed", get(keyed_records))
        .route(
            "/records/{id}",
            get(get_record).put(update_record).delete(delete_record),
        )
        .route("/records/{id}/toggle", post(toggle_record))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)),
        )
        .with_state(state)
}

fn init_tracing(default_level: &str) {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| default_level.to_string());
    let filter = EnvFilter::try_new(&filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (config_path, config) = Config::discover(None)?;
    init_tracing(&config.api.log_level);

    let records = config
        .initial_records()
        .map_err(|e| anyhow::anyhow!("Failed to load seed records: {}", e))?;
    tracing::info!(config = %config_path.display(), records = records.len(), "store seeded");

    let state = Arc::new(AppState::new(Store::with_collection(records)));

    let host: std::net::IpAddr = config
        .api
        .host
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid api.host {:?}: {}", config.api.host, e))?;
    let addr = std::net::SocketAddr::new(host, config.api_port());
    tracing::info!("Starting crudlist-api on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}
