// 🌐 API Gateway - password-gated CRUD over the instance table
//
// Handlers are stateless. Each one borrows a pooled connection for the
// duration of its query and runs the blocking SQLite work off the async
// workers.

use crate::db;
use crate::instance::{InstanceSummary, INSTANCE_TYPE};
use axum::{
    extract::{rejection::JsonRejection, Path, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::Path as FsPath;
use std::sync::Arc;
use thiserror::Error;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

pub type DbPool = r2d2::Pool<SqliteConnectionManager>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub password: Arc<str>,
}

impl AppState {
    pub fn new(pool: DbPool, password: impl Into<Arc<str>>) -> Self {
        Self {
            pool,
            password: password.into(),
        }
    }
}

/// Pool over a SQLite file; every new connection gets the schema.
pub fn build_pool(path: &FsPath, size: u32) -> anyhow::Result<DbPool> {
    let manager = SqliteConnectionManager::file(path).with_init(|conn| {
        db::setup_database(conn).map_err(|err| {
            rusqlite::Error::ToSqlConversionFailure(err.into())
        })
    });
    let pool = r2d2::Pool::builder().max_size(size).build(manager)?;
    info!(path = %path.display(), size, "connection pool ready");
    Ok(pool)
}

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: Invalid password")]
    Unauthorized,
    #[error("Instance {0} not found")]
    NotFound(i64),
    #[error("Invalid instance id: {0}")]
    InvalidId(String),
    #[error("{0}")]
    BadBody(String),
    #[error("{0}")]
    Upstream(String),
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Upstream(format!("{:#}", err))
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidId(_) | ApiError::BadBody(_) | ApiError::Upstream(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("request failed: {}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

// ============================================================================
// AUTH
// ============================================================================

#[derive(Debug, Deserialize)]
struct AuthQuery {
    password: Option<String>,
}

/// Every /api route except health needs `?password=` equal to the secret
async fn require_password(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let provided = Query::<AuthQuery>::try_from_uri(request.uri())
        .ok()
        .and_then(|Query(query)| query.password);

    if provided.as_deref() == Some(&*state.password) {
        next.run(request).await
    } else {
        ApiError::Unauthorized.into_response()
    }
}

// ============================================================================
// HANDLERS
// ============================================================================

/// Borrow a pooled connection on the blocking pool
async fn with_connection<T, F>(pool: &DbPool, work: F) -> Result<T, ApiError>
where
    F: FnOnce(&Connection) -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || -> anyhow::Result<T> {
        let conn = pool.get()?;
        work(&*conn)
    })
    .await
    .map_err(|err| ApiError::Upstream(err.to_string()))?
    .map_err(ApiError::from)
}

fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>()
        .map_err(|_| ApiError::InvalidId(raw.to_string()))
}

/// GET /api/health
async fn health_check() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// GET /api/instances
async fn list_instances(
    State(state): State<AppState>,
) -> Result<Json<Vec<InstanceSummary>>, ApiError> {
    let instances =
        with_connection(&state.pool, |conn| db::list_instances(conn, INSTANCE_TYPE)).await?;
    Ok(Json(instances))
}

/// GET /api/instance/:id
async fn get_instance(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&raw_id)?;
    let instance = with_connection(&state.pool, move |conn| db::get_instance(conn, id)).await?;

    instance
        .map(|instance| Json(instance.data))
        .ok_or(ApiError::NotFound(id))
}

/// PUT /api/instance/:id
async fn update_instance(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&raw_id)?;
    let Json(data) = body.map_err(|rejection| ApiError::BadBody(rejection.body_text()))?;
    if !data.is_object() {
        return Err(ApiError::BadBody(
            "Instance data must be a JSON object".to_string(),
        ));
    }

    let updated =
        with_connection(&state.pool, move |conn| db::update_instance_data(conn, id, &data))
            .await?;

    if updated {
        info!(instance = id, "instance data replaced");
        Ok(StatusCode::OK)
    } else {
        Err(ApiError::NotFound(id))
    }
}

// ============================================================================
// ROUTER
// ============================================================================

/// Unmatched paths under /api, reached only after the password check
async fn unknown_route() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
}

pub fn router(state: AppState) -> Router {
    // `layer` also wraps the fallback, so unknown paths are password-gated too
    let protected = Router::new()
        .route("/instances", get(list_instances))
        .route("/instance/:id", get(get_instance).put(update_instance))
        .fallback(unknown_route)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_password,
        ));

    let api_routes = Router::new()
        .route("/health", get(health_check))
        .merge(protected)
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
