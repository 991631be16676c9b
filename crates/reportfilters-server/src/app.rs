use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use indexmap::IndexMap;
use reportfilters_core::{Clock, FilterValue, ReportFilterSet, SchemaError, SharedRegistry};
use serde::Serialize;
use serde_json::Value;

#[derive(Clone)]
pub struct AppState {
    pub registry: SharedRegistry,
    pub clock: Arc<dyn Clock>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

struct ApiError(SchemaError);

impl From<SchemaError> for ApiError {
    fn from(err: SchemaError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            SchemaError::ReportNotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::UNPROCESSABLE_ENTITY,
        };
        let body = Json(ErrorResponse { error: self.0.to_string() });
        (status, body).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/reports", get(list_reports))
        .route("/reports/:name/filters", get(filters))
        .route("/reports/:name/defaults", get(defaults))
        .route("/reports/:name/prepare", post(prepare))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn list_reports(State(state): State<AppState>) -> Json<Vec<String>> {
    let registry = state.registry.snapshot();
    Json(registry.report_names().map(str::to_string).collect())
}

async fn filters(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ReportFilterSet>, ApiError> {
    let registry = state.registry.snapshot();
    Ok(Json(registry.lookup(&name)?.clone()))
}

async fn defaults(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<IndexMap<String, FilterValue>>, ApiError> {
    let registry = state.registry.snapshot();
    Ok(Json(registry.resolve_defaults(&name, state.clock.as_ref())?))
}

async fn prepare(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(supplied): Json<IndexMap<String, Value>>,
) -> Result<Json<IndexMap<String, FilterValue>>, ApiError> {
    let registry = state.registry.snapshot();
    let prepared = registry.prepare_filters(&name, &supplied, state.clock.as_ref())?;
    tracing::debug!(report = %name, filters = prepared.len(), "prepared report filters");
    Ok(Json(prepared))
}
