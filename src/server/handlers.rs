//! HTTP request handlers for the cookbook server.
//!
//! Errors are reported as `400 Bad Request` with the error's message as a
//! plain text body.

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::SharedState;
use crate::domain::{NewEntry, normalize};

/// Request body for name normalization.
#[derive(Debug, Default, Deserialize)]
pub struct ParseRequest {
    /// The raw name. Empty if missing.
    #[serde(default)]
    pub input: String,
}

/// Response body for a successful normalization.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParseResponse {
    /// The canonical name.
    pub msg: String,
}

/// Query string naming an entry.
#[derive(Debug, Default, Deserialize)]
pub struct NameQuery {
    /// The entry name. Empty if missing.
    #[serde(default)]
    pub name: String,
}

/// Normalize a raw entry name
///
/// POST /parse
pub async fn parse(Json(request): Json<ParseRequest>) -> Response {
    match normalize(&request.input) {
        Ok(msg) => (StatusCode::OK, Json(ParseResponse { msg })).into_response(),
        Err(error) => {
            debug!("{error}");
            (StatusCode::BAD_REQUEST, "Invalid recipe name").into_response()
        }
    }
}

/// Add an ingredient or a recipe
///
/// POST /entry
pub async fn create_entry(
    State(state): State<SharedState>,
    Json(entry): Json<NewEntry>,
) -> Response {
    let mut state = state.write().await;

    match state.cookbook.create(entry) {
        Ok(entry) => {
            info!(name = entry.name(), kind = %entry.kind(), "created entry");
            StatusCode::OK.into_response()
        }
        Err(error) => {
            debug!("rejected entry: {error}");
            (StatusCode::BAD_REQUEST, error.to_string()).into_response()
        }
    }
}

/// Fetch a stored entry in its creation payload shape
///
/// GET /entry?name=<name>
pub async fn get_entry(
    State(state): State<SharedState>,
    Query(query): Query<NameQuery>,
) -> Response {
    let state = state.read().await;

    state.cookbook.lookup(&query.name).map_or_else(
        || {
            (
                StatusCode::NOT_FOUND,
                format!("Cookbook has no entry with name {}", query.name),
            )
                .into_response()
        },
        |entry| (StatusCode::OK, Json(NewEntry::from(entry))).into_response(),
    )
}

/// Resolve a recipe into its cook time and base ingredients
///
/// GET /summary?name=<name>
pub async fn summary(State(state): State<SharedState>, Query(query): Query<NameQuery>) -> Response {
    let state = state.read().await;

    match state.cookbook.summarize(&query.name) {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(error) => {
            debug!("failed to summarize: {error}");
            (StatusCode::BAD_REQUEST, error.to_string()).into_response()
        }
    }
}

/// Liveness probe
///
/// GET /health
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
