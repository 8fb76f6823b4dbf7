// src/api.rs
//
// Read-only HTTP surface over the results map. The map is filled once by
// the pipeline and never mutated afterwards, so handlers share it behind a
// plain Arc. Every absence — unknown tag or data that never arrived — maps
// to a 404 with an error body instead of a crash.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::record::{ProcessedRecord, ResultsMap};
use crate::types::FormatTag;
use crate::viz;

#[derive(Clone)]
pub struct AppState {
    results: Arc<ResultsMap>,
}

impl AppState {
    pub fn new(results: ResultsMap) -> Self {
        Self {
            results: Arc::new(results),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/data", get(all_data))
        .route("/data/{format}", get(data_by_format))
        .route("/charts/{format}", get(charts_by_format))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

fn not_found(message: impl Into<String>) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": message.into() })),
    )
        .into_response()
}

fn to_json(value: &impl serde::Serialize) -> serde_json::Value {
    serde_json::to_value(value).unwrap_or_else(|e| {
        tracing::error!(error = %e, "serializing response");
        serde_json::Value::Null
    })
}

/// All four processed records combined under their `{tag}_data` keys.
async fn all_data(State(state): State<AppState>) -> Response {
    let mut body = serde_json::Map::new();
    for tag in FormatTag::ALL {
        let Some(record) = state.results.get(tag) else {
            return not_found(format!("required {tag} data not available"));
        };
        // The json record already carries its own wrapper; unwrap it so the
        // combined payload keys stay flat.
        let value = match record {
            ProcessedRecord::Json(companies) => to_json(companies),
            other => to_json(other),
        };
        body.insert(format!("{tag}_data"), value);
    }
    Json(serde_json::Value::Object(body)).into_response()
}

async fn data_by_format(State(state): State<AppState>, Path(format): Path<String>) -> Response {
    let Ok(tag) = format.parse::<FormatTag>() else {
        return not_found("Invalid file type");
    };
    let Some(record) = state.results.get(tag) else {
        return not_found(format!("{tag} data not available"));
    };
    match record {
        // Already wrapped as {"json_data": [...]}.
        ProcessedRecord::Json(_) => Json(to_json(record)).into_response(),
        other => {
            let mut body = serde_json::Map::new();
            body.insert(format!("{tag}_data"), to_json(other));
            Json(serde_json::Value::Object(body)).into_response()
        }
    }
}

/// Chart data for one format, produced by the matching visualization
/// strategy.
async fn charts_by_format(State(state): State<AppState>, Path(format): Path<String>) -> Response {
    let Ok(tag) = format.parse::<FormatTag>() else {
        return not_found("Invalid file type");
    };
    let Some(record) = state.results.get(tag) else {
        return not_found(format!("{tag} data not available"));
    };
    match viz::create_visualization(tag, record).and_then(|v| v.charts()) {
        Ok(charts) => Json(to_json(&charts)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, %tag, "building chart data");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}
