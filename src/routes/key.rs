//! Map credential endpoint.
//!
//! The key is read from the environment on every request so a redeploy with
//! new variables takes effect without a rebuild.

#[cfg(test)]
#[path = "key_test.rs"]
mod key_test;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::state::AppState;

/// Checked in order; the first non-empty value wins.
pub const KEY_VARS: [&str; 2] = ["NEXT_PUBLIC_MAPTILER_KEY", "MAPTILER_KEY"];

/// First configured map key, if any.
pub fn resolve_key<F>(lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    KEY_VARS
        .iter()
        .filter_map(|&var| lookup(var))
        .map(|v| v.trim().to_owned())
        .find(|v| !v.is_empty())
}

pub(crate) fn key_reply(key: Option<String>) -> (StatusCode, serde_json::Value) {
    match key {
        Some(key) => (StatusCode::OK, json!({ "key": key })),
        None => (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": "MAPTILER_KEY not set" })),
    }
}

/// `GET /api/key`
pub async fn get_key(State(state): State<AppState>) -> Response {
    let key = resolve_key(|var| (state.env)(var));
    if key.is_none() {
        tracing::warn!("map key requested but neither {} nor {} is set", KEY_VARS[0], KEY_VARS[1]);
    }
    let (status, body) = key_reply(key);
    (status, Json(body)).into_response()
}
