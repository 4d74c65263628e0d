use std::net::SocketAddr;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{ConnectInfo, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::config::Config;
use crate::error::SubmitError;
use crate::state::SharedState;
use crate::submission::{metadata, parser, pipeline};

pub async fn submit(
    State(state): State<SharedState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let allow_origin = allowed_origin(&state.config, &headers);

    let mut response = match handle(state, addr, &headers, body).await {
        Ok(response) => response,
        Err(e) => e.into_response(),
    };

    if let Some(origin) = allow_origin {
        response
            .headers_mut()
            .insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    }

    response
}

async fn handle(
    state: SharedState,
    addr: SocketAddr,
    headers: &HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, SubmitError> {
    let body = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            SubmitError::PayloadTooLarge {
                limit: state.config.max_body_size,
            }
        } else {
            SubmitError::Input(rejection.body_text())
        }
    })?;

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());

    let is_multipart = content_type
        .is_some_and(|ct| ct.to_ascii_lowercase().contains("multipart/form-data"));

    let raw_data = if is_multipart {
        parser::parse_multipart(headers, body)
            .await
            .map_err(SubmitError::Input)?
    } else {
        parser::parse_body(content_type, &body).map_err(SubmitError::Input)?
    };

    let meta = metadata::extract(headers, addr.ip(), &state.config.trusted_proxies);

    // Once started, a submission runs to completion even if the client goes away.
    let result = tokio::spawn(async move { pipeline::run(&state, &meta, raw_data).await })
        .await
        .map_err(|e| SubmitError::Internal(format!("Submission task failed: {e}")))??;

    if !result.spam {
        tracing::debug!(submission_id = ?result.submission_id, "Submission accepted");
    }

    Ok((StatusCode::OK, Json(json!({ "success": true }))).into_response())
}

pub async fn preflight(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let mut response = (
        [
            (header::ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
            (header::ACCESS_CONTROL_MAX_AGE, "86400"),
        ],
        StatusCode::NO_CONTENT,
    )
        .into_response();

    if let Some(origin) = allowed_origin(&state.config, &headers) {
        response
            .headers_mut()
            .insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    }

    response
}

/// `*` when no origins are configured, otherwise the request origin if listed.
fn allowed_origin(config: &Config, headers: &HeaderMap) -> Option<HeaderValue> {
    if config.cors_origins.is_empty() {
        return Some(HeaderValue::from_static("*"));
    }

    let origin = headers.get(header::ORIGIN)?;
    let origin_str = origin.to_str().ok()?;

    config
        .cors_origins
        .iter()
        .any(|allowed| allowed == origin_str)
        .then(|| origin.clone())
}
