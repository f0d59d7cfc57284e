//! Update endpoint: `POST /update/{type}/{name}/{value}`.
//!
//! Flow: method, then percent-decoding of the path, then path shape and
//! segment validation, then the store merge.
//! Any failure returns a plain-text message with the mapped status and leaves
//! the store untouched. Success is `200 OK` with an empty body.

use std::borrow::Cow;

use axum::{
    extract::State,
    http::{header, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};

use masgo_core::error::{ClientCode, MasgoError, Result};
use masgo_core::validate::{parse_update_path, validate_url, UPDATE_METHOD};
use masgo_core::{MetricKind, Repository};
use percent_encoding::percent_decode_str;

use crate::app_state::AppState;

/// Transport status for an error class.
pub fn status_for(code: ClientCode) -> StatusCode {
    match code {
        ClientCode::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        ClientCode::NotFound => StatusCode::NOT_FOUND,
        ClientCode::BadRequest => StatusCode::BAD_REQUEST,
        ClientCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Plain-text error response.
pub fn error_response(err: &MasgoError) -> Response {
    (
        status_for(err.client_code()),
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        err.to_string(),
    )
        .into_response()
}

/// Percent-decode a request path. Segments are split after decoding, so an
/// encoded `/` inside a name adds a segment.
pub fn decode_path(raw: &str) -> Result<Cow<'_, str>> {
    percent_decode_str(raw)
        .decode_utf8()
        .map_err(|_| MasgoError::NotFound)
}

/// Validate one update request and merge it into `store`.
pub fn apply_update(store: &dyn Repository, method: &str, raw_path: &str) -> Result<MetricKind> {
    if method != UPDATE_METHOD {
        return Err(MasgoError::MethodNotAllowed);
    }
    let path = decode_path(raw_path)?;
    validate_url(method, &path)?;
    let metric = parse_update_path(&path)?.to_metric()?;
    let kind = metric.kind();
    store.update(metric)?;
    Ok(kind)
}

/// `kind` label for a request: the parsed type segment, or `unknown`.
fn kind_label(raw_path: &str) -> &'static str {
    decode_path(raw_path)
        .ok()
        .and_then(|path| {
            parse_update_path(&path)
                .ok()
                .and_then(|p| p.kind.parse::<MetricKind>().ok())
        })
        .map_or("unknown", MetricKind::as_str)
}

pub async fn update(State(app): State<AppState>, method: Method, uri: Uri) -> Response {
    let path = uri.path();
    let store = app.store();

    match apply_update(store.as_ref(), method.as_str(), path) {
        Ok(kind) => {
            app.metrics().record_update(kind.as_str(), "ok");
            StatusCode::OK.into_response()
        }
        Err(e) => {
            let code = e.client_code();
            app.metrics().record_update(kind_label(path), code.as_str());
            if code == ClientCode::Internal {
                tracing::warn!(%method, %path, error = %e, "update failed");
            } else {
                tracing::debug!(%method, %path, error = %e, "update rejected");
            }
            error_response(&e)
        }
    }
}
