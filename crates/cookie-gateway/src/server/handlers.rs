//! Axum request handlers for all service endpoints.

use axum::{
    extract::{Path, State},
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use common::protocol::{ErrorResponse, FetchResponse, HealthResponse, StoreRequest, StoreResponse};
use common::ServiceError;
use envelope::{FetchError, StoreError};
use tracing::warn;

use super::jar::{is_valid_cookie_name, HeaderJar};
use super::state::AppState;

/// `PUT /cookies/:name` — seal the request value into a cookie.
///
/// The sealed cookie is returned as a `Set-Cookie` header; the body reports
/// whether the cookie could be written.
pub async fn store_cookie(
    State(state): State<AppState>,
    Path(name): Path<String>,
    headers: HeaderMap,
    Json(req): Json<StoreRequest>,
) -> Response {
    if !is_valid_cookie_name(&name) {
        return error_response(ServiceError::BadRequest(format!(
            "invalid cookie name: {name:?}"
        )));
    }

    let mut jar = HeaderJar::from_headers(&headers);
    let options = state.options_for(chrono::Utc::now().timestamp(), req.expires_in_secs);

    let stored = match state.codec.store(&mut jar, &name, &req.value, &options) {
        Ok(stored) => stored,
        Err(StoreError::Serialization(e)) => {
            warn!(cookie = %name, error = %e, "value could not be serialised");
            return error_response(ServiceError::Internal("value could not be serialised".into()));
        }
        Err(StoreError::CannotPerformOperation) => {
            return error_response(ServiceError::EncryptionFailure("encryption failed".into()));
        }
    };

    let mut resp = (StatusCode::OK, Json(StoreResponse { stored })).into_response();
    for value in jar.into_set_cookie_headers() {
        resp.headers_mut().append(SET_COOKIE, value);
    }
    resp
}

/// `GET /cookies/:name` — recover the value sealed in the request cookie.
///
/// Missing, tampered, and foreign cookies all return `404`.
pub async fn fetch_cookie(
    State(state): State<AppState>,
    Path(name): Path<String>,
    headers: HeaderMap,
) -> Response {
    let jar = HeaderJar::from_headers(&headers);
    match state.codec.fetch::<serde_json::Value, _>(&jar, &name) {
        Ok(Some(value)) => (StatusCode::OK, Json(FetchResponse { value })).into_response(),
        Ok(None) => error_response(ServiceError::NotFound(format!("no readable cookie {name:?}"))),
        Err(e @ FetchError::InvalidType { .. }) => {
            warn!(error = %e, "cookie has an unexpected shape");
            error_response(ServiceError::BadRequest(e.to_string()))
        }
    }
}

/// `GET /health` — liveness check.
pub async fn health() -> Response {
    let body = HealthResponse {
        status: "ok".into(),
    };
    (StatusCode::OK, Json(body)).into_response()
}

/// Catch-all 404 handler.
pub async fn not_found() -> impl IntoResponse {
    let err = ErrorResponse::new("not_found", "the requested resource does not exist");
    (StatusCode::NOT_FOUND, Json(err))
}

fn error_response(err: ServiceError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = ErrorResponse::new(err.code(), err.to_string());
    (status, Json(body)).into_response()
}
