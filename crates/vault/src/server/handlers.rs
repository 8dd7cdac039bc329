//! Axum request handlers for all service endpoints.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::protocol::{
    ErrorResponse, FieldsRequest, HealthResponse, RecordResponse, SessionResponse,
};
use common::{Credential, Identity, ServiceError};
use tracing::debug;

use super::state::AppState;
use crate::config::ExecutionContext;
use crate::fields::{decrypt_fields, encrypt_fields};

/// The signed-in identity, or [`ServiceError::Unauthenticated`].
fn require_session(state: &AppState) -> Result<Identity, ServiceError> {
    state
        .session
        .current_identity()
        .ok_or(ServiceError::Unauthenticated)
}

/// Render a [`ServiceError`] as a JSON error response.
fn error_response(err: &ServiceError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorResponse::from(err))).into_response()
}

/// Unwrap a JSON body, turning axum's plain-text rejection into a
/// [`ServiceError::BadRequest`].
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ServiceError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ServiceError::BadRequest(rejection.body_text()))
}

/// `POST /records/encrypt` — encrypt the named fields of a record before it
/// is written to the document store.
///
/// Requires an authenticated session.
pub async fn encrypt_record(
    State(state): State<AppState>,
    payload: Result<Json<FieldsRequest>, JsonRejection>,
) -> Response {
    let identity = match require_session(&state) {
        Ok(identity) => identity,
        Err(e) => return error_response(&e),
    };
    let req = match json_body(payload) {
        Ok(req) => req,
        Err(e) => return error_response(&e),
    };
    debug!(uid = %identity.uid, fields = req.fields.len(), "encrypting record fields");
    let record = encrypt_fields(&state.cipher, &req.record, req.fields.as_slice());
    (StatusCode::OK, Json(RecordResponse { record })).into_response()
}

/// `POST /records/decrypt` — decrypt the named fields of a record read back
/// from the document store.
///
/// Requires an authenticated session.
pub async fn decrypt_record(
    State(state): State<AppState>,
    payload: Result<Json<FieldsRequest>, JsonRejection>,
) -> Response {
    let identity = match require_session(&state) {
        Ok(identity) => identity,
        Err(e) => return error_response(&e),
    };
    let req = match json_body(payload) {
        Ok(req) => req,
        Err(e) => return error_response(&e),
    };
    debug!(uid = %identity.uid, fields = req.fields.len(), "decrypting record fields");
    let record = decrypt_fields(&state.cipher, &req.record, req.fields.as_slice());
    (StatusCode::OK, Json(RecordResponse { record })).into_response()
}

/// `GET /session` — current session state.
pub async fn session(State(state): State<AppState>) -> Json<SessionResponse> {
    Json(SessionResponse::from(state.session.current()))
}

/// `POST /session/sign-in` — sign in with email and password.
///
/// Failures carry only the fixed category message, never provider text.
pub async fn sign_in(
    State(state): State<AppState>,
    payload: Result<Json<Credential>, JsonRejection>,
) -> Response {
    let credential = match json_body(payload) {
        Ok(credential) => credential,
        Err(e) => {
            debug!(code = e.code(), "sign-in request rejected");
            return error_response(&e);
        }
    };
    match state.session.sign_in(credential).await {
        Ok(_) => {
            let body = SessionResponse::from(state.session.current());
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => {
            debug!(code = e.code(), "sign-in request failed");
            error_response(&e)
        }
    }
}

/// `POST /session/sign-out` — end the current session.
///
/// Always answers with the resulting session; a provider failure leaves it
/// unchanged.
pub async fn sign_out(State(state): State<AppState>) -> Json<SessionResponse> {
    state.session.sign_out().await;
    Json(SessionResponse::from(state.session.current()))
}

/// `GET /health` — liveness and readiness check.
///
/// Returns `200 OK` when the field key did not come from the insecure default
/// and, in interactive mode, the session listener is registered. Returns
/// `503 Service Unavailable` otherwise.
pub async fn health(State(state): State<AppState>) -> Response {
    let key_source = state.cipher.key_source();
    let session_listener = state.session.listener_registered();
    let listener_ok =
        session_listener || state.execution_context == ExecutionContext::Headless;

    let (status_code, status_str) = if !key_source.is_insecure() && listener_ok {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    let body = HealthResponse {
        status: status_str.into(),
        key_source: key_source.as_str().into(),
        session_listener,
    };
    (status_code, Json(body)).into_response()
}

/// Catch-all 404 handler.
pub async fn not_found() -> impl IntoResponse {
    let err = ErrorResponse::new("not_found", "the requested resource does not exist");
    (StatusCode::NOT_FOUND, Json(err))
}
