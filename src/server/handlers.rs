//! HTTP handlers for the control-plane surface.
//!
//! Errors map to structured JSON responses with distinct status codes:
//! 401 for credential failures, 423 while the vault is locked, 400 for
//! malformed uploads, 409 for duplicate names. No error is downgraded.

use axum::extract::{Multipart, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::error::CofferError;
use crate::vault::{FileRecord, LockStatus};

use super::AppState;

/// Protocol error carried across the HTTP boundary.
#[derive(Debug)]
pub struct ApiError(pub CofferError);

impl From<CofferError> for ApiError {
    fn from(err: CofferError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            CofferError::Unauthorized => StatusCode::UNAUTHORIZED,
            CofferError::Locked => StatusCode::LOCKED,
            CofferError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            CofferError::DuplicateName { .. } => StatusCode::CONFLICT,
            CofferError::AccessDenied { .. } => StatusCode::FORBIDDEN,
            CofferError::NotProtected { .. }
            | CofferError::ProtectionBypassed { .. }
            | CofferError::MfaError { .. }
            | CofferError::ProvisioningError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

/// Extract the bearer credential from the `Authorization` header.
fn bearer_credential(headers: &HeaderMap) -> Result<String, ApiError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string)
        .ok_or(ApiError(CofferError::Unauthorized))
}

/// `GET /health` - liveness probe.
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// `GET /spec` - machine-readable interface description.
pub async fn interface_spec() -> Json<serde_json::Value> {
    Json(json!({
        "service": "coffer",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            { "method": "GET",  "path": "/health", "auth": "none" },
            { "method": "GET",  "path": "/spec",   "auth": "none" },
            { "method": "POST", "path": "/lock",   "auth": "bearer",
              "body": { "locked": "bool" } },
            { "method": "POST", "path": "/upload", "auth": "bearer",
              "body": "multipart file field",
              "failures": { "401": "unauthorized", "423": "locked",
                            "400": "invalid input", "409": "duplicate name" } },
            { "method": "GET",  "path": "/files",  "auth": "none" },
        ],
    }))
}

/// Body of `POST /lock`.
#[derive(Debug, Deserialize)]
pub struct SetLockRequest {
    /// Desired lock state.
    pub locked: bool,
}

/// `POST /lock` - transition the vault lock.
pub async fn set_lock(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<SetLockRequest>,
) -> Result<Json<LockStatus>, ApiError> {
    let credential = bearer_credential(&headers)?;
    let status = state.gateway().set_lock(&credential, request.locked)?;
    Ok(Json(status))
}

/// `POST /upload` - accept a multipart file upload.
///
/// Reads the first multipart field carrying a filename; the filename is the
/// catalog name for the record.
pub async fn upload(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<FileRecord>, ApiError> {
    let credential = bearer_credential(&headers)?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| CofferError::invalid_input(format!("malformed multipart body: {}", e)))?
    {
        let Some(name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let content = field
            .bytes()
            .await
            .map_err(|e| CofferError::invalid_input(format!("failed to read upload: {}", e)))?;

        let record = state.gateway().accept_upload(&credential, &name, &content)?;
        return Ok(Json(record));
    }

    Err(ApiError(CofferError::invalid_input(
        "multipart body carries no file field",
    )))
}

/// `GET /files` - accepted records in insertion order.
pub async fn list_files(State(state): State<AppState>) -> Json<Vec<FileRecord>> {
    Json(state.gateway().list_files())
}
