//! AJAX route handlers
//!
//! Both document info and notification mark-read require an authenticated
//! session and answer with the portal's JSON envelopes. Envelope keys are
//! part of the browser contract; the dashboard scripts read them verbatim.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::auth::middleware::resolve_session;
use crate::store::{Document, DocumentKind};

use super::server::SharedState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct DocumentInfoRequest {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Deserialize)]
pub struct MarkReadRequest {
    pub id: i64,
}

#[derive(Debug, Serialize)]
pub struct DocumentInfoResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<Document>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DocumentInfoResponse {
    pub fn ok(document: Document) -> Self {
        Self {
            success: true,
            document: Some(document),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            document: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MarkReadResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MarkReadResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
        }
    }
}

// Health check

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "success": true, "data": "healthy" }))
}

// Document info

pub async fn document_info(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(req): Json<DocumentInfoRequest>,
) -> impl IntoResponse {
    if resolve_session(&headers, &state.sessions).await.is_none() {
        return (
            StatusCode::UNAUTHORIZED,
            Json(DocumentInfoResponse::err("Unauthorized")),
        );
    }

    let Some(kind) = DocumentKind::parse(&req.kind) else {
        return (
            StatusCode::OK,
            Json(DocumentInfoResponse::err("Unknown document type")),
        );
    };

    match state.documents.find(req.id, kind).await {
        Ok(Some(document)) => (StatusCode::OK, Json(DocumentInfoResponse::ok(document))),
        Ok(None) => (
            StatusCode::OK,
            Json(DocumentInfoResponse::err("Document not found")),
        ),
        Err(e) => {
            tracing::error!("Document lookup failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(DocumentInfoResponse::err("System error, try again later.")),
            )
        }
    }
}

// Notification mark-read

pub async fn mark_notification_read(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(req): Json<MarkReadRequest>,
) -> impl IntoResponse {
    if resolve_session(&headers, &state.sessions).await.is_none() {
        return (
            StatusCode::UNAUTHORIZED,
            Json(MarkReadResponse::err("Unauthorized")),
        );
    }

    match state.notifications.mark_read(req.id).await {
        Ok(true) => (StatusCode::OK, Json(MarkReadResponse::ok())),
        Ok(false) => (
            StatusCode::OK,
            Json(MarkReadResponse::err("Notification not found")),
        ),
        Err(e) => {
            tracing::error!("Notification update failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MarkReadResponse::err("System error, try again later.")),
            )
        }
    }
}
