//! Request header helpers for session and client identification

use axum::http::HeaderMap;

use crate::auth::session::{ClientContext, SessionData, SessionManager};

/// Name of the browser session cookie
pub const SESSION_COOKIE: &str = "legistrack_session";

/// Pull the session id out of the Cookie header, if present
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<String> {
    let cookie_str = headers.get("Cookie")?.to_str().ok()?;
    for cookie in cookie_str.split(';') {
        if let Some((name, value)) = cookie.trim().split_once('=') {
            if name == SESSION_COOKIE && !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    None
}

/// Look up the live session named by the request's cookie
pub async fn resolve_session(
    headers: &HeaderMap,
    sessions: &SessionManager,
) -> Option<SessionData> {
    let session_id = session_id_from_headers(headers)?;
    sessions.get_session(&session_id).await
}

/// Capture client IP and user agent for session and audit records.
/// The IP honors the first entry of x-forwarded-for when present.
pub fn client_context_from_headers(headers: &HeaderMap) -> ClientContext {
    let ip = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    let user_agent = headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string());

    ClientContext { ip, user_agent }
}
