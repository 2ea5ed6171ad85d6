//! Per-request role authorization
//!
//! Every protected page calls `authorize` with its own destination before
//! rendering. The guard never re-authenticates; it only re-validates the
//! existing session's role against the page being loaded.

use crate::auth::models::{destination_for, Destination};
use crate::auth::session::SessionData;

/// Guard verdict for one protected-page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Redirect(Destination),
}

/// Check a session against the destination it is trying to load.
///
/// Absent or unauthenticated sessions always redirect to the login page.
/// Authenticated sessions are allowed only onto their role's own dashboard;
/// anything else redirects there.
pub fn authorize(session: Option<&SessionData>, requested: Destination) -> Access {
    let role = match session {
        Some(s) if s.authenticated => Some(s.role),
        _ => None,
    };

    let expected = destination_for(role);
    if expected == Destination::Login {
        return Access::Redirect(Destination::Login);
    }

    if requested == expected {
        Access::Allow
    } else {
        Access::Redirect(expected)
    }
}
