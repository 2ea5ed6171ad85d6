//! Authentication, sessions, and role authorization

pub mod authenticator;
pub mod guard;
pub mod middleware;
pub mod models;
pub mod session;

pub use authenticator::{AuthError, Authenticator, LoginOutcome};
pub use guard::{authorize, Access};
pub use middleware::{client_context_from_headers, resolve_session, SESSION_COOKIE};
pub use models::{destination_for, visible_modules, Destination, NavModule, Role, User};
pub use session::{ClientContext, SessionData, SessionManager};
