//! Credential verification and the login flow
//!
//! `authenticate` is the single entry point: it validates input locally,
//! looks the account up, verifies the password (bcrypt first, then the
//! transitional seed table), and on success commits the session plus its
//! audit records before the caller redirects.

use std::sync::Arc;

use chrono::Utc;
use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use crate::auth::models::{Destination, Role, User};
use crate::auth::session::{ClientContext, SessionData, SessionManager};
use crate::config::AuthConfig;
use crate::store::{AuditAction, AuditTrail, NewAuditEvent, SessionRecord, UserStore};

/// Login failure taxonomy. Display strings are for logs; the browser only
/// ever sees `user_message`.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Rejected before any store access
    #[error("malformed login input")]
    InvalidInput,

    /// No unique active account, or no credential path matched
    #[error("credential verification failed")]
    InvalidCredentials,

    /// A required store call failed
    #[error("backing store unavailable: {0}")]
    StoreUnavailable(#[from] crate::error::Error),
}

impl AuthError {
    /// The opaque string rendered back on the login form
    pub fn user_message(&self) -> &'static str {
        match self {
            AuthError::InvalidInput => {
                "Please enter a valid organizational email address and password."
            }
            AuthError::InvalidCredentials => {
                "Invalid credentials. Please verify your email and password."
            }
            AuthError::StoreUnavailable(_) => "System error, try again later.",
        }
    }
}

/// What a successful login hands back to the HTTP layer
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub session_id: String,
    pub role: Role,
    pub destination: Destination,
}

/// Validates credentials, establishes sessions, and writes the audit trail
#[derive(Clone)]
pub struct Authenticator {
    users: Arc<dyn UserStore>,
    audit: Arc<dyn AuditTrail>,
    sessions: SessionManager,
    settings: AuthConfig,
}

impl Authenticator {
    pub fn new(
        users: Arc<dyn UserStore>,
        audit: Arc<dyn AuditTrail>,
        sessions: SessionManager,
        settings: AuthConfig,
    ) -> Self {
        Self {
            users,
            audit,
            sessions,
            settings,
        }
    }

    /// Run the full login flow for one submitted credential pair.
    ///
    /// Failures before the lookup never touch a store. Lookup misses and
    /// password mismatches are indistinguishable to the caller and both leave
    /// a FAILED_LOGIN audit event. Only the success path mutates the user row
    /// or creates a session.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
        ctx: &ClientContext,
    ) -> std::result::Result<LoginOutcome, AuthError> {
        validate_input(&self.settings, email, password)?;

        let user = match self.users.find_active_by_email(email).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                // Zero and multiple matches collapse to the same outcome so
                // responses never reveal which addresses are provisioned
                self.record_failure(email, None, ctx).await?;
                return Err(AuthError::InvalidCredentials);
            }
            Err(e) => return Err(AuthError::StoreUnavailable(e)),
        };

        let role = if hash_matches(&user, password) {
            user.role
        } else if let Some(role) = legacy_role(&self.settings, email, password) {
            tracing::warn!("Legacy seed credentials accepted for {}", user.email);
            role
        } else {
            self.record_failure(email, Some(user.id), ctx).await?;
            return Err(AuthError::InvalidCredentials);
        };

        self.users.record_login(user.id, Utc::now()).await?;

        let session = self.sessions.create_session(&user, role, ctx).await;

        // Audit writes land before the redirect goes out; in strict mode a
        // failed write also rolls the login back
        if let Err(e) = self.write_login_audit(&user, role, &session, ctx).await {
            self.sessions.delete_session(&session.id).await;
            return Err(e);
        }

        tracing::info!("User {} authenticated as {}", user.email, role);

        Ok(LoginOutcome {
            session_id: session.id,
            role,
            destination: role.destination(),
        })
    }

    async fn record_failure(
        &self,
        email: &str,
        user_id: Option<i64>,
        ctx: &ClientContext,
    ) -> std::result::Result<(), AuthError> {
        tracing::warn!("Failed login attempt for {}", email);
        let event = NewAuditEvent {
            action: AuditAction::FailedLogin,
            user_id,
            detail: format!("Failed login attempt for {}", email),
            ip: ctx.ip.clone(),
            user_agent: ctx.user_agent.clone(),
        };
        self.commit_audit(self.audit.record_event(event).await, "failed-login event")
    }

    async fn write_login_audit(
        &self,
        user: &User,
        role: Role,
        session: &SessionData,
        ctx: &ClientContext,
    ) -> std::result::Result<(), AuthError> {
        let event = NewAuditEvent {
            action: AuditAction::Login,
            user_id: Some(user.id),
            detail: format!("{} logged in as {}", user.email, role),
            ip: ctx.ip.clone(),
            user_agent: ctx.user_agent.clone(),
        };
        self.commit_audit(self.audit.record_event(event).await, "login event")?;

        let record = SessionRecord {
            session_id: session.id.clone(),
            user_id: user.id,
            ip: ctx.ip.clone(),
            user_agent: ctx.user_agent.clone(),
            logged_in_at: session.logged_in_at,
        };
        self.commit_audit(
            self.audit.register_session(record).await,
            "session registration",
        )
    }

    /// Audit writes are best-effort unless `strict_audit` is set
    fn commit_audit(
        &self,
        result: crate::error::Result<()>,
        what: &str,
    ) -> std::result::Result<(), AuthError> {
        match result {
            Ok(()) => Ok(()),
            Err(e) if self.settings.strict_audit => {
                tracing::error!("Audit write failed ({}): {}", what, e);
                Err(AuthError::StoreUnavailable(e))
            }
            Err(e) => {
                tracing::warn!("Audit write failed ({}): {}", what, e);
                Ok(())
            }
        }
    }
}

/// Local input checks. Violations never reach the user store or audit log.
fn validate_input(
    settings: &AuthConfig,
    email: &str,
    password: &str,
) -> std::result::Result<(), AuthError> {
    if email.is_empty() || password.is_empty() {
        return Err(AuthError::InvalidInput);
    }
    if !is_valid_email(email) {
        return Err(AuthError::InvalidInput);
    }
    let suffix = format!("@{}", settings.email_domain);
    if !email.ends_with(&suffix) {
        return Err(AuthError::InvalidInput);
    }
    Ok(())
}

fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Bcrypt comparison against the stored credential. A malformed stored hash
/// is a non-match, not an error.
fn hash_matches(user: &User, password: &str) -> bool {
    bcrypt::verify(password, &user.password_hash).unwrap_or(false)
}

/// Transitional seed-account table. Each literal password is bound to one
/// local part (the councilor password to any local part containing
/// "councilor") and carries its own role. Kept only until the seed accounts
/// are re-provisioned with real hashes; disable via `auth.legacy_logins`.
fn legacy_role(settings: &AuthConfig, email: &str, password: &str) -> Option<Role> {
    if !settings.legacy_logins {
        return None;
    }
    let suffix = format!("@{}", settings.email_domain);
    let local_part = email.strip_suffix(suffix.as_str())?;
    match password {
        "superadmin123" if local_part == "superadmin" => Some(Role::SuperAdmin),
        "admin123" if local_part == "admin" => Some(Role::Admin),
        "councilor123" if local_part.contains("councilor") => Some(Role::Councilor),
        _ => None,
    }
}
