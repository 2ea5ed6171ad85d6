//! Storage traits and the Postgres-backed implementation

mod postgres;

pub use postgres::PgStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::auth::models::User;
use crate::error::Result;

/// Audit log action kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    Login,
    FailedLogin,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Login => "LOGIN",
            AuditAction::FailedLogin => "FAILED_LOGIN",
        }
    }
}

/// An audit event to append. Timestamp is assigned by the store on write.
#[derive(Debug, Clone)]
pub struct NewAuditEvent {
    pub action: AuditAction,
    pub user_id: Option<i64>,
    pub detail: String,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

/// Durable session-registration row, written once per successful login
#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub session_id: String,
    pub user_id: i64,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub logged_in_at: chrono::DateTime<chrono::Utc>,
}

/// Document kinds tracked by the portal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Ordinance,
    Resolution,
}

impl DocumentKind {
    pub fn parse(s: &str) -> Option<DocumentKind> {
        match s {
            "ordinance" => Some(DocumentKind::Ordinance),
            "resolution" => Some(DocumentKind::Resolution),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Ordinance => "ordinance",
            DocumentKind::Resolution => "resolution",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DocumentKind::Ordinance => "Ordinance",
            DocumentKind::Resolution => "Resolution",
        }
    }
}

/// An ordinance or resolution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: i64,
    pub kind: DocumentKind,
    /// Official measure number, e.g. "2024-017"
    pub number: String,
    pub title: String,
    pub sponsor: String,
    pub status: String,
    /// Whether the document appears on the public listing
    pub published: bool,
    pub session_date: chrono::NaiveDate,
    pub summary: String,
}

/// A dashboard notification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    pub message: String,
    pub read: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// User lookup and login bookkeeping
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fetch the unique active user with this exact email, if any
    async fn find_active_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Stamp the user's last successful login
    async fn record_login(
        &self,
        user_id: i64,
        at: chrono::DateTime<chrono::Utc>,
    ) -> Result<()>;

    /// Number of active accounts
    async fn count_active(&self) -> Result<i64>;
}

/// Append-only audit trail: login events and session registrations
#[async_trait]
pub trait AuditTrail: Send + Sync {
    async fn record_event(&self, event: NewAuditEvent) -> Result<()>;

    async fn register_session(&self, record: SessionRecord) -> Result<()>;
}

/// Read access to ordinances and resolutions
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Published documents, newest session first
    async fn list_published(&self) -> Result<Vec<Document>>;

    /// Most recent documents regardless of publication, newest session first
    async fn list_recent(&self, limit: i64) -> Result<Vec<Document>>;

    /// Look up one document by id and kind
    async fn find(&self, id: i64, kind: DocumentKind) -> Result<Option<Document>>;
}

/// Notification reads and the mark-read mutation
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Unread notifications for a user, newest first
    async fn unread_for(&self, user_id: i64) -> Result<Vec<Notification>>;

    /// Mark one notification read; false when no such row exists
    async fn mark_read(&self, id: i64) -> Result<bool>;
}
