//! PostgreSQL-backed stores

use async_trait::async_trait;
use std::sync::Arc;
use tokio_postgres::Row;

use crate::auth::models::{Role, User};
use crate::config::DatabaseConfig;
use crate::error::Result;

use super::{
    AuditTrail, Document, DocumentKind, DocumentStore, NewAuditEvent, Notification,
    NotificationStore, SessionRecord, UserStore,
};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id            BIGSERIAL PRIMARY KEY,
    email         TEXT NOT NULL UNIQUE,
    first_name    TEXT NOT NULL,
    last_name     TEXT NOT NULL,
    role          TEXT NOT NULL,
    department    TEXT NOT NULL DEFAULT '',
    active        BOOLEAN NOT NULL DEFAULT TRUE,
    password_hash TEXT NOT NULL,
    last_login    TIMESTAMPTZ
);

CREATE TABLE IF NOT EXISTS sessions (
    session_id   TEXT PRIMARY KEY,
    user_id      BIGINT NOT NULL REFERENCES users(id),
    ip           TEXT,
    user_agent   TEXT,
    logged_in_at TIMESTAMPTZ NOT NULL
);

CREATE TABLE IF NOT EXISTS audit_logs (
    id         BIGSERIAL PRIMARY KEY,
    action     TEXT NOT NULL,
    user_id    BIGINT,
    detail     TEXT NOT NULL DEFAULT '',
    ip         TEXT,
    user_agent TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE IF NOT EXISTS documents (
    id           BIGSERIAL PRIMARY KEY,
    kind         TEXT NOT NULL,
    number       TEXT NOT NULL,
    title        TEXT NOT NULL,
    sponsor      TEXT NOT NULL DEFAULT '',
    status       TEXT NOT NULL DEFAULT 'pending',
    published    BOOLEAN NOT NULL DEFAULT FALSE,
    session_date DATE NOT NULL,
    summary      TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS notifications (
    id         BIGSERIAL PRIMARY KEY,
    user_id    BIGINT NOT NULL REFERENCES users(id),
    message    TEXT NOT NULL,
    is_read    BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
"#;

const USER_COLUMNS: &str =
    "id, email, first_name, last_name, role, department, active, password_hash, last_login";

const DOCUMENT_COLUMNS: &str =
    "id, kind, number, title, sponsor, status, published, session_date, summary";

/// All portal stores over one pipelined connection
pub struct PgStore {
    client: Arc<tokio_postgres::Client>,
}

impl PgStore {
    /// Connect and spawn the connection driver
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let (client, connection) =
            tokio_postgres::connect(&config.connection_string(), tokio_postgres::NoTls).await?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!("PostgreSQL connection error: {}", e);
            }
        });

        Ok(Self {
            client: Arc::new(client),
        })
    }

    /// Create the portal tables when missing
    pub async fn ensure_schema(&self) -> Result<()> {
        self.client.batch_execute(SCHEMA).await?;
        tracing::info!("Database schema verified");
        Ok(())
    }
}

/// Map a users row; rows with an unrecognized role string never authenticate
fn user_from_row(row: &Row) -> Option<User> {
    let role_raw: String = row.get("role");
    let Some(role) = Role::parse(&role_raw) else {
        tracing::warn!("Ignoring user row with unrecognized role '{}'", role_raw);
        return None;
    };
    Some(User {
        id: row.get("id"),
        email: row.get("email"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        role,
        department: row.get("department"),
        active: row.get("active"),
        password_hash: row.get("password_hash"),
        last_login: row.get("last_login"),
    })
}

fn document_from_row(row: &Row) -> Option<Document> {
    let kind_raw: String = row.get("kind");
    let Some(kind) = DocumentKind::parse(&kind_raw) else {
        tracing::warn!("Ignoring document row with unrecognized kind '{}'", kind_raw);
        return None;
    };
    Some(Document {
        id: row.get("id"),
        kind,
        number: row.get("number"),
        title: row.get("title"),
        sponsor: row.get("sponsor"),
        status: row.get("status"),
        published: row.get("published"),
        session_date: row.get("session_date"),
        summary: row.get("summary"),
    })
}

fn notification_from_row(row: &Row) -> Notification {
    Notification {
        id: row.get("id"),
        user_id: row.get("user_id"),
        message: row.get("message"),
        read: row.get("is_read"),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_active_by_email(&self, email: &str) -> Result<Option<User>> {
        let query = format!(
            "SELECT {} FROM users WHERE email = $1 AND active = TRUE",
            USER_COLUMNS
        );
        let rows = self.client.query(&query, &[&email]).await?;

        // Anything but exactly one active row is treated as no match
        match rows.as_slice() {
            [row] => Ok(user_from_row(row)),
            _ => Ok(None),
        }
    }

    async fn record_login(
        &self,
        user_id: i64,
        at: chrono::DateTime<chrono::Utc>,
    ) -> Result<()> {
        self.client
            .execute("UPDATE users SET last_login = $2 WHERE id = $1", &[&user_id, &at])
            .await?;
        Ok(())
    }

    async fn count_active(&self) -> Result<i64> {
        let row = self
            .client
            .query_one("SELECT COUNT(*) FROM users WHERE active = TRUE", &[])
            .await?;
        Ok(row.get(0))
    }
}

#[async_trait]
impl AuditTrail for PgStore {
    async fn record_event(&self, event: NewAuditEvent) -> Result<()> {
        self.client
            .execute(
                "INSERT INTO audit_logs (action, user_id, detail, ip, user_agent) \
                 VALUES ($1, $2, $3, $4, $5)",
                &[
                    &event.action.as_str(),
                    &event.user_id,
                    &event.detail,
                    &event.ip,
                    &event.user_agent,
                ],
            )
            .await?;
        Ok(())
    }

    async fn register_session(&self, record: SessionRecord) -> Result<()> {
        self.client
            .execute(
                "INSERT INTO sessions (session_id, user_id, ip, user_agent, logged_in_at) \
                 VALUES ($1, $2, $3, $4, $5)",
                &[
                    &record.session_id,
                    &record.user_id,
                    &record.ip,
                    &record.user_agent,
                    &record.logged_in_at,
                ],
            )
            .await?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn list_published(&self) -> Result<Vec<Document>> {
        let query = format!(
            "SELECT {} FROM documents WHERE published = TRUE \
             ORDER BY session_date DESC, id DESC",
            DOCUMENT_COLUMNS
        );
        let rows = self.client.query(&query, &[]).await?;
        Ok(rows.iter().filter_map(document_from_row).collect())
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<Document>> {
        let query = format!(
            "SELECT {} FROM documents ORDER BY session_date DESC, id DESC LIMIT $1",
            DOCUMENT_COLUMNS
        );
        let rows = self.client.query(&query, &[&limit]).await?;
        Ok(rows.iter().filter_map(document_from_row).collect())
    }

    async fn find(&self, id: i64, kind: DocumentKind) -> Result<Option<Document>> {
        let query = format!(
            "SELECT {} FROM documents WHERE id = $1 AND kind = $2",
            DOCUMENT_COLUMNS
        );
        let row = self
            .client
            .query_opt(&query, &[&id, &kind.as_str()])
            .await?;
        Ok(row.as_ref().and_then(document_from_row))
    }
}

#[async_trait]
impl NotificationStore for PgStore {
    async fn unread_for(&self, user_id: i64) -> Result<Vec<Notification>> {
        let rows = self
            .client
            .query(
                "SELECT id, user_id, message, is_read, created_at FROM notifications \
                 WHERE user_id = $1 AND is_read = FALSE ORDER BY created_at DESC",
                &[&user_id],
            )
            .await?;
        Ok(rows.iter().map(notification_from_row).collect())
    }

    async fn mark_read(&self, id: i64) -> Result<bool> {
        let updated = self
            .client
            .execute("UPDATE notifications SET is_read = TRUE WHERE id = $1", &[&id])
            .await?;
        Ok(updated > 0)
    }
}
