//! Session management

use crate::auth::models::{Role, User};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Client details captured when the session is established
#[derive(Debug, Clone, Default)]
pub struct ClientContext {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

/// Per-browser session state. Role and department are snapshots taken at
/// login time and are never re-derived from the user record afterwards.
#[derive(Debug, Clone)]
pub struct SessionData {
    /// Session ID, also the cookie value
    pub id: String,
    /// Linked user id
    pub user_id: i64,
    /// Set true at login and checked by the guard on every request;
    /// logout removes the whole entry rather than clearing this flag
    pub authenticated: bool,
    pub email: String,
    /// Display name
    pub name: String,
    /// Role snapshot at login time
    pub role: Role,
    /// Department snapshot at login time
    pub department: String,
    /// When the session was established
    pub logged_in_at: chrono::DateTime<chrono::Utc>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    /// When the session was last accessed
    pub last_accessed: chrono::DateTime<chrono::Utc>,
}

impl SessionData {
    /// Create a new session for a user with the effective role
    pub fn new(user: &User, role: Role, ctx: &ClientContext) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user.id,
            authenticated: true,
            email: user.email.clone(),
            name: user.full_name(),
            role,
            department: user.department.clone(),
            logged_in_at: now,
            ip: ctx.ip.clone(),
            user_agent: ctx.user_agent.clone(),
            last_accessed: now,
        }
    }

    /// Check if session idled past the given lifetime
    pub fn is_expired(&self, ttl_minutes: i64) -> bool {
        let now = chrono::Utc::now();
        now.signed_duration_since(self.last_accessed).num_minutes() >= ttl_minutes
    }

    /// Update last accessed time
    pub fn touch(&mut self) {
        self.last_accessed = chrono::Utc::now();
    }
}

/// In-memory session storage keyed by session id
pub struct SessionManager {
    sessions: Arc<RwLock<HashMap<String, SessionData>>>,
    ttl_minutes: i64,
}

impl SessionManager {
    /// Create a session manager with the given idle lifetime
    pub fn new(ttl_minutes: i64) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl_minutes,
        }
    }

    /// Register a new session for a user
    pub async fn create_session(
        &self,
        user: &User,
        role: Role,
        ctx: &ClientContext,
    ) -> SessionData {
        let session = SessionData::new(user, role, ctx);
        self.sessions
            .write()
            .await
            .insert(session.id.clone(), session.clone());
        session
    }

    /// Get a session by ID, expiring it if it idled out
    pub async fn get_session(&self, session_id: &str) -> Option<SessionData> {
        let mut sessions = self.sessions.write().await;
        if let Some(session) = sessions.get_mut(session_id) {
            if session.is_expired(self.ttl_minutes) {
                sessions.remove(session_id);
                return None;
            }
            session.touch();
            return Some(session.clone());
        }
        None
    }

    /// Delete a session
    pub async fn delete_session(&self, session_id: &str) {
        self.sessions.write().await.remove(session_id);
    }

    /// Cleanup expired sessions
    pub async fn cleanup_expired(&self) {
        let ttl = self.ttl_minutes;
        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, session| !session.is_expired(ttl));
    }

    /// Get session count
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new(30)
    }
}

impl Clone for SessionManager {
    fn clone(&self) -> Self {
        Self {
            sessions: Arc::clone(&self.sessions),
            ttl_minutes: self.ttl_minutes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> User {
        User {
            id: 7,
            email: "clerk@org.example".to_string(),
            first_name: "Ana".to_string(),
            last_name: "Reyes".to_string(),
            role: Role::Admin,
            department: "Records".to_string(),
            active: true,
            password_hash: String::new(),
            last_login: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_get_session() {
        let manager = SessionManager::default();
        let session = manager
            .create_session(&test_user(), Role::Admin, &ClientContext::default())
            .await;

        let retrieved = manager.get_session(&session.id).await;
        assert!(retrieved.is_some());
        let retrieved = retrieved.unwrap();
        assert_eq!(retrieved.user_id, 7);
        assert_eq!(retrieved.name, "Ana Reyes");
        assert_eq!(retrieved.role, Role::Admin);
        assert_eq!(retrieved.department, "Records");
        assert!(retrieved.authenticated);
    }

    #[tokio::test]
    async fn test_snapshot_keeps_login_time_role() {
        // The session carries the role passed at login, not the user record's
        let manager = SessionManager::default();
        let session = manager
            .create_session(&test_user(), Role::SuperAdmin, &ClientContext::default())
            .await;
        let retrieved = manager.get_session(&session.id).await.unwrap();
        assert_eq!(retrieved.role, Role::SuperAdmin);
    }

    #[tokio::test]
    async fn test_delete_session() {
        let manager = SessionManager::default();
        let session = manager
            .create_session(&test_user(), Role::Admin, &ClientContext::default())
            .await;

        manager.delete_session(&session.id).await;
        assert!(manager.get_session(&session.id).await.is_none());
    }

    #[tokio::test]
    async fn test_session_expiration() {
        let manager = SessionManager::new(30);
        let session = manager
            .create_session(&test_user(), Role::Admin, &ClientContext::default())
            .await;

        // Manually expire the session for testing
        {
            let mut sessions = manager.sessions.write().await;
            if let Some(session) = sessions.get_mut(&session.id) {
                session.last_accessed = chrono::Utc::now() - chrono::Duration::minutes(31);
            }
        }

        assert!(manager.get_session(&session.id).await.is_none());
        assert_eq!(manager.session_count().await, 0);
    }

    #[tokio::test]
    async fn test_cleanup_expired() {
        let manager = SessionManager::new(30);
        let keep = manager
            .create_session(&test_user(), Role::Admin, &ClientContext::default())
            .await;
        let drop = manager
            .create_session(&test_user(), Role::Admin, &ClientContext::default())
            .await;

        {
            let mut sessions = manager.sessions.write().await;
            if let Some(session) = sessions.get_mut(&drop.id) {
                session.last_accessed = chrono::Utc::now() - chrono::Duration::minutes(90);
            }
        }

        manager.cleanup_expired().await;
        assert_eq!(manager.session_count().await, 1);
        assert!(manager.get_session(&keep.id).await.is_some());
    }

    #[tokio::test]
    async fn test_clone_shares_sessions() {
        let manager1 = SessionManager::default();
        let manager2 = manager1.clone();

        let session = manager1
            .create_session(&test_user(), Role::Admin, &ClientContext::default())
            .await;

        assert!(manager2.get_session(&session.id).await.is_some());
    }

    #[tokio::test]
    async fn test_client_context_captured() {
        let manager = SessionManager::default();
        let ctx = ClientContext {
            ip: Some("203.0.113.9".to_string()),
            user_agent: Some("integration-test".to_string()),
        };
        let session = manager.create_session(&test_user(), Role::Admin, &ctx).await;
        assert_eq!(session.ip.as_deref(), Some("203.0.113.9"));
        assert_eq!(session.user_agent.as_deref(), Some("integration-test"));
    }
}
