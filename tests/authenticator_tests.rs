//! Login flow tests against in-memory store doubles
//!
//! The doubles count store calls so the tests can pin down which paths touch
//! the stores at all, not just the final outcome.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use legistrack::auth::{
    AuthError, Authenticator, ClientContext, Destination, Role, SessionManager, User,
};
use legistrack::config::AuthConfig;
use legistrack::error::{Error, Result};
use legistrack::store::{AuditAction, AuditTrail, NewAuditEvent, SessionRecord, UserStore};

/// In-memory user and audit store with call counters and failure switches
#[derive(Default)]
struct MemoryStore {
    users: Mutex<Vec<User>>,
    audit_events: Mutex<Vec<NewAuditEvent>>,
    session_records: Mutex<Vec<SessionRecord>>,
    lookup_calls: AtomicUsize,
    audit_calls: AtomicUsize,
    fail_lookup: AtomicBool,
    fail_login_stamp: AtomicBool,
    fail_audit: AtomicBool,
}

impl MemoryStore {
    fn audit_actions(&self) -> Vec<AuditAction> {
        self.audit_events
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.action)
            .collect()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_active_by_email(&self, email: &str) -> Result<Option<User>> {
        self.lookup_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_lookup.load(Ordering::SeqCst) {
            return Err(Error::Other("user store offline".to_string()));
        }
        let users = self.users.lock().unwrap();
        let matches: Vec<&User> = users
            .iter()
            .filter(|u| u.email == email && u.active)
            .collect();
        match matches.as_slice() {
            [user] => Ok(Some((*user).clone())),
            _ => Ok(None),
        }
    }

    async fn record_login(&self, user_id: i64, at: DateTime<Utc>) -> Result<()> {
        if self.fail_login_stamp.load(Ordering::SeqCst) {
            return Err(Error::Other("user store offline".to_string()));
        }
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.id == user_id) {
            user.last_login = Some(at);
        }
        Ok(())
    }

    async fn count_active(&self) -> Result<i64> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().filter(|u| u.active).count() as i64)
    }
}

#[async_trait]
impl AuditTrail for MemoryStore {
    async fn record_event(&self, event: NewAuditEvent) -> Result<()> {
        self.audit_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_audit.load(Ordering::SeqCst) {
            return Err(Error::Other("audit store offline".to_string()));
        }
        self.audit_events.lock().unwrap().push(event);
        Ok(())
    }

    async fn register_session(&self, record: SessionRecord) -> Result<()> {
        if self.fail_audit.load(Ordering::SeqCst) {
            return Err(Error::Other("audit store offline".to_string()));
        }
        self.session_records.lock().unwrap().push(record);
        Ok(())
    }
}

fn user(id: i64, email: &str, role: Role, password: &str) -> User {
    User {
        id,
        email: email.to_string(),
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        role,
        department: "Secretariat".to_string(),
        active: true,
        password_hash: bcrypt::hash(password, 4).expect("hash"),
        last_login: None,
    }
}

fn build(
    users: Vec<User>,
    settings: AuthConfig,
) -> (Arc<MemoryStore>, SessionManager, Authenticator) {
    let store = Arc::new(MemoryStore::default());
    *store.users.lock().unwrap() = users;
    let sessions = SessionManager::new(30);
    let authenticator =
        Authenticator::new(store.clone(), store.clone(), sessions.clone(), settings);
    (store, sessions, authenticator)
}

fn build_default(users: Vec<User>) -> (Arc<MemoryStore>, SessionManager, Authenticator) {
    build(users, AuthConfig::default())
}

fn ctx() -> ClientContext {
    ClientContext {
        ip: Some("203.0.113.9".to_string()),
        user_agent: Some("portal-test/1.0".to_string()),
    }
}

#[tokio::test]
async fn test_malformed_input_never_touches_stores() {
    let (store, _, authenticator) = build_default(vec![]);

    for email in [
        "",
        "no-at-sign",
        "two@@org.example",
        "spaced name@org.example",
        "clerk@elsewhere.com",
    ] {
        let result = authenticator.authenticate(email, "pw", &ctx()).await;
        assert!(
            matches!(result, Err(AuthError::InvalidInput)),
            "expected InvalidInput for {:?}",
            email
        );
    }

    let result = authenticator
        .authenticate("clerk@org.example", "", &ctx())
        .await;
    assert!(matches!(result, Err(AuthError::InvalidInput)));

    assert_eq!(store.lookup_calls.load(Ordering::SeqCst), 0);
    assert_eq!(store.audit_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_correct_password_logs_in_and_audits_once() {
    let (store, sessions, authenticator) =
        build_default(vec![user(1, "clerk@org.example", Role::Admin, "s3cret")]);

    let outcome = authenticator
        .authenticate("clerk@org.example", "s3cret", &ctx())
        .await
        .expect("login should succeed");

    assert_eq!(outcome.role, Role::Admin);
    assert_eq!(outcome.destination, Destination::AdminDashboard);
    assert_eq!(store.audit_actions(), vec![AuditAction::Login]);

    let session = sessions
        .get_session(&outcome.session_id)
        .await
        .expect("session should exist");
    assert!(session.authenticated);
    assert_eq!(session.role, Role::Admin);
    assert_eq!(session.department, "Secretariat");
    assert_eq!(session.ip, Some("203.0.113.9".to_string()));

    let records = store.session_records.lock().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].session_id, outcome.session_id);
    assert_eq!(records[0].user_id, 1);

    assert!(store.users.lock().unwrap()[0].last_login.is_some());
}

#[tokio::test]
async fn test_wrong_password_audits_failure_and_creates_no_session() {
    let (store, sessions, authenticator) =
        build_default(vec![user(1, "clerk@org.example", Role::Admin, "s3cret")]);

    let result = authenticator
        .authenticate("clerk@org.example", "wrong", &ctx())
        .await;

    assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    assert_eq!(store.audit_actions(), vec![AuditAction::FailedLogin]);
    assert_eq!(sessions.session_count().await, 0);
    assert!(store.users.lock().unwrap()[0].last_login.is_none());
}

#[tokio::test]
async fn test_unknown_email_is_indistinguishable_from_wrong_password() {
    let (store, _, authenticator) =
        build_default(vec![user(1, "clerk@org.example", Role::Admin, "s3cret")]);

    let unknown = authenticator
        .authenticate("ghost@org.example", "whatever", &ctx())
        .await
        .expect_err("unknown email should fail");
    let wrong = authenticator
        .authenticate("clerk@org.example", "wrong", &ctx())
        .await
        .expect_err("wrong password should fail");

    assert_eq!(unknown.user_message(), wrong.user_message());
    assert_eq!(
        store.audit_actions(),
        vec![AuditAction::FailedLogin, AuditAction::FailedLogin]
    );

    // The unknown-email event has no user id to attach
    let events = store.audit_events.lock().unwrap();
    assert_eq!(events[0].user_id, None);
    assert_eq!(events[1].user_id, Some(1));
}

#[tokio::test]
async fn test_inactive_account_cannot_log_in() {
    let mut inactive = user(1, "clerk@org.example", Role::Admin, "s3cret");
    inactive.active = false;
    let (store, sessions, authenticator) = build_default(vec![inactive]);

    let result = authenticator
        .authenticate("clerk@org.example", "s3cret", &ctx())
        .await;

    assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    assert_eq!(store.audit_actions(), vec![AuditAction::FailedLogin]);
    assert_eq!(sessions.session_count().await, 0);
}

#[tokio::test]
async fn test_duplicate_active_accounts_are_rejected() {
    let (store, _, authenticator) = build_default(vec![
        user(1, "clerk@org.example", Role::Admin, "s3cret"),
        user(2, "clerk@org.example", Role::Councilor, "s3cret"),
    ]);

    let result = authenticator
        .authenticate("clerk@org.example", "s3cret", &ctx())
        .await;

    assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    assert_eq!(store.audit_actions(), vec![AuditAction::FailedLogin]);
}

#[tokio::test]
async fn test_legacy_superadmin_overrides_stored_hash() {
    // The stored hash matches a different password entirely
    let (store, _, authenticator) = build_default(vec![user(
        1,
        "superadmin@org.example",
        Role::SuperAdmin,
        "completely-different",
    )]);

    let outcome = authenticator
        .authenticate("superadmin@org.example", "superadmin123", &ctx())
        .await
        .expect("legacy login should succeed");

    assert_eq!(outcome.role, Role::SuperAdmin);
    assert_eq!(outcome.destination, Destination::SuperAdminDashboard);
    assert_eq!(store.audit_actions(), vec![AuditAction::Login]);
}

#[tokio::test]
async fn test_legacy_login_works_with_malformed_stored_hash() {
    let mut seeded = user(2, "admin@org.example", Role::Admin, "anything");
    seeded.password_hash = "not-a-bcrypt-hash".to_string();
    let (_, _, authenticator) = build_default(vec![seeded]);

    let outcome = authenticator
        .authenticate("admin@org.example", "admin123", &ctx())
        .await
        .expect("legacy login should succeed");

    assert_eq!(outcome.role, Role::Admin);
    assert_eq!(outcome.destination, Destination::AdminDashboard);
}

#[tokio::test]
async fn test_legacy_councilor_matches_any_councilor_local_part() {
    let (_, _, authenticator) = build_default(vec![
        user(3, "councilor.reyes@org.example", Role::Councilor, "other"),
        user(4, "mayor@org.example", Role::Admin, "other"),
    ]);

    let outcome = authenticator
        .authenticate("councilor.reyes@org.example", "councilor123", &ctx())
        .await
        .expect("legacy councilor login should succeed");
    assert_eq!(outcome.role, Role::Councilor);
    assert_eq!(outcome.destination, Destination::CouncilorDashboard);

    // Same literal password, local part without "councilor"
    let result = authenticator
        .authenticate("mayor@org.example", "councilor123", &ctx())
        .await;
    assert!(matches!(result, Err(AuthError::InvalidCredentials)));
}

#[tokio::test]
async fn test_legacy_requires_a_provisioned_active_account() {
    let (store, _, authenticator) = build_default(vec![]);

    let result = authenticator
        .authenticate("superadmin@org.example", "superadmin123", &ctx())
        .await;

    assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    assert_eq!(store.audit_actions(), vec![AuditAction::FailedLogin]);
}

#[tokio::test]
async fn test_legacy_logins_can_be_disabled() {
    let settings = AuthConfig {
        legacy_logins: false,
        ..AuthConfig::default()
    };
    let (_, _, authenticator) = build(
        vec![user(1, "superadmin@org.example", Role::SuperAdmin, "real-pw")],
        settings,
    );

    let result = authenticator
        .authenticate("superadmin@org.example", "superadmin123", &ctx())
        .await;
    assert!(matches!(result, Err(AuthError::InvalidCredentials)));

    // The hash path still works with the flag off
    let outcome = authenticator
        .authenticate("superadmin@org.example", "real-pw", &ctx())
        .await
        .expect("hash login should still succeed");
    assert_eq!(outcome.role, Role::SuperAdmin);
}

#[tokio::test]
async fn test_lookup_outage_surfaces_system_error() {
    let (store, sessions, authenticator) =
        build_default(vec![user(1, "clerk@org.example", Role::Admin, "s3cret")]);
    store.fail_lookup.store(true, Ordering::SeqCst);

    let err = authenticator
        .authenticate("clerk@org.example", "s3cret", &ctx())
        .await
        .expect_err("outage should fail the login");

    assert!(matches!(err, AuthError::StoreUnavailable(_)));
    assert_eq!(err.user_message(), "System error, try again later.");
    assert_ne!(
        err.user_message(),
        AuthError::InvalidCredentials.user_message()
    );
    assert_eq!(store.audit_calls.load(Ordering::SeqCst), 0);
    assert_eq!(sessions.session_count().await, 0);
}

#[tokio::test]
async fn test_login_stamp_failure_aborts_the_login() {
    let (store, sessions, authenticator) =
        build_default(vec![user(1, "clerk@org.example", Role::Admin, "s3cret")]);
    store.fail_login_stamp.store(true, Ordering::SeqCst);

    let err = authenticator
        .authenticate("clerk@org.example", "s3cret", &ctx())
        .await
        .expect_err("stamp failure should fail the login");

    assert!(matches!(err, AuthError::StoreUnavailable(_)));
    assert_eq!(sessions.session_count().await, 0);
    assert!(store.audit_actions().is_empty());
}

#[tokio::test]
async fn test_audit_failure_is_swallowed_by_default() {
    let (store, sessions, authenticator) =
        build_default(vec![user(1, "clerk@org.example", Role::Admin, "s3cret")]);
    store.fail_audit.store(true, Ordering::SeqCst);

    let outcome = authenticator
        .authenticate("clerk@org.example", "s3cret", &ctx())
        .await
        .expect("login should succeed despite audit outage");

    assert!(sessions.get_session(&outcome.session_id).await.is_some());
    assert!(store.audit_actions().is_empty());
}

#[tokio::test]
async fn test_strict_audit_rolls_the_login_back() {
    let settings = AuthConfig {
        strict_audit: true,
        ..AuthConfig::default()
    };
    let (store, sessions, authenticator) = build(
        vec![user(1, "clerk@org.example", Role::Admin, "s3cret")],
        settings,
    );
    store.fail_audit.store(true, Ordering::SeqCst);

    let err = authenticator
        .authenticate("clerk@org.example", "s3cret", &ctx())
        .await
        .expect_err("strict audit should fail the login");

    assert!(matches!(err, AuthError::StoreUnavailable(_)));
    assert_eq!(sessions.session_count().await, 0);
}
