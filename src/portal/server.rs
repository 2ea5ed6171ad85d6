//! Portal HTTP server

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{Authenticator, SessionManager};
use crate::config::Config;
use crate::error::Result;
use crate::store::{DocumentStore, NotificationStore, PgStore, UserStore};

use super::routes;

/// Application state shared across handlers
pub struct AppState {
    pub config: Config,
    pub sessions: SessionManager,
    pub authenticator: Authenticator,
    pub users: Arc<dyn UserStore>,
    pub documents: Arc<dyn DocumentStore>,
    pub notifications: Arc<dyn NotificationStore>,
}

pub type SharedState = Arc<AppState>;

/// Run the portal server
pub async fn run_server(config: Config, host: &str, port: u16) -> Result<()> {
    let store = Arc::new(PgStore::connect(&config.database).await?);
    store.ensure_schema().await?;

    let sessions = SessionManager::new(config.auth.session_ttl_minutes);
    let authenticator = Authenticator::new(
        store.clone(),
        store.clone(),
        sessions.clone(),
        config.auth.clone(),
    );

    start_session_sweeper(sessions.clone());

    let state = Arc::new(AppState {
        config,
        sessions,
        authenticator,
        users: store.clone(),
        documents: store.clone(),
        notifications: store,
    });

    let app = create_router(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Portal listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Drop idle sessions in the background
fn start_session_sweeper(sessions: SessionManager) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(300));
        loop {
            interval.tick().await;
            sessions.cleanup_expired().await;
            tracing::debug!("Sessions after sweep: {}", sessions.session_count().await);
        }
    });
}

/// Create the router with all routes
fn create_router(state: SharedState) -> Router {
    Router::new()
        // Public pages
        .route("/", get(crate::ui::public_listing))
        .route("/login", get(crate::ui::login_page))
        .route("/login", post(crate::ui::submit_login))
        .route("/logout", post(crate::ui::logout))
        // Role dashboards; each handler runs the guard before rendering
        .route(
            "/dashboard/super-admin",
            get(crate::ui::super_admin_dashboard),
        )
        .route("/dashboard/admin", get(crate::ui::admin_dashboard))
        .route("/dashboard/councilor", get(crate::ui::councilor_dashboard))
        // AJAX endpoints
        .route("/api/health", get(routes::health))
        .route("/api/documents/info", post(routes::document_info))
        .route(
            "/api/notifications/read",
            post(routes::mark_notification_read),
        )
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
