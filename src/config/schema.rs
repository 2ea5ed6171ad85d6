//! Configuration schema definitions

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub portal: PortalConfig,
}

/// Server configuration for the HTTP portal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8085
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// PostgreSQL connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_host")]
    pub host: String,

    #[serde(default = "default_db_port")]
    pub port: u16,

    #[serde(default = "default_db_user")]
    pub user: String,

    #[serde(default = "default_db_password")]
    pub password: String,

    #[serde(default = "default_db_name")]
    pub dbname: String,
}

fn default_db_host() -> String {
    "localhost".to_string()
}

fn default_db_port() -> u16 {
    5432
}

fn default_db_user() -> String {
    "postgres".to_string()
}

fn default_db_password() -> String {
    "postgres".to_string()
}

fn default_db_name() -> String {
    "legistrack".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: default_db_host(),
            port: default_db_port(),
            user: default_db_user(),
            password: default_db_password(),
            dbname: default_db_name(),
        }
    }
}

impl DatabaseConfig {
    /// Build a tokio-postgres connection string
    pub fn connection_string(&self) -> String {
        format!(
            "host={} port={} user={} password={} dbname={}",
            self.host, self.port, self.user, self.password, self.dbname
        )
    }
}

/// Authentication behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Organizational email domain required for all logins
    #[serde(default = "default_email_domain")]
    pub email_domain: String,

    /// Idle session lifetime in minutes
    #[serde(default = "default_session_ttl_minutes")]
    pub session_ttl_minutes: i64,

    /// Accept the pre-migration literal seed credentials
    #[serde(default = "default_legacy_logins")]
    pub legacy_logins: bool,

    /// Fail the login when an audit write fails instead of logging and continuing
    #[serde(default)]
    pub strict_audit: bool,
}

fn default_email_domain() -> String {
    "org.example".to_string()
}

fn default_session_ttl_minutes() -> i64 {
    30
}

fn default_legacy_logins() -> bool {
    true
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            email_domain: default_email_domain(),
            session_ttl_minutes: default_session_ttl_minutes(),
            legacy_logins: default_legacy_logins(),
            strict_audit: false,
        }
    }
}

/// Portal presentation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalConfig {
    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default = "default_municipality")]
    pub municipality: String,
}

fn default_title() -> String {
    "LegisTrack".to_string()
}

fn default_municipality() -> String {
    "Municipal Council".to_string()
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            municipality: default_municipality(),
        }
    }
}
