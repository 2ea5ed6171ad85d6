//! LegisTrack - Municipal ordinance and resolution portal
//!
//! This is the library interface for LegisTrack, exposing the
//! authentication core, the storage traits, and the portal server.

pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod portal;
pub mod store;
pub mod ui;

pub use auth::Authenticator;
pub use config::Config;
pub use error::Error;
