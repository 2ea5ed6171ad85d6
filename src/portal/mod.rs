//! Portal HTTP server and AJAX endpoints

pub mod routes;
pub mod server;

pub use server::{run_server, AppState, SharedState};
