//! Server-rendered web UI

mod handlers;

pub use handlers::*;
