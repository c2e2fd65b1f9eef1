pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod middleware;
pub mod router;
pub mod state;
pub mod validation;

pub use router::app;
pub use state::AppState;
