pub mod app;
pub mod authz;
pub mod config;
pub mod docs;
pub mod errors;
pub mod gate;
pub mod identity;
pub mod jwt;
pub mod routes;
pub mod routing;

// Re-export commonly used items for tests
pub use app::{build_router, create_app, create_app_with, AppState};
