// API layer module (adapters for controllers)
// Follows Hexagonal Architecture - API is an adapter

pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod permissions;
pub mod routes;
pub mod state;

pub use routes::router;
pub use state::{AdminBootstrapError, AppState, Repositories};
