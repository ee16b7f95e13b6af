// API layer module (adapters for controllers)
// Follows Hexagonal Architecture - API is an adapter

pub mod envelope;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use router::router;
pub use state::AppState;
