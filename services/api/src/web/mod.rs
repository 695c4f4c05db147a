pub mod auth;
pub mod middleware;
pub mod pages;
pub mod rest;
pub mod router;
pub mod session;
pub mod state;

// Re-export the pieces the binary needs to build the web server.
pub use router::build_router;
pub use state::AppState;
