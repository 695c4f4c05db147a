//! crates/blog_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific implementations like databases or host probes.

use async_trait::async_trait;
use crate::domain::{AuthState, NewPost, Post, SystemMetrics};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, OS).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Storage fault: {0}")]
    Storage(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// The durable, ordered collection of posts.
///
/// Implementations must assign `id` and `created_at` atomically with respect to
/// other `create` calls, and `list_all` must never observe a half-written post.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Stores a new post, assigning its id and server-side timestamp.
    async fn create(&self, post: NewPost) -> PortResult<Post>;

    /// Returns every post, newest first; ties fall back to reverse insertion order.
    async fn list_all(&self) -> PortResult<Vec<Post>>;
}

/// Per-client session state, keyed by an opaque token.
///
/// Unknown tokens behave as fresh anonymous sessions with no pending flashes.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn auth_state(&self, token: &str) -> PortResult<AuthState>;

    async fn set_auth_state(&self, token: &str, state: AuthState) -> PortResult<()>;

    /// Queues a message for the next rendered page of this session.
    async fn push_flash(&self, token: &str, message: &str) -> PortResult<()>;

    /// Drains and returns the queued messages, oldest first.
    async fn take_flashes(&self, token: &str) -> PortResult<Vec<String>>;
}

#[async_trait]
pub trait TimeSource: Send + Sync {
    /// Returns the current local time in the configured zone, already formatted.
    async fn now_formatted(&self) -> PortResult<String>;
}

#[async_trait]
pub trait MetricsSource: Send + Sync {
    async fn snapshot(&self) -> PortResult<SystemMetrics>;
}

pub trait GreetingSource: Send + Sync {
    /// Picks one message from a fixed set.
    fn pick(&self) -> String;
}
