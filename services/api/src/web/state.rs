//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::adapters::{InMemorySessionStore, StaticGreetings, SysinfoMetrics, ZonedClock};
use crate::config::Config;
use crate::web::pages::PageRenderer;
use blog_core::ports::{GreetingSource, MetricsSource, PostStore, SessionStore, TimeSource};
use blog_core::SessionGate;
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostStore>,
    pub sessions: Arc<dyn SessionStore>,
    pub gate: SessionGate,
    pub clock: Arc<dyn TimeSource>,
    pub metrics: Arc<dyn MetricsSource>,
    pub greetings: Arc<dyn GreetingSource>,
    pub pages: Arc<PageRenderer>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Wires the default collaborators around the given post store.
    ///
    /// The session gate and the page handlers share one session store.
    pub fn new(config: Arc<Config>, posts: Arc<dyn PostStore>) -> Result<Self, minijinja::Error> {
        let sessions: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());
        let gate = SessionGate::new(config.credentials.clone(), sessions.clone());

        Ok(Self {
            posts,
            sessions,
            gate,
            clock: Arc::new(ZonedClock::new(config.display_timezone)),
            metrics: Arc::new(SysinfoMetrics::new()),
            greetings: Arc::new(StaticGreetings),
            pages: Arc::new(PageRenderer::new()?),
            config,
        })
    }
}
