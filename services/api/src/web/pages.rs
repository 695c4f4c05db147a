//! services/api/src/web/pages.rs
//!
//! Server-rendered HTML pages and the template environment behind them.

use axum::{
    extract::State,
    response::Html,
    Extension,
};
use minijinja::{context, Environment};
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

use crate::error::HttpError;
use crate::web::rest::{PostResponse, SystemInfoResponse};
use crate::web::session::SessionContext;
use crate::web::state::AppState;

//=========================================================================================
// Renderer
//=========================================================================================

/// Holds the compiled page templates, which are embedded in the binary.
pub struct PageRenderer {
    env: Environment<'static>,
}

impl PageRenderer {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template("base.html", include_str!("../../templates/base.html"))?;
        env.add_template("index.html", include_str!("../../templates/index.html"))?;
        env.add_template("login.html", include_str!("../../templates/login.html"))?;
        env.add_template("services.html", include_str!("../../templates/services.html"))?;
        Ok(Self { env })
    }

    /// Renders a named template with a serializable context.
    pub fn render<S: Serialize>(&self, name: &str, ctx: S) -> Result<String, minijinja::Error> {
        self.env.get_template(name)?.render(ctx)
    }

    pub(crate) fn page<S: Serialize>(&self, name: &str, ctx: S) -> Result<Html<String>, HttpError> {
        self.render(name, ctx)
            .map(Html)
            .map_err(|e| HttpError::Internal(format!("rendering {}: {:#}", name, e)))
    }
}

//=========================================================================================
// Page Handlers
//=========================================================================================

/// GET / - Overview of the backend: clock, greeting, host metrics and posts.
pub async fn home_handler(State(state): State<Arc<AppState>>) -> Result<Html<String>, HttpError> {
    let posts: Vec<PostResponse> = state
        .posts
        .list_all()
        .await?
        .iter()
        .map(PostResponse::from)
        .collect();

    let current_time = state
        .clock
        .now_formatted()
        .await
        .map_err(|e| HttpError::Internal(format!("clock: {}", e)))?;

    // The page is still useful without metrics.
    let system_rows = match state.metrics.snapshot().await {
        Ok(metrics) => SystemInfoResponse::from(metrics).rows(),
        Err(e) => {
            warn!("Metrics unavailable for home page: {:?}", e);
            Vec::new()
        }
    };

    state.pages.page(
        "index.html",
        context! {
            current_time,
            timezone => state.config.display_timezone.name(),
            message => state.greetings.pick(),
            system_rows,
            posts,
        },
    )
}

/// GET /services - The protected page; only reachable through `require_login`.
pub async fn services_handler(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
) -> Result<Html<String>, HttpError> {
    let flashes = state.sessions.take_flashes(&session.token).await?;
    state.pages.page(
        "services.html",
        context! {
            flashes,
            username => state.config.credentials.username(),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_page_shows_flashes_escaped() {
        let pages = PageRenderer::new().unwrap();
        let html = pages
            .render(
                "login.html",
                context! { flashes => vec!["<b>Invalid credentials. Please try again.</b>"] },
            )
            .unwrap();
        assert!(html.contains("&lt;b&gt;Invalid credentials. Please try again."));
        assert!(!html.contains("<b>"));
        assert!(html.contains("name=\"username\""));
    }

    #[test]
    fn index_lists_posts() {
        let pages = PageRenderer::new().unwrap();
        let posts = vec![PostResponse {
            id: 1,
            title: "Hi".to_string(),
            content: "Hello".to_string(),
            author: "Ana".to_string(),
            created_at: "2024-01-01T00:00:00.000000Z".to_string(),
        }];
        let html = pages
            .render(
                "index.html",
                context! {
                    current_time => "2024-01-01 00:00:00",
                    timezone => "America/Toronto",
                    message => "hello",
                    system_rows => vec![("CPU Usage", "1.0%")],
                    posts,
                },
            )
            .unwrap();
        assert!(html.contains("Hi"));
        assert!(html.contains("Ana"));
        assert!(html.contains("CPU Usage"));
        assert!(html.contains("Current time (America&#x2f;Toronto): 2024-01-01 00:00:00"));
    }
}
