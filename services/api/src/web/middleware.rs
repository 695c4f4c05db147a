//! services/api/src/web/middleware.rs
//!
//! Login gate middleware for protecting pages.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use blog_core::GateDecision;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::HttpError;
use crate::web::session::SessionContext;
use crate::web::state::AppState;

/// Middleware that consults the session gate before the protected handler runs.
///
/// If the session is authenticated the request continues.
/// Otherwise the client is redirected to the login page, with the deny reason
/// queued as a flash message when the request came with a session cookie.
/// A cookie-less client may never come back for it.
pub async fn require_login(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Response {
    // 1. The session layer must have run first
    let Some(session) = req.extensions().get::<SessionContext>().cloned() else {
        return HttpError::Internal("require_login installed without with_session".to_string())
            .into_response();
    };

    // 2. Ask the gate
    match state.gate.guard(&session.token).await {
        Ok(GateDecision::Allow) => next.run(req).await,
        Ok(GateDecision::Deny { reason }) => {
            debug!("Denied {} to anonymous session", req.uri().path());
            if !session.is_new {
                if let Err(e) = state.sessions.push_flash(&session.token, reason).await {
                    warn!("Failed to queue login-required flash: {:?}", e);
                }
            }
            Redirect::to("/login").into_response()
        }
        Err(e) => HttpError::Storage(e).into_response(),
    }
}
