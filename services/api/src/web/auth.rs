//! services/api/src/web/auth.rs
//!
//! Browser-facing login and logout endpoints.

use axum::{
    extract::{rejection::FormRejection, State},
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Form,
};
use blog_core::gate::{AuthError, LOGGED_OUT, LOGIN_SUCCESS};
use minijinja::context;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::HttpError;
use crate::web::session::SessionContext;
use crate::web::state::AppState;

//=========================================================================================
// Request Types
//=========================================================================================

#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

//=========================================================================================
// Handlers
//=========================================================================================

async fn render_login(state: &AppState, session: &SessionContext) -> Result<Html<String>, HttpError> {
    let flashes = state.sessions.take_flashes(&session.token).await?;
    state.pages.page("login.html", context! { flashes })
}

/// GET /login - Show the login form with any pending messages.
pub async fn login_page_handler(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
) -> Result<Html<String>, HttpError> {
    render_login(&state, &session).await
}

/// POST /login - Check the submitted pair against the configured credentials.
///
/// Success redirects to the services page; a mismatch re-renders the form
/// with the failure message. An unreadable form counts as a mismatch.
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
    form: Result<Form<LoginForm>, FormRejection>,
) -> Result<Response, HttpError> {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            warn!("Unreadable login form: {}", rejection);
            LoginForm::default()
        }
    };

    match state
        .gate
        .login(&session.token, &form.username, &form.password)
        .await
    {
        Ok(()) => {
            info!("User '{}' logged in", form.username);
            state.sessions.push_flash(&session.token, LOGIN_SUCCESS).await?;
            Ok(Redirect::to("/services").into_response())
        }
        Err(err @ AuthError::InvalidCredentials) => {
            debug!("Rejected login attempt for '{}'", form.username);
            state
                .sessions
                .push_flash(&session.token, err.user_message())
                .await?;
            Ok(render_login(&state, &session).await?.into_response())
        }
        Err(AuthError::Port(e)) => Err(HttpError::Storage(e)),
    }
}

/// GET /logout - End the session's authentication unconditionally.
pub async fn logout_handler(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
) -> Result<Redirect, HttpError> {
    state.gate.logout(&session.token).await?;
    state.sessions.push_flash(&session.token, LOGGED_OUT).await?;
    Ok(Redirect::to("/login"))
}
