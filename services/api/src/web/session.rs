//! services/api/src/web/session.rs
//!
//! Cookie transport for browser sessions.
//!
//! The `with_session` middleware resolves the client's opaque token and hands
//! it to handlers as an explicit `SessionContext` request extension.

use axum::{
    extract::Request,
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::{debug, error};
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "session";

/// The session a request belongs to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionContext {
    pub token: String,
    /// The token was minted for this request; the client has not yet shown
    /// that it keeps cookies.
    pub is_new: bool,
}

/// Returns the session token carried by the `Cookie` header, if it is well formed.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .find_map(|c| {
            let (name, value) = c.trim().split_once('=')?;
            (name == SESSION_COOKIE).then_some(value)
        })
        .and_then(|value| Uuid::parse_str(value).ok())
        .map(|id| id.to_string())
}

/// Attaches a `SessionContext` to the request, minting a token (and setting
/// the cookie on the response) when the client did not present one.
pub async fn with_session(mut req: Request, next: Next) -> Response {
    let (token, minted) = match session_token(req.headers()) {
        Some(token) => (token, false),
        None => (Uuid::new_v4().to_string(), true),
    };
    if minted {
        debug!("Starting new browser session");
    }

    req.extensions_mut().insert(SessionContext {
        token: token.clone(),
        is_new: minted,
    });
    let mut response = next.run(req).await;

    if minted {
        let cookie = format!("{}={}; HttpOnly; SameSite=Lax; Path=/", SESSION_COOKIE, token);
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            Err(e) => error!("Failed to build session cookie: {:?}", e),
        }
    }
    response
}
