//! crates/blog_core/src/gate.rs
//!
//! The session gate: decides whether a client may see the protected pages.

use std::sync::Arc;

use crate::domain::{AuthState, Credentials, GateDecision};
use crate::ports::{PortError, PortResult, SessionStore};

pub const LOGIN_SUCCESS: &str = "Login successful!";
pub const INVALID_CREDENTIALS: &str = "Invalid credentials. Please try again.";
pub const LOGIN_REQUIRED: &str = "Please log in to access services.";
pub const LOGGED_OUT: &str = "You've been logged out.";

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("{}", INVALID_CREDENTIALS)]
    InvalidCredentials,
    #[error(transparent)]
    Port(#[from] PortError),
}

impl AuthError {
    /// The message shown to the user on the re-rendered login page.
    pub fn user_message(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => INVALID_CREDENTIALS,
            AuthError::Port(_) => "Login is temporarily unavailable. Please try again.",
        }
    }
}

/// Binary authenticated/anonymous gate over a [`SessionStore`].
#[derive(Clone)]
pub struct SessionGate {
    credentials: Credentials,
    sessions: Arc<dyn SessionStore>,
}

impl SessionGate {
    pub fn new(credentials: Credentials, sessions: Arc<dyn SessionStore>) -> Self {
        Self {
            credentials,
            sessions,
        }
    }

    /// Checks the pair against the configured credentials.
    ///
    /// A mismatch leaves the session anonymous; there is no lockout or delay.
    pub async fn login(&self, token: &str, username: &str, password: &str) -> Result<(), AuthError> {
        if !self.credentials.matches(username, password) {
            self.sessions
                .set_auth_state(token, AuthState::Anonymous)
                .await?;
            return Err(AuthError::InvalidCredentials);
        }

        self.sessions
            .set_auth_state(token, AuthState::Authenticated)
            .await?;
        Ok(())
    }

    pub async fn logout(&self, token: &str) -> PortResult<()> {
        self.sessions
            .set_auth_state(token, AuthState::Anonymous)
            .await
    }

    pub async fn guard(&self, token: &str) -> PortResult<GateDecision> {
        match self.sessions.auth_state(token).await? {
            AuthState::Authenticated => Ok(GateDecision::Allow),
            AuthState::Anonymous => Ok(GateDecision::Deny {
                reason: LOGIN_REQUIRED,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MapSessions {
        states: Mutex<HashMap<String, AuthState>>,
    }

    #[async_trait]
    impl SessionStore for MapSessions {
        async fn auth_state(&self, token: &str) -> PortResult<AuthState> {
            Ok(self.states.lock().unwrap().get(token).copied().unwrap_or_default())
        }

        async fn set_auth_state(&self, token: &str, state: AuthState) -> PortResult<()> {
            self.states.lock().unwrap().insert(token.to_string(), state);
            Ok(())
        }

        async fn push_flash(&self, _token: &str, _message: &str) -> PortResult<()> {
            Ok(())
        }

        async fn take_flashes(&self, _token: &str) -> PortResult<Vec<String>> {
            Ok(Vec::new())
        }
    }

    fn gate() -> SessionGate {
        SessionGate::new(
            Credentials::new("admin", "password123"),
            Arc::new(MapSessions::default()),
        )
    }

    #[tokio::test]
    async fn unknown_session_is_denied() {
        let decision = gate().guard("fresh").await.unwrap();
        assert_eq!(decision, GateDecision::Deny { reason: LOGIN_REQUIRED });
    }

    #[tokio::test]
    async fn login_then_logout_round_trip() {
        let gate = gate();
        gate.login("t1", "admin", "password123").await.unwrap();
        assert_eq!(gate.guard("t1").await.unwrap(), GateDecision::Allow);

        gate.logout("t1").await.unwrap();
        assert!(matches!(gate.guard("t1").await.unwrap(), GateDecision::Deny { .. }));
    }

    #[tokio::test]
    async fn wrong_password_keeps_session_anonymous() {
        let gate = gate();
        let err = gate.login("t1", "admin", "wrongpass").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
        assert_eq!(err.user_message(), INVALID_CREDENTIALS);
        assert!(matches!(gate.guard("t1").await.unwrap(), GateDecision::Deny { .. }));
    }

    #[tokio::test]
    async fn sessions_are_independent() {
        let gate = gate();
        gate.login("a", "admin", "password123").await.unwrap();
        assert_eq!(gate.guard("a").await.unwrap(), GateDecision::Allow);
        assert!(matches!(gate.guard("b").await.unwrap(), GateDecision::Deny { .. }));
    }

    #[tokio::test]
    async fn logout_of_anonymous_session_succeeds() {
        let gate = gate();
        gate.logout("never-seen").await.unwrap();
        assert!(matches!(gate.guard("never-seen").await.unwrap(), GateDecision::Deny { .. }));
    }
}
