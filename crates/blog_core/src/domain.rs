//! crates/blog_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, Utc};

/// A stored blog entry. Posts are never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
}

/// Returned when a required post field is missing or empty.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Missing fields: {}", .missing.join(", "))]
pub struct ValidationError {
    pub missing: Vec<&'static str>,
}

/// The validated input of a create operation.
///
/// The only way to obtain one is through [`NewPost::new`], so every value of
/// this type carries three non-empty fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    title: String,
    content: String,
    author: String,
}

impl NewPost {
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        author: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let (title, content, author) = (title.into(), content.into(), author.into());

        let missing: Vec<&'static str> = [("title", &title), ("content", &content), ("author", &author)]
            .into_iter()
            .filter(|(_, value)| value.is_empty())
            .map(|(name, _)| name)
            .collect();
        if !missing.is_empty() {
            return Err(ValidationError { missing });
        }

        Ok(Self { title, content, author })
    }

    /// Builds a create input from optional fields, treating `None` as empty.
    pub fn from_parts(
        title: Option<String>,
        content: Option<String>,
        author: Option<String>,
    ) -> Result<Self, ValidationError> {
        Self::new(
            title.unwrap_or_default(),
            content.unwrap_or_default(),
            author.unwrap_or_default(),
        )
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    /// Attaches the store-assigned identity, consuming the input.
    pub fn into_post(self, id: i64, created_at: DateTime<Utc>) -> Post {
        Post {
            id,
            title: self.title,
            content: self.content,
            author: self.author,
            created_at,
        }
    }
}

/// Whether a client session has passed the login check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthState {
    #[default]
    Anonymous,
    Authenticated,
}

/// The single username/password pair accepted by the login form.
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Exact, case-sensitive comparison of both fields.
    pub fn matches(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}

// Never print the password, even in debug logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// The outcome of checking a session against the protected route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    Deny { reason: &'static str },
}

/// A point-in-time reading of host metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemMetrics {
    pub cpu_percent: f32,
    pub memory_percent: f32,
    pub uptime_seconds: u64,
    pub platform: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_post_accepts_non_empty_fields() {
        let post = NewPost::new("Hi", "Hello", "Ana").unwrap();
        assert_eq!(post.title(), "Hi");
        assert_eq!(post.content(), "Hello");
        assert_eq!(post.author(), "Ana");
    }

    #[test]
    fn new_post_reports_every_empty_field() {
        let err = NewPost::new("", "x", "").unwrap_err();
        assert_eq!(err.missing, vec!["title", "author"]);
    }

    #[test]
    fn absent_parts_count_as_missing() {
        let err = NewPost::from_parts(Some("t".into()), None, Some("a".into())).unwrap_err();
        assert_eq!(err.missing, vec!["content"]);
    }

    #[test]
    fn credentials_are_case_sensitive() {
        let creds = Credentials::new("admin", "secret");
        assert!(creds.matches("admin", "secret"));
        assert!(!creds.matches("Admin", "secret"));
        assert!(!creds.matches("admin", "SECRET"));
    }

    #[test]
    fn credentials_debug_hides_password() {
        let creds = Credentials::new("admin", "secret");
        assert!(!format!("{:?}", creds).contains("secret"));
    }
}
