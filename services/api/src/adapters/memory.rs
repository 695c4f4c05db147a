//! services/api/src/adapters/memory.rs
//!
//! In-process implementations of the storage ports. The post store backs the
//! test suite and `DATABASE_URL=memory`; the session store is what the server
//! uses for browser sessions.

use std::collections::HashMap;

use async_trait::async_trait;
use blog_core::domain::{AuthState, NewPost, Post};
use blog_core::ports::{PortResult, PostStore, SessionStore};
use tokio::sync::RwLock;

use super::next_timestamp;

//=========================================================================================
// Posts
//=========================================================================================

#[derive(Default)]
struct PostTable {
    rows: Vec<Post>,
    last_id: i64,
}

/// A `PostStore` that keeps posts in insertion order behind a single lock.
#[derive(Default)]
pub struct InMemoryPostStore {
    table: RwLock<PostTable>,
}

impl InMemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostStore for InMemoryPostStore {
    async fn create(&self, post: NewPost) -> PortResult<Post> {
        let mut table = self.table.write().await;

        let created_at = next_timestamp(table.rows.last().map(|p| p.created_at));
        table.last_id += 1;
        let stored = post.into_post(table.last_id, created_at);
        table.rows.push(stored.clone());

        Ok(stored)
    }

    async fn list_all(&self) -> PortResult<Vec<Post>> {
        let table = self.table.read().await;
        // Rows are appended with non-decreasing timestamps, so reversing the
        // insertion order is the same as sorting by (created_at, id) descending.
        Ok(table.rows.iter().rev().cloned().collect())
    }
}

//=========================================================================================
// Sessions
//=========================================================================================

#[derive(Debug, Default)]
struct SessionEntry {
    auth: AuthState,
    flashes: Vec<String>,
}

impl SessionEntry {
    /// An idle entry is indistinguishable from an unknown token.
    fn is_idle(&self) -> bool {
        self.auth == AuthState::Anonymous && self.flashes.is_empty()
    }
}

fn prune_idle(sessions: &mut HashMap<String, SessionEntry>, token: &str) {
    if sessions.get(token).is_some_and(SessionEntry::is_idle) {
        sessions.remove(token);
    }
}

/// A `SessionStore` holding every client's state in a token-keyed map.
///
/// Only authenticated sessions and sessions with undelivered flashes keep an
/// entry, so anonymous traffic does not grow the map.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, SessionEntry>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn auth_state(&self, token: &str) -> PortResult<AuthState> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(token).map(|s| s.auth).unwrap_or_default())
    }

    async fn set_auth_state(&self, token: &str, state: AuthState) -> PortResult<()> {
        let mut sessions = self.sessions.write().await;
        sessions.entry(token.to_string()).or_default().auth = state;
        prune_idle(&mut sessions, token);
        Ok(())
    }

    async fn push_flash(&self, token: &str, message: &str) -> PortResult<()> {
        let mut sessions = self.sessions.write().await;
        sessions
            .entry(token.to_string())
            .or_default()
            .flashes
            .push(message.to_string());
        Ok(())
    }

    async fn take_flashes(&self, token: &str) -> PortResult<Vec<String>> {
        let mut sessions = self.sessions.write().await;
        let flashes = sessions
            .get_mut(token)
            .map(|s| std::mem::take(&mut s.flashes))
            .unwrap_or_default();
        prune_idle(&mut sessions, token);
        Ok(flashes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn posts_list_newest_first_with_unique_ids() {
        let store = InMemoryPostStore::new();
        let first = store.create(NewPost::new("a", "b", "c").unwrap()).await.unwrap();
        let second = store.create(NewPost::new("d", "e", "f").unwrap()).await.unwrap();

        assert_ne!(first.id, second.id);
        assert!(second.created_at >= first.created_at);
        assert_eq!(store.list_all().await.unwrap(), vec![second, first]);
    }

    #[tokio::test]
    async fn concurrent_creates_do_not_lose_posts() {
        let store = Arc::new(InMemoryPostStore::new());
        let handles: Vec<_> = (0..20)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .create(NewPost::new(format!("t{i}"), "c", "a").unwrap())
                        .await
                        .unwrap()
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        let posts = store.list_all().await.unwrap();
        let mut ids: Vec<i64> = posts.iter().map(|p| p.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, (1..=20).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn flashes_drain_once() {
        let store = InMemorySessionStore::new();
        store.push_flash("t", "one").await.unwrap();
        store.push_flash("t", "two").await.unwrap();

        assert_eq!(store.take_flashes("t").await.unwrap(), vec!["one", "two"]);
        assert!(store.take_flashes("t").await.unwrap().is_empty());
    }

    async fn tracked_sessions(store: &InMemorySessionStore) -> usize {
        store.sessions.read().await.len()
    }

    #[tokio::test]
    async fn delivered_flashes_release_anonymous_sessions() {
        let store = InMemorySessionStore::new();
        for i in 0..50 {
            let token = format!("visitor-{i}");
            store.push_flash(&token, "Please log in to access services.").await.unwrap();
            store.take_flashes(&token).await.unwrap();
        }
        assert_eq!(tracked_sessions(&store).await, 0);
    }

    #[tokio::test]
    async fn logout_forgets_session_once_flashes_are_shown() {
        let store = InMemorySessionStore::new();
        store.set_auth_state("t", AuthState::Authenticated).await.unwrap();
        store.push_flash("t", "Login successful!").await.unwrap();
        assert_eq!(store.take_flashes("t").await.unwrap(), vec!["Login successful!"]);
        assert_eq!(tracked_sessions(&store).await, 1);
        assert_eq!(store.auth_state("t").await.unwrap(), AuthState::Authenticated);

        store.set_auth_state("t", AuthState::Anonymous).await.unwrap();
        assert_eq!(tracked_sessions(&store).await, 0);

        store.set_auth_state("t", AuthState::Anonymous).await.unwrap();
        store.push_flash("t", "bye").await.unwrap();
        assert_eq!(tracked_sessions(&store).await, 1);
        assert_eq!(store.take_flashes("t").await.unwrap(), vec!["bye"]);
        assert_eq!(tracked_sessions(&store).await, 0);
    }

    #[tokio::test]
    async fn unknown_token_is_anonymous() {
        let store = InMemorySessionStore::new();
        assert_eq!(store.auth_state("nobody").await.unwrap(), AuthState::Anonymous);
        assert!(store.take_flashes("nobody").await.unwrap().is_empty());
    }
}
