//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `PostStore` port from the `core` crate. It handles all interactions
//! with the SQLite database using `sqlx`.

use std::sync::Arc;

use async_trait::async_trait;
use blog_core::domain::{NewPost, Post};
use blog_core::ports::{PortError, PortResult, PostStore};
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;
use tokio::sync::Mutex;
use tracing::debug;

use super::next_timestamp;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `PostStore` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: SqlitePool,
    /// Serialises id/timestamp assignment across concurrent `create` calls.
    write_lock: Arc<Mutex<()>>,
}

impl DbAdapter {
    /// Creates a new `DbAdapter` over an existing pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Opens a pool for `database_url` and makes sure the schema exists.
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        let adapter = Self::new(pool);
        adapter.ensure_schema().await?;
        Ok(adapter)
    }

    /// Creates the `posts` table when it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS posts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title VARCHAR(200) NOT NULL,
                content TEXT NOT NULL,
                author VARCHAR(100) NOT NULL,
                created_at DATETIME NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct PostRecord {
    id: i64,
    title: String,
    content: String,
    author: String,
    created_at: DateTime<Utc>,
}
impl PostRecord {
    fn to_domain(self) -> Post {
        Post {
            id: self.id,
            title: self.title,
            content: self.content,
            author: self.author,
            created_at: self.created_at,
        }
    }
}

fn storage_fault(e: sqlx::Error) -> PortError {
    PortError::Storage(e.to_string())
}

//=========================================================================================
// `PostStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl PostStore for DbAdapter {
    async fn create(&self, post: NewPost) -> PortResult<Post> {
        let _writer = self.write_lock.lock().await;

        // Dropping `tx` on any early return rolls the insert back.
        let mut tx = self.pool.begin().await.map_err(storage_fault)?;

        let latest = sqlx::query_scalar::<_, DateTime<Utc>>(
            "SELECT created_at FROM posts ORDER BY created_at DESC, id DESC LIMIT 1",
        )
        .fetch_optional(&mut *tx)
        .await
        .map_err(storage_fault)?;
        let created_at = next_timestamp(latest);

        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO posts (title, content, author, created_at) VALUES (?, ?, ?, ?) RETURNING id",
        )
        .bind(post.title())
        .bind(post.content())
        .bind(post.author())
        .bind(created_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(storage_fault)?;

        tx.commit().await.map_err(storage_fault)?;
        debug!("Stored post {}", id);

        Ok(post.into_post(id, created_at))
    }

    async fn list_all(&self) -> PortResult<Vec<Post>> {
        let records = sqlx::query_as::<_, PostRecord>(
            "SELECT id, title, content, author, created_at FROM posts ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(storage_fault)?;

        let posts = records.into_iter().map(|r| r.to_domain()).collect();
        Ok(posts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::SubsecRound;
    use std::collections::HashSet;

    async fn memory_adapter() -> DbAdapter {
        // A single connection, since every `:memory:` connection is its own database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let adapter = DbAdapter::new(pool);
        adapter.ensure_schema().await.unwrap();
        adapter
    }

    #[tokio::test]
    async fn empty_table_lists_nothing() {
        let db = memory_adapter().await;
        assert!(db.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_assigns_id_and_timestamp() {
        let db = memory_adapter().await;
        let before = Utc::now();
        let post = db
            .create(NewPost::new("Hi", "Hello", "Ana").unwrap())
            .await
            .unwrap();

        assert_eq!(post.id, 1);
        assert_eq!(post.title, "Hi");
        assert!(post.created_at >= before.trunc_subsecs(6));

        let listed = db.list_all().await.unwrap();
        assert_eq!(listed, vec![post]);
    }

    #[tokio::test]
    async fn listing_is_reverse_insertion_order() {
        let db = memory_adapter().await;
        for i in 0..5 {
            db.create(NewPost::new(format!("t{i}"), "c", "a").unwrap())
                .await
                .unwrap();
        }

        let titles: Vec<String> = db
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, vec!["t4", "t3", "t2", "t1", "t0"]);
    }

    #[tokio::test]
    async fn concurrent_creates_get_distinct_ids() {
        let db = memory_adapter().await;
        let handles: Vec<_> = (0..10)
            .map(|i| {
                let db = db.clone();
                tokio::spawn(async move {
                    db.create(NewPost::new(format!("t{i}"), "c", "a").unwrap())
                        .await
                        .unwrap()
                        .id
                })
            })
            .collect();

        let mut ids = HashSet::new();
        for handle in handles {
            ids.insert(handle.await.unwrap());
        }
        assert_eq!(ids.len(), 10);
        assert_eq!(db.list_all().await.unwrap().len(), 10);
    }
}
