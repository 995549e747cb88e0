//! SQLite store — durable conversation history in a single database file.
//!
//! One `messages` table holds every turn, keyed by (resource_id,
//! thread_id). Replay order uses a monotonic `seq` column rather than
//! timestamps, so two turns written in the same millisecond still come
//! back in insertion order.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use persona_core::error::StoreError;
use persona_core::message::{ChatRole, Message, ThreadId, Transcript};
use persona_core::store::ThreadStore;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use tracing::{debug, info};

/// A durable SQLite thread store.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Create a new SQLite store from a file path.
    ///
    /// The database and schema are created automatically.
    /// Pass `":memory:"` for an in-process ephemeral database (tests).
    pub async fn new(path: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(path)
            .map_err(|e| StoreError::Storage(format!("Invalid SQLite path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .pragma("foreign_keys", "ON");

        // A pooled ":memory:" database would give each connection its own
        // empty database, so ephemeral databases get a single connection.
        let max_connections = if path.contains(":memory:") { 1 } else { 4 };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Storage(format!("Failed to open SQLite: {e}")))?;

        let store = Self { pool };
        store.run_migrations().await?;
        info!("SQLite thread store initialized at {path}");
        Ok(store)
    }

    /// Run schema migrations — creates the messages table and its index.
    async fn run_migrations(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS messages (
                seq         INTEGER PRIMARY KEY AUTOINCREMENT,
                id          TEXT UNIQUE NOT NULL,
                resource_id TEXT NOT NULL,
                thread_id   TEXT NOT NULL,
                role        TEXT NOT NULL,
                content     TEXT NOT NULL,
                created_at  TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::MigrationFailed(format!("messages table: {e}")))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_messages_thread
             ON messages(resource_id, thread_id, seq)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::MigrationFailed(format!("thread index: {e}")))?;

        debug!("SQLite migrations complete");
        Ok(())
    }

    /// Parse a `Message` from a SQLite row.
    fn row_to_message(row: &sqlx::sqlite::SqliteRow) -> Result<Message, StoreError> {
        let role_text: String = row
            .try_get("role")
            .map_err(|e| StoreError::QueryFailed(format!("role column: {e}")))?;
        let role = match role_text.as_str() {
            "user" => ChatRole::User,
            "assistant" => ChatRole::Assistant,
            "system" => ChatRole::System,
            other => {
                return Err(StoreError::QueryFailed(format!(
                    "unknown role \"{other}\" in messages table"
                )));
            }
        };

        let created_at: String = row
            .try_get("created_at")
            .map_err(|e| StoreError::QueryFailed(format!("created_at column: {e}")))?;
        let timestamp = DateTime::parse_from_rfc3339(&created_at)
            .map_err(|e| StoreError::QueryFailed(format!("bad timestamp: {e}")))?
            .with_timezone(&Utc);

        Ok(Message {
            id: row
                .try_get("id")
                .map_err(|e| StoreError::QueryFailed(format!("id column: {e}")))?,
            role,
            content: row
                .try_get("content")
                .map_err(|e| StoreError::QueryFailed(format!("content column: {e}")))?,
            timestamp,
        })
    }

    fn role_text(role: ChatRole) -> &'static str {
        match role {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
            ChatRole::System => "system",
        }
    }
}

#[async_trait]
impl ThreadStore for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn history(
        &self,
        resource_id: &ThreadId,
        thread_id: &ThreadId,
    ) -> Result<Transcript, StoreError> {
        let rows = sqlx::query(
            "SELECT id, role, content, created_at FROM messages
             WHERE resource_id = ? AND thread_id = ?
             ORDER BY seq ASC",
        )
        .bind(resource_id.as_str())
        .bind(thread_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::QueryFailed(format!("history: {e}")))?;

        let messages = rows
            .iter()
            .map(Self::row_to_message)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Transcript { messages })
    }

    async fn append(
        &self,
        resource_id: &ThreadId,
        thread_id: &ThreadId,
        messages: Vec<Message>,
    ) -> Result<(), StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::Storage(format!("begin transaction: {e}")))?;

        for message in &messages {
            sqlx::query(
                "INSERT INTO messages (id, resource_id, thread_id, role, content, created_at)
                 VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(&message.id)
            .bind(resource_id.as_str())
            .bind(thread_id.as_str())
            .bind(Self::role_text(message.role))
            .bind(&message.content)
            .bind(message.timestamp.to_rfc3339())
            .execute(&mut *tx)
            .await
            .map_err(|e| StoreError::QueryFailed(format!("insert message: {e}")))?;
        }

        tx.commit()
            .await
            .map_err(|e| StoreError::Storage(format!("commit: {e}")))?;

        debug!(
            thread_id = %thread_id,
            count = messages.len(),
            "Appended messages to thread"
        );
        Ok(())
    }

    async fn threads(&self, resource_id: &ThreadId) -> Result<Vec<ThreadId>, StoreError> {
        let rows = sqlx::query(
            "SELECT DISTINCT thread_id FROM messages WHERE resource_id = ? ORDER BY thread_id",
        )
        .bind(resource_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::QueryFailed(format!("threads: {e}")))?;

        rows.iter()
            .map(|row| {
                row.try_get::<String, _>("thread_id")
                    .map(ThreadId)
                    .map_err(|e| StoreError::QueryFailed(format!("thread_id column: {e}")))
            })
            .collect()
    }

    async fn delete_thread(
        &self,
        resource_id: &ThreadId,
        thread_id: &ThreadId,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM messages WHERE resource_id = ? AND thread_id = ?")
            .bind(resource_id.as_str())
            .bind(thread_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::QueryFailed(format!("delete thread: {e}")))?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_store() -> SqliteStore {
        SqliteStore::new(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn append_and_replay() {
        let store = test_store().await;
        let id = ThreadId::from("t1");

        store
            .append(
                &id,
                &id,
                vec![
                    Message::system("You are a pirate."),
                    Message::user("Hello"),
                    Message::assistant("Arr!"),
                ],
            )
            .await
            .unwrap();

        let transcript = store.history(&id, &id).await.unwrap();
        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript.messages[0].role, ChatRole::System);
        assert_eq!(transcript.messages[2].content, "Arr!");
    }

    #[tokio::test]
    async fn replay_order_survives_same_timestamp() {
        let store = test_store().await;
        let id = ThreadId::from("t1");

        // Messages created back-to-back share a millisecond; the seq
        // column must keep replay in insertion order regardless.
        let batch: Vec<Message> = (0..20).map(|i| Message::user(format!("msg-{i}"))).collect();
        store.append(&id, &id, batch).await.unwrap();

        let transcript = store.history(&id, &id).await.unwrap();
        let contents: Vec<&str> = transcript
            .messages
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        let expected: Vec<String> = (0..20).map(|i| format!("msg-{i}")).collect();
        assert_eq!(contents, expected);
    }

    #[tokio::test]
    async fn unknown_thread_yields_empty_transcript() {
        let store = test_store().await;
        let id = ThreadId::from("nothing-here");
        assert!(store.history(&id, &id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_thread_removes_rows() {
        let store = test_store().await;
        let keep = ThreadId::from("keep");
        let drop_ = ThreadId::from("drop");

        store.append(&keep, &keep, vec![Message::user("kept")]).await.unwrap();
        store.append(&drop_, &drop_, vec![Message::user("gone")]).await.unwrap();

        assert!(store.delete_thread(&drop_, &drop_).await.unwrap());
        assert!(store.history(&drop_, &drop_).await.unwrap().is_empty());
        assert_eq!(store.history(&keep, &keep).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn lists_threads_for_resource() {
        let store = test_store().await;
        let res = ThreadId::from("res");

        store
            .append(&res, &ThreadId::from("t1"), vec![Message::user("a")])
            .await
            .unwrap();
        store
            .append(&res, &ThreadId::from("t2"), vec![Message::user("b")])
            .await
            .unwrap();

        let threads = store.threads(&res).await.unwrap();
        assert_eq!(threads.len(), 2);
        assert_eq!(threads[0].as_str(), "t1");
        assert_eq!(threads[1].as_str(), "t2");
    }
}
