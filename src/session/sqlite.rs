//! SQLite-backed session store.
//!
//! One `sessions` table keyed by session id; node and edge snapshots are
//! stored as JSON columns so the schema survives payload evolution, and
//! timestamps are RFC3339 strings. The schema is applied on connect.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use tracing::{debug, instrument};

use super::{Result, Session, SessionStore, SessionStoreError, SessionSummary};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS sessions (
    id TEXT PRIMARY KEY,
    repo_url TEXT NOT NULL,
    created_at TEXT NOT NULL,
    last_modified TEXT NOT NULL,
    nodes_json TEXT NOT NULL,
    edges_json TEXT NOT NULL
)";

/// Client-local session database.
#[derive(Clone, Debug)]
pub struct SqliteSessionStore {
    pool: SqlitePool,
}

impl SqliteSessionStore {
    /// Connects to (and creates, if missing) the database at `url`, e.g.
    /// `sqlite://launchloom.db`, and applies the schema.
    pub async fn connect(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(SessionStoreError::Sqlx)?
            .create_if_missing(true);
        // A shared :memory: database only exists per connection; keep the
        // pool at one connection so tests see a single database.
        let max_connections = if url.contains(":memory:") { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;
        sqlx::query(SCHEMA).execute(&pool).await?;
        debug!(url, "session store ready");
        Ok(Self { pool })
    }

    /// An isolated in-memory database, handy for tests.
    pub async fn in_memory() -> Result<Self> {
        Self::connect("sqlite::memory:").await
    }

    fn row_to_session(row: &SqliteRow) -> Result<Session> {
        let nodes_json: String = row.try_get("nodes_json")?;
        let edges_json: String = row.try_get("edges_json")?;
        Ok(Session {
            id: row.try_get("id")?,
            repo_url: row.try_get("repo_url")?,
            created_at: parse_timestamp(&row.try_get::<String, _>("created_at")?),
            last_modified: parse_timestamp(&row.try_get::<String, _>("last_modified")?),
            nodes: serde_json::from_str(&nodes_json)?,
            edges: serde_json::from_str(&edges_json)?,
        })
    }
}

fn parse_timestamp(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
    #[instrument(skip(self))]
    async fn load(&self, id: &str) -> Result<Option<Session>> {
        let row = sqlx::query("SELECT * FROM sessions WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(row) => Ok(Some(Self::row_to_session(&row)?)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self, session), fields(id = %session.id))]
    async fn save(&self, session: &Session) -> Result<()> {
        let nodes_json = serde_json::to_string(&session.nodes)?;
        let edges_json = serde_json::to_string(&session.edges)?;
        sqlx::query(
            "INSERT INTO sessions (id, repo_url, created_at, last_modified, nodes_json, edges_json)
             VALUES (?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                 repo_url = excluded.repo_url,
                 last_modified = excluded.last_modified,
                 nodes_json = excluded.nodes_json,
                 edges_json = excluded.edges_json",
        )
        .bind(&session.id)
        .bind(&session.repo_url)
        .bind(session.created_at.to_rfc3339())
        .bind(session.last_modified.to_rfc3339())
        .bind(nodes_json)
        .bind(edges_json)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<SessionSummary>> {
        let rows = sqlx::query(
            "SELECT id, repo_url, created_at, last_modified
             FROM sessions ORDER BY last_modified DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.iter()
            .map(|row| {
                Ok(SessionSummary {
                    id: row.try_get("id")?,
                    repo_url: row.try_get("repo_url")?,
                    created_at: parse_timestamp(&row.try_get::<String, _>("created_at")?),
                    last_modified: parse_timestamp(&row.try_get::<String, _>("last_modified")?),
                })
            })
            .collect()
    }
}
