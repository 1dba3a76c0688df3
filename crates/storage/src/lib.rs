use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Row, Sqlite,
};
use tokio::sync::Mutex;
use tracing::debug;

/// Client-local key-value store with per-entry expiry.
///
/// Expired entries read as absent; `set` always overwrites the whole value.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str, ttl_days: u32) -> Result<()>;
}

fn expiry_from_now(ttl_days: u32) -> Result<DateTime<Utc>> {
    Duration::try_days(i64::from(ttl_days))
        .and_then(|ttl| Utc::now().checked_add_signed(ttl))
        .with_context(|| format!("expiry of {ttl_days} days is out of range"))
}

fn is_live(expires_at: DateTime<Utc>) -> bool {
    expires_at > Utc::now()
}

#[derive(Debug, Clone)]
struct MemoryEntry {
    value: String,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, MemoryEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut guard = self.entries.lock().await;
        match guard.get(key) {
            Some(entry) if is_live(entry.expires_at) => Ok(Some(entry.value.clone())),
            Some(_) => {
                guard.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str, ttl_days: u32) -> Result<()> {
        let expires_at = expiry_from_now(ttl_days)?;
        self.entries.lock().await.insert(
            key.to_string(),
            MemoryEntry {
                value: value.to_string(),
                expires_at,
            },
        );
        Ok(())
    }
}

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("invalid sqlite url '{database_url}'"))?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    /// Deletes every entry whose expiry has passed, returning how many went.
    pub async fn purge_expired(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM kv_entries WHERE expires_at <= ?")
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .context("failed to purge expired kv entries")?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl KeyValueStore for Storage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let row = sqlx::query("SELECT value, expires_at FROM kv_entries WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("failed to read kv entry '{key}'"))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let expires_at: DateTime<Utc> = row.try_get("expires_at")?;
        if !is_live(expires_at) {
            debug!("storage: expired entry key={key} expires_at={expires_at}");
            return Ok(None);
        }

        Ok(Some(row.try_get::<String, _>("value")?))
    }

    async fn set(&self, key: &str, value: &str, ttl_days: u32) -> Result<()> {
        let expires_at = expiry_from_now(ttl_days)?;
        sqlx::query(
            "INSERT INTO kv_entries (key, value, expires_at, updated_at)
             VALUES (?, ?, ?, CURRENT_TIMESTAMP)
             ON CONFLICT(key) DO UPDATE SET value=excluded.value, expires_at=excluded.expires_at, updated_at=CURRENT_TIMESTAMP",
        )
        .bind(key)
        .bind(value)
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .with_context(|| format!("failed to write kv entry '{key}'"))?;
        Ok(())
    }
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url == "sqlite::memory:" || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
