//! Durable key/value store contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide a `localStorage`-like string key/value surface for the durable
//!   tier of the content cache and the world preference.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Every operation is fallible; callers decide whether a failure matters.
//! - A configured quota bounds the total stored bytes (keys + values); a write
//!   that would exceed it fails with `StoreError::QuotaExceeded` and leaves
//!   the previous value untouched.

use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Durable-tier failure.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    QuotaExceeded {
        key: String,
        required_bytes: u64,
        quota_bytes: u64,
    },
    /// Store is not reachable at all (e.g. disabled by the host).
    Unavailable(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::QuotaExceeded {
                key,
                required_bytes,
                quota_bytes,
            } => write!(
                f,
                "quota exceeded writing `{key}`: {required_bytes} bytes required, {quota_bytes} allowed"
            ),
            Self::Unavailable(reason) => write!(f, "durable store unavailable: {reason}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::QuotaExceeded { .. } | Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// String key/value storage surviving process restarts.
pub trait DurableStore {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> StoreResult<()>;
    fn remove_item(&self, key: &str) -> StoreResult<()>;
}

impl<S: DurableStore + ?Sized> DurableStore for &S {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> StoreResult<()> {
        (**self).remove_item(key)
    }
}

/// SQLite-backed durable store over the `local_store` table.
pub struct SqliteLocalStore<'conn> {
    conn: &'conn Connection,
    quota_bytes: Option<u64>,
}

impl<'conn> SqliteLocalStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self {
            conn,
            quota_bytes: None,
        }
    }

    /// Caps total stored bytes, mirroring browser storage quotas.
    pub fn with_quota_bytes(mut self, quota_bytes: u64) -> Self {
        self.quota_bytes = Some(quota_bytes);
        self
    }

    /// Returns the number of bytes currently stored (keys + values).
    pub fn used_bytes(&self) -> StoreResult<u64> {
        let used: i64 = self.conn.query_row(
            "SELECT COALESCE(SUM(length(CAST(key AS BLOB)) + length(CAST(value AS BLOB))), 0)
             FROM local_store;",
            [],
            |row| row.get(0),
        )?;
        Ok(u64::try_from(used).unwrap_or(0))
    }

    /// Lists stored keys starting with `prefix`, sorted ascending.
    pub fn keys_with_prefix(&self, prefix: &str) -> StoreResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT key FROM local_store
             WHERE substr(key, 1, length(?1)) = ?1
             ORDER BY key ASC;",
        )?;
        let keys = stmt
            .query_map([prefix], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(keys)
    }

    fn check_quota(&self, key: &str, value: &str) -> StoreResult<()> {
        let Some(quota_bytes) = self.quota_bytes else {
            return Ok(());
        };

        let existing: i64 = self
            .conn
            .query_row(
                "SELECT length(CAST(key AS BLOB)) + length(CAST(value AS BLOB))
                 FROM local_store WHERE key = ?1;",
                [key],
                |row| row.get(0),
            )
            .optional()?
            .unwrap_or(0);
        let incoming = (key.len() + value.len()) as u64;
        let required_bytes = self
            .used_bytes()?
            .saturating_sub(u64::try_from(existing).unwrap_or(0))
            + incoming;

        if required_bytes > quota_bytes {
            return Err(StoreError::QuotaExceeded {
                key: key.to_string(),
                required_bytes,
                quota_bytes,
            });
        }
        Ok(())
    }
}

impl DurableStore for SqliteLocalStore<'_> {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM local_store WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_item(&self, key: &str, value: &str) -> StoreResult<()> {
        self.check_quota(key, value)?;

        self.conn.execute(
            "INSERT INTO local_store (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StoreResult<()> {
        self.conn
            .execute("DELETE FROM local_store WHERE key = ?1;", [key])?;
        Ok(())
    }
}
