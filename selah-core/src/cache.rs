//! Insight-cache implementations.
//!
//! The synthesizer only sees the [`InsightCache`] trait; this module supplies
//! the SQLite store used in production (one row per user/time-range, upserted
//! once per calendar day) and an in-memory map for tests.

use crate::error::{Error, Result};
use crate::insight::{CacheEntry, InsightCache};
use crate::types::TimeRange;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Current cache schema version
const SCHEMA_VERSION: i32 = 1;

const MIGRATIONS: &[&str] = &[
    // Version 1: initial schema
    r#"
    CREATE TABLE IF NOT EXISTS insight_cache (
        user_id      TEXT NOT NULL,
        time_range   TEXT NOT NULL,
        insights     JSON NOT NULL,
        analytics    JSON NOT NULL,
        generated_at TEXT NOT NULL,
        PRIMARY KEY (user_id, time_range)
    );
    "#,
];

/// SQLite-backed insight cache.
pub struct SqliteInsightCache {
    conn: Mutex<Connection>,
}

impl SqliteInsightCache {
    /// Open (or create) the cache database at `path` and run migrations.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        let cache = Self {
            conn: Mutex::new(conn),
        };
        cache.migrate()?;
        Ok(cache)
    }

    /// Open an in-memory cache (tests).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let cache = Self {
            conn: Mutex::new(conn),
        };
        cache.migrate()?;
        Ok(cache)
    }

    fn migrate(&self) -> Result<()> {
        let conn = self.lock();
        let version: i32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

        for (i, migration) in MIGRATIONS.iter().enumerate() {
            let target = i as i32 + 1;
            if version < target {
                conn.execute_batch(migration)?;
                conn.pragma_update(None, "user_version", target)?;
                tracing::debug!(version = target, "Applied insight-cache migration");
            }
        }

        debug_assert_eq!(MIGRATIONS.len() as i32, SCHEMA_VERSION);
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Connection> {
        // A poisoned lock only means a prior panic mid-query; the connection
        // itself is still usable.
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl InsightCache for SqliteInsightCache {
    fn get(&self, user_id: &str, range: TimeRange) -> Result<Option<CacheEntry>> {
        let conn = self.lock();
        let row = conn
            .query_row(
                "SELECT insights, analytics, generated_at
                 FROM insight_cache WHERE user_id = ?1 AND time_range = ?2",
                params![user_id, range.as_str()],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()?;

        let Some((insights, analytics, generated_at)) = row else {
            return Ok(None);
        };

        let generated_at = DateTime::parse_from_rfc3339(&generated_at)
            .map_err(|e| Error::Config(format!("corrupt generated_at in cache: {}", e)))?
            .with_timezone(&Utc);

        Ok(Some(CacheEntry {
            insights: serde_json::from_str(&insights)?,
            analytics: serde_json::from_str(&analytics)?,
            generated_at,
        }))
    }

    fn put(&self, user_id: &str, range: TimeRange, entry: &CacheEntry) -> Result<()> {
        let insights = serde_json::to_string(&entry.insights)?;
        let analytics = serde_json::to_string(&entry.analytics)?;

        let conn = self.lock();
        conn.execute(
            "INSERT INTO insight_cache (user_id, time_range, insights, analytics, generated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT (user_id, time_range) DO UPDATE SET
                 insights = excluded.insights,
                 analytics = excluded.analytics,
                 generated_at = excluded.generated_at",
            params![
                user_id,
                range.as_str(),
                insights,
                analytics,
                entry.generated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }
}

/// In-memory insight cache for tests and callers without persistence.
#[derive(Debug, Clone, Default)]
pub struct MemoryInsightCache {
    entries: Arc<Mutex<HashMap<(String, TimeRange), CacheEntry>>>,
}

impl MemoryInsightCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl InsightCache for MemoryInsightCache {
    fn get(&self, user_id: &str, range: TimeRange) -> Result<Option<CacheEntry>> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(&(user_id.to_string(), range)).cloned())
    }

    fn put(&self, user_id: &str, range: TimeRange, entry: &CacheEntry) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert((user_id.to_string(), range), entry.clone());
        Ok(())
    }
}
