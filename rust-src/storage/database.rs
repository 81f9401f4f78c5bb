//! SQLite store for usage samples, blocked apps, limits and toggle history.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::{GuardError, GuardResult};
use crate::models::{
    AppLimit,
    AppUsage,
    BlockedApp,
    NewUsageSample,
    Period,
    ToggleHistoryEntry,
    ToggleReason,
    Traffic,
    UsageSample,
};


const SAMPLE_COLUMNS: &str =
    "id, timestamp, tx_bytes, rx_bytes, counter_tx, counter_rx, top_apps_json, period";


/// Store summary.
#[derive(Debug, Clone, Default)]
pub struct StoreStats {
    pub total_samples: i64,
    pub oldest: Option<DateTime<Utc>>,
    pub newest: Option<DateTime<Utc>>,
    pub total_traffic: Traffic,
    pub blocked_apps: i64,
    pub app_limits: i64,
    pub toggle_entries: i64,
}


/// The process-wide persistent store.
///
/// One connection guarded by a mutex: writers from the tick loop, the
/// screen-lock timer and CLI commands are serialized through it.
pub struct Store {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}


impl Store {
    /// Open (creating if needed) the database at `path`.
    pub fn open(path: &Path) -> GuardResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|source| GuardError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let conn = Connection::open(path)?;
        init_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
            path: Some(path.to_path_buf()),
        })
    }

    /// Open a throwaway in-memory store.
    #[allow(dead_code)]
    pub fn open_in_memory() -> GuardResult<Self> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
            path: None,
        })
    }

    /// Database file location, `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    // ── usage samples ──

    /// Append a sample and return it with its assigned id.
    pub fn insert_usage(&self, sample: NewUsageSample) -> GuardResult<UsageSample> {
        let top_apps_json = serde_json::to_string(&sample.top_consumers)?;
        let conn = self.conn.lock();

        conn.execute(
            "INSERT INTO usage_samples (
                timestamp, tx_bytes, rx_bytes, counter_tx, counter_rx, top_apps_json, period
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                sample.timestamp.timestamp_millis(),
                to_sql_int(sample.delta.tx_bytes),
                to_sql_int(sample.delta.rx_bytes),
                to_sql_int(sample.counters.tx_bytes),
                to_sql_int(sample.counters.rx_bytes),
                top_apps_json,
                sample.period.as_str(),
            ],
        )?;

        Ok(UsageSample::from_new(conn.last_insert_rowid(), sample))
    }

    /// Most recently inserted sample.
    ///
    /// Ordered by insertion rather than timestamp so that a wall-clock jump
    /// does not change which reading the next delta is taken against.
    pub fn latest_usage(&self) -> GuardResult<Option<UsageSample>> {
        let conn = self.conn.lock();
        let sample = conn
            .query_row(
                &format!("SELECT {SAMPLE_COLUMNS} FROM usage_samples ORDER BY id DESC LIMIT 1"),
                [],
                sample_from_row,
            )
            .optional()?;
        Ok(sample)
    }

    /// Newest samples carrying a period tag.
    #[allow(dead_code)]
    pub fn usage_by_period(&self, period: Period, limit: usize) -> GuardResult<Vec<UsageSample>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!(
            "SELECT {SAMPLE_COLUMNS} FROM usage_samples
             WHERE period = ?1 ORDER BY timestamp DESC LIMIT ?2"
        ))?;
        let samples = stmt
            .query_map(params![period.as_str(), to_sql_int(limit as u64)], sample_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(samples)
    }

    /// Samples with `start <= timestamp <= end`, newest first.
    pub fn usage_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> GuardResult<Vec<UsageSample>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!(
            "SELECT {SAMPLE_COLUMNS} FROM usage_samples
             WHERE timestamp BETWEEN ?1 AND ?2 ORDER BY timestamp DESC, id DESC"
        ))?;
        let samples = stmt
            .query_map(
                params![start.timestamp_millis(), end.timestamp_millis()],
                sample_from_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(samples)
    }

    /// Summed deltas of samples with `start <= timestamp <= end`.
    pub fn traffic_in_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> GuardResult<Traffic> {
        let conn = self.conn.lock();
        let (tx, rx): (i64, i64) = conn.query_row(
            "SELECT COALESCE(SUM(tx_bytes), 0), COALESCE(SUM(rx_bytes), 0)
             FROM usage_samples WHERE timestamp BETWEEN ?1 AND ?2",
            params![start.timestamp_millis(), end.timestamp_millis()],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        Ok(Traffic::new(from_sql_int(tx), from_sql_int(rx)))
    }

    /// Every sample, oldest first.
    pub fn all_usage(&self) -> GuardResult<Vec<UsageSample>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!(
            "SELECT {SAMPLE_COLUMNS} FROM usage_samples ORDER BY timestamp ASC, id ASC"
        ))?;
        let samples = stmt
            .query_map([], sample_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(samples)
    }

    /// Retention pruning. Returns the number of samples removed.
    pub fn delete_usage_before(&self, cutoff: DateTime<Utc>) -> GuardResult<usize> {
        let conn = self.conn.lock();
        let removed = conn.execute(
            "DELETE FROM usage_samples WHERE timestamp < ?1",
            params![cutoff.timestamp_millis()],
        )?;
        Ok(removed)
    }

    pub fn clear_usage(&self) -> GuardResult<()> {
        self.conn.lock().execute("DELETE FROM usage_samples", [])?;
        Ok(())
    }

    // ── blocked apps ──

    /// Record a block; re-blocking the same uid replaces the row.
    pub fn block_app(&self, app: &BlockedApp) -> GuardResult<()> {
        self.conn.lock().execute(
            "INSERT OR REPLACE INTO blocked_apps (uid, package_name, app_name, blocked_at, enforced)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                app.uid,
                app.package_name,
                app.app_name,
                app.blocked_at.timestamp_millis(),
                app.enforced,
            ],
        )?;
        Ok(())
    }

    /// Remove a block. Returns whether a row existed.
    pub fn unblock_app(&self, uid: u32) -> GuardResult<bool> {
        let removed = self
            .conn
            .lock()
            .execute("DELETE FROM blocked_apps WHERE uid = ?1", params![uid])?;
        Ok(removed > 0)
    }

    pub fn blocked_app(&self, uid: u32) -> GuardResult<Option<BlockedApp>> {
        let conn = self.conn.lock();
        let app = conn
            .query_row(
                "SELECT uid, package_name, app_name, blocked_at, enforced
                 FROM blocked_apps WHERE uid = ?1",
                params![uid],
                blocked_app_from_row,
            )
            .optional()?;
        Ok(app)
    }

    /// All blocked apps, most recently blocked first.
    pub fn blocked_apps(&self) -> GuardResult<Vec<BlockedApp>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT uid, package_name, app_name, blocked_at, enforced
             FROM blocked_apps ORDER BY blocked_at DESC",
        )?;
        let apps = stmt
            .query_map([], blocked_app_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(apps)
    }

    pub fn clear_blocked_apps(&self) -> GuardResult<()> {
        self.conn.lock().execute("DELETE FROM blocked_apps", [])?;
        Ok(())
    }

    // ── app limits ──

    pub fn upsert_app_limit(&self, limit: &AppLimit) -> GuardResult<()> {
        self.conn.lock().execute(
            "INSERT INTO app_limits (uid, package_name, daily_limit_mb, weekly_limit_mb, monthly_limit_mb)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(uid) DO UPDATE SET
                package_name = excluded.package_name,
                daily_limit_mb = excluded.daily_limit_mb,
                weekly_limit_mb = excluded.weekly_limit_mb,
                monthly_limit_mb = excluded.monthly_limit_mb",
            params![
                limit.uid,
                limit.package_name,
                to_sql_int(limit.daily_limit_mb),
                to_sql_int(limit.weekly_limit_mb),
                to_sql_int(limit.monthly_limit_mb),
            ],
        )?;
        Ok(())
    }

    /// Returns whether a row existed.
    pub fn delete_app_limit(&self, uid: u32) -> GuardResult<bool> {
        let removed = self
            .conn
            .lock()
            .execute("DELETE FROM app_limits WHERE uid = ?1", params![uid])?;
        Ok(removed > 0)
    }

    pub fn app_limit(&self, uid: u32) -> GuardResult<Option<AppLimit>> {
        let conn = self.conn.lock();
        let limit = conn
            .query_row(
                "SELECT uid, package_name, daily_limit_mb, weekly_limit_mb, monthly_limit_mb
                 FROM app_limits WHERE uid = ?1",
                params![uid],
                app_limit_from_row,
            )
            .optional()?;
        Ok(limit)
    }

    /// All limits ordered by package name.
    pub fn app_limits(&self) -> GuardResult<Vec<AppLimit>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT uid, package_name, daily_limit_mb, weekly_limit_mb, monthly_limit_mb
             FROM app_limits ORDER BY package_name ASC",
        )?;
        let limits = stmt
            .query_map([], app_limit_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(limits)
    }

    pub fn clear_app_limits(&self) -> GuardResult<()> {
        self.conn.lock().execute("DELETE FROM app_limits", [])?;
        Ok(())
    }

    // ── toggle history ──

    pub fn insert_toggle(
        &self,
        timestamp: DateTime<Utc>,
        enabled: bool,
        reason: ToggleReason,
    ) -> GuardResult<ToggleHistoryEntry> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO toggle_history (timestamp, enabled, reason) VALUES (?1, ?2, ?3)",
            params![timestamp.timestamp_millis(), enabled, reason.as_str()],
        )?;

        Ok(ToggleHistoryEntry {
            id: conn.last_insert_rowid(),
            timestamp,
            enabled,
            reason,
        })
    }

    /// Newest entries first.
    pub fn toggle_history(&self, limit: usize) -> GuardResult<Vec<ToggleHistoryEntry>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, timestamp, enabled, reason FROM toggle_history
             ORDER BY timestamp DESC, id DESC LIMIT ?1",
        )?;
        let entries = stmt
            .query_map(params![to_sql_int(limit as u64)], |row| {
                Ok(ToggleHistoryEntry {
                    id: row.get(0)?,
                    timestamp: timestamp_from_row(row, 1)?,
                    enabled: row.get(2)?,
                    reason: parse_column(row, 3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    pub fn delete_toggle_history_before(&self, cutoff: DateTime<Utc>) -> GuardResult<usize> {
        let removed = self.conn.lock().execute(
            "DELETE FROM toggle_history WHERE timestamp < ?1",
            params![cutoff.timestamp_millis()],
        )?;
        Ok(removed)
    }

    pub fn clear_toggle_history(&self) -> GuardResult<()> {
        self.conn.lock().execute("DELETE FROM toggle_history", [])?;
        Ok(())
    }

    /// Wipe every table. Each table is cleared independently.
    pub fn clear_all(&self) -> GuardResult<()> {
        self.clear_usage()?;
        self.clear_blocked_apps()?;
        self.clear_app_limits()?;
        self.clear_toggle_history()
    }

    // ── summary ──

    pub fn stats(&self) -> GuardResult<StoreStats> {
        let conn = self.conn.lock();

        let (total_samples, oldest, newest, tx, rx): (i64, Option<i64>, Option<i64>, i64, i64) =
            conn.query_row(
                "SELECT COUNT(*), MIN(timestamp), MAX(timestamp),
                        COALESCE(SUM(tx_bytes), 0), COALESCE(SUM(rx_bytes), 0)
                 FROM usage_samples",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?)),
            )?;

        let count = |table: &str| -> rusqlite::Result<i64> {
            conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
        };

        Ok(StoreStats {
            total_samples,
            oldest: oldest.and_then(DateTime::from_timestamp_millis),
            newest: newest.and_then(DateTime::from_timestamp_millis),
            total_traffic: Traffic::new(from_sql_int(tx), from_sql_int(rx)),
            blocked_apps: count("blocked_apps")?,
            app_limits: count("app_limits")?,
            toggle_entries: count("toggle_history")?,
        })
    }
}


/// Create tables and indexes if missing.
fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS usage_samples (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            timestamp INTEGER NOT NULL,
            tx_bytes INTEGER NOT NULL,
            rx_bytes INTEGER NOT NULL,
            counter_tx INTEGER NOT NULL,
            counter_rx INTEGER NOT NULL,
            top_apps_json TEXT NOT NULL,
            period TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_usage_samples_timestamp ON usage_samples(timestamp);

        CREATE TABLE IF NOT EXISTS blocked_apps (
            uid INTEGER PRIMARY KEY,
            package_name TEXT NOT NULL,
            app_name TEXT NOT NULL,
            blocked_at INTEGER NOT NULL,
            enforced INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS app_limits (
            uid INTEGER PRIMARY KEY,
            package_name TEXT NOT NULL,
            daily_limit_mb INTEGER NOT NULL,
            weekly_limit_mb INTEGER NOT NULL,
            monthly_limit_mb INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS toggle_history (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            timestamp INTEGER NOT NULL,
            enabled INTEGER NOT NULL,
            reason TEXT NOT NULL
        );",
    )
}


fn sample_from_row(row: &Row<'_>) -> rusqlite::Result<UsageSample> {
    let top_apps_json: String = row.get(6)?;
    let top_consumers: Vec<AppUsage> = serde_json::from_str(&top_apps_json)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(6, Type::Text, Box::new(e)))?;

    Ok(UsageSample {
        id: row.get(0)?,
        timestamp: timestamp_from_row(row, 1)?,
        delta: Traffic::new(from_sql_int(row.get(2)?), from_sql_int(row.get(3)?)),
        counters: Traffic::new(from_sql_int(row.get(4)?), from_sql_int(row.get(5)?)),
        top_consumers,
        period: parse_column(row, 7)?,
    })
}


fn blocked_app_from_row(row: &Row<'_>) -> rusqlite::Result<BlockedApp> {
    Ok(BlockedApp {
        uid: row.get(0)?,
        package_name: row.get(1)?,
        app_name: row.get(2)?,
        blocked_at: timestamp_from_row(row, 3)?,
        enforced: row.get(4)?,
    })
}


fn app_limit_from_row(row: &Row<'_>) -> rusqlite::Result<AppLimit> {
    Ok(AppLimit {
        uid: row.get(0)?,
        package_name: row.get(1)?,
        daily_limit_mb: from_sql_int(row.get(2)?),
        weekly_limit_mb: from_sql_int(row.get(3)?),
        monthly_limit_mb: from_sql_int(row.get(4)?),
    })
}


fn timestamp_from_row(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let millis: i64 = row.get(idx)?;
    DateTime::from_timestamp_millis(millis).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Integer,
            format!("timestamp {millis} out of range").into(),
        )
    })
}


fn parse_column<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: std::str::FromStr<Err = String>,
{
    let raw: String = row.get(idx)?;
    raw.parse::<T>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, e.into()))
}


/// SQLite integers are signed; byte counts beyond `i64::MAX` saturate.
fn to_sql_int(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}


fn from_sql_int(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}
