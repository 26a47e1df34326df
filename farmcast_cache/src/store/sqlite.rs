//! Persist cache entries in a single SQLite file.
//!
//! The database holds one table:
//!
//! ```sql
//! cache_entries (cache_key TEXT PRIMARY KEY, payload TEXT, data_type TEXT,
//!                location_bucket TEXT, created_at INTEGER, expires_at INTEGER)
//! ```
//!
//! with secondary indices on `location_bucket`, `data_type` and `expires_at`.
//! Timestamps are stored as Unix milliseconds.
//!
//! ## Concurrency
//! All mutating statements go through one writer connection behind a mutex, so
//! writes to the same key are serialised (last writer wins). Reads use a small
//! connection pool and run in parallel with each other and with the writer; the
//! database is switched to WAL journaling so a reader always sees a committed row.
//! No lock is held on the file between statements, so other tools can open it.
//!
//! ## Usage
//! ```rust,no_run
//! use farmcast_cache::{EntryStore, SqliteEntryStore, SqliteOptions};
//! use std::path::Path;
//!
//! let store = SqliteEntryStore::open_dir(Path::new("cache"), &SqliteOptions::default())?;
//! let stats = store.stats(time::OffsetDateTime::now_utc())?;
//! println!("{} entries", stats.total);
//! # Ok::<(), anyhow::Error>(())
//! ```

use super::{CacheEntry, EntryStats, EntryStore};
use crate::StoreError;
use anyhow::{Context, Result, anyhow};
use farmcast_derive::context;
use parking_lot::Mutex;
use r2d2::Pool;
use r2d2_sqlite::{
	SqliteConnectionManager,
	rusqlite::{Connection, Error as SqlError, OptionalExtension, Row, params, types::Type},
};
use std::{
	collections::BTreeMap,
	fmt::Debug,
	fs::create_dir_all,
	path::{Path, PathBuf},
	time::Duration,
};
use time::OffsetDateTime;

/// File name of the database inside the cache directory.
pub const DATABASE_FILE_NAME: &str = "farmcast_cache.db";

const SCHEMA: &str = "
	CREATE TABLE IF NOT EXISTS cache_entries (
		cache_key TEXT PRIMARY KEY NOT NULL,
		payload TEXT NOT NULL,
		data_type TEXT NOT NULL,
		location_bucket TEXT NOT NULL,
		created_at INTEGER NOT NULL,
		expires_at INTEGER NOT NULL
	);
	CREATE INDEX IF NOT EXISTS idx_cache_entries_location ON cache_entries (location_bucket);
	CREATE INDEX IF NOT EXISTS idx_cache_entries_type ON cache_entries (data_type);
	CREATE INDEX IF NOT EXISTS idx_cache_entries_expiry ON cache_entries (expires_at);";

const COLUMNS: &str = "cache_key, payload, data_type, location_bucket, created_at, expires_at";

/// Connection settings for [`SqliteEntryStore`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SqliteOptions {
	/// Name of the database file inside the cache directory.
	pub file_name: String,
	/// Maximum number of pooled read connections.
	pub pool_size: u32,
	/// How long a statement waits for a competing lock before failing.
	pub busy_timeout: Duration,
}

impl Default for SqliteOptions {
	fn default() -> Self {
		SqliteOptions {
			file_name: DATABASE_FILE_NAME.to_string(),
			pool_size: 4,
			busy_timeout: Duration::from_secs(5),
		}
	}
}

pub struct SqliteEntryStore {
	path: PathBuf,
	writer: Mutex<Connection>,
	readers: Pool<SqliteConnectionManager>,
}

impl SqliteEntryStore {
	/// Opens `<directory>/<options.file_name>`, creating the directory if necessary.
	#[context("opening cache directory '{}'", directory.display())]
	pub fn open_dir(directory: &Path, options: &SqliteOptions) -> Result<Self> {
		create_dir_all(directory)?;
		Self::open(&directory.join(&options.file_name), options)
	}

	/// Opens (or creates) the database at `path` and ensures the schema exists.
	#[context("opening cache database '{}'", path.display())]
	pub fn open(path: &Path, options: &SqliteOptions) -> Result<Self> {
		log::debug!("open {path:?}");

		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			create_dir_all(parent)?;
		}

		let writer = Connection::open(path)?;
		writer.busy_timeout(options.busy_timeout)?;
		let journal_mode: String = writer.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
		log::trace!("journal mode of {path:?}: {journal_mode}");
		writer.execute_batch("PRAGMA synchronous = NORMAL;")?;
		writer.execute_batch(SCHEMA)?;

		let busy_timeout = options.busy_timeout;
		let manager = SqliteConnectionManager::file(path).with_init(move |conn| conn.busy_timeout(busy_timeout));
		let readers = Pool::builder().max_size(options.pool_size.max(1)).build(manager)?;

		Ok(SqliteEntryStore {
			path: path.to_path_buf(),
			writer: Mutex::new(writer),
			readers,
		})
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Closes the writer connection, surfacing errors that `Drop` would swallow.
	pub fn close(self) -> Result<()> {
		let SqliteEntryStore { path, writer, readers } = self;
		drop(readers);
		writer
			.into_inner()
			.close()
			.map_err(|(_, err)| anyhow!(err))
			.with_context(|| format!("closing cache database '{}'", path.display()))
	}

	#[context("upserting cache entry '{}'", entry.cache_key)]
	fn upsert_row(&self, entry: &CacheEntry) -> Result<()> {
		log::trace!("upsert {}", entry.cache_key);
		self.writer.lock().execute(
			"INSERT INTO cache_entries (cache_key, payload, data_type, location_bucket, created_at, expires_at)
			VALUES (?1, ?2, ?3, ?4, ?5, ?6)
			ON CONFLICT (cache_key) DO UPDATE SET
				payload = excluded.payload,
				data_type = excluded.data_type,
				location_bucket = excluded.location_bucket,
				created_at = excluded.created_at,
				expires_at = excluded.expires_at",
			params![
				entry.cache_key,
				entry.payload,
				entry.data_type,
				entry.location_bucket,
				to_millis(entry.created_at),
				to_millis(entry.expires_at),
			],
		)?;
		Ok(())
	}

	#[context("reading cache entry '{}'", cache_key)]
	fn select_row(&self, cache_key: &str) -> Result<Option<RawRow>> {
		let conn = self.readers.get()?;
		let mut stmt = conn.prepare_cached(&format!("SELECT {COLUMNS} FROM cache_entries WHERE cache_key = ?1"))?;
		Ok(stmt.query_row([cache_key], RawRow::from_row).optional()?)
	}

	#[context("deleting cache entry '{}'", cache_key)]
	fn delete_row(&self, cache_key: &str) -> Result<()> {
		self
			.writer
			.lock()
			.execute("DELETE FROM cache_entries WHERE cache_key = ?1", [cache_key])?;
		Ok(())
	}

	#[context("deleting cache entry '{}' if unchanged", entry.cache_key)]
	fn delete_unchanged_row(&self, entry: &CacheEntry) -> Result<bool> {
		let removed = self.writer.lock().execute(
			"DELETE FROM cache_entries
			WHERE cache_key = ?1 AND payload = ?2 AND created_at = ?3 AND expires_at = ?4",
			params![
				entry.cache_key,
				entry.payload,
				to_millis(entry.created_at),
				to_millis(entry.expires_at),
			],
		)?;
		Ok(removed > 0)
	}

	#[context("deleting cache entries (data_type: {:?}, location_bucket: {:?})", data_type, location_bucket)]
	fn delete_rows(&self, data_type: Option<&str>, location_bucket: Option<&str>) -> Result<u64> {
		let conn = self.writer.lock();
		let removed = match (data_type, location_bucket) {
			(Some(t), Some(b)) => conn.execute(
				"DELETE FROM cache_entries WHERE data_type = ?1 AND location_bucket = ?2",
				[t, b],
			)?,
			(Some(t), None) => conn.execute("DELETE FROM cache_entries WHERE data_type = ?1", [t])?,
			(None, Some(b)) => conn.execute("DELETE FROM cache_entries WHERE location_bucket = ?1", [b])?,
			(None, None) => conn.execute("DELETE FROM cache_entries", [])?,
		};
		Ok(removed as u64)
	}

	#[context("sweeping cache entries expired before {}", now)]
	fn sweep_rows(&self, now: OffsetDateTime) -> Result<u64> {
		let removed = self
			.writer
			.lock()
			.execute("DELETE FROM cache_entries WHERE expires_at < ?1", [to_millis(now)])?;
		Ok(removed as u64)
	}

	/// Execute a single-value aggregate query.
	fn count(conn: &Connection, sql: &str, now: Option<i64>) -> Result<u64> {
		log::trace!("SQL: {sql}");
		let value: i64 = match now {
			Some(now) => conn.query_row(sql, [now], |row| row.get(0))?,
			None => conn.query_row(sql, [], |row| row.get(0))?,
		};
		Ok(u64::try_from(value)?)
	}

	#[context("counting cache entries")]
	fn count_rows(&self, now: OffsetDateTime) -> Result<EntryStats> {
		let conn = self.readers.get()?;
		let total = Self::count(&conn, "SELECT COUNT(*) FROM cache_entries", None)?;
		let expired = Self::count(
			&conn,
			"SELECT COUNT(*) FROM cache_entries WHERE expires_at < ?1",
			Some(to_millis(now)),
		)?;

		let mut stmt = conn.prepare("SELECT data_type, COUNT(*) FROM cache_entries GROUP BY data_type")?;
		let by_type = stmt
			.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?
			.map(|r| -> Result<(String, u64)> {
				let (data_type, count) = r?;
				Ok((data_type, u64::try_from(count)?))
			})
			.collect::<Result<BTreeMap<_, _>>>()?;

		Ok(EntryStats { total, by_type, expired })
	}
}

impl EntryStore for SqliteEntryStore {
	fn upsert(&self, entry: &CacheEntry) -> Result<(), StoreError> {
		Ok(self.upsert_row(entry)?)
	}

	fn get(&self, cache_key: &str) -> Result<Option<CacheEntry>, StoreError> {
		self.select_row(cache_key)?.map(RawRow::into_entry).transpose()
	}

	fn delete(&self, cache_key: &str) -> Result<(), StoreError> {
		Ok(self.delete_row(cache_key)?)
	}

	fn delete_if_unchanged(&self, entry: &CacheEntry) -> Result<bool, StoreError> {
		Ok(self.delete_unchanged_row(entry)?)
	}

	fn delete_where(&self, data_type: Option<&str>, location_bucket: Option<&str>) -> Result<u64, StoreError> {
		Ok(self.delete_rows(data_type, location_bucket)?)
	}

	fn sweep_expired(&self, now: OffsetDateTime) -> Result<u64, StoreError> {
		Ok(self.sweep_rows(now)?)
	}

	fn stats(&self, now: OffsetDateTime) -> Result<EntryStats, StoreError> {
		Ok(self.count_rows(now)?)
	}
}

impl Debug for SqliteEntryStore {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SqliteEntryStore").field("path", &self.path).finish()
	}
}

/// A row as SQLite returns it, before payload and timestamps are checked.
struct RawRow {
	cache_key: String,
	payload: Vec<u8>,
	data_type: String,
	location_bucket: String,
	created_at: i64,
	expires_at: i64,
}

impl RawRow {
	fn from_row(row: &Row<'_>) -> r2d2_sqlite::rusqlite::Result<Self> {
		Ok(RawRow {
			cache_key: row.get(0)?,
			payload: row
				.get_ref(1)?
				.as_bytes()
				.map_err(|err| SqlError::FromSqlConversionFailure(1, Type::Text, Box::new(err)))?
				.to_vec(),
			data_type: row.get(2)?,
			location_bucket: row.get(3)?,
			created_at: row.get(4)?,
			expires_at: row.get(5)?,
		})
	}

	fn into_entry(self) -> Result<CacheEntry, StoreError> {
		let corrupt = |reason: String| StoreError::Corrupt {
			cache_key: self.cache_key.clone(),
			reason,
		};
		let created_at = from_millis(self.created_at).map_err(|e| corrupt(format!("created_at: {e}")))?;
		let expires_at = from_millis(self.expires_at).map_err(|e| corrupt(format!("expires_at: {e}")))?;
		if expires_at <= created_at {
			return Err(corrupt(format!("expires_at {expires_at} is not after created_at {created_at}")));
		}
		let payload = String::from_utf8(self.payload).map_err(|e| corrupt(format!("payload: {e}")))?;
		Ok(CacheEntry {
			cache_key: self.cache_key,
			payload,
			data_type: self.data_type,
			location_bucket: self.location_bucket,
			created_at,
			expires_at,
		})
	}
}

fn to_millis(time: OffsetDateTime) -> i64 {
	(time.unix_timestamp_nanos() / 1_000_000) as i64
}

fn from_millis(millis: i64) -> Result<OffsetDateTime> {
	OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000)
		.with_context(|| format!("{millis} ms is not a valid timestamp"))
}
