//! Durable storage of cache entries.
//!
//! The [`EntryStore`] trait is the only interface the cache service needs:
//! upsert, point lookup, idempotent delete, conditional delete, filtered bulk delete,
//! expiry sweep and aggregate counts. Two implementations exist:
//! - [`SqliteEntryStore`]: one SQLite file, one writer connection, pooled readers.
//! - [`InMemoryEntryStore`]: a locked hash map with the same semantics.
//!
//! Stores never decide whether an entry is expired on their own; callers pass
//! "now" where it matters.

mod entry;
mod memory;
mod sqlite;
mod store_type;

pub use entry::{CacheEntry, EntryStats};
pub use memory::InMemoryEntryStore;
pub use sqlite::{DATABASE_FILE_NAME, SqliteEntryStore, SqliteOptions};
pub use store_type::{DEFAULT_CACHE_DIR, StoreType, open_store};

use crate::StoreError;
use std::fmt::Debug;
use time::OffsetDateTime;

pub trait EntryStore: Debug + Send + Sync {
	/// Inserts `entry`, or replaces every column of the row with the same `cache_key`.
	///
	/// Readers observe either the old or the new row, never a mix.
	fn upsert(&self, entry: &CacheEntry) -> Result<(), StoreError>;

	/// Returns the row stored under `cache_key`, expired or not.
	fn get(&self, cache_key: &str) -> Result<Option<CacheEntry>, StoreError>;

	/// Removes the row; removing a missing key succeeds.
	fn delete(&self, cache_key: &str) -> Result<(), StoreError>;

	/// Removes the row under `entry.cache_key` only if it still holds exactly `entry`.
	/// Returns `false` when the row is gone or has been replaced in the meantime.
	fn delete_if_unchanged(&self, entry: &CacheEntry) -> Result<bool, StoreError>;

	/// Removes every row matching all given filters; without filters the store is emptied.
	/// Returns the number of rows removed.
	fn delete_where(&self, data_type: Option<&str>, location_bucket: Option<&str>) -> Result<u64, StoreError>;

	/// Removes every row with `expires_at < now` and returns how many went.
	fn sweep_expired(&self, now: OffsetDateTime) -> Result<u64, StoreError>;

	/// Counts rows in total, per data type, and those with `expires_at < now`.
	fn stats(&self, now: OffsetDateTime) -> Result<EntryStats, StoreError>;
}
