//! Selects where cache entries are kept.
//!
//! The default directory can be set with the environment variable
//! `FARMCAST_CACHE_DIR`. If unset, `./cache` is used.

use super::{EntryStore, InMemoryEntryStore, SqliteEntryStore, SqliteOptions};
use anyhow::Result;
use std::{path::PathBuf, sync::Arc};

lazy_static::lazy_static! {
	pub static ref DEFAULT_CACHE_DIR: PathBuf = std::env::var_os("FARMCAST_CACHE_DIR").map_or_else(|| PathBuf::from("cache"), PathBuf::from);
}

/// - `InMemory`: entries live in the process; useful for tests and one-shot runs.
/// - `Disk(PathBuf)`: entries live in `<dir>/farmcast_cache.db` and survive restarts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreType {
	InMemory,
	Disk(PathBuf),
}

impl StoreType {
	#[must_use]
	pub fn new_disk() -> Self {
		Self::Disk(DEFAULT_CACHE_DIR.to_path_buf())
	}

	#[must_use]
	pub fn new_memory() -> Self {
		Self::InMemory
	}
}

impl Default for StoreType {
	fn default() -> Self {
		Self::new_disk()
	}
}

/// Opens the store described by `store_type`.
pub fn open_store(store_type: &StoreType, options: &SqliteOptions) -> Result<Arc<dyn EntryStore>> {
	Ok(match store_type {
		StoreType::InMemory => Arc::new(InMemoryEntryStore::new()),
		StoreType::Disk(directory) => Arc::new(SqliteEntryStore::open_dir(directory, options)?),
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use time::macros::datetime;

	#[test]
	fn default_is_disk() {
		assert_eq!(StoreType::default(), StoreType::Disk(DEFAULT_CACHE_DIR.clone()));
		assert_eq!(StoreType::new_memory(), StoreType::InMemory);
	}

	#[test]
	fn opens_both_kinds() {
		let dir = assert_fs::TempDir::new().unwrap();
		let now = datetime!(2024-06-01 06:00 UTC);

		let memory = open_store(&StoreType::InMemory, &SqliteOptions::default()).unwrap();
		assert!(format!("{memory:?}").starts_with("InMemoryEntryStore"));
		assert_eq!(memory.stats(now).unwrap().total, 0);

		let disk = open_store(&StoreType::Disk(dir.path().to_path_buf()), &SqliteOptions::default()).unwrap();
		assert!(format!("{disk:?}").starts_with("SqliteEntryStore"));
		assert!(dir.path().join(super::super::DATABASE_FILE_NAME).exists());
	}
}
