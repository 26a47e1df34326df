//! Store doubles for exercising failure paths.

use crate::{CacheEntry, EntryStats, EntryStore, StoreError};
use anyhow::anyhow;
use time::OffsetDateTime;

/// A store whose every operation fails, as a full disk or a locked file would.
#[derive(Debug, Default)]
pub struct FailingStore;

fn failure(operation: &str) -> StoreError {
	StoreError::Backend(anyhow!("{operation}: disk I/O error"))
}

impl EntryStore for FailingStore {
	fn upsert(&self, _entry: &CacheEntry) -> Result<(), StoreError> {
		Err(failure("upsert"))
	}

	fn get(&self, _cache_key: &str) -> Result<Option<CacheEntry>, StoreError> {
		Err(failure("get"))
	}

	fn delete(&self, _cache_key: &str) -> Result<(), StoreError> {
		Err(failure("delete"))
	}

	fn delete_if_unchanged(&self, _entry: &CacheEntry) -> Result<bool, StoreError> {
		Err(failure("delete_if_unchanged"))
	}

	fn delete_where(&self, _data_type: Option<&str>, _location_bucket: Option<&str>) -> Result<u64, StoreError> {
		Err(failure("delete_where"))
	}

	fn sweep_expired(&self, _now: OffsetDateTime) -> Result<u64, StoreError> {
		Err(failure("sweep_expired"))
	}

	fn stats(&self, _now: OffsetDateTime) -> Result<EntryStats, StoreError> {
		Err(failure("stats"))
	}
}
