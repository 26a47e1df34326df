use super::{CacheEntry, EntryStats, EntryStore};
use crate::StoreError;
use parking_lot::RwLock;
use std::collections::HashMap;
use time::OffsetDateTime;

/// Keeps entries in a hash map; nothing survives the process.
#[derive(Debug, Default)]
pub struct InMemoryEntryStore {
	entries: RwLock<HashMap<String, CacheEntry>>,
}

impl InMemoryEntryStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn len(&self) -> usize {
		self.entries.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.read().is_empty()
	}
}

fn matches(entry: &CacheEntry, data_type: Option<&str>, location_bucket: Option<&str>) -> bool {
	data_type.is_none_or(|t| entry.data_type == t) && location_bucket.is_none_or(|b| entry.location_bucket == b)
}

impl EntryStore for InMemoryEntryStore {
	fn upsert(&self, entry: &CacheEntry) -> Result<(), StoreError> {
		self.entries.write().insert(entry.cache_key.clone(), entry.clone());
		Ok(())
	}

	fn get(&self, cache_key: &str) -> Result<Option<CacheEntry>, StoreError> {
		Ok(self.entries.read().get(cache_key).cloned())
	}

	fn delete(&self, cache_key: &str) -> Result<(), StoreError> {
		self.entries.write().remove(cache_key);
		Ok(())
	}

	fn delete_if_unchanged(&self, entry: &CacheEntry) -> Result<bool, StoreError> {
		let mut entries = self.entries.write();
		if entries.get(&entry.cache_key) == Some(entry) {
			entries.remove(&entry.cache_key);
			return Ok(true);
		}
		Ok(false)
	}

	fn delete_where(&self, data_type: Option<&str>, location_bucket: Option<&str>) -> Result<u64, StoreError> {
		let mut entries = self.entries.write();
		let before = entries.len();
		entries.retain(|_, entry| !matches(entry, data_type, location_bucket));
		Ok((before - entries.len()) as u64)
	}

	fn sweep_expired(&self, now: OffsetDateTime) -> Result<u64, StoreError> {
		let mut entries = self.entries.write();
		let before = entries.len();
		entries.retain(|_, entry| entry.expires_at >= now);
		Ok((before - entries.len()) as u64)
	}

	fn stats(&self, now: OffsetDateTime) -> Result<EntryStats, StoreError> {
		let entries = self.entries.read();
		let mut stats = EntryStats {
			total: entries.len() as u64,
			..EntryStats::default()
		};
		for entry in entries.values() {
			*stats.by_type.entry(entry.data_type.clone()).or_default() += 1;
			if entry.expires_at < now {
				stats.expired += 1;
			}
		}
		Ok(stats)
	}
}
