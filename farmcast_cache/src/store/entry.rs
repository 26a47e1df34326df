use serde_json::{Value, json};
use std::collections::BTreeMap;
use time::{Duration, OffsetDateTime};

/// One row of the cache table.
///
/// `payload` is opaque to the store. `expires_at` is always later than `created_at`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheEntry {
	pub cache_key: String,
	pub payload: String,
	pub data_type: String,
	pub location_bucket: String,
	pub created_at: OffsetDateTime,
	pub expires_at: OffsetDateTime,
}

impl CacheEntry {
	/// Builds an entry written at `created_at` that lives for `ttl`.
	///
	/// Returns `None` if `created_at + ttl` is not a representable instant.
	pub fn new(
		cache_key: &str,
		payload: String,
		data_type: &str,
		location_bucket: &str,
		created_at: OffsetDateTime,
		ttl: Duration,
	) -> Option<Self> {
		Some(CacheEntry {
			cache_key: cache_key.to_string(),
			payload,
			data_type: data_type.to_string(),
			location_bucket: location_bucket.to_string(),
			created_at,
			expires_at: created_at.checked_add(ttl)?,
		})
	}

	/// An entry is expired from its `expires_at` instant onwards.
	pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
		now >= self.expires_at
	}
}

/// Aggregate counts over the store.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EntryStats {
	pub total: u64,
	pub by_type: BTreeMap<String, u64>,
	pub expired: u64,
}

impl EntryStats {
	/// Entries that could still be served: `total - expired`.
	pub fn hit_potential(&self) -> u64 {
		self.total.saturating_sub(self.expired)
	}

	pub fn to_json(&self) -> Value {
		json!({
			"total_entries": self.total,
			"entries_by_type": self.by_type,
			"expired_entries": self.expired,
			"cache_hit_potential": self.hit_potential(),
		})
	}
}
