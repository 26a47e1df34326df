//! Failure taxonomy of the cache.
//!
//! - [`StoreError`]: the durable storage could not be read or written.
//! - [`CacheError::Serialization`]: a payload could not be encoded or decoded.
//! - [`CacheError::Key`]: a cache key could not be built.
//! - [`CacheError::ExpiryOutOfRange`]: the TTL pushes the expiry past the representable range.
//!
//! A missing TTL policy is not an error; see [`farmcast_core::PolicyMiss`].
//! None of these escape the `store_*`/`get_*` methods of
//! [`CacheService`](crate::CacheService): they are logged and turned into misses.

use farmcast_core::CacheKeyError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
	/// I/O, SQLite or connection-pool failure.
	#[error("cache storage failed: {0:#}")]
	Backend(#[from] anyhow::Error),

	/// A row exists but cannot be interpreted.
	#[error("cache entry '{cache_key}' is corrupt: {reason}")]
	Corrupt { cache_key: String, reason: String },
}

#[derive(Debug, Error)]
pub enum CacheError {
	#[error(transparent)]
	Store(#[from] StoreError),

	#[error("cache payload could not be (de)serialized: {0}")]
	Serialization(#[from] serde_json::Error),

	#[error(transparent)]
	Key(#[from] CacheKeyError),

	#[error("expiry of '{cache_key}' is out of range")]
	ExpiryOutOfRange { cache_key: String },
}

#[cfg(test)]
mod tests {
	use super::*;
	use anyhow::{Context, anyhow};

	#[test]
	fn backend_errors_keep_their_chain() {
		let err = StoreError::from(Err::<(), _>(anyhow!("disk I/O error")).context("upserting 'k'").unwrap_err());
		assert_eq!(err.to_string(), "cache storage failed: upserting 'k': disk I/O error");
	}

	#[test]
	fn cache_error_wraps_every_kind() {
		let store: CacheError = StoreError::Corrupt {
			cache_key: "soil_data_1.000_2.000".to_string(),
			reason: "bad timestamp".to_string(),
		}
		.into();
		assert_eq!(
			store.to_string(),
			"cache entry 'soil_data_1.000_2.000' is corrupt: bad timestamp"
		);

		let key: CacheError = CacheKeyError::EmptyDataType.into();
		assert_eq!(key.to_string(), "cache key requires a non-empty data type");

		let serde: CacheError = serde_json::from_str::<u8>("x").unwrap_err().into();
		assert!(serde.to_string().starts_with("cache payload could not be (de)serialized"));

		let expiry = CacheError::ExpiryOutOfRange {
			cache_key: "soil_data_1.000_2.000".to_string(),
		};
		assert_eq!(expiry.to_string(), "expiry of 'soil_data_1.000_2.000' is out of range");
	}
}
