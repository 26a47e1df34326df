//! Offline-first geospatial cache.
//!
//! Expensive lookups (reverse geocoding, weather, soil composition, crop
//! recommendations, historical analysis) are kept on local disk, keyed by a
//! coarse location bucket, and refreshed on a per-data-type schedule.
//!
//! ```rust,no_run
//! use farmcast_cache::{CacheOptions, CacheService, StoreType};
//! use farmcast_core::GeoPoint;
//!
//! let cache = CacheService::open(&StoreType::new_disk(), CacheOptions::default())?;
//! let here = GeoPoint::new(12.971, 77.594)?;
//! if cache.get_soil(&here).is_none() {
//! 	// fetch from the upstream service, then `cache.store_soil(&here, &soil)`
//! }
//! cache.close();
//! # Ok::<(), anyhow::Error>(())
//! ```

mod error;
pub use error::*;

mod service;
pub use service::*;

mod store;
pub use store::*;

#[cfg(any(test, feature = "test"))]
pub mod testing;
