//! # farmcast
//!
//! An offline-first geospatial cache for crop-advisory lookups.
//!
//! - [`core`]: value types (coordinates, location buckets, cache keys, TTL policy, payloads)
//! - [`cache`]: the SQLite-backed entry store and the [`cache::CacheService`]
//! - [`config`]: YAML configuration shared by the `farmcast` binary and embedding services
//!
//! ```rust,no_run
//! use farmcast::{config::Config, core::GeoPoint};
//!
//! let config = Config::load(None)?;
//! let cache = config.open_cache()?;
//! let here = GeoPoint::new(12.971, 77.594)?;
//! println!("{:?}", cache.get_weather(&here, false));
//! cache.close();
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod config;

pub use farmcast_cache as cache;
pub use farmcast_core as core;
pub use farmcast_derive as derive;
