//! Configuration of the farmcast cache.
//!
//! - [`Config`]: top-level loader and YAML parser
//! - [`CacheConfig`]: storage location, bucketing precision and sweeping
//! - [`TtlConfig`]: time-to-live overrides per data type
//!
//! Configuration is read from a YAML file (`farmcast.yml`); every field is
//! optional. Run `farmcast help config` for a commented example.

mod cache;
mod main;
mod ttl;

pub use cache::CacheConfig;
pub use main::{CACHE_DIR_ENV, Config};
pub use ttl::TtlConfig;
