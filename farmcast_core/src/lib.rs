//! Core value types for the farmcast geospatial cache.
//!
//! Nothing in this crate touches the filesystem: it describes *what* is cached
//! (the [`payload`] kinds), *where* (the [`types::LocationBucket`] derived from a
//! [`types::GeoPoint`]), under which [`types::CacheKey`], and for how long
//! ([`types::TtlPolicy`]). The [`clock`] module abstracts "now" so expiry can be
//! driven deterministically in tests.

pub mod clock;

pub mod payload;

pub mod types;

#[cfg(any(test, feature = "test"))]
pub mod testing;

pub use clock::{Clock, ManualClock, SystemClock};
pub use payload::*;
pub use types::*;
