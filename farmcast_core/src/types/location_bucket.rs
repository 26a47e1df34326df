//! Coarse geographic bucketing.
//!
//! Nearby queries should share one cache entry, so coordinates are rounded to a
//! fixed number of decimal places before they become part of a key. At the
//! default precision of 3 a bucket spans roughly 111 m of latitude.
//!
//! ```
//! use farmcast_core::LocationHasher;
//!
//! let hasher = LocationHasher::default();
//! assert_eq!(hasher.hash(12.97149, 77.59361).as_str(), "12.971_77.594");
//! assert_eq!(hasher.hash(12.97051, 77.59449), hasher.hash(12.97149, 77.59361));
//! ```

use super::GeoPoint;
use std::fmt::{Debug, Display};

/// Decimal places used when nothing else is configured.
pub const DEFAULT_PRECISION: u8 = 3;

/// Upper bound for the precision; beyond this `f64` rounding is meaningless for coordinates.
pub const MAX_PRECISION: u8 = 9;

/// A rounded `"{lat}_{lon}"` pair identifying a small geographic cell.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocationBucket(String);

impl LocationBucket {
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl AsRef<str> for LocationBucket {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

impl Display for LocationBucket {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.0)
	}
}

impl Debug for LocationBucket {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "LocationBucket({})", self.0)
	}
}

/// Maps coordinates onto [`LocationBucket`]s at a fixed precision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LocationHasher {
	precision: u8,
}

impl LocationHasher {
	/// Creates a hasher; precisions above [`MAX_PRECISION`] are clamped.
	pub fn new(precision: u8) -> Self {
		LocationHasher {
			precision: precision.min(MAX_PRECISION),
		}
	}

	pub fn precision(&self) -> u8 {
		self.precision
	}

	pub fn hash(&self, lat: f64, lon: f64) -> LocationBucket {
		LocationBucket(location_bucket(lat, lon, self.precision))
	}

	pub fn hash_point(&self, point: &GeoPoint) -> LocationBucket {
		self.hash(point.lat, point.lon)
	}
}

impl Default for LocationHasher {
	fn default() -> Self {
		LocationHasher::new(DEFAULT_PRECISION)
	}
}

/// Rounds both coordinates to `precision` decimal digits and joins them with `_`.
///
/// Pure and total: identical inputs always give identical output, and values
/// that round to zero from below are written as `0.000`, not `-0.000`.
pub fn location_bucket(lat: f64, lon: f64, precision: u8) -> String {
	let precision = precision.min(MAX_PRECISION);
	format!("{}_{}", round_coordinate(lat, precision), round_coordinate(lon, precision))
}

fn round_coordinate(value: f64, precision: u8) -> String {
	let text = format!("{value:.prec$}", prec = precision as usize);
	match text.strip_prefix('-') {
		Some(rest) if rest.bytes().all(|b| b == b'0' || b == b'.') => rest.to_string(),
		_ => text,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(12.971, 77.594, 3, "12.971_77.594")]
	#[case(12.9714, 77.5936, 3, "12.971_77.594")]
	#[case(12.0, 77.0, 3, "12.000_77.000")]
	#[case(-33.86785, 151.20732, 2, "-33.87_151.21")]
	#[case(-0.0001, 0.0004, 3, "0.000_0.000")]
	#[case(-0.0, -0.0, 0, "0_0")]
	#[case(51.5, -0.12, 0, "52_0")]
	fn rounds_to_precision(#[case] lat: f64, #[case] lon: f64, #[case] precision: u8, #[case] expected: &str) {
		assert_eq!(location_bucket(lat, lon, precision), expected);
	}

	#[test]
	fn nearby_points_share_a_bucket() {
		let hasher = LocationHasher::default();
		let a = hasher.hash(12.9712, 77.5941);
		let b = hasher.hash(12.9708, 77.5944);
		assert_eq!(a, b);
		assert_ne!(a, hasher.hash(12.972, 77.594));
	}

	#[test]
	fn hashing_is_deterministic() {
		let hasher = LocationHasher::new(4);
		let point = GeoPoint::new(28.61394, 77.20902).unwrap();
		assert_eq!(hasher.hash_point(&point), hasher.hash_point(&point));
		assert_eq!(hasher.hash_point(&point).as_str(), "28.6139_77.2090");
	}

	#[test]
	fn precision_is_clamped() {
		assert_eq!(LocationHasher::new(200).precision(), MAX_PRECISION);
		assert_eq!(location_bucket(1.0, 2.0, 12), "1.000000000_2.000000000");
	}
}
