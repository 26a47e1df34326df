use anyhow::{Result, ensure};
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display};

/// A position in geographic space:
/// - `lat` latitude (range: [-90, 90])
/// - `lon` longitude (range: [-180, 180])
///
/// Serialized as `{"lat": .., "lon": ..}`.
#[derive(Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
	pub lat: f64,
	pub lon: f64,
}

impl GeoPoint {
	/// Creates a point and validates its ranges.
	///
	/// # Errors
	///
	/// Returns an error if a coordinate is not finite or out of range.
	pub fn new(lat: f64, lon: f64) -> Result<Self> {
		let point = GeoPoint { lat, lon };
		point.check()?;
		Ok(point)
	}

	/// Checks that latitude and longitude are finite and within their ranges.
	///
	/// # Errors
	///
	/// Returns an error if any of these checks fail.
	pub fn check(&self) -> Result<()> {
		ensure!(self.lat.is_finite(), "latitude must be finite, got {}", self.lat);
		ensure!(self.lon.is_finite(), "longitude must be finite, got {}", self.lon);
		ensure!((-90.0..=90.0).contains(&self.lat), "latitude must be within [-90, 90], got {}", self.lat);
		ensure!(
			(-180.0..=180.0).contains(&self.lon),
			"longitude must be within [-180, 180], got {}",
			self.lon
		);
		Ok(())
	}
}

impl Debug for GeoPoint {
	/// Formats the point as `"lat, lon"`.
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}, {}", self.lat, self.lon)
	}
}

impl Display for GeoPoint {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "({}, {})", self.lat, self.lon)
	}
}

impl TryFrom<(f64, f64)> for GeoPoint {
	type Error = anyhow::Error;

	/// Builds a validated point from a `(lat, lon)` tuple.
	fn try_from((lat, lon): (f64, f64)) -> Result<Self> {
		GeoPoint::new(lat, lon)
	}
}
