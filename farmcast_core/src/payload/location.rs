use crate::GeoPoint;
use serde::{Deserialize, Serialize};

/// Result of reverse-geocoding a coordinate pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocationData {
	pub latitude: f64,
	pub longitude: f64,
	pub address: String,
	pub district: String,
	pub state: String,
	pub country: String,
}

impl LocationData {
	/// The coordinates this record describes; location data is cached under them.
	pub fn point(&self) -> GeoPoint {
		GeoPoint {
			lat: self.latitude,
			lon: self.longitude,
		}
	}
}
