use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Weather observation or forecast for one location.
///
/// `timestamp` is written as RFC 3339.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeatherData {
	/// °C
	pub temperature: f64,
	/// %
	pub humidity: f64,
	/// mm
	pub rainfall: f64,
	/// mm/day
	pub evapotranspiration: f64,
	/// m/s
	pub wind_speed: f64,
	/// hPa
	pub pressure: f64,
	#[serde(with = "time::serde::rfc3339")]
	pub timestamp: OffsetDateTime,
}
