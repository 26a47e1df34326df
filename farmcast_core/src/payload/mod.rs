//! Domain payloads that the cache can hold.
//!
//! Every cache entry stores one [`Payload`] variant, encoded as JSON text. The
//! entry's [`DataType`] tag decides which variant its text is decoded into, so
//! adding a new kind means one new variant, one tag, and one arm in
//! [`Payload::encode`] and [`Payload::decode`].
//!
//! Only the inner value is encoded; the tag lives beside the payload in the store.

mod crops;
mod historical;
mod location;
mod soil;
mod weather;

pub use crops::*;
pub use historical::*;
pub use location::*;
pub use soil::*;
pub use weather::*;

use crate::DataType;

/// A value of one of the known payload kinds.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
	Location(LocationData),
	WeatherCurrent(WeatherData),
	WeatherForecast(WeatherData),
	Soil(SoilData),
	CropRecommendations(CropRecommendationSet),
	HistoricalPatterns(HistoricalPatternSet),
}

impl Payload {
	pub fn data_type(&self) -> DataType {
		match self {
			Payload::Location(_) => DataType::LocationData,
			Payload::WeatherCurrent(_) => DataType::WeatherCurrent,
			Payload::WeatherForecast(_) => DataType::WeatherForecast,
			Payload::Soil(_) => DataType::SoilData,
			Payload::CropRecommendations(_) => DataType::CropRecommendations,
			Payload::HistoricalPatterns(_) => DataType::HistoricalData,
		}
	}

	/// Wraps weather data in the current or forecast variant.
	pub fn weather(data: WeatherData, is_forecast: bool) -> Self {
		if is_forecast {
			Payload::WeatherForecast(data)
		} else {
			Payload::WeatherCurrent(data)
		}
	}

	/// Serializes the inner value to the opaque text form kept in the store.
	///
	/// # Errors
	/// Returns an error if the value cannot be represented as JSON (e.g. a
	/// timestamp outside the RFC 3339 range).
	pub fn encode(&self) -> serde_json::Result<String> {
		match self {
			Payload::Location(v) => serde_json::to_string(v),
			Payload::WeatherCurrent(v) | Payload::WeatherForecast(v) => serde_json::to_string(v),
			Payload::Soil(v) => serde_json::to_string(v),
			Payload::CropRecommendations(v) => serde_json::to_string(v),
			Payload::HistoricalPatterns(v) => serde_json::to_string(v),
		}
	}

	/// Parses stored text back into the variant selected by `data_type`.
	///
	/// # Errors
	/// Returns an error if `text` is not a valid encoding for that kind.
	pub fn decode(data_type: DataType, text: &str) -> serde_json::Result<Self> {
		Ok(match data_type {
			DataType::LocationData => Payload::Location(serde_json::from_str(text)?),
			DataType::WeatherCurrent => Payload::WeatherCurrent(serde_json::from_str(text)?),
			DataType::WeatherForecast => Payload::WeatherForecast(serde_json::from_str(text)?),
			DataType::SoilData => Payload::Soil(serde_json::from_str(text)?),
			DataType::CropRecommendations => Payload::CropRecommendations(serde_json::from_str(text)?),
			DataType::HistoricalData => Payload::HistoricalPatterns(serde_json::from_str(text)?),
		})
	}
}
