//! This module defines the `DataType` enum: the tag stored with every cache entry.
//! The tag selects the TTL policy and the schema used to decode the payload.
//!
//! ```
//! use farmcast_core::DataType;
//!
//! assert_eq!(DataType::SoilData.as_str(), "soil_data");
//! assert_eq!("weather_forecast".parse::<DataType>().unwrap(), DataType::WeatherForecast);
//! ```

use anyhow::{Result, bail};
#[cfg(feature = "cli")]
use clap::ValueEnum;
use std::{fmt::Display, str::FromStr};

/// The kinds of payload the cache knows how to store.
#[cfg_attr(feature = "cli", derive(ValueEnum))]
#[cfg_attr(feature = "cli", value(rename_all = "snake_case"))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DataType {
	LocationData,
	WeatherCurrent,
	WeatherForecast,
	SoilData,
	CropRecommendations,
	HistoricalData,
}

impl DataType {
	pub const ALL: [DataType; 6] = [
		DataType::LocationData,
		DataType::WeatherCurrent,
		DataType::WeatherForecast,
		DataType::SoilData,
		DataType::CropRecommendations,
		DataType::HistoricalData,
	];

	pub fn as_str(&self) -> &'static str {
		match self {
			DataType::LocationData => "location_data",
			DataType::WeatherCurrent => "weather_current",
			DataType::WeatherForecast => "weather_forecast",
			DataType::SoilData => "soil_data",
			DataType::CropRecommendations => "crop_recommendations",
			DataType::HistoricalData => "historical_data",
		}
	}

	/// Selects the weather tag for current conditions or a forecast.
	pub fn weather(is_forecast: bool) -> Self {
		if is_forecast {
			DataType::WeatherForecast
		} else {
			DataType::WeatherCurrent
		}
	}
}

impl Display for DataType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for DataType {
	type Err = anyhow::Error;

	fn from_str(value: &str) -> Result<Self> {
		match DataType::ALL.iter().find(|t| t.as_str() == value) {
			Some(data_type) => Ok(*data_type),
			None => bail!("unknown data type '{value}'"),
		}
	}
}
