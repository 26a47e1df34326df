//! Time-to-live per data-type tag.
//!
//! The table starts from the built-in policy below and can be extended or
//! overridden (e.g. from configuration). Tags without an entry fall back to
//! [`TtlPolicy::default_ttl`]; that is a [`PolicyMiss`], not an error.
//!
//! | tag                    | hours |
//! |------------------------|-------|
//! | `weather_current`      | 1     |
//! | `weather_forecast`     | 6     |
//! | `soil_data`            | 720   |
//! | `crop_recommendations` | 24    |
//! | `historical_data`      | 168   |
//! | `location_data`        | 720   |

use super::DataType;
use anyhow::{Result, ensure};
use std::collections::BTreeMap;
use time::Duration;

/// Fallback for tags that have no explicit policy.
pub const DEFAULT_TTL_HOURS: u32 = 24;

/// Longest accepted TTL: one hundred years.
pub const MAX_TTL_HOURS: u32 = 24 * 365 * 100;

const BUILT_IN_HOURS: [(DataType, u32); 6] = [
	(DataType::WeatherCurrent, 1),
	(DataType::WeatherForecast, 6),
	(DataType::SoilData, 24 * 30),
	(DataType::CropRecommendations, 24),
	(DataType::HistoricalData, 24 * 7),
	(DataType::LocationData, 24 * 30),
];

/// A tag was looked up that has no explicit policy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PolicyMiss {
	pub data_type: String,
	pub fallback: Duration,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TtlPolicy {
	hours: BTreeMap<String, u32>,
	default_hours: u32,
}

impl TtlPolicy {
	/// Looks up the explicit TTL for `data_type`.
	///
	/// # Errors
	/// Returns a [`PolicyMiss`] carrying the fallback duration when the tag is unknown.
	pub fn lookup(&self, data_type: &str) -> Result<Duration, PolicyMiss> {
		match self.hours.get(data_type) {
			Some(hours) => Ok(Duration::hours(i64::from(*hours))),
			None => Err(PolicyMiss {
				data_type: data_type.to_string(),
				fallback: self.default_ttl(),
			}),
		}
	}

	/// TTL for `data_type`, falling back to the default for unknown tags.
	pub fn ttl_for(&self, data_type: &str) -> Duration {
		self.lookup(data_type).unwrap_or_else(|miss| {
			log::debug!(
				"no TTL policy for '{}', using default of {}",
				miss.data_type,
				miss.fallback
			);
			miss.fallback
		})
	}

	pub fn default_ttl(&self) -> Duration {
		Duration::hours(i64::from(self.default_hours))
	}

	/// Sets or replaces the TTL for a tag.
	///
	/// # Errors
	/// Returns an error if `data_type` is empty or `hours` is outside `1..=MAX_TTL_HOURS`.
	pub fn set_hours(&mut self, data_type: &str, hours: u32) -> Result<()> {
		ensure!(!data_type.is_empty(), "TTL policy requires a non-empty data type");
		ensure!(hours > 0, "TTL for '{data_type}' must be at least one hour");
		ensure!(
			hours <= MAX_TTL_HOURS,
			"TTL for '{data_type}' must not exceed {MAX_TTL_HOURS} hours, got {hours}"
		);
		self.hours.insert(data_type.to_string(), hours);
		Ok(())
	}

	/// Replaces the fallback TTL.
	///
	/// # Errors
	/// Returns an error if `hours` is outside `1..=MAX_TTL_HOURS`.
	pub fn set_default_hours(&mut self, hours: u32) -> Result<()> {
		ensure!(hours > 0, "default TTL must be at least one hour");
		ensure!(
			hours <= MAX_TTL_HOURS,
			"default TTL must not exceed {MAX_TTL_HOURS} hours, got {hours}"
		);
		self.default_hours = hours;
		Ok(())
	}

	/// All explicit `(tag, hours)` pairs, sorted by tag.
	pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
		self.hours.iter().map(|(tag, hours)| (tag.as_str(), *hours))
	}
}

impl Default for TtlPolicy {
	fn default() -> Self {
		TtlPolicy {
			hours: BUILT_IN_HOURS
				.iter()
				.map(|(data_type, hours)| (data_type.as_str().to_string(), *hours))
				.collect(),
			default_hours: DEFAULT_TTL_HOURS,
		}
	}
}
