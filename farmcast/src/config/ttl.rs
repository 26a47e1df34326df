use anyhow::{Context, Result};
use farmcast_core::{DEFAULT_TTL_HOURS, TtlPolicy};
use farmcast_derive::ConfigDoc;
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Deserialize, PartialEq, ConfigDoc)]
#[serde(deny_unknown_fields, default)]
pub struct TtlConfig {
	/// Hours an entry lives when its data type has no policy.
	#[config_demo("24")]
	pub default_hours: u32,

	/// Hours per data type. Entries here replace the built-in policy
	/// (weather_current 1, weather_forecast 6, soil_data 720,
	/// crop_recommendations 24, historical_data 168, location_data 720)
	/// or add new data types.
	#[config_demo(
		r#"
    weather_current: 1
    soil_data: 720"#
	)]
	pub hours: BTreeMap<String, u32>,
}

impl Default for TtlConfig {
	fn default() -> Self {
		TtlConfig {
			default_hours: DEFAULT_TTL_HOURS,
			hours: BTreeMap::new(),
		}
	}
}

impl TtlConfig {
	/// Built-in policy with this section's overrides applied.
	pub fn policy(&self) -> Result<TtlPolicy> {
		let mut policy = TtlPolicy::default();
		policy.set_default_hours(self.default_hours).context("ttl.default_hours")?;
		for (data_type, hours) in &self.hours {
			policy
				.set_hours(data_type, *hours)
				.with_context(|| format!("ttl.hours.{data_type}"))?;
		}
		Ok(policy)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;
	use time::Duration;

	#[test]
	fn overrides_apply_on_top_of_built_ins() {
		let config: TtlConfig = serde_yaml_ng::from_str("default_hours: 12\nhours:\n  soil_data: 48\n  pest_alerts: 3\n").unwrap();
		let policy = config.policy().unwrap();
		assert_eq!(policy.ttl_for("soil_data"), Duration::hours(48));
		assert_eq!(policy.ttl_for("pest_alerts"), Duration::hours(3));
		assert_eq!(policy.ttl_for("weather_current"), Duration::hours(1));
		assert_eq!(policy.ttl_for("market_prices"), Duration::hours(12));
	}

	#[test]
	fn zero_hours_are_rejected() {
		let config: TtlConfig = serde_yaml_ng::from_str("hours:\n  weather_current: 0\n").unwrap();
		let err = config.policy().unwrap_err();
		assert_eq!(err.to_string(), "ttl.hours.weather_current");

		let config: TtlConfig = serde_yaml_ng::from_str("default_hours: 0\n").unwrap();
		assert_eq!(config.policy().unwrap_err().to_string(), "ttl.default_hours");
	}

	#[test]
	fn excessive_hours_are_rejected() {
		let config: TtlConfig = serde_yaml_ng::from_str("hours:\n  soil_data: 100000000\n").unwrap();
		let err = config.policy().unwrap_err();
		assert_eq!(err.to_string(), "ttl.hours.soil_data");
		assert_eq!(
			err.root_cause().to_string(),
			"TTL for 'soil_data' must not exceed 876000 hours, got 100000000"
		);
	}
}
