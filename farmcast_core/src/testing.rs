//! Sample payloads shared by the tests of this and downstream crates.
//!
//! Compiled for this crate's tests and, through the `test` feature, for others.

use crate::*;
use std::collections::BTreeMap;
use time::macros::datetime;

/// The reference location used throughout the tests (Bengaluru).
pub const BENGALURU: GeoPoint = GeoPoint {
	lat: 12.971,
	lon: 77.594,
};

#[must_use]
pub fn sample_location() -> LocationData {
	LocationData {
		latitude: BENGALURU.lat,
		longitude: BENGALURU.lon,
		address: "MG Road, Bengaluru".to_string(),
		district: "Bengaluru Urban".to_string(),
		state: "Karnataka".to_string(),
		country: "India".to_string(),
	}
}

#[must_use]
pub fn sample_weather() -> WeatherData {
	WeatherData {
		temperature: 27.5,
		humidity: 64.0,
		rainfall: 2.5,
		evapotranspiration: 4.1,
		wind_speed: 3.2,
		pressure: 1012.0,
		timestamp: datetime!(2024-06-01 06:00 UTC),
	}
}

#[must_use]
pub fn sample_soil() -> SoilData {
	SoilData {
		ph: 6.5,
		moisture: 22.0,
		organic_carbon: 0.8,
		nitrogen: 280.0,
		phosphorus: 22.0,
		potassium: 180.0,
		sand_content: 45.0,
		clay_content: 30.0,
		silt_content: 25.0,
	}
}

#[must_use]
pub fn sample_crops(season: &str) -> CropRecommendationSet {
	let crop = |name: &str, water: f64, days: u32| CropRecommendation {
		crop_name: name.to_string(),
		expected_yield: 3200.0,
		profit_margin: 32.5,
		sustainability_score: 71.0,
		water_requirement: water,
		growth_duration: days,
		best_planting_time: format!("{season} sowing window"),
		risk_factors: vec!["stem borer".to_string()],
		care_instructions: vec!["irrigate weekly".to_string(), "apply mulch".to_string()],
	};
	CropRecommendationSet {
		recommendations: vec![crop("Rice", 1200.0, 120), crop("Maize", 500.0, 95)],
		season: season.to_string(),
		location: BENGALURU,
	}
}

#[must_use]
pub fn sample_history() -> HistoricalPatternSet {
	let conditions: BTreeMap<String, String> = [
		("rainfall_variability", "moderate"),
		("temperature_stress", "moderate"),
		("extreme_events", "low"),
	]
	.into_iter()
	.map(|(k, v)| (k.to_string(), v.to_string()))
	.collect();
	HistoricalPatternSet {
		patterns: (2019..=2021)
			.map(|year| HistoricalPattern {
				crop: "Wheat".to_string(),
				year,
				yield_per_hectare: 2900.0 + f64::from(year - 2019) * 50.0,
				profit_margin: 30.0,
				weather_conditions: conditions.clone(),
				success_rate: 0.82,
			})
			.collect(),
		location: BENGALURU,
	}
}
