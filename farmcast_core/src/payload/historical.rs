use crate::GeoPoint;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Yield and profit of one crop in one past year.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPattern {
	pub crop: String,
	pub year: i32,
	pub yield_per_hectare: f64,
	pub profit_margin: f64,
	/// Qualitative labels such as `rainfall_variability: "high"`.
	pub weather_conditions: BTreeMap<String, String>,
	pub success_rate: f64,
}

/// Stored form of a historical analysis: the patterns plus the coordinates they describe.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPatternSet {
	pub patterns: Vec<HistoricalPattern>,
	pub location: GeoPoint,
}
