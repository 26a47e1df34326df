use crate::GeoPoint;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CropRecommendation {
	pub crop_name: String,
	/// kg/hectare
	pub expected_yield: f64,
	/// percent
	pub profit_margin: f64,
	/// 0–100
	pub sustainability_score: f64,
	/// mm/season
	pub water_requirement: f64,
	/// days
	pub growth_duration: u32,
	pub best_planting_time: String,
	pub risk_factors: Vec<String>,
	pub care_instructions: Vec<String>,
}

/// Stored form of a recommendation list: the crops plus the season and the
/// coordinates they were computed for.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CropRecommendationSet {
	pub recommendations: Vec<CropRecommendation>,
	pub season: String,
	pub location: GeoPoint,
}
