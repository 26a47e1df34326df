use serde::{Deserialize, Serialize};

/// Soil composition at a location.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SoilData {
	pub ph: f64,
	pub moisture: f64,
	pub organic_carbon: f64,
	pub nitrogen: f64,
	pub phosphorus: f64,
	pub potassium: f64,
	pub sand_content: f64,
	pub clay_content: f64,
	pub silt_content: f64,
}
