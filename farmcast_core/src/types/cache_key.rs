//! Defines [`CacheKey`], the primary key of a cache entry.
//!
//! A key is `"{data_type}_{location_bucket}"`, optionally followed by
//! `"_{discriminator}"`. Keys without a discriminator never carry a trailing
//! separator, so they stay stable when discriminators are introduced elsewhere.

use std::fmt::{Debug, Display};
use thiserror::Error;

const SEPARATOR: char = '_';

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CacheKeyError {
	#[error("cache key requires a non-empty data type")]
	EmptyDataType,
}

/// Unique identifier of one cached fact.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
	/// Composes a key from its parts.
	///
	/// The discriminator is trimmed and lower-cased; when it ends up empty the
	/// segment is left out entirely.
	///
	/// # Errors
	/// Returns [`CacheKeyError::EmptyDataType`] if `data_type` is empty.
	pub fn build(data_type: &str, location_bucket: &str, discriminator: &str) -> Result<Self, CacheKeyError> {
		if data_type.is_empty() {
			return Err(CacheKeyError::EmptyDataType);
		}
		let discriminator = normalize_discriminator(discriminator);
		let key = if discriminator.is_empty() {
			format!("{data_type}{SEPARATOR}{location_bucket}")
		} else {
			format!("{data_type}{SEPARATOR}{location_bucket}{SEPARATOR}{discriminator}")
		};
		Ok(CacheKey(key))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

/// Discriminators are case-insensitive: `"Kharif"` and `"kharif"` address the same entry.
pub fn normalize_discriminator(discriminator: &str) -> String {
	discriminator.trim().to_lowercase()
}

impl AsRef<str> for CacheKey {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

impl Display for CacheKey {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.0)
	}
}

impl Debug for CacheKey {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "CacheKey({})", self.0)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("weather_current", "12.971_77.594", "", "weather_current_12.971_77.594")]
	#[case("soil_data", "0.000_0.000", "   ", "soil_data_0.000_0.000")]
	#[case("crop_recommendations", "12.971_77.594", "kharif", "crop_recommendations_12.971_77.594_kharif")]
	#[case("crop_recommendations", "12.971_77.594", " Rabi ", "crop_recommendations_12.971_77.594_rabi")]
	fn builds_keys(#[case] data_type: &str, #[case] bucket: &str, #[case] discriminator: &str, #[case] expected: &str) {
		assert_eq!(CacheKey::build(data_type, bucket, discriminator).unwrap().as_str(), expected);
	}

	#[test]
	fn rejects_empty_data_type() {
		assert_eq!(
			CacheKey::build("", "12.971_77.594", "kharif"),
			Err(CacheKeyError::EmptyDataType)
		);
	}

	#[test]
	fn discriminators_are_case_insensitive() {
		let a = CacheKey::build("crop_recommendations", "1.000_2.000", "KHARIF").unwrap();
		let b = CacheKey::build("crop_recommendations", "1.000_2.000", "kharif").unwrap();
		assert_eq!(a, b);
		assert_eq!(format!("{a:?}"), "CacheKey(crop_recommendations_1.000_2.000_kharif)");
	}
}
