use anyhow::{Result, ensure};
use farmcast_cache::{DATABASE_FILE_NAME, SqliteOptions};
use farmcast_core::{DEFAULT_PRECISION, MAX_PRECISION};
use farmcast_derive::ConfigDoc;
use serde::Deserialize;
use std::{path::PathBuf, time::Duration};

#[derive(Debug, Clone, Deserialize, PartialEq, ConfigDoc)]
#[serde(deny_unknown_fields, default)]
pub struct CacheConfig {
	/// Directory holding the cache database. Relative paths are resolved against
	/// the directory of the configuration file.
	#[config_demo("cache")]
	pub directory: PathBuf,

	/// File name of the SQLite database inside `directory`.
	#[config_demo("farmcast_cache.db")]
	pub file_name: String,

	/// Decimal places kept when bucketing coordinates (0-9). Three places group
	/// points roughly 100 m apart.
	#[config_demo("3")]
	pub precision: u8,

	/// Maximum number of pooled read connections.
	#[config_demo("4")]
	pub pool_size: u32,

	/// Sweep expired entries in the background at this interval. Without it,
	/// entries are swept when the cache is opened and closed.
	pub sweep_interval_seconds: Option<u64>,
}

impl Default for CacheConfig {
	fn default() -> Self {
		CacheConfig {
			directory: PathBuf::from("cache"),
			file_name: DATABASE_FILE_NAME.to_string(),
			precision: DEFAULT_PRECISION,
			pool_size: 4,
			sweep_interval_seconds: None,
		}
	}
}

impl CacheConfig {
	pub fn check(&self) -> Result<()> {
		ensure!(!self.file_name.trim().is_empty(), "cache.file_name must not be empty");
		ensure!(
			self.precision <= MAX_PRECISION,
			"cache.precision must be at most {MAX_PRECISION}, got {}",
			self.precision
		);
		ensure!(self.pool_size > 0, "cache.pool_size must be positive");
		ensure!(
			self.sweep_interval_seconds != Some(0),
			"cache.sweep_interval_seconds must be positive"
		);
		Ok(())
	}

	pub fn sqlite_options(&self) -> SqliteOptions {
		SqliteOptions {
			file_name: self.file_name.clone(),
			pool_size: self.pool_size,
			..SqliteOptions::default()
		}
	}

	pub fn sweep_interval(&self) -> Option<Duration> {
		self.sweep_interval_seconds.map(Duration::from_secs)
	}
}
