use super::{CacheConfig, TtlConfig};
use anyhow::{Context, Result};
use farmcast_cache::{CacheOptions, CacheService, StoreType};
use farmcast_derive::ConfigDoc;
use serde::Deserialize;
use std::{
	fs::File,
	io::{BufReader, Read},
	path::Path,
};

/// Environment variable that overrides `cache.directory`.
pub const CACHE_DIR_ENV: &str = "FARMCAST_CACHE_DIR";

#[derive(Default, Debug, Clone, Deserialize, PartialEq, ConfigDoc)]
#[serde(deny_unknown_fields)]
pub struct Config {
	/// Storage of cache entries
	#[serde(default)]
	pub cache: CacheConfig,

	/// Time-to-live per data type
	#[serde(default)]
	pub ttl: TtlConfig,
}

impl Config {
	pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
		Ok(serde_yaml_ng::from_reader(reader)?)
	}

	pub fn from_string(text: &str) -> Result<Self> {
		Ok(serde_yaml_ng::from_str(text)?)
	}

	/// Parses a file and resolves `cache.directory` relative to it.
	pub fn from_path(path: &Path) -> Result<Self> {
		let file = File::open(path).with_context(|| format!("opening config file {path:?}"))?;
		let mut config = Config::from_reader(BufReader::new(file)).with_context(|| format!("parsing config file {path:?}"))?;
		if let Some(base) = path.parent() {
			config.resolve_paths(base);
		}
		Ok(config)
	}

	/// Reads `path` if given (defaults otherwise), applies `FARMCAST_CACHE_DIR` and validates.
	pub fn load(path: Option<&Path>) -> Result<Self> {
		let mut config = match path {
			Some(path) => Config::from_path(path)?,
			None => Config::default(),
		};
		if let Some(directory) = std::env::var_os(CACHE_DIR_ENV).filter(|d| !d.is_empty()) {
			log::debug!("{CACHE_DIR_ENV} overrides cache directory with {directory:?}");
			config.cache.directory = directory.into();
		}
		config.check()?;
		Ok(config)
	}

	pub fn resolve_paths(&mut self, base: &Path) {
		if self.cache.directory.is_relative() {
			self.cache.directory = base.join(&self.cache.directory);
		}
	}

	pub fn check(&self) -> Result<()> {
		self.cache.check()?;
		self.ttl.policy()?;
		Ok(())
	}

	pub fn store_type(&self) -> StoreType {
		StoreType::Disk(self.cache.directory.clone())
	}

	pub fn cache_options(&self) -> Result<CacheOptions> {
		Ok(CacheOptions {
			precision: self.cache.precision,
			ttl: self.ttl.policy()?,
			sqlite: self.cache.sqlite_options(),
			sweep_interval: self.cache.sweep_interval(),
		})
	}

	/// Opens the configured cache; expired entries are swept on open.
	pub fn open_cache(&self) -> Result<CacheService> {
		CacheService::open(&self.store_type(), self.cache_options()?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;
	use std::{collections::BTreeMap, path::PathBuf, time::Duration};

	#[test]
	fn parse_example_config() {
		let path = Path::new("../testdata/farmcast.yml");
		let config = Config::from_path(path).unwrap();

		assert_eq!(
			config,
			Config {
				cache: CacheConfig {
					directory: PathBuf::from("../testdata/cache"),
					file_name: "advisory.db".to_string(),
					precision: 2,
					pool_size: 2,
					sweep_interval_seconds: Some(900),
				},
				ttl: TtlConfig {
					default_hours: 12,
					hours: BTreeMap::from([("market_prices".to_string(), 6), ("weather_current".to_string(), 2)]),
				}
			}
		);

		let options = config.cache_options().unwrap();
		assert_eq!(options.precision, 2);
		assert_eq!(options.sqlite.file_name, "advisory.db");
		assert_eq!(options.sweep_interval, Some(Duration::from_secs(900)));
		assert_eq!(options.ttl.ttl_for("weather_current"), time::Duration::hours(2));
		assert_eq!(
			config.store_type(),
			StoreType::Disk(PathBuf::from("../testdata/cache"))
		);
	}

	#[test]
	fn parse_empty_config() {
		assert_eq!(Config::from_string("").unwrap(), Config::default());
		assert_eq!(Config::from_string("cache:\n  precision: 4\n").unwrap().cache.pool_size, 4);
	}

	#[test]
	fn parse_invalid_config() {
		assert!(Config::from_string("cache:\n  precission: 3").is_err());
		assert!(Config::from_string("ttl:\n  hours: 3").is_err());
		assert!(Config::from_path(Path::new("../testdata/missing.yml")).is_err());
	}

	#[test]
	fn absolute_directories_are_kept() {
		let mut config = Config::from_string("cache:\n  directory: /var/cache/farmcast\n").unwrap();
		config.resolve_paths(Path::new("/etc/farmcast"));
		assert_eq!(config.cache.directory, PathBuf::from("/var/cache/farmcast"));

		let mut config = Config::default();
		config.resolve_paths(Path::new("/etc/farmcast"));
		assert_eq!(config.cache.directory, PathBuf::from("/etc/farmcast/cache"));
	}

	#[test]
	fn parse_demo_config() {
		let yaml = Config::demo_yaml();
		assert!(yaml.starts_with("# Storage of cache entries\ncache:\n"));
		assert!(yaml.contains("\n  # Hours an entry lives when its data type has no policy.\n  default_hours: 24\n"));
		let config = Config::from_string(&yaml).unwrap();
		assert_eq!(config.cache, CacheConfig::default());
		assert_eq!(config.ttl.hours.get("soil_data"), Some(&720));
		config.check().unwrap();
	}
}
