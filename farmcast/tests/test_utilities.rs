#![allow(unused)]

use assert_cmd::{Command, cargo};
use farmcast::{
	cache::{CacheOptions, CacheService, StoreType},
	core::GeoPoint,
};
use std::path::{Path, PathBuf};
use tempfile::{TempDir, tempdir};

/// Helper to get a testdata file path.
pub fn get_testdata(filename: &str) -> PathBuf {
	PathBuf::from(env!("CARGO_MANIFEST_DIR"))
		.parent()
		.unwrap()
		.join("testdata")
		.join(filename)
}

/// Helper to create a Command for the farmcast binary, isolated from the caller's environment.
pub fn farmcast_cmd() -> Command {
	let mut cmd = Command::new(cargo::cargo_bin!("farmcast"));
	cmd.env_remove("FARMCAST_CACHE_DIR");
	cmd
}

/// Opens a cache in a fresh temporary directory.
pub fn temp_cache() -> (TempDir, CacheService) {
	let dir = tempdir().expect("failed to create temp dir");
	let cache = CacheService::open(&StoreType::Disk(dir.path().to_path_buf()), CacheOptions::default()).unwrap();
	(dir, cache)
}

pub fn dir_arg(dir: &TempDir) -> String {
	dir.path().to_string_lossy().to_string()
}

pub fn point(lat: f64, lon: f64) -> GeoPoint {
	GeoPoint::new(lat, lon).unwrap()
}
