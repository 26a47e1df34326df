use anyhow::Result;
use farmcast::{
	config::Config,
	core::{DataType, GeoPoint},
};

#[derive(clap::Args, Debug)]
#[command(disable_version_flag = true, allow_negative_numbers = true)]
pub struct Subcommand {
	/// only remove entries of this data type
	#[arg(long, value_enum)]
	data_type: Option<DataType>,

	/// only remove entries in the bucket of this latitude
	#[arg(long, requires = "lon")]
	lat: Option<f64>,

	/// only remove entries in the bucket of this longitude
	#[arg(long, requires = "lat")]
	lon: Option<f64>,
}

/// Without filters every entry is removed.
pub fn run(arguments: &Subcommand, config: &Config) -> Result<()> {
	let location = match (arguments.lat, arguments.lon) {
		(Some(lat), Some(lon)) => Some(GeoPoint::new(lat, lon)?),
		_ => None,
	};

	let cache = config.open_cache()?;
	let removed = cache.invalidate(arguments.data_type, location.as_ref())?;
	println!("invalidated {removed} entries");
	cache.close();
	Ok(())
}

#[cfg(test)]
mod tests {
	use crate::tests::run_command;
	use assert_fs::TempDir;

	#[test]
	fn rejects_out_of_range_coordinates() {
		let dir = TempDir::new().unwrap();
		let cache_dir = dir.path().to_str().unwrap();
		let err = run_command(vec![
			"farmcast",
			"invalidate",
			"--lat",
			"91",
			"--lon",
			"0",
			"--cache-dir",
			cache_dir,
		])
		.unwrap_err();
		assert_eq!(err.to_string(), "latitude must be within [-90, 90], got 91");
	}

	#[test]
	fn negative_coordinates() {
		let dir = TempDir::new().unwrap();
		let cache_dir = dir.path().to_str().unwrap();
		run_command(vec![
			"farmcast",
			"invalidate",
			"--data-type",
			"soil_data",
			"--lat",
			"-33.87",
			"--lon",
			"151.21",
			"--cache-dir",
			cache_dir,
		])
		.unwrap();
	}
}
