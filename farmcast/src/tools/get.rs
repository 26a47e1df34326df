use anyhow::{Result, bail};
use farmcast::{
	cache::Lookup,
	config::Config,
	core::{DataType, GeoPoint},
};

#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true, allow_negative_numbers = true)]
pub struct Subcommand {
	/// data type to read
	#[arg(value_enum)]
	data_type: DataType,

	/// latitude in degrees
	lat: f64,

	/// longitude in degrees
	lon: f64,

	/// season of crop recommendations, e.g. "kharif" or "rabi"
	#[arg(long)]
	season: Option<String>,
}

pub fn run(arguments: &Subcommand, config: &Config) -> Result<()> {
	if arguments.season.is_some() && arguments.data_type != DataType::CropRecommendations {
		bail!("--season only applies to crop_recommendations, not {}", arguments.data_type);
	}
	let point = GeoPoint::new(arguments.lat, arguments.lon)?;
	let cache = config.open_cache()?;
	let season = arguments.season.as_deref().unwrap_or_default();
	let lookup = cache.lookup(&point, arguments.data_type, season);
	cache.close();

	match lookup {
		Lookup::Hit(payload) => {
			let value: serde_json::Value = serde_json::from_str(&payload.encode()?)?;
			println!("{}", serde_json::to_string_pretty(&value)?);
			Ok(())
		}
		Lookup::Miss(reason) => bail!("no cached {} at {point}: {reason}", arguments.data_type),
	}
}
