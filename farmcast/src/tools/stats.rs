use anyhow::Result;
use farmcast::{
	cache::open_store,
	config::Config,
	core::{Clock, SystemClock},
};

#[derive(clap::Args, Debug)]
#[command(disable_version_flag = true)]
pub struct Subcommand {
	/// print compact JSON on one line
	#[arg(long)]
	compact: bool,
}

/// Counts entries without sweeping, so expired entries are reported as such.
pub fn run(arguments: &Subcommand, config: &Config) -> Result<()> {
	let store = open_store(&config.store_type(), &config.cache.sqlite_options())?;
	let stats = store.stats(SystemClock.now())?;
	log::debug!("{stats:?}");

	let json = stats.to_json();
	if arguments.compact {
		println!("{json}");
	} else {
		println!("{}", serde_json::to_string_pretty(&json)?);
	}
	Ok(())
}
