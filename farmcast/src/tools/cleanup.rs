use anyhow::Result;
use farmcast::config::Config;

#[derive(clap::Args, Debug)]
#[command(disable_version_flag = true)]
pub struct Subcommand {}

pub fn run(_arguments: &Subcommand, config: &Config) -> Result<()> {
	let cache = config.open_cache()?;
	// opening already swept once; this reports what is left over
	let removed = cache.cleanup_expired()?;
	println!("removed {removed} expired entries");
	cache.close();
	Ok(())
}
