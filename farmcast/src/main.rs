mod tools;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use farmcast::config::Config;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
	author,
	version,
	about,
	long_about = None,
	propagate_version = true,
	arg_required_else_help = true,
	disable_help_subcommand = true,
)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	/// YAML configuration file
	#[arg(long, short, global = true, value_name = "FILE")]
	config: Option<PathBuf>,

	/// Cache directory; overrides the configuration and FARMCAST_CACHE_DIR
	#[arg(long, global = true, value_name = "DIR")]
	cache_dir: Option<PathBuf>,

	#[command(flatten)]
	verbose: Verbosity<WarnLevel>,
}

#[derive(Subcommand, Debug)]
enum Commands {
	/// Show entry counts of the cache
	Stats(tools::stats::Subcommand),

	/// Remove expired entries
	Cleanup(tools::cleanup::Subcommand),

	/// Remove entries by data type and/or location
	Invalidate(tools::invalidate::Subcommand),

	/// Print a cached payload as JSON
	Get(tools::get::Subcommand),

	/// Show detailed help
	Help(tools::help::Subcommand),
}

fn main() -> Result<()> {
	let cli = Cli::parse();

	env_logger::Builder::new()
		.filter_level(cli.verbose.log_level_filter())
		.format_timestamp(None)
		.init();

	run(cli)
}

fn load_config(cli: &Cli) -> Result<Config> {
	let mut config = Config::load(cli.config.as_deref())?;
	if let Some(directory) = &cli.cache_dir {
		config.cache.directory.clone_from(directory);
	}
	Ok(config)
}

fn run(cli: Cli) -> Result<()> {
	if let Commands::Help(arguments) = &cli.command {
		return tools::help::run(arguments);
	}

	let config = load_config(&cli)?;
	log::debug!("using cache directory {:?}", config.cache.directory);

	match &cli.command {
		Commands::Stats(arguments) => tools::stats::run(arguments, &config),
		Commands::Cleanup(arguments) => tools::cleanup::run(arguments, &config),
		Commands::Invalidate(arguments) => tools::invalidate::run(arguments, &config),
		Commands::Get(arguments) => tools::get::run(arguments, &config),
		Commands::Help(arguments) => tools::help::run(arguments),
	}
}
