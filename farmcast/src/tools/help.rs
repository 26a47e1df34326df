use anyhow::Result;
use farmcast::config::Config;

#[derive(clap::Args, Debug)]
#[command(
	arg_required_else_help = true,
	disable_help_flag = true,
	disable_version_flag = true
)]
pub struct Subcommand {
	#[command(subcommand)]
	topic: Topic,
}

#[derive(clap::Subcommand, Debug)]
enum Topic {
	/// Commented example of the YAML configuration
	Config,
}

pub fn run(command: &Subcommand) -> Result<()> {
	match command.topic {
		Topic::Config => {
			println!("# farmcast configuration\n");
			print!("{}", Config::demo_yaml());
		}
	};
	Ok(())
}
