//! Command-line interface.

use clap::{Parser, Subcommand};
use clap_verbosity_flag::{ErrorLevel, Verbosity};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
	author,
	version,
	about,
	long_about = None,
	propagate_version = true,
	disable_help_subcommand = true,
)]
pub struct Cli {
	#[command(subcommand)]
	pub command: Commands,

	#[command(flatten)]
	pub verbose: Verbosity<ErrorLevel>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	#[clap(alias = "server")]
	/// Serve tiles and UTFGrid documents via http
	Serve(ServeArgs),
}

#[derive(clap::Args, Debug)]
pub struct ServeArgs {
	/// Path to a YAML configuration file. Overrides `TILEPOINTS_CONFIG`.
	#[arg(short = 'c', long, value_name = "FILE", display_order = 0)]
	pub config: Option<PathBuf>,

	/// Serve via socket ip. Default: 0.0.0.0
	#[arg(short = 'i', long, display_order = 0)]
	pub ip: Option<String>,

	/// Serve via port. Default: 5000
	#[arg(short, long, display_order = 0)]
	pub port: Option<u16>,
}
