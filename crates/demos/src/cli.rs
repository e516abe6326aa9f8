use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "parley")]
#[command(about = "Ping a pool of slow workers and consume the replies four different ways")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// How the pinger consumes each reply future.
	#[command(subcommand)]
	pub strategy: Strategy,

	/// TOML file with demo settings
	#[arg(long, short = 'c', value_name = "FILE", global = true)]
	pub config: Option<PathBuf>,

	/// Settings taking precedence over the config file.
	#[command(flatten)]
	pub overrides: Overrides,

	/// Verbose logging (ignored when RUST_LOG is set)
	#[arg(short, long, global = true)]
	pub verbose: bool,
}

/// Reply consumption strategies, one demo each.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
	/// Block the pinger's turn until the reply or timeout
	Wait,
	/// Handle the outcome in a callback off the pinger's turn
	Await,
	/// Deliver the reply to the pinger's mailbox as a message
	Pipe,
	/// Resume the suspended turn once the reply arrives
	Reenter,
}

/// Command-line overrides for [`DemoConfig`](crate::config::DemoConfig).
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
	/// Milliseconds between ticks
	#[arg(long, value_name = "MS", global = true)]
	pub tick_ms: Option<u64>,

	/// Request timeout in milliseconds
	#[arg(long, value_name = "MS", global = true)]
	pub timeout_ms: Option<u64>,

	/// Number of pooled pong workers (unused by the wait demo)
	#[arg(long, value_name = "N", global = true)]
	pub pool_size: Option<NonZeroUsize>,
}
