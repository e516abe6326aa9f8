//! `parley` demo binary.
//!
//! A ticker drives a pinger actor, which requests pongs from slow workers and
//! consumes each reply future with the strategy picked on the command line.
//! Replies that miss their deadline are printed as dead letters.

mod cli;
mod config;
mod demo;
mod events;
mod messages;
mod ticker;
mod workers;

use clap::Parser;
use parley_actor::ActorSystem;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::config::DemoConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let cli = Cli::parse();

	// RUST_LOG wins over --verbose
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(if cli.verbose { "debug" } else { "info" }));
	let subscriber = tracing_subscriber::fmt().with_env_filter(filter).finish();
	tracing::subscriber::set_global_default(subscriber)?;

	let config = DemoConfig::resolve(cli.strategy, cli.config.as_deref(), &cli.overrides)?;
	info!(
		strategy = ?cli.strategy,
		tick = ?config.tick,
		timeout = ?config.timeout,
		pool_size = config.pool_size.get(),
		"Starting parley"
	);

	let system = ActorSystem::with_config(config.system.clone())?;
	let _logger = events::spawn_logger(&system);
	let pinger = demo::spawn(cli.strategy, &system, &config);

	let shutdown = async {
		if let Err(error) = tokio::signal::ctrl_c().await {
			tracing::error!(%error, "failed to listen for ctrl-c");
		}
	};
	let ticks = ticker::run(&system, &pinger, config.tick, shutdown).await;

	info!(ticks, "Finish");
	Ok(())
}
