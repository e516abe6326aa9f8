//! One pinger per reply consumption strategy.
//!
//! Every pinger turns `Tick { count }` into `Ping { count }` against a worker
//! and logs what comes back. They differ only in how the reply future is
//! consumed, which changes what the pinger can do while a request is pending.

mod await_future;
mod pipe;
mod reenter;
mod wait;

use parley_actor::{ActorSystem, Pid};

use crate::cli::Strategy;
use crate::config::DemoConfig;
use crate::messages::DemoMsg;
use crate::workers::PongWorker;

/// Spawns the workers and the pinger for `strategy`; returns the pinger.
pub fn spawn(strategy: Strategy, system: &ActorSystem<DemoMsg>, config: &DemoConfig) -> Pid {
	match strategy {
		Strategy::Wait => wait::spawn(system, config),
		Strategy::Await => await_future::spawn(system, config),
		Strategy::Pipe => pipe::spawn(system, config),
		Strategy::Reenter => reenter::spawn(system, config),
	}
}

fn pong_pool(system: &ActorSystem<DemoMsg>, config: &DemoConfig) -> Pid {
	system.round_robin_pool(config.pool_size, || PongWorker)
}

#[cfg(test)]
mod tests;
