use std::time::Duration;

use async_trait::async_trait;
use parley_actor::{Actor, ActorSystem, Context, HandlerError, Pid};
use tracing::info;

use crate::config::DemoConfig;
use crate::messages::DemoMsg;
use crate::workers::AlternatingWorker;

/// Holds its turn until each reply or timeout. Ticks queue up meanwhile.
struct WaitPinger {
	worker: Pid,
	timeout: Duration,
}

#[async_trait]
impl Actor for WaitPinger {
	type Msg = DemoMsg;

	async fn receive(&mut self, ctx: &mut Context<Self>) -> Result<(), HandlerError> {
		let DemoMsg::Tick { count } = *ctx.message() else {
			return Ok(());
		};
		match ctx.request_future(&self.worker, DemoMsg::Ping { count }, self.timeout).result().await {
			Ok(reply) => info!(?reply, "Received pong message"),
			Err(err) => info!(count, error = %err, "Timed out"),
		}
		Ok(())
	}
}

pub(super) fn spawn(system: &ActorSystem<DemoMsg>, config: &DemoConfig) -> Pid {
	let worker = system.spawn(AlternatingWorker::default());
	system.spawn(WaitPinger {
		worker,
		timeout: config.timeout,
	})
}
