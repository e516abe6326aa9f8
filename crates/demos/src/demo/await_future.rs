use std::time::Duration;

use async_trait::async_trait;
use parley_actor::{Actor, ActorSystem, Context, HandlerError, Pid};
use tracing::info;

use crate::config::DemoConfig;
use crate::messages::DemoMsg;

/// Hands each outcome to a callback and moves straight on to the next tick.
///
/// The callback runs outside the pinger's turn, so it only sees what it
/// captured: here the tick it was issued for.
struct AwaitPinger {
	pool: Pid,
	timeout: Duration,
}

#[async_trait]
impl Actor for AwaitPinger {
	type Msg = DemoMsg;

	async fn receive(&mut self, ctx: &mut Context<Self>) -> Result<(), HandlerError> {
		let tick = *ctx.message();
		let DemoMsg::Tick { count } = tick else {
			return Ok(());
		};
		let future = ctx.request_future(&self.pool, DemoMsg::Ping { count }, self.timeout);
		ctx.await_future(future, move |outcome| match outcome {
			Ok(reply) => info!(?reply, "Received pong response"),
			Err(err) => info!(count, message = ?tick, error = %err, "Failed to handle"),
		});
		Ok(())
	}
}

pub(super) fn spawn(system: &ActorSystem<DemoMsg>, config: &DemoConfig) -> Pid {
	let pool = super::pong_pool(system, config);
	system.spawn(AwaitPinger {
		pool,
		timeout: config.timeout,
	})
}
