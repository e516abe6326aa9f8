use std::time::Duration;

use async_trait::async_trait;
use parley_actor::{Actor, ActorSystem, Context, FutureError, HandlerError, Pid};
use tracing::info;

use crate::config::DemoConfig;
use crate::messages::DemoMsg;

/// Suspends each tick and resumes it in a later turn with the reply.
///
/// Unlike the await demo, the continuation runs as the pinger itself and
/// `ctx.message()` still reports the tick that issued the request.
struct ReenterPinger {
	pool: Pid,
	timeout: Duration,
	answered: u32,
}

impl ReenterPinger {
	fn resume(&mut self, ctx: &mut Context<Self>, outcome: Result<DemoMsg, FutureError>) -> Result<(), HandlerError> {
		match outcome {
			Ok(reply) => {
				self.answered += 1;
				info!(?reply, tick = ?ctx.message(), answered = self.answered, "Received pong response");
			}
			Err(err) => info!(message = ?ctx.message(), error = %err, "Failed to handle"),
		}
		Ok(())
	}
}

#[async_trait]
impl Actor for ReenterPinger {
	type Msg = DemoMsg;

	async fn receive(&mut self, ctx: &mut Context<Self>) -> Result<(), HandlerError> {
		let DemoMsg::Tick { count } = *ctx.message() else {
			return Ok(());
		};
		let future = ctx.request_future(&self.pool, DemoMsg::Ping { count }, self.timeout);
		ctx.reenter_after(future, Self::resume);
		Ok(())
	}
}

pub(super) fn spawn(system: &ActorSystem<DemoMsg>, config: &DemoConfig) -> Pid {
	let pool = super::pong_pool(system, config);
	system.spawn(ReenterPinger {
		pool,
		timeout: config.timeout,
		answered: 0,
	})
}
