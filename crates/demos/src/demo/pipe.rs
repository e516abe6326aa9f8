use std::time::Duration;

use async_trait::async_trait;
use parley_actor::{Actor, ActorSystem, Context, HandlerError, Pid};
use tracing::info;

use crate::config::DemoConfig;
use crate::messages::DemoMsg;

/// Pipes every reply back into its own mailbox. Timeouts are silent; the
/// late reply shows up as a dead letter instead.
struct PipePinger {
	pool: Pid,
	timeout: Duration,
}

#[async_trait]
impl Actor for PipePinger {
	type Msg = DemoMsg;

	async fn receive(&mut self, ctx: &mut Context<Self>) -> Result<(), HandlerError> {
		match *ctx.message() {
			DemoMsg::Tick { count } => ctx
				.request_future(&self.pool, DemoMsg::Ping { count }, self.timeout)
				.pipe_to(ctx.self_pid()),
			DemoMsg::Pong { .. } => info!(message = ?ctx.message(), "Received pong message"),
			DemoMsg::Ping { .. } => {}
		}
		Ok(())
	}
}

pub(super) fn spawn(system: &ActorSystem<DemoMsg>, config: &DemoConfig) -> Pid {
	let pool = super::pong_pool(system, config);
	system.spawn(PipePinger {
		pool,
		timeout: config.timeout,
	})
}
