//! Pong workers standing in for slow downstream services.

use std::time::Duration;

use async_trait::async_trait;
use parley_actor::{Actor, Context, HandlerError};

use crate::messages::DemoMsg;

/// Reply latency of [`PongWorker`] for a given ping count.
pub fn pong_delay(count: u32) -> Duration {
	let millis = match count % 3 {
		0 => 1700,
		1 => 300,
		_ => 2900,
	};
	Duration::from_millis(millis)
}

/// Pool member: sleeps per [`pong_delay`] and answers the sender.
pub struct PongWorker;

#[async_trait]
impl Actor for PongWorker {
	type Msg = DemoMsg;

	async fn receive(&mut self, ctx: &mut Context<Self>) -> Result<(), HandlerError> {
		if let DemoMsg::Ping { count } = *ctx.message() {
			tokio::time::sleep(pong_delay(count)).await;
			ctx.respond(DemoMsg::Pong { count });
		}
		Ok(())
	}
}

/// Single worker for the wait demo, alternating a fast and a slow reply.
#[derive(Default)]
pub struct AlternatingWorker {
	slow_next: bool,
}

impl AlternatingWorker {
	pub const FAST: Duration = Duration::from_millis(300);
	pub const SLOW: Duration = Duration::from_millis(2500);

	fn next_delay(&mut self) -> Duration {
		let delay = if self.slow_next { Self::SLOW } else { Self::FAST };
		self.slow_next = !self.slow_next;
		delay
	}
}

#[async_trait]
impl Actor for AlternatingWorker {
	type Msg = DemoMsg;

	async fn receive(&mut self, ctx: &mut Context<Self>) -> Result<(), HandlerError> {
		if let DemoMsg::Ping { count } = *ctx.message() {
			tokio::time::sleep(self.next_delay()).await;
			ctx.respond(DemoMsg::Pong { count });
		}
		Ok(())
	}
}
