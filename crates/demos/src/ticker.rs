use std::future::Future;
use std::time::Duration;

use parley_actor::{ActorSystem, Pid};
use tokio::time::{Instant, sleep_until};

use crate::messages::DemoMsg;

/// Sends `Tick { count }` to `target` every `every`, starting one period from
/// now with count 1, until `shutdown` completes. Returns the last count sent.
///
/// A period too long for the clock sends nothing and just waits for shutdown.
pub async fn run(system: &ActorSystem<DemoMsg>, target: &Pid, every: Duration, shutdown: impl Future<Output = ()>) -> u32 {
	let mut next = Instant::now().checked_add(every);
	let mut count = 0;
	tokio::pin!(shutdown);

	while let Some(at) = next {
		tokio::select! {
			biased;
			_ = &mut shutdown => return count,
			_ = sleep_until(at) => {
				count += 1;
				tracing::debug!(count, "ticker.tick");
				system.send(target, DemoMsg::Tick { count });
				next = at.checked_add(every);
			}
		}
	}
	shutdown.await;
	count
}
