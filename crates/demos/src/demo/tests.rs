use std::num::NonZeroUsize;
use std::time::Duration;

use parley_actor::DeadLetter;
use tokio::time::sleep;

use super::*;
use crate::ticker;

/// Runs `strategy` for `ticks` ticks, then waits `settle` for stragglers.
async fn run_demo(strategy: Strategy, ticks: u32, settle: Duration) -> (ActorSystem<DemoMsg>, Vec<DeadLetter<DemoMsg>>) {
	let config = DemoConfig::defaults(strategy);
	let system = ActorSystem::with_config(config.system.clone()).expect("default system config");
	let pinger = spawn(strategy, &system, &config);

	let window = config.tick * ticks + config.tick / 2;
	let sent = ticker::run(&system, &pinger, config.tick, sleep(window)).await;
	assert_eq!(sent, ticks);

	sleep(settle).await;
	let letters = system.dead_letters();
	(system, letters)
}

fn late_pongs(letters: &[DeadLetter<DemoMsg>]) -> Vec<u32> {
	letters
		.iter()
		.map(|letter| {
			assert!(letter.destination.is_future(), "dead letter for {}", letter.destination);
			assert_eq!(letter.sender, None);
			match letter.message {
				DemoMsg::Pong { count } => count,
				other => panic!("unexpected dead letter {other:?}"),
			}
		})
		.collect()
}

#[tokio::test(start_paused = true)]
async fn wait_demo_loses_every_other_reply() {
	// Ticks at 2s and 4s: the first reply takes 300ms, the second 2500ms against a 1s timeout.
	let (_, letters) = run_demo(Strategy::Wait, 2, Duration::from_secs(3)).await;

	assert_eq!(late_pongs(&letters), vec![2]);
}

#[tokio::test(start_paused = true)]
async fn pooled_demos_lose_counts_that_need_2900ms() {
	for strategy in [Strategy::Await, Strategy::Pipe, Strategy::Reenter] {
		// Ticks 1..=6 at 1s intervals; counts 2 and 5 sleep past the 2500ms timeout.
		let (system, letters) = run_demo(strategy, 6, Duration::from_secs(4)).await;

		assert_eq!(late_pongs(&letters), vec![2, 5], "{strategy:?}");
		// Ten workers, a router and the pinger; every future has been released.
		assert_eq!(system.live_processes(), 12, "{strategy:?}");
	}
}

#[tokio::test(start_paused = true)]
async fn single_worker_pool_serialises_pings() {
	let config = DemoConfig {
		pool_size: NonZeroUsize::new(1).expect("non-zero"),
		..DemoConfig::defaults(Strategy::Pipe)
	};
	let system = ActorSystem::new();
	let pool = pong_pool(&system, &config);

	// A single worker serialises the pings: 300ms then 2900ms.
	let first = system.request_future(&pool, DemoMsg::Ping { count: 1 }, config.timeout);
	let second = system.request_future(&pool, DemoMsg::Ping { count: 2 }, config.timeout);

	assert_eq!(first.await, Ok(DemoMsg::Pong { count: 1 }));
	assert!(second.await.is_err_and(|err| err.is_timeout()));
}
