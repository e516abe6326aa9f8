//! End-to-end request/reply scenarios against the public API.
//!
//! All tests run on paused tokio time, so the sleeps below cost nothing and
//! the observed instants are exact up to scheduling jitter.

use std::num::NonZeroUsize;
use std::time::Duration;

use async_trait::async_trait;
use parley_actor::{Actor, ActorSystem, Context, FutureError, HandlerError, Pid, SystemEvent};
use tokio::sync::mpsc;
use tokio::time::{Instant, sleep};

const TIMEOUT: Duration = Duration::from_millis(2500);

#[derive(Debug, Clone, PartialEq, Eq)]
enum Msg {
	Tick { count: u32 },
	Ping { count: u32 },
	Pong { count: u32 },
}

/// Sleeps by `count % 3` (1700, 300, 2900 ms) and echoes the count back.
struct PongWorker;

#[async_trait]
impl Actor for PongWorker {
	type Msg = Msg;

	async fn receive(&mut self, ctx: &mut Context<Self>) -> Result<(), HandlerError> {
		if let Msg::Ping { count } = *ctx.message() {
			let delay = match count % 3 {
				0 => 1700,
				1 => 300,
				_ => 2900,
			};
			sleep(Duration::from_millis(delay)).await;
			ctx.respond(Msg::Pong { count });
		}
		Ok(())
	}
}

/// Replies after a fixed delay.
struct FixedWorker(Duration);

#[async_trait]
impl Actor for FixedWorker {
	type Msg = Msg;

	async fn receive(&mut self, ctx: &mut Context<Self>) -> Result<(), HandlerError> {
		if let Msg::Ping { count } = *ctx.message() {
			sleep(self.0).await;
			ctx.respond(Msg::Pong { count });
		}
		Ok(())
	}
}

fn pool(system: &ActorSystem<Msg>) -> Pid {
	system.round_robin_pool(NonZeroUsize::new(10).expect("pool size"), || PongWorker)
}

fn near(actual: Duration, expected_ms: u64) -> bool {
	let expected = Duration::from_millis(expected_ms);
	actual >= expected && actual < expected + Duration::from_millis(10)
}

#[tokio::test(start_paused = true)]
async fn fast_worker_echoes_the_request_payload() {
	let system = ActorSystem::new();
	let worker = system.spawn(FixedWorker(Duration::from_millis(300)));

	let start = Instant::now();
	let reply = system.request_future(&worker, Msg::Ping { count: 41 }, TIMEOUT).await;

	assert_eq!(reply, Ok(Msg::Pong { count: 41 }));
	assert!(near(start.elapsed(), 300), "resolved at {:?}", start.elapsed());
	assert!(system.dead_letters().is_empty());
}

#[tokio::test(start_paused = true)]
async fn slow_worker_times_out_and_the_late_reply_is_a_dead_letter() {
	let system = ActorSystem::new();
	let mut events = system.subscribe();
	let worker = system.spawn(FixedWorker(Duration::from_millis(2900)));

	let start = Instant::now();
	let future = system.request_future(&worker, Msg::Ping { count: 2 }, TIMEOUT);
	let future_pid = future.pid().clone();

	let err = future.await.expect_err("worker is slower than the timeout");
	assert_eq!(
		err,
		FutureError::Timeout {
			pid: future_pid.clone(),
			timeout: TIMEOUT,
		}
	);
	assert!(near(start.elapsed(), 2500), "timed out at {:?}", start.elapsed());

	let Ok(SystemEvent::DeadLetter(record)) = events.recv().await else {
		panic!("late reply must surface as a dead letter");
	};
	assert!(near(start.elapsed(), 2900), "dead letter at {:?}", start.elapsed());
	assert_eq!(record.destination, future_pid);
	assert_eq!(record.sender, None);
	assert_eq!(system.dead_letters()[0].message, Msg::Pong { count: 2 });
}

#[tokio::test(start_paused = true)]
async fn pool_follows_the_count_schedule() {
	let system = ActorSystem::new();
	let router = pool(&system);
	let (tx, mut rx) = mpsc::unbounded_channel();

	let start = Instant::now();
	for count in 0..3 {
		let tx = tx.clone();
		system
			.request_future(&router, Msg::Ping { count }, TIMEOUT)
			.on_complete(move |outcome| {
				let _ = tx.send((count, outcome, start.elapsed()));
			});
		sleep(Duration::from_secs(1)).await;
	}
	drop(tx);

	let mut outcomes = Vec::new();
	while let Some(outcome) = rx.recv().await {
		outcomes.push(outcome);
	}

	let order: Vec<u32> = outcomes.iter().map(|(count, ..)| *count).collect();
	assert_eq!(order, vec![1, 0, 2]);
	assert_eq!(outcomes[0].1, Ok(Msg::Pong { count: 1 }));
	assert!(near(outcomes[0].2, 1300));
	assert_eq!(outcomes[1].1, Ok(Msg::Pong { count: 0 }));
	assert!(near(outcomes[1].2, 1700));
	assert!(outcomes[2].1.as_ref().is_err_and(FutureError::is_timeout));
	assert!(near(outcomes[2].2, 4500));
}

#[tokio::test(start_paused = true)]
async fn outcome_is_delivered_exactly_once_when_reply_races_the_timer() {
	let system = ActorSystem::new();
	let timeout = Duration::from_millis(500);
	let worker = system.spawn(FixedWorker(timeout));
	let (tx, mut rx) = mpsc::unbounded_channel();

	system
		.request_future(&worker, Msg::Ping { count: 1 }, timeout)
		.on_complete(move |outcome| {
			let _ = tx.send(outcome);
		});

	let outcome = rx.recv().await.expect("one outcome");
	assert_eq!(rx.recv().await, None);

	// Let the worker's reply land if the timer won.
	sleep(Duration::from_millis(50)).await;
	match outcome {
		Ok(reply) => {
			assert_eq!(reply, Msg::Pong { count: 1 });
			assert!(system.dead_letters().is_empty());
		}
		Err(err) => {
			assert!(err.is_timeout());
			assert_eq!(system.dead_letters().len(), 1);
		}
	}
}

#[derive(Debug, PartialEq, Eq)]
enum Seen {
	Turn(Msg),
	Resumed { current: Msg, outcome: Result<Msg, FutureError> },
}

/// Ticks request through `worker` and consume the reply with `Mode`.
struct Pinger {
	worker: Pid,
	mode: Mode,
	tx: mpsc::UnboundedSender<Seen>,
}

#[derive(Clone, Copy)]
enum Mode {
	Wait,
	Pipe,
	Reenter,
}

#[async_trait]
impl Actor for Pinger {
	type Msg = Msg;

	async fn receive(&mut self, ctx: &mut Context<Self>) -> Result<(), HandlerError> {
		let _ = self.tx.send(Seen::Turn(ctx.message().clone()));
		let Msg::Tick { count } = *ctx.message() else {
			return Ok(());
		};
		let future = ctx.request_future(&self.worker, Msg::Ping { count }, TIMEOUT);
		match self.mode {
			Mode::Wait => {
				let outcome = future.result().await;
				let _ = self.tx.send(Seen::Resumed {
					current: ctx.message().clone(),
					outcome,
				});
			}
			Mode::Pipe => future.pipe_to(ctx.self_pid()),
			Mode::Reenter => ctx.reenter_after(future, |this, ctx, outcome| {
				let _ = this.tx.send(Seen::Resumed {
					current: ctx.message().clone(),
					outcome,
				});
				Ok(())
			}),
		}
		Ok(())
	}
}

fn pinger(system: &ActorSystem<Msg>, mode: Mode, delay_ms: u64) -> (Pid, mpsc::UnboundedReceiver<Seen>) {
	let worker = system.spawn(FixedWorker(Duration::from_millis(delay_ms)));
	let (tx, rx) = mpsc::unbounded_channel();
	(system.spawn(Pinger { worker, mode, tx }), rx)
}

async fn collect(rx: &mut mpsc::UnboundedReceiver<Seen>, n: usize) -> Vec<Seen> {
	let mut seen = Vec::with_capacity(n);
	for _ in 0..n {
		seen.push(rx.recv().await.expect("pinger event"));
	}
	seen
}

#[tokio::test(start_paused = true)]
async fn reenter_reports_the_suspended_tick_after_other_ticks() {
	let system = ActorSystem::new();
	let (pinger, mut rx) = pinger(&system, Mode::Reenter, 500);

	system.send(&pinger, Msg::Tick { count: 5 });
	sleep(Duration::from_millis(100)).await;
	system.send(&pinger, Msg::Tick { count: 6 });

	let seen = collect(&mut rx, 3).await;
	assert_eq!(
		seen,
		vec![
			Seen::Turn(Msg::Tick { count: 5 }),
			Seen::Turn(Msg::Tick { count: 6 }),
			Seen::Resumed {
				current: Msg::Tick { count: 5 },
				outcome: Ok(Msg::Pong { count: 5 }),
			},
		]
	);
}

#[tokio::test(start_paused = true)]
async fn pipe_reply_arrives_in_a_later_turn() {
	let system = ActorSystem::new();
	let (pinger, mut rx) = pinger(&system, Mode::Pipe, 300);

	system.send(&pinger, Msg::Tick { count: 1 });

	let seen = collect(&mut rx, 2).await;
	assert_eq!(
		seen,
		vec![Seen::Turn(Msg::Tick { count: 1 }), Seen::Turn(Msg::Pong { count: 1 })]
	);
}

#[tokio::test(start_paused = true)]
async fn wait_holds_the_mailbox_until_the_reply() {
	let system = ActorSystem::new();
	let (pinger, mut rx) = pinger(&system, Mode::Wait, 300);

	system.send(&pinger, Msg::Tick { count: 1 });
	system.send(&pinger, Msg::Tick { count: 2 });

	let seen = collect(&mut rx, 4).await;
	assert_eq!(
		seen,
		vec![
			Seen::Turn(Msg::Tick { count: 1 }),
			Seen::Resumed {
				current: Msg::Tick { count: 1 },
				outcome: Ok(Msg::Pong { count: 1 }),
			},
			Seen::Turn(Msg::Tick { count: 2 }),
			Seen::Resumed {
				current: Msg::Tick { count: 2 },
				outcome: Ok(Msg::Pong { count: 2 }),
			},
		]
	);
}
