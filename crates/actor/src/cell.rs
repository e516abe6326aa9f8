use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio_util::sync::CancellationToken;

use crate::actor::Turn;
use crate::mailbox::{Mailbox, MailboxReceiver, MailboxSender};
use crate::pid::PidKind;
use crate::registry::Process;
use crate::{Actor, ActorSystem, Context, Envelope, HandlerError, Pid};

/// Shared handles of one running actor, cloned into every turn's context.
pub(crate) struct CellRef<A: Actor> {
	pub(crate) system: ActorSystem<A::Msg>,
	pub(crate) pid: Pid,
	pub(crate) mailbox: MailboxSender<Turn<A>>,
}

impl<A: Actor> Clone for CellRef<A> {
	fn clone(&self) -> Self {
		Self {
			system: self.system.clone(),
			pid: self.pid.clone(),
			mailbox: self.mailbox.clone(),
		}
	}
}

/// Registry entry for an actor: its mailbox plus a stop switch.
struct ActorProcess<A: Actor> {
	mailbox: MailboxSender<Turn<A>>,
	cancel: CancellationToken,
}

impl<A: Actor> Process<A::Msg> for ActorProcess<A> {
	fn deliver(&self, envelope: Envelope<A::Msg>) -> Result<(), Envelope<A::Msg>> {
		self.mailbox.send(Turn::Deliver(envelope)).map_err(|rejected| rejected.0.into_envelope())
	}

	fn stop(&self) -> bool {
		if self.mailbox.is_closed() {
			return false;
		}
		self.mailbox.close();
		self.cancel.cancel();
		true
	}
}

/// Registers a new actor cell and starts its processing task.
///
/// The pid is registered before the task starts, so messages sent right after
/// `spawn` returns are queued rather than dead-lettered.
pub(crate) fn spawn_cell<A: Actor>(system: &ActorSystem<A::Msg>, actor: A) -> Pid {
	let pid = system.registry().next_pid(PidKind::Actor);
	let mailbox = Mailbox::new();
	let cancel = CancellationToken::new();
	system.registry().register(
		pid.clone(),
		Arc::new(ActorProcess::<A> {
			mailbox: mailbox.sender(),
			cancel: cancel.clone(),
		}),
	);

	let cell = CellRef {
		system: system.clone(),
		pid: pid.clone(),
		mailbox: mailbox.sender(),
	};
	tracing::debug!(pid = %pid, actor = std::any::type_name::<A>(), "actor.spawn");
	crate::spawn::spawn("actor", run_cell(actor, cell, mailbox.receiver(), cancel));
	pid
}

async fn run_cell<A: Actor>(mut actor: A, cell: CellRef<A>, rx: MailboxReceiver<Turn<A>>, cancel: CancellationToken) {
	loop {
		// Cancel-aware recv: a stopped actor must not wait for more mail.
		let turn = tokio::select! {
			biased;
			_ = cancel.cancelled() => break,
			turn = rx.recv() => {
				let Some(turn) = turn else {
					break;
				};
				turn
			}
		};

		// Cancel-aware turn: stopping preempts a long-running handler.
		tokio::select! {
			biased;
			_ = cancel.cancelled() => break,
			_ = run_turn(&mut actor, &cell, turn) => {}
		}
	}

	// Whatever is still queued can no longer be processed.
	for turn in rx.close_and_drain() {
		match turn {
			Turn::Deliver(envelope) => cell.system.dead_letter(envelope),
			Turn::Resume { envelope, outcome, .. } => {
				if let Ok(reply) = outcome {
					cell.system.dead_letter(Envelope::new(cell.pid.clone(), reply, envelope.sender().cloned()));
				}
			}
		}
	}
	tracing::debug!(pid = %cell.pid, "actor.stop");
}

async fn run_turn<A: Actor>(actor: &mut A, cell: &CellRef<A>, turn: Turn<A>) {
	match turn {
		Turn::Deliver(envelope) => {
			let mut ctx = Context::new(cell.clone(), envelope);
			let result = AssertUnwindSafe(actor.receive(&mut ctx)).catch_unwind().await;
			report(cell, &ctx, result);
		}
		Turn::Resume {
			envelope,
			outcome,
			continuation,
		} => {
			let mut ctx = Context::new(cell.clone(), envelope);
			let result = std::panic::catch_unwind(AssertUnwindSafe(|| continuation(actor, &mut ctx, outcome)));
			report(cell, &ctx, result);
		}
	}
}

fn report<A: Actor>(cell: &CellRef<A>, ctx: &Context<A>, result: Result<Result<(), HandlerError>, Box<dyn Any + Send>>) {
	let error = match result {
		Ok(Ok(())) => return,
		Ok(Err(error)) => error,
		Err(payload) => HandlerError::new(format!("handler panicked: {}", panic_message(payload.as_ref()))),
	};
	cell.system.handler_failure(&ctx.envelope, &error);
}

/// Extracts a readable message from a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> &str {
	if let Some(msg) = payload.downcast_ref::<&'static str>() {
		*msg
	} else if let Some(msg) = payload.downcast_ref::<String>() {
		msg.as_str()
	} else {
		"non-string panic payload"
	}
}
