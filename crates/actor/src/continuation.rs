//! Ways to consume a [`ReplyFuture`].
//!
//! | Strategy | Entry point                    | Runs on                         |
//! |----------|--------------------------------|---------------------------------|
//! | Wait     | `.await` / [`ReplyFuture::result`] / [`ReplyFuture::blocking_result`] | the caller, which is suspended until resolution |
//! | Await    | [`ReplyFuture::on_complete`] / [`Context::await_future`] | a runtime task, off the actor's turn |
//! | Pipe     | [`ReplyFuture::pipe_to`]       | the destination's mailbox, as an ordinary message |
//! | Reenter  | [`Context::reenter_after`]     | a new turn of the same actor, with the original message restored |

use std::panic::AssertUnwindSafe;

use crate::actor::Turn;
use crate::cell::panic_message;
use crate::{Actor, Context, Envelope, FutureError, HandlerError, Message, Pid, ReplyFuture};

impl<M: Message> ReplyFuture<M> {
	/// Waits for the reply or the timeout.
	///
	/// Awaiting inside a handler holds that actor's turn for the whole round
	/// trip; the actor processes nothing else meanwhile.
	pub async fn result(self) -> Result<M, FutureError> {
		self.await
	}

	/// Runs `callback` exactly once with the outcome, on a runtime task.
	///
	/// Returns immediately. The callback does not run inside any actor's turn,
	/// so it must not assume exclusive access to actor state; send a message
	/// to the actor instead. A panicking callback is reported as a
	/// [`SystemEvent::HandlerFailure`](crate::SystemEvent::HandlerFailure)
	/// against the future's pid.
	pub fn on_complete<F>(self, callback: F)
	where
		F: FnOnce(Result<M, FutureError>) + Send + 'static,
	{
		let system = self.system.clone();
		let pid = self.pid.clone();
		crate::spawn::spawn("future.await", async move {
			let outcome = self.await;
			let summary = format!("{outcome:?}");
			if let Err(payload) = std::panic::catch_unwind(AssertUnwindSafe(|| callback(outcome))) {
				let error = HandlerError::new(format!("await callback panicked: {}", panic_message(payload.as_ref())));
				system.callback_failure(&pid, summary, &error);
			}
		});
	}

	/// Delivers a successful reply to `target` as an ordinary message.
	///
	/// The reply goes through `target`'s mailbox like any other message, so
	/// the receiving actor handles it in its own turn. A timed-out future
	/// sends nothing; the late reply, if any, ends up as a dead letter.
	pub fn pipe_to(self, target: &Pid) {
		let target = target.clone();
		crate::spawn::spawn("future.pipe", async move {
			let system = self.system.clone();
			match self.await {
				Ok(reply) => system.send(&target, reply),
				Err(err) => tracing::debug!(target = %target, error = %err, "future.pipe.skipped"),
			}
		});
	}
}

impl<A: Actor> Context<A> {
	/// Await strategy from inside a handler. See [`ReplyFuture::on_complete`].
	pub fn await_future<F>(&self, future: ReplyFuture<A::Msg>, callback: F)
	where
		F: FnOnce(Result<A::Msg, FutureError>) + Send + 'static,
	{
		future.on_complete(callback);
	}

	/// Suspends the current message's processing until `future` resolves,
	/// then runs `continuation` as a new turn of this actor.
	///
	/// During the continuation [`Context::message`] and [`Context::sender`]
	/// report the message being processed now. Other messages may be handled
	/// while the future is pending. If the actor is stopped first, a
	/// successful reply becomes a dead letter addressed to this actor.
	pub fn reenter_after<F>(&self, future: ReplyFuture<A::Msg>, continuation: F)
	where
		F: FnOnce(&mut A, &mut Context<A>, Result<A::Msg, FutureError>) -> Result<(), HandlerError> + Send + 'static,
	{
		let envelope = self.envelope.clone();
		let cell = self.cell.clone();
		crate::spawn::spawn("actor.reenter", async move {
			let outcome = future.await;
			let turn = Turn::Resume {
				envelope,
				outcome,
				continuation: Box::new(continuation),
			};
			let Err(rejected) = cell.mailbox.send_system(turn) else {
				return;
			};
			tracing::debug!(pid = %cell.pid, "actor.reenter.dropped");
			if let Turn::Resume {
				envelope,
				outcome: Ok(reply),
				..
			} = rejected.0
			{
				cell.system
					.dead_letter(Envelope::new(cell.pid.clone(), reply, envelope.sender().cloned()));
			}
		});
	}
}
