use std::time::Duration;

use async_trait::async_trait;

use crate::cell::CellRef;
use crate::{ActorSystem, Envelope, FutureError, HandlerError, Message, Pid, ReplyFuture};

/// Unit of state plus a message handler, always driven through its mailbox.
///
/// The runtime calls [`Actor::receive`] once per envelope and never runs two
/// turns of the same actor at the same time, so `&mut self` needs no locking.
#[async_trait]
pub trait Actor: Send + Sized + 'static {
	/// Message set this actor accepts.
	type Msg: Message;

	/// Handles the message exposed by [`Context::message`].
	///
	/// A returned error (or a panic) is reported on the system event stream;
	/// the actor keeps its state and continues with the next message.
	async fn receive(&mut self, ctx: &mut Context<Self>) -> Result<(), HandlerError>;
}

/// Scheduled reentrant continuation for actor `A`.
pub(crate) type Continuation<A> =
	Box<dyn FnOnce(&mut A, &mut Context<A>, Result<<A as Actor>::Msg, FutureError>) -> Result<(), HandlerError> + Send>;

/// One unit of work taken from an actor's mailbox.
pub(crate) enum Turn<A: Actor> {
	/// Ordinary message delivery.
	Deliver(Envelope<A::Msg>),
	/// Resumption of a suspended turn with the outcome it waited for.
	Resume {
		envelope: Envelope<A::Msg>,
		outcome: Result<A::Msg, FutureError>,
		continuation: Continuation<A>,
	},
}

impl<A: Actor> Turn<A> {
	pub(crate) fn into_envelope(self) -> Envelope<A::Msg> {
		match self {
			Self::Deliver(envelope) | Self::Resume { envelope, .. } => envelope,
		}
	}
}

/// Per-turn view of the running actor and the envelope being processed.
pub struct Context<A: Actor> {
	pub(crate) cell: CellRef<A>,
	pub(crate) envelope: Envelope<A::Msg>,
}

impl<A: Actor> Context<A> {
	pub(crate) fn new(cell: CellRef<A>, envelope: Envelope<A::Msg>) -> Self {
		Self { cell, envelope }
	}

	/// Message of the current turn.
	///
	/// Inside a reentrant continuation this is still the message that was
	/// being processed when [`Context::reenter_after`] was called.
	pub fn message(&self) -> &A::Msg {
		self.envelope.message()
	}

	/// Envelope of the current turn.
	pub fn envelope(&self) -> &Envelope<A::Msg> {
		&self.envelope
	}

	/// Sender of the current message, if any.
	pub fn sender(&self) -> Option<&Pid> {
		self.envelope.sender()
	}

	/// This actor's pid.
	pub fn self_pid(&self) -> &Pid {
		&self.cell.pid
	}

	/// The system this actor runs in.
	pub fn system(&self) -> &ActorSystem<A::Msg> {
		&self.cell.system
	}

	/// Sends `message` to `target` without a sender.
	pub fn send(&self, target: &Pid, message: A::Msg) {
		self.cell.system.send(target, message);
	}

	/// Sends `message` to `target` with this actor as the sender.
	pub fn request(&self, target: &Pid, message: A::Msg) {
		self.cell.system.send_from(target, message, Some(self.cell.pid.clone()));
	}

	/// Replies to the current sender. Without a sender the reply is a dead letter.
	pub fn respond(&self, message: A::Msg) {
		match self.envelope.sender() {
			Some(sender) => self.cell.system.send(sender, message),
			None => self
				.cell
				.system
				.dead_letter(Envelope::new(self.cell.pid.clone(), message, None)),
		}
	}

	/// Re-sends the current message to `target`, keeping the original sender.
	pub fn forward(&self, target: &Pid) {
		let message = self.envelope.message().clone();
		self.cell.system.send_from(target, message, self.envelope.sender().cloned());
	}

	/// Issues a request whose reply resolves the returned future.
	pub fn request_future(&self, target: &Pid, message: A::Msg, timeout: Duration) -> ReplyFuture<A::Msg> {
		self.cell.system.request_future(target, message, timeout)
	}

	/// Spawns another actor in the same system.
	pub fn spawn<B>(&self, actor: B) -> Pid
	where
		B: Actor<Msg = A::Msg>,
	{
		self.cell.system.spawn(actor)
	}
}
