use std::fmt::Debug;

use crate::Pid;

/// Payload accepted by an actor system.
///
/// A program describes its message set as one closed enum and handlers match
/// over it. Every `Clone + Debug + Send + Sync + 'static` type qualifies.
pub trait Message: Clone + Debug + Send + Sync + 'static {}

impl<T> Message for T where T: Clone + Debug + Send + Sync + 'static {}

/// One message in flight, created at send time and consumed at dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope<M> {
	message: M,
	sender: Option<Pid>,
	target: Pid,
}

impl<M> Envelope<M> {
	pub(crate) fn new(target: Pid, message: M, sender: Option<Pid>) -> Self {
		Self { message, sender, target }
	}

	/// Carried payload.
	pub fn message(&self) -> &M {
		&self.message
	}

	/// Process that should receive replies, if any.
	pub fn sender(&self) -> Option<&Pid> {
		self.sender.as_ref()
	}

	/// Destination this envelope was addressed to.
	pub fn target(&self) -> &Pid {
		&self.target
	}

	/// Consumes the envelope into its parts.
	pub fn into_parts(self) -> (Pid, M, Option<Pid>) {
		(self.target, self.message, self.sender)
	}
}
