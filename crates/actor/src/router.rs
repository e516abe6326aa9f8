use std::marker::PhantomData;

use async_trait::async_trait;

use crate::{Actor, Context, HandlerError, Message, Pid};

/// Forwarding actor that hands each message to the next member in turn.
///
/// The original sender is preserved, so members reply straight to the
/// requester (typically a future) and never through the router.
pub struct RoundRobinRouter<M> {
	members: Vec<Pid>,
	next_index: usize,
	_msg: PhantomData<fn() -> M>,
}

impl<M> RoundRobinRouter<M> {
	/// Creates a router over `members`, starting with the first one.
	pub fn new(members: Vec<Pid>) -> Self {
		Self {
			members,
			next_index: 0,
			_msg: PhantomData,
		}
	}

	/// Routed members, in selection order.
	pub fn members(&self) -> &[Pid] {
		&self.members
	}
}

#[async_trait]
impl<M: Message> Actor for RoundRobinRouter<M> {
	type Msg = M;

	async fn receive(&mut self, ctx: &mut Context<Self>) -> Result<(), HandlerError> {
		let Some(member) = self.members.get(self.next_index) else {
			ctx.system().dead_letter(ctx.envelope().clone());
			return Err(HandlerError::from("round-robin router has no members"));
		};
		ctx.forward(member);
		self.next_index = (self.next_index + 1) % self.members.len();
		Ok(())
	}
}
