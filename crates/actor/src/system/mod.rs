use std::num::NonZeroUsize;
use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::broadcast;

use crate::cell::spawn_cell;
use crate::event::EventSink;
use crate::registry::ProcessRegistry;
use crate::{Actor, ConfigError, DeadLetter, Envelope, HandlerError, Message, Pid, ReplyFuture, RoundRobinRouter, SystemConfig, SystemEvent};

pub(crate) struct SystemInner<M> {
	pub(crate) config: SystemConfig,
	pub(crate) registry: ProcessRegistry<M>,
	pub(crate) sink: EventSink<M>,
}

/// Process-wide actor runtime for message type `M`.
///
/// Cloning is cheap and every clone addresses the same runtime. All sends and
/// spawns are non-blocking; only [`ReplyFuture::blocking_result`] blocks.
pub struct ActorSystem<M> {
	inner: Arc<SystemInner<M>>,
}

impl<M> Clone for ActorSystem<M> {
	fn clone(&self) -> Self {
		Self {
			inner: Arc::clone(&self.inner),
		}
	}
}

impl<M: Message> Default for ActorSystem<M> {
	fn default() -> Self {
		Self::new()
	}
}

impl<M: Message> ActorSystem<M> {
	/// Creates a runtime with the default configuration.
	pub fn new() -> Self {
		Self::build(SystemConfig::default())
	}

	/// Creates a runtime with an explicit configuration.
	pub fn with_config(config: SystemConfig) -> Result<Self, ConfigError> {
		config.validate()?;
		Ok(Self::build(config))
	}

	fn build(config: SystemConfig) -> Self {
		tracing::debug!(address = %config.address, "actor_system.init");
		Self {
			inner: Arc::new(SystemInner {
				registry: ProcessRegistry::new(&config.address),
				sink: EventSink::new(&config),
				config,
			}),
		}
	}

	/// Active configuration.
	pub fn config(&self) -> &SystemConfig {
		&self.inner.config
	}

	/// Spawns `actor` and returns its pid immediately.
	pub fn spawn<A>(&self, actor: A) -> Pid
	where
		A: Actor<Msg = M>,
	{
		spawn_cell(self, actor)
	}

	/// Sends `message` to `target` without a sender.
	pub fn send(&self, target: &Pid, message: M) {
		self.send_from(target, message, None);
	}

	/// Sends `message` to `target` on behalf of `sender`.
	///
	/// Never blocks and never fails: if `target` is not a live local process
	/// the envelope becomes a dead letter.
	pub fn send_from(&self, target: &Pid, message: M, sender: Option<Pid>) {
		let envelope = Envelope::new(target.clone(), message, sender);
		if target.address() != self.inner.registry.address() {
			self.dead_letter(envelope);
			return;
		}
		let Some(process) = self.inner.registry.get(target) else {
			self.dead_letter(envelope);
			return;
		};
		if let Err(envelope) = process.deliver(envelope) {
			self.dead_letter(envelope);
		}
	}

	/// Sends `message` to `target` with a fresh future as the sender.
	///
	/// The future resolves with the first reply sent to its pid, or with
	/// [`FutureError::Timeout`](crate::FutureError::Timeout) once `timeout`
	/// has elapsed since this call.
	pub fn request_future(&self, target: &Pid, message: M, timeout: Duration) -> ReplyFuture<M> {
		crate::future::request(self, target, message, timeout)
	}

	/// Spawns `size` workers from `factory` behind a round-robin router and
	/// returns the router's pid.
	pub fn round_robin_pool<A, F>(&self, size: NonZeroUsize, factory: F) -> Pid
	where
		A: Actor<Msg = M>,
		F: Fn() -> A,
	{
		let members = (0..size.get()).map(|_| self.spawn(factory())).collect();
		self.spawn(RoundRobinRouter::new(members))
	}

	/// Spawns a round-robin router over already running actors.
	pub fn round_robin_group(&self, members: Vec<Pid>) -> Pid {
		self.spawn(RoundRobinRouter::new(members))
	}

	/// Stops an actor. Later messages to `pid` become dead letters, as does
	/// anything still queued in its mailbox.
	///
	/// Returns false if `pid` is not a live actor. Futures cannot be stopped.
	pub fn stop(&self, pid: &Pid) -> bool {
		let Some(process) = self.inner.registry.get(pid) else {
			return false;
		};
		if !process.stop() {
			return false;
		}
		self.inner.registry.remove(pid);
		tracing::debug!(pid = %pid, "actor.stop_requested");
		true
	}

	/// Returns true if `pid` currently resolves to a live process.
	pub fn is_alive(&self, pid: &Pid) -> bool {
		self.inner.registry.contains(pid)
	}

	/// Number of live processes, futures included.
	pub fn live_processes(&self) -> usize {
		self.inner.registry.len()
	}

	/// Subscribes to dead-letter and handler-failure events.
	pub fn subscribe(&self) -> broadcast::Receiver<SystemEvent> {
		self.inner.sink.subscribe()
	}

	/// Snapshot of retained dead letters, oldest first.
	pub fn dead_letters(&self) -> Vec<DeadLetter<M>> {
		self.inner.sink.dead_letters()
	}

	pub(crate) fn dead_letter(&self, envelope: Envelope<M>) {
		self.inner.sink.dead_letter(envelope);
	}

	pub(crate) fn handler_failure(&self, envelope: &Envelope<M>, error: &HandlerError) {
		self.inner.sink.handler_failure(envelope, error);
	}

	pub(crate) fn callback_failure(&self, pid: &Pid, outcome_summary: String, error: &HandlerError) {
		self.inner.sink.callback_failure(pid, outcome_summary, error);
	}

	pub(crate) fn registry(&self) -> &ProcessRegistry<M> {
		&self.inner.registry
	}

	pub(crate) fn downgrade(&self) -> Weak<SystemInner<M>> {
		Arc::downgrade(&self.inner)
	}
}
