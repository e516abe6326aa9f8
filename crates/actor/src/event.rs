//! Observability sink: dead letters and handler failures.
//!
//! Every event is logged through `tracing`, published on a broadcast channel
//! for subscribers, and dead letters are additionally retained (typed) in a
//! bounded log.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tokio::sync::broadcast;

use crate::{Envelope, HandlerError, Message, Pid, SystemConfig};

/// Structured record shared by every [`SystemEvent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
	/// Wall-clock time the event was recorded.
	pub timestamp: DateTime<Utc>,
	/// Process the message was addressed to.
	pub destination: Pid,
	/// `Debug` rendering of the message.
	pub message_summary: String,
	/// Sender carried by the envelope, if any.
	pub sender: Option<Pid>,
}

impl EventRecord {
	fn from_envelope<M: Message>(envelope: &Envelope<M>) -> Self {
		Self {
			timestamp: Utc::now(),
			destination: envelope.target().clone(),
			message_summary: format!("{:?}", envelope.message()),
			sender: envelope.sender().cloned(),
		}
	}
}

/// Event published on the system event stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SystemEvent {
	/// A message could not be delivered to a live process.
	DeadLetter(EventRecord),
	/// A turn returned an error or panicked, or an await callback panicked;
	/// the actor keeps running.
	HandlerFailure {
		/// Message being processed when the failure happened. For an await
		/// callback this is the future's pid and its outcome.
		record: EventRecord,
		/// Failure description.
		error: String,
	},
}

impl SystemEvent {
	/// Record common to all event kinds.
	pub fn record(&self) -> &EventRecord {
		match self {
			Self::DeadLetter(record) | Self::HandlerFailure { record, .. } => record,
		}
	}
}

/// Undeliverable message retained by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeadLetter<M> {
	/// Process the message was addressed to.
	pub destination: Pid,
	/// The undelivered message.
	pub message: M,
	/// Sender carried by the envelope, if any.
	pub sender: Option<Pid>,
	/// Wall-clock time the message was declared dead.
	pub timestamp: DateTime<Utc>,
}

/// Dead-letter log plus event broadcast for one actor system.
pub(crate) struct EventSink<M> {
	capacity: usize,
	dead_letters: Mutex<VecDeque<DeadLetter<M>>>,
	events: broadcast::Sender<SystemEvent>,
}

impl<M: Message> EventSink<M> {
	pub(crate) fn new(config: &SystemConfig) -> Self {
		let (events, _) = broadcast::channel(config.event_buffer.max(1));
		Self {
			capacity: config.dead_letter_capacity.max(1),
			dead_letters: Mutex::new(VecDeque::new()),
			events,
		}
	}

	pub(crate) fn subscribe(&self) -> broadcast::Receiver<SystemEvent> {
		self.events.subscribe()
	}

	/// Records one undeliverable envelope.
	pub(crate) fn dead_letter(&self, envelope: Envelope<M>) {
		let record = EventRecord::from_envelope(&envelope);
		tracing::debug!(
			pid = %record.destination,
			message = %record.message_summary,
			sender = ?record.sender.as_ref().map(ToString::to_string),
			"dead_letter"
		);

		let (destination, message, sender) = envelope.into_parts();
		{
			let mut log = self.dead_letters.lock();
			if log.len() >= self.capacity {
				log.pop_front();
			}
			log.push_back(DeadLetter {
				destination,
				message,
				sender,
				timestamp: record.timestamp,
			});
		}
		let _ = self.events.send(SystemEvent::DeadLetter(record));
	}

	/// Reports one failed turn.
	pub(crate) fn handler_failure(&self, envelope: &Envelope<M>, error: &HandlerError) {
		let record = EventRecord::from_envelope(envelope);
		tracing::warn!(
			pid = %record.destination,
			message = %record.message_summary,
			error = %error,
			"actor.handler_failed"
		);
		self.publish_failure(record, error);
	}

	/// Reports a failed await callback of the future `pid`.
	pub(crate) fn callback_failure(&self, pid: &Pid, outcome_summary: String, error: &HandlerError) {
		let record = EventRecord {
			timestamp: Utc::now(),
			destination: pid.clone(),
			message_summary: outcome_summary,
			sender: None,
		};
		tracing::warn!(
			pid = %record.destination,
			outcome = %record.message_summary,
			error = %error,
			"future.callback_failed"
		);
		self.publish_failure(record, error);
	}

	fn publish_failure(&self, record: EventRecord, error: &HandlerError) {
		let _ = self.events.send(SystemEvent::HandlerFailure {
			record,
			error: error.to_string(),
		});
	}

	/// Snapshot of retained dead letters, oldest first.
	pub(crate) fn dead_letters(&self) -> Vec<DeadLetter<M>> {
		self.dead_letters.lock().iter().cloned().collect()
	}
}
