use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::Notify;

/// Item handed back by a closed mailbox.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Rejected<T>(pub T);

struct MailboxState<T> {
	system: VecDeque<T>,
	user: VecDeque<T>,
	closed: bool,
}

struct MailboxInner<T> {
	state: Mutex<MailboxState<T>>,
	notify_recv: Notify,
}

/// Multi-producer mailbox sender.
pub(crate) struct MailboxSender<T> {
	inner: Arc<MailboxInner<T>>,
}

/// Single-consumer mailbox receiver, owned by the actor's processing task.
pub(crate) struct MailboxReceiver<T> {
	inner: Arc<MailboxInner<T>>,
}

/// Unbounded two-lane mailbox.
///
/// The system lane carries runtime-scheduled turns and is always drained
/// before the user lane. Each lane is FIFO, so two items sent by the same
/// producer come out in send order.
pub(crate) struct Mailbox<T> {
	inner: Arc<MailboxInner<T>>,
}

impl<T> Clone for MailboxSender<T> {
	fn clone(&self) -> Self {
		Self {
			inner: Arc::clone(&self.inner),
		}
	}
}

impl<T> Mailbox<T> {
	/// Creates an empty, open mailbox.
	pub(crate) fn new() -> Self {
		Self {
			inner: Arc::new(MailboxInner {
				state: Mutex::new(MailboxState {
					system: VecDeque::new(),
					user: VecDeque::new(),
					closed: false,
				}),
				notify_recv: Notify::new(),
			}),
		}
	}

	/// Returns a sender handle.
	pub(crate) fn sender(&self) -> MailboxSender<T> {
		MailboxSender {
			inner: Arc::clone(&self.inner),
		}
	}

	/// Returns the receiver handle.
	pub(crate) fn receiver(self) -> MailboxReceiver<T> {
		MailboxReceiver { inner: self.inner }
	}
}

impl<T> MailboxSender<T> {
	/// Enqueues on the user lane. Never blocks.
	pub(crate) fn send(&self, item: T) -> Result<(), Rejected<T>> {
		self.push(item, false)
	}

	/// Enqueues on the system lane. Never blocks.
	pub(crate) fn send_system(&self, item: T) -> Result<(), Rejected<T>> {
		self.push(item, true)
	}

	fn push(&self, item: T, system: bool) -> Result<(), Rejected<T>> {
		let mut state = self.inner.state.lock();
		if state.closed {
			return Err(Rejected(item));
		}
		if system {
			state.system.push_back(item);
		} else {
			state.user.push_back(item);
		}
		drop(state);
		self.inner.notify_recv.notify_one();
		Ok(())
	}

	/// Closes the mailbox. Later sends are rejected; queued items stay
	/// available to the receiver.
	pub(crate) fn close(&self) {
		self.inner.state.lock().closed = true;
		self.inner.notify_recv.notify_one();
	}

	/// Returns true once the mailbox is closed.
	pub(crate) fn is_closed(&self) -> bool {
		self.inner.state.lock().closed
	}
}

impl<T> MailboxReceiver<T> {
	/// Receives one item, system lane first. Returns `None` once the mailbox
	/// is closed and drained.
	pub(crate) async fn recv(&self) -> Option<T> {
		loop {
			{
				let mut state = self.inner.state.lock();
				if let Some(item) = state.system.pop_front().or_else(|| state.user.pop_front()) {
					return Some(item);
				}
				if state.closed {
					return None;
				}
			}
			self.inner.notify_recv.notified().await;
		}
	}

	/// Closes the mailbox and takes everything still queued, system lane first.
	pub(crate) fn close_and_drain(&self) -> Vec<T> {
		let mut state = self.inner.state.lock();
		state.closed = true;
		let system = std::mem::take(&mut state.system);
		let user = std::mem::take(&mut state.user);
		system.into_iter().chain(user).collect()
	}
}

#[cfg(test)]
mod tests {
	use std::time::Duration;

	use super::*;

	#[tokio::test]
	async fn user_lane_is_fifo() {
		let mailbox = Mailbox::new();
		let tx = mailbox.sender();
		let rx = mailbox.receiver();

		for i in 0..5u32 {
			assert_eq!(tx.send(i), Ok(()));
		}
		tx.close();

		let mut drained = Vec::new();
		while let Some(item) = rx.recv().await {
			drained.push(item);
		}
		assert_eq!(drained, vec![0, 1, 2, 3, 4]);
	}

	#[tokio::test]
	async fn system_lane_is_drained_first() {
		let mailbox = Mailbox::new();
		let tx = mailbox.sender();
		let rx = mailbox.receiver();

		let _ = tx.send("user-1");
		let _ = tx.send("user-2");
		let _ = tx.send_system("system-1");

		assert_eq!(rx.recv().await, Some("system-1"));
		assert_eq!(rx.recv().await, Some("user-1"));
		assert_eq!(rx.recv().await, Some("user-2"));
	}

	#[tokio::test]
	async fn closed_mailbox_hands_the_item_back() {
		let mailbox = Mailbox::new();
		let tx = mailbox.sender();
		let rx = mailbox.receiver();

		let _ = tx.send(1u32);
		tx.close();
		assert!(tx.is_closed());
		assert_eq!(tx.send(2), Err(Rejected(2)));
		assert_eq!(tx.send_system(3), Err(Rejected(3)));

		// Queued items survive close.
		assert_eq!(rx.recv().await, Some(1));
		assert_eq!(rx.recv().await, None);
	}

	#[tokio::test]
	async fn recv_waits_until_send() {
		let mailbox = Mailbox::new();
		let tx = mailbox.sender();
		let rx = mailbox.receiver();

		let recv_task = tokio::spawn(async move { rx.recv().await });
		tokio::time::sleep(Duration::from_millis(10)).await;
		assert!(!recv_task.is_finished());

		let _ = tx.send(42u32);
		let got = tokio::time::timeout(Duration::from_millis(100), recv_task)
			.await
			.expect("recv should wake after send")
			.expect("recv task should not panic");
		assert_eq!(got, Some(42));
	}

	#[tokio::test]
	async fn close_and_drain_returns_leftovers() {
		let mailbox = Mailbox::new();
		let tx = mailbox.sender();
		let rx = mailbox.receiver();

		let _ = tx.send(1u32);
		let _ = tx.send(2);
		let _ = tx.send_system(0);

		assert_eq!(rx.close_and_drain(), vec![0, 1, 2]);
		assert!(tx.is_closed());
		assert_eq!(rx.recv().await, None);
	}

	#[tokio::test]
	async fn many_producers_keep_per_producer_order() {
		let mailbox = Mailbox::new();
		let producers: Vec<_> = (0..4usize)
			.map(|producer| {
				let tx = mailbox.sender();
				std::thread::spawn(move || {
					for seq in 0..50u32 {
						let _ = tx.send((producer, seq));
					}
				})
			})
			.collect();
		for producer in producers {
			producer.join().expect("producer thread should not panic");
		}
		mailbox.sender().close();

		let rx = mailbox.receiver();
		let mut per_producer: Vec<Vec<u32>> = vec![Vec::new(); 4];
		while let Some((producer, seq)) = rx.recv().await {
			per_producer[producer].push(seq);
		}
		for seqs in per_producer {
			assert_eq!(seqs, (0..50).collect::<Vec<_>>());
		}
	}
}
