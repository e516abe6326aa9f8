//! Timeout-bounded reply futures.
//!
//! A request allocates an ephemeral `future$<n>` pid, registers a one-shot
//! process under it and sends the request with that pid as the sender. The
//! first of {reply arrives, deadline passes} resolves the future and removes
//! the pid from the registry, so anything sent to it afterwards is a dead
//! letter.
//!
//! ```text
//! Pending ──reply──▶ Completed(msg)
//!    │
//!    └──deadline──▶ TimedOut
//! ```

use std::pin::Pin;
use std::sync::{Arc, Weak};
use std::task::{Context, Poll};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::oneshot;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::pid::PidKind;
use crate::registry::Process;
use crate::system::SystemInner;
use crate::{ActorSystem, Envelope, FutureError, Message, Pid};

type Outcome<M> = Result<M, FutureError>;

/// Pending reply to one request.
///
/// Consuming methods take `self`, so each future is consumed by exactly one
/// strategy: awaiting it (or [`ReplyFuture::result`]), blocking on it,
/// [`on_complete`](ReplyFuture::on_complete), [`pipe_to`](ReplyFuture::pipe_to)
/// or [`Context::reenter_after`](crate::Context::reenter_after).
#[must_use = "a reply future does nothing unless consumed"]
pub struct ReplyFuture<M> {
	pub(crate) pid: Pid,
	timeout: Duration,
	pub(crate) system: ActorSystem<M>,
	rx: oneshot::Receiver<Outcome<M>>,
}

impl<M> ReplyFuture<M> {
	/// Ephemeral pid replies are addressed to.
	pub fn pid(&self) -> &Pid {
		&self.pid
	}

	/// Timeout this request was issued with.
	pub fn timeout(&self) -> Duration {
		self.timeout
	}
}

impl<M> std::fmt::Debug for ReplyFuture<M> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ReplyFuture")
			.field("pid", &self.pid)
			.field("timeout", &self.timeout)
			.finish_non_exhaustive()
	}
}

impl<M> std::future::Future for ReplyFuture<M> {
	type Output = Outcome<M>;

	fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
		let this = self.get_mut();
		match Pin::new(&mut this.rx).poll(cx) {
			Poll::Ready(Ok(outcome)) => Poll::Ready(outcome),
			Poll::Ready(Err(_)) => Poll::Ready(Err(FutureError::Abandoned { pid: this.pid.clone() })),
			Poll::Pending => Poll::Pending,
		}
	}
}

impl<M> ReplyFuture<M> {
	/// Blocking counterpart of awaiting the future, for callers outside any
	/// async context.
	///
	/// # Panics
	///
	/// Panics if called from within an asynchronous execution context; await
	/// the future there instead.
	pub fn blocking_result(self) -> Outcome<M> {
		let Self { pid, rx, .. } = self;
		rx.blocking_recv().unwrap_or_else(|_| Err(FutureError::Abandoned { pid }))
	}
}

/// One-shot process registered under a future's pid.
struct FutureProcess<M> {
	pid: Pid,
	timeout: Duration,
	slot: Mutex<Option<oneshot::Sender<Outcome<M>>>>,
	timer: CancellationToken,
	system: Weak<SystemInner<M>>,
}

impl<M: Message> FutureProcess<M> {
	/// Claims the reply slot. Only the first caller gets it; claiming disarms
	/// the timer and retires the pid.
	fn claim(&self) -> Option<oneshot::Sender<Outcome<M>>> {
		let tx = self.slot.lock().take()?;
		self.timer.cancel();
		if let Some(system) = self.system.upgrade() {
			system.registry.remove(&self.pid);
		}
		Some(tx)
	}

	fn expire(&self) {
		let Some(tx) = self.claim() else {
			return;
		};
		tracing::debug!(pid = %self.pid, timeout = ?self.timeout, "future.timeout");
		let _ = tx.send(Err(FutureError::Timeout {
			pid: self.pid.clone(),
			timeout: self.timeout,
		}));
	}
}

impl<M: Message> Process<M> for FutureProcess<M> {
	fn deliver(&self, envelope: Envelope<M>) -> Result<(), Envelope<M>> {
		// A resolved future is gone; the caller turns the reply into a dead letter.
		let Some(tx) = self.claim() else {
			return Err(envelope);
		};
		tracing::trace!(pid = %self.pid, "future.resolved");
		let (_, reply, _) = envelope.into_parts();
		if tx.send(Ok(reply)).is_err() {
			tracing::trace!(pid = %self.pid, "future.consumer_dropped");
		}
		Ok(())
	}

	fn stop(&self) -> bool {
		false
	}
}

/// Issues `message` to `target` and returns the future for its reply.
pub(crate) fn request<M: Message>(system: &ActorSystem<M>, target: &Pid, message: M, timeout: Duration) -> ReplyFuture<M> {
	// A deadline past the clock's range never fires.
	let deadline = Instant::now().checked_add(timeout);
	let pid = system.registry().next_pid(PidKind::Future);
	let (tx, rx) = oneshot::channel();
	let process = Arc::new(FutureProcess {
		pid: pid.clone(),
		timeout,
		slot: Mutex::new(Some(tx)),
		timer: CancellationToken::new(),
		system: system.downgrade(),
	});
	system.registry().register(pid.clone(), Arc::clone(&process) as Arc<dyn Process<M>>);

	let timer = process.timer.clone();
	crate::spawn::spawn("future.timer", async move {
		let expiry = async {
			match deadline {
				Some(deadline) => tokio::time::sleep_until(deadline).await,
				None => std::future::pending::<()>().await,
			}
		};
		tokio::select! {
			_ = timer.cancelled() => {}
			_ = expiry => process.expire(),
		}
	});

	system.send_from(target, message, Some(pid.clone()));
	ReplyFuture {
		pid,
		timeout,
		system: system.clone(),
		rx,
	}
}
