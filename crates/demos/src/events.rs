use parley_actor::{ActorSystem, Message, SystemEvent};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Logs dead letters and handler failures at info level for the demo output.
pub fn spawn_logger<M: Message>(system: &ActorSystem<M>) -> JoinHandle<()> {
	let mut events = system.subscribe();
	tokio::spawn(async move {
		loop {
			match events.recv().await {
				Ok(SystemEvent::DeadLetter(record)) => info!(
					pid = %record.destination,
					message = %record.message_summary,
					sender = ?record.sender.as_ref().map(ToString::to_string),
					"[DeadLetter]"
				),
				Ok(SystemEvent::HandlerFailure { record, error }) => warn!(
					pid = %record.destination,
					message = %record.message_summary,
					%error,
					"Handler failed"
				),
				Err(RecvError::Lagged(skipped)) => warn!(skipped, "event stream lagged"),
				Err(RecvError::Closed) => break,
			}
		}
	})
}
