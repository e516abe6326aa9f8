use std::future::Future;
use std::sync::LazyLock;

use tokio::runtime::{Builder, Handle, Runtime};
use tokio::task::JoinHandle;

/// Hosts actor cells and future timers for callers that never entered a
/// tokio runtime, such as a plain `main` that only uses `blocking_result`.
static FALLBACK_RUNTIME: LazyLock<Runtime> = LazyLock::new(|| {
	Builder::new_multi_thread()
		.enable_all()
		.worker_threads(2)
		.thread_name("parley-fallback")
		.build()
		.expect("failed to build parley fallback tokio runtime")
});

/// Spawns one runtime task on the current runtime, or on the fallback one.
/// `task` names the task kind in trace output.
pub(crate) fn spawn<F>(task: &'static str, fut: F) -> JoinHandle<F::Output>
where
	F: Future + Send + 'static,
	F::Output: Send + 'static,
{
	tracing::trace!(task, "runtime.spawn");
	match Handle::try_current() {
		Ok(handle) => handle.spawn(fut),
		Err(_) => FALLBACK_RUNTIME.spawn(fut),
	}
}
