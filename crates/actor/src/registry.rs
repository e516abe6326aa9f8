use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::pid::{PidAllocator, PidKind};
use crate::{Envelope, Pid};

/// Anything addressable by a [`Pid`]: actor cells and reply futures.
pub(crate) trait Process<M>: Send + Sync {
	/// Accepts one envelope, or hands it back when the process can no longer
	/// take messages.
	fn deliver(&self, envelope: Envelope<M>) -> Result<(), Envelope<M>>;

	/// Requests termination. Returns false for processes that cannot be
	/// stopped from outside.
	fn stop(&self) -> bool;
}

/// Live process table for one actor system.
pub(crate) struct ProcessRegistry<M> {
	pids: PidAllocator,
	processes: RwLock<HashMap<Pid, Arc<dyn Process<M>>>>,
}

impl<M> ProcessRegistry<M> {
	pub(crate) fn new(address: &str) -> Self {
		Self {
			pids: PidAllocator::new(address),
			processes: RwLock::new(HashMap::new()),
		}
	}

	pub(crate) fn address(&self) -> &str {
		self.pids.address()
	}

	pub(crate) fn next_pid(&self, kind: PidKind) -> Pid {
		self.pids.next(kind)
	}

	pub(crate) fn register(&self, pid: Pid, process: Arc<dyn Process<M>>) {
		self.processes.write().insert(pid, process);
	}

	/// Looks up a live process. The table lock is released before returning.
	pub(crate) fn get(&self, pid: &Pid) -> Option<Arc<dyn Process<M>>> {
		self.processes.read().get(pid).cloned()
	}

	pub(crate) fn remove(&self, pid: &Pid) -> Option<Arc<dyn Process<M>>> {
		self.processes.write().remove(pid)
	}

	pub(crate) fn contains(&self, pid: &Pid) -> bool {
		self.processes.read().contains_key(pid)
	}

	pub(crate) fn len(&self) -> usize {
		self.processes.read().len()
	}
}
