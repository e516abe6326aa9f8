use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Prefix carried by ids of ephemeral future processes.
const FUTURE_PREFIX: &str = "future";

/// Opaque, location-transparent actor reference.
///
/// Equality is by value: two pids with the same address and id denote the
/// same process. Cloning is cheap.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pid {
	address: Arc<str>,
	id: Arc<str>,
}

impl Pid {
	pub(crate) fn new(address: Arc<str>, id: impl Into<Arc<str>>) -> Self {
		Self { address, id: id.into() }
	}

	/// Logical host this pid lives on.
	pub fn address(&self) -> &str {
		&self.address
	}

	/// Process id, unique within one actor system.
	pub fn id(&self) -> &str {
		&self.id
	}

	/// Returns true if this pid backs a reply future.
	pub fn is_future(&self) -> bool {
		self.id.starts_with(FUTURE_PREFIX)
	}
}

impl fmt::Display for Pid {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}/{}", self.address, self.id)
	}
}

/// Kind of process a fresh pid is allocated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PidKind {
	Actor,
	Future,
}

/// Monotonic pid allocator for one actor system.
#[derive(Debug)]
pub(crate) struct PidAllocator {
	address: Arc<str>,
	next: AtomicU64,
}

impl PidAllocator {
	pub(crate) fn new(address: &str) -> Self {
		Self {
			address: Arc::from(address),
			next: AtomicU64::new(0),
		}
	}

	pub(crate) fn address(&self) -> &str {
		&self.address
	}

	/// Allocates the next unique pid.
	pub(crate) fn next(&self, kind: PidKind) -> Pid {
		let n = self.next.fetch_add(1, Ordering::Relaxed).wrapping_add(1);
		let id = match kind {
			PidKind::Actor => format!("${}", base36(n)),
			PidKind::Future => format!("{FUTURE_PREFIX}${}", base36(n)),
		};
		Pid::new(Arc::clone(&self.address), id)
	}
}

fn base36(mut n: u64) -> String {
	const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
	if n == 0 {
		return "0".to_owned();
	}
	let mut digits = Vec::new();
	while n > 0 {
		digits.push(char::from(DIGITS[(n % 36) as usize]));
		n /= 36;
	}
	digits.iter().rev().collect()
}
