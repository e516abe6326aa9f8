//! Local actor runtime with timeout-bounded reply futures.
//!
//! This crate provides:
//! * `ActorSystem`: process registry, spawning, sending and the observability sink
//! * `Actor` / `Context`: turn-based message handling over an unbounded mailbox
//! * `ReplyFuture`: one-shot reply slot backed by an ephemeral, addressable pid
//! * four ways to consume a reply: wait, await, pipe and reenter
//! * `RoundRobinRouter`: a forwarding actor that spreads messages over a pool
//!
//! Undeliverable messages (unknown target, stopped actor, reply to an expired
//! future) are never dropped silently; they become dead letters.

#![warn(missing_docs)]

mod actor;
mod cell;
mod config;
mod continuation;
mod error;
mod event;
mod future;
mod mailbox;
mod message;
mod pid;
mod registry;
mod router;
mod spawn;
mod system;

pub use actor::{Actor, Context};
pub use config::SystemConfig;
pub use error::{ConfigError, FutureError, HandlerError};
pub use event::{DeadLetter, EventRecord, SystemEvent};
pub use future::ReplyFuture;
pub use message::{Envelope, Message};
pub use pid::Pid;
pub use router::RoundRobinRouter;
pub use system::ActorSystem;
