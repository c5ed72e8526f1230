//! Fan-out/fan-in coordination for tokio tasks.
//!
//! [`WaitGroup`] is a counting completion barrier: register units of work,
//! release each one exactly once, and wait for the counter to reach zero.
//! [`fan_out`] spawns one task per input with the registration and release
//! handled for the caller.

mod dispatch;
mod wait_group;

pub use dispatch::{fan_out, spawn_tracked};
pub use wait_group::{DoneGuard, SyncError, SyncResult, WaitGroup};
