//! Long-running operation handling.
//!
//! Mutating AutoML calls return an [`Operation`](crate::Operation) that
//! completes asynchronously. [`OperationPoller`] re-fetches it following a
//! [`PollPolicy`] until it is done, the wait bound elapses, or the caller
//! cancels.

mod policy;
mod poller;

pub use policy::{
    DEFAULT_INITIAL_INTERVAL_MS, DEFAULT_MAX_INTERVAL_MS, DEFAULT_MAX_WAIT_MS,
    DEFAULT_MULTIPLIER, MIN_INTERVAL_MS, PollPolicy,
};
pub use poller::OperationPoller;
