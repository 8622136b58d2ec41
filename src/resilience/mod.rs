//! Resilience helpers.
//!
//! # Data Flow
//! ```text
//! RPC call:
//!     → timeouts.rs (every call has a deadline)
//! Receipt wait:
//!     → backoff.rs (jittered exponential delay between polls)
//! ```
//!
//! There are no retries: a failed submission aborts the workflow.

pub mod backoff;
pub mod timeouts;

pub use backoff::PollSchedule;
pub use timeouts::rpc_deadline;
