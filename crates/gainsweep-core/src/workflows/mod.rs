//! # Workflows Module
//!
//! Top-level entry points of gainsweep. A workflow owns everything one run needs
//! (search space, result store, progress counters, cancellation token) and hands the
//! caller an immutable outcome once every worker has joined.
//!
//! - **Search Workflow** ([`search`]) - Exhaustive enumeration of feasible two-stage
//!   gain configurations with live progress reporting.

pub mod search;
