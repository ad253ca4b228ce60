//! # Engine Module
//!
//! The stateful layer of gainsweep: it validates the configuration, evaluates
//! combinations and spreads that work over a pool of worker threads.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Validated search parameters and tuning knobs
//! - **Feasibility** ([`solver`]) - Zone layout and acceptance test for one combination
//! - **Scheduling** ([`scheduler`]) - Static-chunk or shared-cursor distribution of the index space
//! - **Results** ([`store`]) - The lock-protected, append-only solution store
//! - **Progress** ([`progress`], [`monitor`]) - Atomic counters, snapshots and the polling observer
//! - **Cancellation** ([`cancel`]) - Cooperative stop flag checked by every worker
//! - **Error Handling** ([`error`]) - Engine-specific error types
//!
//! ## Concurrency Model
//!
//! The search space is read-only and shared without synchronization. The only shared
//! mutable state is the result store (one mutex, append-only) and the progress counters
//! (lock-free atomics). Workers never wait on each other outside the store's short
//! critical section.

pub mod cancel;
pub mod config;
pub mod error;
pub mod monitor;
pub mod progress;
pub mod scheduler;
pub mod solver;
pub mod store;
