//! # gainsweep Core Library
//!
//! An exhaustive search engine for two-stage, gain-switchable amplifier configurations.
//! Given an input-voltage interval, an allowed output-voltage interval and a gain
//! quantization step, the engine finds every pair of stage gain ranges whose four
//! composite gains can be laid out over four contiguous input zones while keeping the
//! output inside the allowed interval.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Immutable data models (`GainRange`, `Combination`,
//!   `Solution`), the quantized gain grid and the index-addressable search space.
//!
//! - **[`engine`]: The Logic Core.** Configuration and validation, the feasibility
//!   solver, the parallel work scheduler, the shared result store, progress counters
//!   and the progress monitor.
//!
//! - **[`workflows`]: The Public API.** Ties `engine` and `core` together into a single
//!   search run with progress reporting and cooperative cancellation.

pub mod core;
pub mod engine;
pub mod workflows;
