//! # Core Module
//!
//! Stateless foundation of the search: data models, the quantized gain grid and the
//! combination space built from it.
//!
//! - **Models** ([`models`]) - Gain ranges, combinations, assignments, zones and solutions
//! - **Gain Grid** ([`grid`]) - Quantized gain magnitudes and per-stage candidate ranges
//! - **Search Space** ([`search_space`]) - Index-addressable stage1 x stage2 cross product
//!
//! Nothing in this module is mutated after construction, so every type here can be
//! shared freely between worker threads.

pub mod grid;
pub mod models;
pub mod search_space;

/// Absolute tolerance applied to every numeric comparison of the search.
pub const EPSILON: f64 = 1e-6;
