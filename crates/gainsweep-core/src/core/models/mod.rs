//! # Models Module
//!
//! Immutable value types shared by every layer of the search.
//!
//! - [`gain`] - A stage identifier and one stage's switchable `[min, max]` gain pair
//! - [`combination`] - One stage1 x stage2 candidate and its four composite gains
//! - [`solution`] - Assignments of gains to zones, zone geometry and accepted solutions

pub mod combination;
pub mod gain;
pub mod solution;
