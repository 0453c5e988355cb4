//! Test utilities
//!
//! Manual test doubles and fixtures for unit testing.
//!
//! The ports are small synchronous traits, so hand-written doubles are
//! simpler than generated mocks and let tests inspect what was called.

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
