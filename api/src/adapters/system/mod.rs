//! System adapters
//!
//! Implementations of ports backed by the operating system.

pub mod clock;

pub use clock::SystemClock;
