//! Background keying adapters
//!
//! Implementations of the `BackgroundRemover` port.

pub mod border_flood;

pub use border_flood::BorderFloodRemover;
