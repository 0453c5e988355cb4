//! Adapters layer
//!
//! Implementations of port traits for external systems.

pub mod keying;
pub mod system;

pub use keying::BorderFloodRemover;
pub use system::SystemClock;
