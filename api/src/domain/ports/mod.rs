//! Domain ports (traits)
//!
//! Port traits define interfaces that the domain layer requires.
//! Adapters provide concrete implementations of these traits.

pub mod background;
pub mod clock;

pub use background::BackgroundRemover;
pub use clock::Clock;
