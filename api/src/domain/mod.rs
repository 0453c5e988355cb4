//! Domain layer
//!
//! Contains the processing model with no HTTP concerns.
//! - `entities`: Processor configuration and upload batch models
//! - `ports`: Trait definitions for external dependencies

pub mod entities;
pub mod ports;
