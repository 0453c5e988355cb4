//! Application layer
//!
//! Contains the processing pipeline and service orchestration.
//! Services coordinate between domain entities, ports, and encoders.

pub mod archive;
pub mod enhance_config;
pub mod imaging;
pub mod processor_service;

pub use processor_service::ImageProcessor;
