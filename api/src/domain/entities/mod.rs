//! Domain entities
//!
//! Pure domain models for processor settings and upload batches.

pub mod color;
pub mod processor_config;
pub mod upload;

pub use color::HexColor;
pub use processor_config::{Dimensions, Operations, OutputFormat, ProcessorConfig, StageToggles};
pub use upload::{BatchId, FailedUpload, ProcessedBatch, UploadedImage};
