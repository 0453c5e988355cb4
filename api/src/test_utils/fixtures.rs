//! Test fixtures
//!
//! Factory functions for images, encoded uploads and configured services.

use std::io::Cursor;
use std::sync::Arc;

use chrono::NaiveDate;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

use super::mocks::FixedClock;
use crate::adapters::{BorderFloodRemover, SystemClock};
use crate::app::ImageProcessor;
use crate::config::Config;
use crate::domain::entities::{Dimensions, OutputFormat, ProcessorConfig};
use crate::AppState;

/// Backdrop colour used by `product_on_backdrop`
pub const BACKDROP: Rgb<u8> = Rgb([255, 255, 255]);

/// Product colour used by `product_on_backdrop`
pub const PRODUCT: Rgb<u8> = Rgb([200, 30, 30]);

/// Clock fixed at 2024-01-02 03:04:05
pub fn fixed_clock() -> FixedClock {
    FixedClock(
        NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap(),
    )
}

/// A red square covering the middle half of a white frame
pub fn product_on_backdrop(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let inside_x = x >= width / 4 && x < width - width / 4;
        let inside_y = y >= height / 4 && y < height - height / 4;
        if inside_x && inside_y {
            PRODUCT
        } else {
            BACKDROP
        }
    })
}

/// Encode an image as PNG bytes
pub fn encode_png(image: &RgbImage) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(image.clone())
        .write_to(&mut buf, ImageFormat::Png)
        .unwrap();
    buf.into_inner()
}

/// Small-canvas PNG processor config so tests stay fast
pub fn test_processor_config() -> ProcessorConfig {
    ProcessorConfig {
        dimensions: Dimensions {
            width: 64,
            height: 64,
        },
        output_format: OutputFormat::Png,
        ..ProcessorConfig::default()
    }
}

/// Server config without rate limiting or file logging
pub fn test_config() -> Config {
    Config {
        processor_config_path: None,
        log_file: None,
        rate_limit_replenish_secs: 0,
        ..Config::default()
    }
}

/// App state wired with the production adapters
pub fn test_state(processor_config: ProcessorConfig, config: Config) -> AppState {
    let remover = Arc::new(BorderFloodRemover::new(
        processor_config.backgrounds.key_tolerance,
    ));
    AppState {
        processor: Arc::new(ImageProcessor::new(
            processor_config,
            remover,
            Arc::new(SystemClock),
        )),
        config,
    }
}
