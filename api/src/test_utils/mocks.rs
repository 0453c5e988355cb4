//! Test doubles for port traits
//!
//! These stand in for adapters and record how they were used.

use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::NaiveDateTime;
use image::{Rgba, RgbImage, RgbaImage};

use crate::domain::ports::{BackgroundRemover, Clock};
use crate::error::DomainError;

// ============================================================================
// Clock
// ============================================================================

/// Clock that always reports the same instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

// ============================================================================
// Background removers
// ============================================================================

/// Remover that makes every pixel transparent and counts calls
#[derive(Default)]
pub struct RecordingBackgroundRemover {
    calls: AtomicUsize,
}

impl RecordingBackgroundRemover {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl BackgroundRemover for RecordingBackgroundRemover {
    fn remove_background(&self, image: &RgbImage) -> Result<RgbaImage, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(RgbaImage::from_fn(image.width(), image.height(), |x, y| {
            let [r, g, b] = image.get_pixel(x, y).0;
            Rgba([r, g, b, 0])
        }))
    }
}

/// Remover that always fails
pub struct FailingBackgroundRemover;

impl BackgroundRemover for FailingBackgroundRemover {
    fn remove_background(&self, _image: &RgbImage) -> Result<RgbaImage, DomainError> {
        Err(DomainError::Io(std::io::Error::other(
            "segmentation unavailable",
        )))
    }
}
