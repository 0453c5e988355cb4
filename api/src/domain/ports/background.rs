//! Background removal port trait
//!
//! Defines the interface for separating a product from its backdrop.

use image::{RgbImage, RgbaImage};

use crate::error::DomainError;

/// Removes the backdrop behind a product photo
pub trait BackgroundRemover: Send + Sync {
    /// Return the image with backdrop pixels made transparent.
    ///
    /// The output has the same dimensions as the input.
    fn remove_background(&self, image: &RgbImage) -> Result<RgbaImage, DomainError>;
}
