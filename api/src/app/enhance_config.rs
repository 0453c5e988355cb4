//! Enhancement configuration constants
//!
//! Blend factors and kernels for the tonal enhancement stage.

/// Contrast blend factor (1.0 leaves the image unchanged)
pub const CONTRAST_FACTOR: f32 = 1.2;

/// Brightness blend factor (1.0 leaves the image unchanged)
pub const BRIGHTNESS_FACTOR: f32 = 1.1;

/// Sharpness blend factor (1.0 leaves the image unchanged)
pub const SHARPNESS_FACTOR: f32 = 1.1;

/// 3x3 smoothing kernel used as the sharpness baseline, row-major
pub const SMOOTH_KERNEL: [u32; 9] = [1, 1, 1, 1, 5, 1, 1, 1, 1];

/// Sum of `SMOOTH_KERNEL`
pub const SMOOTH_DIVISOR: u32 = 13;
