//! Pixel operations
//!
//! Canvas fitting, alpha flattening and tonal enhancement on 8-bit RGB
//! buffers. Every blend is `degenerate + factor * (image - degenerate)`,
//! truncated toward zero and clamped to the channel range.

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage, RgbaImage};

use crate::app::enhance_config::{
    BRIGHTNESS_FACTOR, CONTRAST_FACTOR, SHARPNESS_FACTOR, SMOOTH_DIVISOR, SMOOTH_KERNEL,
};
use crate::domain::entities::{Dimensions, HexColor};

/// Size an image takes when fitted inside `target` without upscaling
pub fn contain_size(width: u32, height: u32, target: Dimensions) -> (u32, u32) {
    if width <= target.width && height <= target.height {
        return (width, height);
    }

    let scale = f64::min(
        target.width as f64 / width as f64,
        target.height as f64 / height as f64,
    );
    let fit_width = ((width as f64 * scale).round() as u32).clamp(1, target.width);
    let fit_height = ((height as f64 * scale).round() as u32).clamp(1, target.height);
    (fit_width, fit_height)
}

/// Fit an image inside `target` and centre it on a canvas of exactly that size
pub fn resize_contain(image: &RgbImage, target: Dimensions, fill: HexColor) -> RgbImage {
    let (width, height) = image.dimensions();
    let (fit_width, fit_height) = contain_size(width, height, target);

    let mut canvas = RgbImage::from_pixel(target.width, target.height, Rgb(fill.channels()));
    let x = (target.width - fit_width).div_ceil(2) as i64;
    let y = (target.height - fit_height).div_ceil(2) as i64;

    if (fit_width, fit_height) == (width, height) {
        imageops::replace(&mut canvas, image, x, y);
    } else {
        let scaled = imageops::resize(image, fit_width, fit_height, FilterType::Lanczos3);
        imageops::replace(&mut canvas, &scaled, x, y);
    }

    canvas
}

/// Composite an RGBA image over a solid fill
pub fn flatten(image: &RgbaImage, fill: HexColor) -> RgbImage {
    let background = fill.channels();
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b, a] = image.get_pixel(x, y).0;
        let alpha = a as u32;
        let mix = |fg: u8, bg: u8| {
            ((fg as u32 * alpha + bg as u32 * (255 - alpha) + 127) / 255) as u8
        };
        Rgb([
            mix(r, background[0]),
            mix(g, background[1]),
            mix(b, background[2]),
        ])
    })
}

/// Apply the standard enhancement chain: contrast, brightness, sharpness
pub fn enhance(image: &RgbImage) -> RgbImage {
    let image = adjust_contrast(image, CONTRAST_FACTOR);
    let image = adjust_brightness(&image, BRIGHTNESS_FACTOR);
    adjust_sharpness(&image, SHARPNESS_FACTOR)
}

/// ITU-R 601-2 luma, in 16-bit fixed point
fn luma(pixel: &Rgb<u8>) -> u32 {
    let [r, g, b] = pixel.0;
    (r as u32 * 19595 + g as u32 * 38470 + b as u32 * 7471 + 0x8000) >> 16
}

fn blend_channel(degenerate: u8, value: u8, factor: f32) -> u8 {
    let blended = degenerate as f32 + factor * (value as f32 - degenerate as f32);
    if blended <= 0.0 {
        0
    } else if blended >= 255.0 {
        255
    } else {
        blended as u8
    }
}

/// Scale contrast around the mean grey level
pub fn adjust_contrast(image: &RgbImage, factor: f32) -> RgbImage {
    let count = image.width() as u64 * image.height() as u64;
    if count == 0 {
        return image.clone();
    }

    let total: u64 = image.pixels().map(|p| luma(p) as u64).sum();
    let mean = (total as f64 / count as f64 + 0.5) as u8;

    let mut out = image.clone();
    for pixel in out.pixels_mut() {
        for channel in pixel.0.iter_mut() {
            *channel = blend_channel(mean, *channel, factor);
        }
    }
    out
}

/// Scale brightness toward or away from black
pub fn adjust_brightness(image: &RgbImage, factor: f32) -> RgbImage {
    let mut out = image.clone();
    for pixel in out.pixels_mut() {
        for channel in pixel.0.iter_mut() {
            *channel = blend_channel(0, *channel, factor);
        }
    }
    out
}

/// Scale the difference between the image and its smoothed copy.
///
/// The outermost ring of pixels has no full neighbourhood and is left as is.
pub fn adjust_sharpness(image: &RgbImage, factor: f32) -> RgbImage {
    let (width, height) = image.dimensions();
    if width < 3 || height < 3 {
        return image.clone();
    }

    let smooth = smooth(image);
    let mut out = image.clone();
    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let base = smooth.get_pixel(x, y).0;
            let pixel = out.get_pixel_mut(x, y);
            for (channel, degenerate) in pixel.0.iter_mut().zip(base) {
                *channel = blend_channel(degenerate, *channel, factor);
            }
        }
    }
    out
}

fn smooth(image: &RgbImage) -> RgbImage {
    let (width, height) = image.dimensions();
    let mut out = image.clone();

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let mut sums = [0u32; 3];
            for (k, weight) in SMOOTH_KERNEL.iter().enumerate() {
                let nx = x + (k as u32 % 3) - 1;
                let ny = y + (k as u32 / 3) - 1;
                let neighbour = image.get_pixel(nx, ny).0;
                for c in 0..3 {
                    sums[c] += neighbour[c] as u32 * weight;
                }
            }
            let pixel = out.get_pixel_mut(x, y);
            for c in 0..3 {
                pixel.0[c] = ((sums[c] + SMOOTH_DIVISOR / 2) / SMOOTH_DIVISOR) as u8;
            }
        }
    }

    out
}
