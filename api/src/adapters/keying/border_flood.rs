//! Border flood-fill background remover
//!
//! Product photos are usually shot against a near-uniform backdrop that
//! touches every edge of the frame. The backdrop colour is estimated from
//! the border pixels and everything connected to the border within
//! tolerance of it is keyed out.

use std::collections::VecDeque;

use image::{Rgb, RgbImage, Rgba, RgbaImage};

use crate::domain::ports::BackgroundRemover;
use crate::error::DomainError;

/// Keys out the backdrop region connected to the image border
#[derive(Debug, Clone, Copy)]
pub struct BorderFloodRemover {
    tolerance: u8,
}

impl BorderFloodRemover {
    pub fn new(tolerance: u8) -> Self {
        Self { tolerance }
    }

    fn matches(&self, pixel: &Rgb<u8>, backdrop: [u8; 3]) -> bool {
        pixel
            .0
            .iter()
            .zip(backdrop)
            .all(|(&c, b)| c.abs_diff(b) <= self.tolerance)
    }
}

/// Coordinates of every pixel on the outer ring, each listed once
fn border_coords(width: u32, height: u32) -> Vec<(u32, u32)> {
    let mut coords = Vec::new();
    for x in 0..width {
        coords.push((x, 0));
        if height > 1 {
            coords.push((x, height - 1));
        }
    }
    for y in 1..height.saturating_sub(1) {
        coords.push((0, y));
        if width > 1 {
            coords.push((width - 1, y));
        }
    }
    coords
}

/// Per-channel median of the border pixels
fn estimate_backdrop(image: &RgbImage, border: &[(u32, u32)]) -> [u8; 3] {
    let mut backdrop = [0u8; 3];
    for (c, slot) in backdrop.iter_mut().enumerate() {
        let mut values: Vec<u8> = border
            .iter()
            .map(|&(x, y)| image.get_pixel(x, y).0[c])
            .collect();
        values.sort_unstable();
        *slot = values[values.len() / 2];
    }
    backdrop
}

impl BackgroundRemover for BorderFloodRemover {
    fn remove_background(&self, image: &RgbImage) -> Result<RgbaImage, DomainError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(DomainError::Validation("image has no pixels".to_string()));
        }

        let border = border_coords(width, height);
        let backdrop = estimate_backdrop(image, &border);

        let mut out = RgbaImage::from_fn(width, height, |x, y| {
            let [r, g, b] = image.get_pixel(x, y).0;
            Rgba([r, g, b, 255])
        });

        let index = |x: u32, y: u32| y as usize * width as usize + x as usize;
        let mut visited = vec![false; width as usize * height as usize];
        let mut queue = VecDeque::new();

        for &(x, y) in &border {
            if self.matches(image.get_pixel(x, y), backdrop) {
                visited[index(x, y)] = true;
                queue.push_back((x, y));
            }
        }

        let mut keyed = 0usize;
        while let Some((x, y)) = queue.pop_front() {
            out.get_pixel_mut(x, y).0[3] = 0;
            keyed += 1;

            let neighbours = [
                (x.wrapping_sub(1), y),
                (x + 1, y),
                (x, y.wrapping_sub(1)),
                (x, y + 1),
            ];
            for (nx, ny) in neighbours {
                if nx >= width || ny >= height || visited[index(nx, ny)] {
                    continue;
                }
                if self.matches(image.get_pixel(nx, ny), backdrop) {
                    visited[index(nx, ny)] = true;
                    queue.push_back((nx, ny));
                }
            }
        }

        tracing::debug!(
            "Keyed {} of {} pixels against backdrop {:?}",
            keyed,
            visited.len(),
            backdrop
        );

        Ok(out)
    }
}
