use log::trace;
use rayon::prelude::*;
use track_core::ResponseField;

use crate::error::{validate_image, DetectError, DetectResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Anything that turns a grayscale image into a same-sized response field
pub trait ResponseProvider {
    fn compute(&self, img: &[u8], width: usize, height: usize) -> DetectResult<ResponseField>;
}

/// Harris corner measure `det(M) - k * trace(M)^2`
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HarrisResponse {
    /// Neighbourhood considered for the structure tensor
    pub block_size: usize,
    /// Sobel aperture (must be 3)
    pub aperture_size: usize,
    pub k: f32,
}

impl Default for HarrisResponse {
    fn default() -> Self {
        Self { block_size: 2, aperture_size: 3, k: 0.04 }
    }
}

/// Smaller eigenvalue of the structure tensor (Shi-Tomasi measure)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MinEigenResponse {
    pub block_size: usize,
    pub aperture_size: usize,
}

impl Default for MinEigenResponse {
    fn default() -> Self {
        Self { block_size: 4, aperture_size: 3 }
    }
}

impl ResponseProvider for HarrisResponse {
    fn compute(&self, img: &[u8], width: usize, height: usize) -> DetectResult<ResponseField> {
        let tensor = structure_tensor(img, width, height, self.block_size, self.aperture_size)?;
        let k = self.k;
        let data = tensor
            .into_iter()
            .map(|[ixx, ixy, iyy]| {
                let det = ixx * iyy - ixy * ixy;
                let trace = ixx + iyy;
                det - k * trace * trace
            })
            .collect();
        Ok(ResponseField::new(height, width, data)?)
    }
}

impl ResponseProvider for MinEigenResponse {
    fn compute(&self, img: &[u8], width: usize, height: usize) -> DetectResult<ResponseField> {
        let tensor = structure_tensor(img, width, height, self.block_size, self.aperture_size)?;
        let data = tensor
            .into_iter()
            .map(|[ixx, ixy, iyy]| {
                let half_trace = (ixx + iyy) * 0.5;
                let half_diff = (ixx - iyy) * 0.5;
                half_trace - (half_diff * half_diff + ixy * ixy).sqrt()
            })
            .collect();
        Ok(ResponseField::new(height, width, data)?)
    }
}

/// Per-pixel `[Ixx, Ixy, Iyy]` summed over a `block_size` box.
///
/// Even block sizes are anchored at `block_size / 2`, so the window covers
/// `x - b/2 ..= x - b/2 + b - 1`. Borders replicate.
fn structure_tensor(
    img: &[u8],
    width: usize,
    height: usize,
    block_size: usize,
    aperture_size: usize,
) -> DetectResult<Vec<[f32; 3]>> {
    validate_image(img, width, height)?;
    if aperture_size != 3 {
        return Err(DetectError::InvalidAperture(aperture_size));
    }
    if block_size == 0 {
        return Err(DetectError::InvalidBlockSize(block_size));
    }

    let (gx, gy) = sobel_gradients(img, width, height);
    trace!("sobel gradients done for {}x{}", width, height);

    let anchor = (block_size / 2) as isize;
    let max_x = width as isize - 1;
    let max_y = height as isize - 1;

    let tensor = (0..height)
        .into_par_iter()
        .flat_map_iter(|y| {
            let mut row = Vec::with_capacity(width);
            for x in 0..width {
                let mut ixx = 0.0f32;
                let mut ixy = 0.0f32;
                let mut iyy = 0.0f32;
                for by in 0..block_size as isize {
                    let yy = (y as isize - anchor + by).clamp(0, max_y) as usize;
                    for bx in 0..block_size as isize {
                        let xx = (x as isize - anchor + bx).clamp(0, max_x) as usize;
                        let dx = gx[yy * width + xx];
                        let dy = gy[yy * width + xx];
                        ixx += dx * dx;
                        ixy += dx * dy;
                        iyy += dy * dy;
                    }
                }
                row.push([ixx, ixy, iyy]);
            }
            row
        })
        .collect();

    Ok(tensor)
}

/// 3x3 Sobel gradients with replicated borders, scaled by 1/8
fn sobel_gradients(img: &[u8], width: usize, height: usize) -> (Vec<f32>, Vec<f32>) {
    let at = |x: isize, y: isize| -> f32 {
        let xx = x.clamp(0, width as isize - 1) as usize;
        let yy = y.clamp(0, height as isize - 1) as usize;
        img[yy * width + xx] as f32
    };

    let gradients: Vec<(f32, f32)> = (0..height)
        .into_par_iter()
        .flat_map_iter(|y| {
            let y = y as isize;
            let mut row = Vec::with_capacity(width);
            for x in 0..width as isize {
                // Sobel X kernel: [-1, 0, 1; -2, 0, 2; -1, 0, 1]
                let gx = at(x + 1, y - 1) + 2.0 * at(x + 1, y) + at(x + 1, y + 1)
                    - at(x - 1, y - 1)
                    - 2.0 * at(x - 1, y)
                    - at(x - 1, y + 1);
                // Sobel Y kernel: [-1, -2, -1; 0, 0, 0; 1, 2, 1]
                let gy = at(x - 1, y + 1) + 2.0 * at(x, y + 1) + at(x + 1, y + 1)
                    - at(x - 1, y - 1)
                    - 2.0 * at(x, y - 1)
                    - at(x + 1, y - 1);
                row.push((gx / 8.0, gy / 8.0));
            }
            row
        })
        .collect();

    gradients.into_iter().unzip()
}
