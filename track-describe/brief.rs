use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use rayon::prelude::*;
use track_core::{BinaryDescriptor, Keypoint, ANGLE_UNSET};

/// Number of intensity comparisons in a 32-byte descriptor
pub const BRIEF_PAIRS: usize = 256;
/// Largest offset of a sampling point from the keypoint
pub const PATTERN_RADIUS: i32 = 13;

const PATTERN_SEED: u64 = 0x0b71_ef5e_ed00_0256;

/// Fixed sampling pairs `(x1, y1, x2, y2)` relative to the keypoint.
///
/// Drawn once from a seeded PCG so every run and every process compares the
/// same pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct BriefPattern {
    pairs: Vec<(i32, i32, i32, i32)>,
}

impl BriefPattern {
    pub fn new() -> Self {
        Self::with_seed(PATTERN_SEED)
    }

    pub fn with_seed(seed: u64) -> Self {
        let mut rng = Pcg64::seed_from_u64(seed);
        let mut coord = || rng.gen_range(-PATTERN_RADIUS..=PATTERN_RADIUS);
        let pairs = (0..BRIEF_PAIRS).map(|_| (coord(), coord(), coord(), coord())).collect();
        Self { pairs }
    }

    pub fn pairs(&self) -> &[(i32, i32, i32, i32)] {
        &self.pairs
    }

    /// Radius a steered pattern can reach
    pub fn steered_radius(&self) -> f32 {
        PATTERN_RADIUS as f32 * std::f32::consts::SQRT_2
    }
}

impl Default for BriefPattern {
    fn default() -> Self {
        Self::new()
    }
}

pub struct BriefGenerator<'a> {
    pattern: &'a BriefPattern,
    w: usize,
    h: usize,
}

impl<'a> BriefGenerator<'a> {
    pub fn new(pattern: &'a BriefPattern, width: usize, height: usize) -> Self {
        Self { pattern, w: width, h: height }
    }

    /// Describe every keypoint; steering uses the keypoint angle when `steered`
    /// is set and the angle is known.
    ///
    /// Callers must already have dropped keypoints whose pattern leaves the image.
    pub fn generate_descriptors(&self, img: &[u8], kps: &[Keypoint], steered: bool) -> Vec<BinaryDescriptor> {
        kps.par_iter()
            .map(|kp| {
                let angle = if steered && kp.angle != ANGLE_UNSET { kp.angle.to_radians() } else { 0.0 };
                let (s, c) = angle.sin_cos();
                let (cx, cy) = (kp.x, kp.y);
                let mut d = [0u8; 32];

                for (i, &(dx1, dy1, dx2, dy2)) in self.pattern.pairs.iter().enumerate() {
                    let (rx1, ry1) = (
                        cx + c * dx1 as f32 - s * dy1 as f32,
                        cy + s * dx1 as f32 + c * dy1 as f32,
                    );
                    let (rx2, ry2) = (
                        cx + c * dx2 as f32 - s * dy2 as f32,
                        cy + s * dx2 as f32 + c * dy2 as f32,
                    );

                    let val1 = self.bilinear_sample(img, rx1, ry1);
                    let val2 = self.bilinear_sample(img, rx2, ry2);

                    let bit = (val1 < val2) as u8;
                    d[i / 8] |= bit << (i % 8);
                }
                d
            })
            .collect()
    }

    /// Bilinear interpolation for subpixel sampling
    fn bilinear_sample(&self, img: &[u8], x: f32, y: f32) -> f32 {
        let x0 = x.floor();
        let y0 = y.floor();
        let x1 = x0 + 1.0;
        let y1 = y0 + 1.0;

        if x0 < 0.0 || y0 < 0.0 || x1 >= self.w as f32 || y1 >= self.h as f32 {
            let cx = x.round().clamp(0.0, (self.w - 1) as f32) as usize;
            let cy = y.round().clamp(0.0, (self.h - 1) as f32) as usize;
            return img[cy * self.w + cx] as f32;
        }

        let dx = x - x0;
        let dy = y - y0;

        let x0_idx = x0 as usize;
        let y0_idx = y0 as usize;
        let x1_idx = x1 as usize;
        let y1_idx = y1 as usize;

        let p00 = img[y0_idx * self.w + x0_idx] as f32;
        let p10 = img[y0_idx * self.w + x1_idx] as f32;
        let p01 = img[y1_idx * self.w + x0_idx] as f32;
        let p11 = img[y1_idx * self.w + x1_idx] as f32;

        let top = p00 * (1.0 - dx) + p10 * dx;
        let bottom = p01 * (1.0 - dx) + p11 * dx;

        top * (1.0 - dy) + bottom * dy
    }
}
