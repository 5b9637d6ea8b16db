use rayon::prelude::*;
use track_core::Keypoint;

use crate::error::{validate_image, DetectError, DetectResult};
use crate::kind::FastParams;
use crate::types::CornerType;

/// Diameter reported for FAST keypoints (radius-3 Bresenham circle)
pub const FAST_KEYPOINT_SIZE: f32 = 7.0;

/// FAST circle offsets for corner detection, clockwise from 12 o'clock
pub const FAST_OFFSETS: [(i32, i32); 16] = [
    (0, -3), (1, -3), (2, -2), (3, -1),
    (3, 0), (3, 1), (2, 2), (1, 3),
    (0, 3), (-1, 3), (-2, 2), (-3, 1),
    (-3, 0), (-3, -1), (-2, -2), (-1, -3),
];

/// Segment-test corner detector
pub struct FastCornerDetector {
    params: FastParams,
}

impl FastCornerDetector {
    pub fn new(params: FastParams) -> DetectResult<Self> {
        if params.arc_length == 0 || params.arc_length > 16 {
            return Err(DetectError::InvalidConfig(format!(
                "FAST arc length must be 1..=16, got {}",
                params.arc_length
            )));
        }
        Ok(Self { params })
    }

    pub fn detect(&self, img: &[u8], width: usize, height: usize) -> DetectResult<Vec<Keypoint>> {
        validate_image(img, width, height)?;
        if width < 7 || height < 7 {
            return Ok(Vec::new());
        }

        let scores = self.score_map(img, width, height);

        let keypoints = (3..height - 3)
            .into_par_iter()
            .flat_map_iter(|y| {
                let scores = &scores;
                let mut row = Vec::new();
                for x in 3..width - 3 {
                    let score = scores[y * width + x];
                    if score <= 0.0 {
                        continue;
                    }
                    if self.params.nonmax_suppression && !is_strict_local_max(scores, width, x, y) {
                        continue;
                    }
                    row.push(Keypoint::new(x as f32, y as f32, FAST_KEYPOINT_SIZE, score));
                }
                row
            })
            .collect();

        Ok(keypoints)
    }

    /// Corner score per pixel, 0 where the segment test fails or at the border
    fn score_map(&self, img: &[u8], width: usize, height: usize) -> Vec<f32> {
        let mut scores = vec![0.0f32; width * height];
        scores
            .par_chunks_mut(width)
            .enumerate()
            .skip(3)
            .take(height - 6)
            .for_each(|(y, row)| {
                for (x, score) in row.iter_mut().enumerate().take(width - 3).skip(3) {
                    *score = self.corner_score(img, width, x, y);
                }
            });
        scores
    }

    fn corner_score(&self, img: &[u8], width: usize, x: usize, y: usize) -> f32 {
        let center = img[y * width + x] as i32;
        let t = self.params.threshold as i32;

        let mut bright = [false; 16];
        let mut dark = [false; 16];
        let mut diffs = [0i32; 16];
        for (i, &(dx, dy)) in FAST_OFFSETS.iter().enumerate() {
            let px = (x as i32 + dx) as usize;
            let py = (y as i32 + dy) as usize;
            let pixel = img[py * width + px] as i32;
            diffs[i] = pixel - center;
            bright[i] = pixel > center + t;
            dark[i] = pixel < center - t;
        }

        let corner = if has_contiguous_arc(&bright, self.params.arc_length) {
            CornerType::Bright
        } else if has_contiguous_arc(&dark, self.params.arc_length) {
            CornerType::Dark
        } else {
            CornerType::None
        };

        let mask = match corner {
            CornerType::Bright => &bright,
            CornerType::Dark => &dark,
            CornerType::None => return 0.0,
        };
        // Sum of absolute differences beyond the threshold over the arc class
        diffs
            .iter()
            .zip(mask.iter())
            .filter(|&(_, &on)| on)
            .map(|(&d, _)| (d.abs() - t) as f32)
            .sum()
    }
}

fn is_strict_local_max(scores: &[f32], width: usize, x: usize, y: usize) -> bool {
    let score = scores[y * width + x];
    for ny in y - 1..=y + 1 {
        for nx in x - 1..=x + 1 {
            if (nx, ny) != (x, y) && scores[ny * width + nx] >= score {
                return false;
            }
        }
    }
    true
}

/// At least `min_count` consecutive `true` entries on the circular array,
/// checked with a rotated bitmask
pub fn has_contiguous_arc(pixels: &[bool; 16], min_count: usize) -> bool {
    if min_count == 0 || min_count > 16 {
        return false;
    }

    let mut mask: u16 = 0;
    for (i, &pixel) in pixels.iter().enumerate() {
        if pixel {
            mask |= 1 << i;
        }
    }

    let mut run = mask;
    for i in 1..min_count as u32 {
        run &= mask.rotate_right(i);
        if run == 0 {
            return false;
        }
    }
    run != 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_image(width: usize, height: usize) -> Vec<u8> {
        vec![128; width * height]
    }

    /// Bright square in the centre, dark background
    fn create_corner_image(width: usize, height: usize) -> Vec<u8> {
        let mut img = vec![50; width * height];
        let cx = width / 2;
        let cy = height / 2;
        for y in cy - 2..=cy + 2 {
            for x in cx - 2..=cx + 2 {
                img[y * width + x] = 255;
            }
        }
        img
    }

    #[test]
    fn test_contiguous_arc_simple() {
        let mut pixels = [false; 16];
        for p in pixels.iter_mut().take(9) {
            *p = true;
        }
        assert!(has_contiguous_arc(&pixels, 9));
        assert!(!has_contiguous_arc(&pixels, 10));
    }

    #[test]
    fn test_contiguous_arc_wraps_around() {
        let mut pixels = [false; 16];
        for i in (12..16).chain(0..5) {
            pixels[i] = true;
        }
        assert!(has_contiguous_arc(&pixels, 9));
        assert!(!has_contiguous_arc(&pixels, 10));
    }

    #[test]
    fn test_alternating_pixels_are_not_an_arc() {
        let mut pixels = [false; 16];
        for i in (0..16).step_by(2) {
            pixels[i] = true;
        }
        assert!(!has_contiguous_arc(&pixels, 2));
        assert!(has_contiguous_arc(&pixels, 1));
        assert!(has_contiguous_arc(&[true; 16], 16));
    }

    #[test]
    fn test_uniform_image_has_no_corners() {
        let detector = FastCornerDetector::new(FastParams::default()).unwrap();
        let img = create_test_image(20, 20);
        assert!(detector.detect(&img, 20, 20).unwrap().is_empty());
    }

    #[test]
    fn test_square_corners_detected() {
        let detector = FastCornerDetector::new(FastParams::default()).unwrap();
        let img = create_corner_image(30, 30);
        let kps = detector.detect(&img, 30, 30).unwrap();
        assert!(!kps.is_empty());
        for kp in &kps {
            assert!(kp.response > 0.0);
            assert_eq!(kp.size, FAST_KEYPOINT_SIZE);
            // Everything fires around the bright square
            assert!((kp.x - 15.0).abs() <= 4.0 && (kp.y - 15.0).abs() <= 4.0);
        }
    }

    #[test]
    fn test_nms_reduces_keypoints() {
        let img = create_corner_image(30, 30);
        let raw = FastCornerDetector::new(FastParams { nonmax_suppression: false, ..FastParams::default() })
            .unwrap()
            .detect(&img, 30, 30)
            .unwrap();
        let nms = FastCornerDetector::new(FastParams::default())
            .unwrap()
            .detect(&img, 30, 30)
            .unwrap();
        assert!(nms.len() <= raw.len());
        assert!(!nms.is_empty());
    }

    #[test]
    fn test_small_and_invalid_inputs() {
        let detector = FastCornerDetector::new(FastParams::default()).unwrap();
        assert!(detector.detect(&create_test_image(6, 6), 6, 6).unwrap().is_empty());
        assert!(matches!(
            detector.detect(&[0; 10], 5, 5),
            Err(DetectError::InvalidImageData { .. })
        ));
        assert!(FastCornerDetector::new(FastParams { arc_length: 17, ..FastParams::default() }).is_err());
    }
}
