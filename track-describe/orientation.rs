/// Intensity-centroid orientation in degrees, in `[0, 360)`.
///
/// Moments are summed over the disc of radius `half_patch` centred on the
/// rounded keypoint position. Returns `None` when the disc leaves the image.
pub fn intensity_centroid_angle(img: &[u8], width: usize, height: usize, x: f32, y: f32, half_patch: usize) -> Option<f32> {
    let half = half_patch as i64;
    let (cx, cy) = (x.round() as i64, y.round() as i64);
    if cx - half < 0 || cy - half < 0 || cx + half >= width as i64 || cy + half >= height as i64 {
        return None;
    }

    let mut m10 = 0i64;
    let mut m01 = 0i64;
    let r2 = half * half;
    for dy in -half..=half {
        let row = ((cy + dy) as usize) * width;
        for dx in -half..=half {
            if dx * dx + dy * dy > r2 {
                continue;
            }
            let val = img[row + (cx + dx) as usize] as i64;
            m10 += dx * val;
            m01 += dy * val;
        }
    }

    let angle = (m01 as f32).atan2(m10 as f32).to_degrees();
    Some(if angle < 0.0 { angle + 360.0 } else { angle })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(width: usize, height: usize, f: impl Fn(usize, usize) -> u8) -> Vec<u8> {
        (0..height).flat_map(|y| (0..width).map(move |x| (x, y))).map(|(x, y)| f(x, y)).collect()
    }

    #[test]
    fn test_centroid_follows_brightness() {
        let right = ramp(41, 41, |x, _| (x * 5) as u8);
        let angle = intensity_centroid_angle(&right, 41, 41, 20.0, 20.0, 15).unwrap();
        assert!(angle.abs() < 1e-3 || (360.0 - angle).abs() < 1e-3);

        let down = ramp(41, 41, |_, y| (y * 5) as u8);
        let angle = intensity_centroid_angle(&down, 41, 41, 20.0, 20.0, 15).unwrap();
        assert!((angle - 90.0).abs() < 1e-3);

        let left = ramp(41, 41, |x, _| (250 - x * 5) as u8);
        let angle = intensity_centroid_angle(&left, 41, 41, 20.0, 20.0, 15).unwrap();
        assert!((angle - 180.0).abs() < 1e-3);
    }

    #[test]
    fn test_patch_outside_image() {
        let img = vec![0u8; 41 * 41];
        assert!(intensity_centroid_angle(&img, 41, 41, 10.0, 20.0, 15).is_none());
        assert!(intensity_centroid_angle(&img, 41, 41, 20.0, 26.0, 15).is_none());
        // Flat patch has zero moments
        assert_eq!(intensity_centroid_angle(&img, 41, 41, 20.0, 20.0, 15), Some(0.0));
    }
}
