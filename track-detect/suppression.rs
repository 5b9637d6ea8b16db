use track_core::{Keypoint, ResponseField};

/// Cells above `threshold` that are not exceeded by any 8-neighbour.
///
/// Border cells are skipped. Returned in row-major order.
pub fn local_maxima(field: &ResponseField, threshold: f32) -> Vec<(usize, usize, f32)> {
    let (rows, cols) = (field.rows(), field.cols());
    if rows < 3 || cols < 3 {
        return Vec::new();
    }
    let data = field.as_slice();

    let mut maxima = Vec::new();
    for y in 1..rows - 1 {
        for x in 1..cols - 1 {
            let v = data[y * cols + x];
            if v <= threshold || v == 0.0 {
                continue;
            }
            let mut is_max = true;
            'window: for ny in y - 1..=y + 1 {
                for nx in x - 1..=x + 1 {
                    if data[ny * cols + nx] > v {
                        is_max = false;
                        break 'window;
                    }
                }
            }
            if is_max {
                maxima.push((y, x, v));
            }
        }
    }
    maxima
}

/// Greedy strongest-first acceptance with a minimum pairwise distance.
///
/// The sort is stable, so equal responses keep their input order.
pub fn min_distance_suppression(keypoints: &[Keypoint], min_distance: f32, max_count: usize) -> Vec<Keypoint> {
    if keypoints.is_empty() || max_count == 0 {
        return Vec::new();
    }

    let mut sorted = keypoints.to_vec();
    sorted.sort_by(|a, b| b.response.total_cmp(&a.response));

    let mut accepted: Vec<Keypoint> = Vec::new();
    let min_distance_sq = min_distance * min_distance;

    for candidate in sorted {
        let too_close = accepted.iter().any(|existing| {
            let dx = candidate.x - existing.x;
            let dy = candidate.y - existing.y;
            dx * dx + dy * dy < min_distance_sq
        });
        if !too_close {
            accepted.push(candidate);
            if accepted.len() == max_count {
                break;
            }
        }
    }

    accepted
}
