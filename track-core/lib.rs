#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod params;

pub use params::{AkazeDescriptorType, AkazeParams, BriskParams, Diffusivity, OrbParams, OrbScore, SiftParams};

/// Row-major 8-bit grayscale image
pub type Image = Vec<u8>;

/// 256-bit binary descriptor = 32 bytes
pub type BinaryDescriptor = [u8; 32];

/// Sentinel angle for keypoints whose orientation was never computed
pub const ANGLE_UNSET: f32 = -1.0;

/// Malformed input handed to one of the pure tracking algorithms
#[derive(Debug, Clone, PartialEq)]
pub enum InputError {
    FieldSizeMismatch { expected_len: usize, actual_len: usize },
    RaggedField { row: usize, expected_cols: usize, actual_cols: usize },
    MissingCandidates { query: usize, found: usize },
}

impl std::fmt::Display for InputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputError::FieldSizeMismatch { expected_len, actual_len } => {
                write!(f, "Response field length mismatch: expected {}, got {}", expected_len, actual_len)
            }
            InputError::RaggedField { row, expected_cols, actual_cols } => {
                write!(f, "Response field row {} has {} columns (expected {})", row, actual_cols, expected_cols)
            }
            InputError::MissingCandidates { query, found } => {
                write!(f, "Query {} has {} match candidates (need at least 2)", query, found)
            }
        }
    }
}

impl std::error::Error for InputError {}

/// Keypoint in continuous image coordinates (`x` = column, `y` = row)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Keypoint {
    pub x: f32,
    pub y: f32,
    /// Diameter of the meaningful neighbourhood
    pub size: f32,
    pub response: f32,
    /// Orientation in degrees within `[0, 360)`, `ANGLE_UNSET` if not computed
    pub angle: f32,
}

impl Keypoint {
    pub fn new(x: f32, y: f32, size: f32, response: f32) -> Self {
        Self { x, y, size, response, angle: ANGLE_UNSET }
    }

    pub fn with_angle(mut self, angle: f32) -> Self {
        self.angle = angle;
        self
    }

    /// Intersection-over-union of the two circular neighbourhoods.
    ///
    /// Returns `0.0` for disjoint circles and the ratio of the smaller to the
    /// larger area when one circle contains the other.
    pub fn overlap(&self, other: &Keypoint) -> f32 {
        let a = self.size * 0.5;
        let b = other.size * 0.5;
        let a_2 = a * a;
        let b_2 = b * b;

        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let c = (dx * dx + dy * dy).sqrt();

        if a.min(b) + c <= a.max(b) {
            if a_2.max(b_2) == 0.0 {
                return 0.0;
            }
            return a_2.min(b_2) / a_2.max(b_2);
        }

        if c >= a + b {
            return 0.0;
        }

        let c_2 = c * c;
        let cos_alpha = ((b_2 + c_2 - a_2) / (2.0 * b * c)).clamp(-1.0, 1.0);
        let cos_beta = ((a_2 + c_2 - b_2) / (2.0 * a * c)).clamp(-1.0, 1.0);
        let alpha = cos_alpha.acos();
        let beta = cos_beta.acos();

        let segment_a = a_2 * beta;
        let segment_b = b_2 * alpha;
        let triangle_a = a_2 * beta.sin() * cos_beta;
        let triangle_b = b_2 * alpha.sin() * cos_alpha;

        let intersection = segment_a + segment_b - triangle_a - triangle_b;
        let union = (a_2 + b_2) * std::f32::consts::PI - intersection;
        intersection / union
    }
}

/// Dense per-pixel corner response, row-major
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseField {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl ResponseField {
    pub fn new(rows: usize, cols: usize, data: Vec<f32>) -> Result<Self, InputError> {
        if data.len() != rows * cols {
            return Err(InputError::FieldSizeMismatch {
                expected_len: rows * cols,
                actual_len: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self { rows, cols, data: vec![0.0; rows * cols] }
    }

    /// Build from nested rows, rejecting ragged input
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<Self, InputError> {
        let cols = rows.first().map_or(0, |r| r.len());
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (row, values) in rows.iter().enumerate() {
            if values.len() != cols {
                return Err(InputError::RaggedField {
                    row,
                    expected_cols: cols,
                    actual_cols: values.len(),
                });
            }
            data.extend_from_slice(values);
        }
        Ok(Self { rows: rows.len(), cols, data })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row < self.rows && col < self.cols {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }

    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        if row < self.rows && col < self.cols {
            self.data[row * self.cols + col] = value;
        }
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Row-major `(row, col, value)` iteration
    pub fn iter_cells(&self) -> impl Iterator<Item = (usize, usize, f32)> + '_ {
        let cols = self.cols;
        self.data
            .iter()
            .enumerate()
            .map(move |(i, &v)| (i / cols, i % cols, v))
    }

    pub fn max_value(&self) -> Option<f32> {
        self.data.iter().copied().reduce(f32::max)
    }

    pub fn min_value(&self) -> Option<f32> {
        self.data.iter().copied().reduce(f32::min)
    }

    /// Min-max normalisation into `[lo, hi]`; a constant field maps to `lo`
    pub fn normalized(&self, lo: f32, hi: f32) -> Self {
        let (min, max) = match (self.min_value(), self.max_value()) {
            (Some(min), Some(max)) => (min, max),
            _ => return self.clone(),
        };
        let range = max - min;
        let data = if range > 0.0 {
            let scale = (hi - lo) / range;
            self.data.iter().map(|&v| lo + (v - min) * scale).collect()
        } else {
            vec![lo; self.data.len()]
        };
        Self { rows: self.rows, cols: self.cols, data }
    }
}

/// One nearest-neighbour candidate for a query descriptor
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MatchCandidate {
    pub query_idx: usize,
    pub train_idx: usize,
    pub distance: f32,
}

impl MatchCandidate {
    pub fn new(query_idx: usize, train_idx: usize, distance: f32) -> Self {
        Self { query_idx, train_idx, distance }
    }
}

/// Accepted correspondence between a query and a reference descriptor
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Match {
    pub query_idx: usize,
    pub reference_idx: usize,
    pub distance: f32,
}

impl From<MatchCandidate> for Match {
    fn from(c: MatchCandidate) -> Self {
        Self {
            query_idx: c.query_idx,
            reference_idx: c.train_idx,
            distance: c.distance,
        }
    }
}

/// Default worker count for the global pool
pub fn default_threads() -> usize {
    num_cpus::get().max(1)
}

/// Initialize Rayon thread pool with the specified number of threads
pub fn init_thread_pool(n_threads: usize) -> Result<(), rayon::ThreadPoolBuildError> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(n_threads)
        .build_global()
}
