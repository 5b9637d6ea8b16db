/// Dissimilarity between two descriptors of the same family
pub trait DescriptorDistance {
    fn distance(&self, other: &Self) -> f32;
}

/// Hamming distance for packed binary descriptors
impl DescriptorDistance for [u8; 32] {
    fn distance(&self, other: &Self) -> f32 {
        self.iter().zip(other).map(|(a, b)| (a ^ b).count_ones()).sum::<u32>() as f32
    }
}

/// Euclidean distance for float descriptors; extra trailing components are ignored
impl DescriptorDistance for [f32] {
    fn distance(&self, other: &Self) -> f32 {
        self.iter().zip(other).map(|(a, b)| (a - b) * (a - b)).sum::<f32>().sqrt()
    }
}

impl DescriptorDistance for Vec<f32> {
    fn distance(&self, other: &Self) -> f32 {
        self.as_slice().distance(other.as_slice())
    }
}
