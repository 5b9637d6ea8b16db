/// Bookkeeping from one deduplication pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DedupStats {
    /// Cells strictly above the response threshold
    pub candidates: usize,
    pub appended: usize,
    pub replaced: usize,
    pub discarded: usize,
}

/// Corner type classification for the FAST segment test
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum CornerType {
    Bright,
    Dark,
    None,
}
