use crate::errors::TreeSizeError;

/// Shape of a concurrent Merkle tree: its depth and the number of
/// changelog entries kept for concurrent writers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DepthSizePair {
    max_depth: u32,
    max_buffer_size: u32,
}

/// Every (max_depth, max_buffer_size) combination the account-compression
/// program accepts.
pub const ALL_DEPTH_SIZE_PAIRS: [DepthSizePair; 26] = [
    DepthSizePair::unchecked(3, 8),
    DepthSizePair::unchecked(5, 8),
    DepthSizePair::unchecked(14, 64),
    DepthSizePair::unchecked(14, 256),
    DepthSizePair::unchecked(14, 1024),
    DepthSizePair::unchecked(14, 2048),
    DepthSizePair::unchecked(15, 64),
    DepthSizePair::unchecked(16, 64),
    DepthSizePair::unchecked(17, 64),
    DepthSizePair::unchecked(18, 64),
    DepthSizePair::unchecked(19, 64),
    DepthSizePair::unchecked(20, 64),
    DepthSizePair::unchecked(20, 256),
    DepthSizePair::unchecked(20, 1024),
    DepthSizePair::unchecked(20, 2048),
    DepthSizePair::unchecked(24, 64),
    DepthSizePair::unchecked(24, 256),
    DepthSizePair::unchecked(24, 512),
    DepthSizePair::unchecked(24, 1024),
    DepthSizePair::unchecked(24, 2048),
    DepthSizePair::unchecked(26, 512),
    DepthSizePair::unchecked(26, 1024),
    DepthSizePair::unchecked(26, 2048),
    DepthSizePair::unchecked(30, 512),
    DepthSizePair::unchecked(30, 1024),
    DepthSizePair::unchecked(30, 2048),
];

impl DepthSizePair {
    const fn unchecked(max_depth: u32, max_buffer_size: u32) -> Self {
        Self {
            max_depth,
            max_buffer_size,
        }
    }

    /// Returns the pair if it is one of [`ALL_DEPTH_SIZE_PAIRS`].
    pub fn new(max_depth: u32, max_buffer_size: u32) -> Result<Self, TreeSizeError> {
        let pair = Self::unchecked(max_depth, max_buffer_size);
        if ALL_DEPTH_SIZE_PAIRS.contains(&pair) {
            Ok(pair)
        } else {
            Err(TreeSizeError::InvalidDepthSizePair {
                max_depth,
                max_buffer_size,
            })
        }
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    pub fn max_buffer_size(&self) -> u32 {
        self.max_buffer_size
    }

    /// Number of leaves the tree can hold.
    pub fn capacity(&self) -> u64 {
        1u64 << self.max_depth
    }
}

impl Default for DepthSizePair {
    fn default() -> Self {
        Self::unchecked(14, 64)
    }
}

impl TryFrom<(u32, u32)> for DepthSizePair {
    type Error = TreeSizeError;

    fn try_from((max_depth, max_buffer_size): (u32, u32)) -> Result<Self, Self::Error> {
        Self::new(max_depth, max_buffer_size)
    }
}
