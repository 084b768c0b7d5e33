pub mod depth_size_pair;
pub mod errors;
pub mod size;

pub use depth_size_pair::{DepthSizePair, ALL_DEPTH_SIZE_PAIRS};
pub use errors::TreeSizeError;
pub use size::{
    canopy_size, compute_required_space, concurrent_merkle_tree_size, merkle_tree_account_size,
    CONCURRENT_MERKLE_TREE_HEADER_SIZE_V1,
};
