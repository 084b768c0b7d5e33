use crate::{depth_size_pair::DepthSizePair, errors::TreeSizeError};

const NODE_SIZE: usize = 32;

/// Account type tag (1) + header version tag (1) + header data v1 (54):
/// max_buffer_size u32, max_depth u32, authority, creation_slot u64, 6
/// padding bytes.
pub const CONCURRENT_MERKLE_TREE_HEADER_SIZE_V1: usize = 2 + 4 + 4 + 32 + 8 + 6;

/// Root, path of `max_depth` nodes, index u32, padding u32.
fn changelog_size(max_depth: usize) -> usize {
    NODE_SIZE + NODE_SIZE * max_depth + 4 + 4
}

/// Proof of `max_depth` nodes, leaf, index u32, padding u32.
fn path_size(max_depth: usize) -> usize {
    NODE_SIZE * max_depth + NODE_SIZE + 4 + 4
}

/// Size of the tree body: sequence_number, active_index and buffer_size
/// (u64 each), the changelog ring buffer and the rightmost proof.
pub fn concurrent_merkle_tree_size(pair: DepthSizePair) -> usize {
    let max_depth = pair.max_depth() as usize;
    let max_buffer_size = pair.max_buffer_size() as usize;
    3 * 8 + max_buffer_size * changelog_size(max_depth) + path_size(max_depth)
}

/// Bytes needed to cache the top `canopy_depth` levels of the tree.
pub fn canopy_size(canopy_depth: u32) -> usize {
    ((1usize << (canopy_depth + 1)).saturating_sub(2)) * NODE_SIZE
}

pub fn merkle_tree_account_size(
    max_depth: u32,
    max_buffer_size: u32,
    canopy_depth: u32,
) -> Result<usize, TreeSizeError> {
    let pair = DepthSizePair::new(max_depth, max_buffer_size)?;
    if canopy_depth > pair.max_depth() {
        return Err(TreeSizeError::InvalidCanopyDepth {
            canopy_depth,
            max_depth,
        });
    }
    Ok(CONCURRENT_MERKLE_TREE_HEADER_SIZE_V1
        + concurrent_merkle_tree_size(pair)
        + canopy_size(canopy_depth))
}

/// Space to allocate for a tree without canopy.
pub fn compute_required_space(
    max_depth: u32,
    max_buffer_size: u32,
) -> Result<usize, TreeSizeError> {
    merkle_tree_account_size(max_depth, max_buffer_size, 0)
}

#[test]
fn test_compute_required_space_known_values() {
    assert_eq!(compute_required_space(14, 64).unwrap(), 31_800);
    assert_eq!(compute_required_space(3, 8).unwrap(), 1_304);
    assert_eq!(compute_required_space(30, 2048).unwrap(), 2_049_080);
}

#[test]
fn test_compute_required_space_all_pairs() {
    for pair in crate::ALL_DEPTH_SIZE_PAIRS.iter() {
        let space = compute_required_space(pair.max_depth(), pair.max_buffer_size()).unwrap();
        assert!(space > CONCURRENT_MERKLE_TREE_HEADER_SIZE_V1);
        assert_eq!(
            space,
            compute_required_space(pair.max_depth(), pair.max_buffer_size()).unwrap()
        );
    }
}

#[test]
fn test_compute_required_space_rejects_invalid_pairs() {
    for depth in 0..=32 {
        for buffer in [0, 1, 8, 32, 64, 128, 256, 512, 1024, 2048, 4096] {
            let valid = DepthSizePair::new(depth, buffer).is_ok();
            assert_eq!(compute_required_space(depth, buffer).is_ok(), valid);
        }
    }
}

#[test]
fn test_canopy() {
    assert_eq!(canopy_size(0), 0);
    assert_eq!(canopy_size(1), 64);
    assert_eq!(canopy_size(10), 65_472);
    assert_eq!(
        merkle_tree_account_size(14, 64, 10).unwrap(),
        31_800 + 65_472
    );
    assert_eq!(
        merkle_tree_account_size(3, 8, 4),
        Err(TreeSizeError::InvalidCanopyDepth {
            canopy_depth: 4,
            max_depth: 3
        })
    );
}
