use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeSizeError {
    #[error("Invalid depth/buffer size pair: max_depth {max_depth}, max_buffer_size {max_buffer_size}")]
    InvalidDepthSizePair { max_depth: u32, max_buffer_size: u32 },
    #[error("Canopy depth {canopy_depth} exceeds max depth {max_depth}")]
    InvalidCanopyDepth { canopy_depth: u32, max_depth: u32 },
}
