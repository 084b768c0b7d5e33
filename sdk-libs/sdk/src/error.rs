use cnft_tree_size::TreeSizeError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CnftSdkError {
    #[error(transparent)]
    TreeSize(#[from] TreeSizeError),
    #[error("Account discriminator not found, account data is {0} bytes")]
    AccountDiscriminatorNotFound(usize),
    #[error("Account discriminator mismatch: expected {expected:?}, found {actual:?}")]
    AccountDiscriminatorMismatch { expected: [u8; 8], actual: [u8; 8] },
    #[error("Failed to deserialize account: {0}")]
    AccountDidNotDeserialize(String),
    #[error("Invalid metadata: {0}")]
    InvalidMetadata(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Seed of {0} bytes exceeds the maximum seed length")]
    InvalidSeed(usize),
    #[error("Program ids were already set for this process")]
    ProgramIdsAlreadySet,
}
