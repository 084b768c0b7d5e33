use cnft_client::rpc::RpcError;
use cnft_sdk::{CnftSdkError, TreeSizeError};
use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TokenClientError {
    #[error("TreeConfig account {0} not found")]
    TreeConfigNotFound(Pubkey),

    #[error("TreeConfig account {address} is owned by {owner}, expected {expected}")]
    TreeConfigOwnerMismatch {
        address: Pubkey,
        owner: Pubkey,
        expected: Pubkey,
    },

    #[error("Cannot mint an empty batch")]
    EmptyBatch,

    #[error(transparent)]
    Sdk(#[from] CnftSdkError),

    #[error(transparent)]
    Rpc(#[from] RpcError),
}

impl From<TreeSizeError> for TokenClientError {
    fn from(err: TreeSizeError) -> Self {
        TokenClientError::Sdk(err.into())
    }
}
