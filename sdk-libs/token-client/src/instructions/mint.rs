use cnft_client::rpc::RpcConnection;
use cnft_sdk::{
    instructions::{mint_v1_instruction, MintV1Accounts},
    program_ids, LeafMetadata, TreeConfig,
};
use solana_sdk::{instruction::Instruction, pubkey::Pubkey};
use tracing::debug;

use crate::error::TokenClientError;

/// Fetches and decodes a TreeConfig account. One network read, never cached.
pub async fn fetch_tree_config<R: RpcConnection>(
    rpc: &R,
    tree_config: &Pubkey,
) -> Result<TreeConfig, TokenClientError> {
    let account = rpc
        .get_account(*tree_config)
        .await?
        .ok_or(TokenClientError::TreeConfigNotFound(*tree_config))?;
    let bubblegum = program_ids().bubblegum;
    if account.owner != bubblegum {
        return Err(TokenClientError::TreeConfigOwnerMismatch {
            address: *tree_config,
            owner: account.owner,
            expected: bubblegum,
        });
    }
    let config = TreeConfig::try_deserialize(&account.data)?;
    debug!(
        "TreeConfig {}: authority {}, {} of {} minted",
        tree_config,
        config.authority(),
        config.num_minted,
        config.total_mint_capacity
    );
    Ok(config)
}

/// Builds the `mint_v1` instruction for a single leaf.
pub async fn create_mint_instruction<R: RpcConnection>(
    rpc: &R,
    payer: &Pubkey,
    tree_config: &Pubkey,
    merkle_tree: &Pubkey,
    leaf_owner: &Pubkey,
    metadata: &LeafMetadata,
) -> Result<Instruction, TokenClientError> {
    metadata.validate()?;
    let config = fetch_tree_config(rpc, tree_config).await?;
    let accounts = MintV1Accounts::new(
        *tree_config,
        *merkle_tree,
        *leaf_owner,
        *payer,
        config.authority(),
    );
    Ok(mint_v1_instruction(
        program_ids(),
        accounts,
        &metadata.to_metadata_args(),
    )?)
}

/// Builds one `mint_v1` instruction per record, in input order, from a
/// single TreeConfig fetch.
pub async fn create_mint_instructions<R: RpcConnection>(
    rpc: &R,
    payer: &Pubkey,
    tree_config: &Pubkey,
    merkle_tree: &Pubkey,
    leaf_owner: &Pubkey,
    metadata: &[LeafMetadata],
) -> Result<Vec<Instruction>, TokenClientError> {
    if metadata.is_empty() {
        return Err(TokenClientError::EmptyBatch);
    }
    for record in metadata {
        record.validate()?;
    }
    let config = fetch_tree_config(rpc, tree_config).await?;
    let accounts = MintV1Accounts::new(
        *tree_config,
        *merkle_tree,
        *leaf_owner,
        *payer,
        config.authority(),
    );
    let programs = program_ids();
    metadata
        .iter()
        .map(|record| {
            mint_v1_instruction(programs, accounts, &record.to_metadata_args())
                .map_err(TokenClientError::from)
        })
        .collect()
}
