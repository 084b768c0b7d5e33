use cnft_client::rpc::RpcConnection;
use cnft_sdk::LeafMetadata;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
};
use tracing::info;

use crate::{
    error::TokenClientError,
    instructions::{create_mint_instruction, create_mint_instructions},
};

/// Mints one compressed NFT to `leaf_owner`.
///
/// The transaction is signed by `payer` only, which therefore has to be the
/// tree authority stored in TreeConfig. Otherwise signing fails before
/// submission.
pub async fn mint_compressed_nft<R: RpcConnection>(
    rpc: &mut R,
    payer: &Keypair,
    tree_config: &Pubkey,
    merkle_tree: &Pubkey,
    leaf_owner: &Pubkey,
    metadata: &LeafMetadata,
) -> Result<Signature, TokenClientError> {
    let instruction = create_mint_instruction(
        rpc,
        &payer.pubkey(),
        tree_config,
        merkle_tree,
        leaf_owner,
        metadata,
    )
    .await?;
    let signature = rpc
        .create_and_send_transaction(&[instruction], &payer.pubkey(), &[payer])
        .await?;
    info!("Minted {:?} into {}: {}", metadata.name, merkle_tree, signature);
    Ok(signature)
}

/// Mints all records in one transaction. Either every leaf is appended or
/// none is. Transaction size limits are not checked.
pub async fn mint_compressed_nft_batch<R: RpcConnection>(
    rpc: &mut R,
    payer: &Keypair,
    tree_config: &Pubkey,
    merkle_tree: &Pubkey,
    leaf_owner: &Pubkey,
    metadata: &[LeafMetadata],
) -> Result<Signature, TokenClientError> {
    let instructions = create_mint_instructions(
        rpc,
        &payer.pubkey(),
        tree_config,
        merkle_tree,
        leaf_owner,
        metadata,
    )
    .await?;
    let signature = rpc
        .create_and_send_transaction(&instructions, &payer.pubkey(), &[payer])
        .await?;
    info!(
        "Minted {} leaves into {}: {}",
        instructions.len(),
        merkle_tree,
        signature
    );
    Ok(signature)
}
