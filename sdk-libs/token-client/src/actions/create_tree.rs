use cnft_client::rpc::RpcConnection;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
};
use tracing::info;

use crate::{
    error::TokenClientError,
    instructions::{create_standalone_tree_instructions, create_tree_instructions, CreateTreeParams},
};

/// A tree created by [`create_tree`].
#[derive(Debug)]
pub struct ProvisionedTree {
    pub merkle_tree: Pubkey,
    pub tree_config: Pubkey,
    /// Only needed for later tree authority operations, not for minting.
    pub merkle_tree_keypair: Keypair,
    pub signature: Signature,
}

/// Allocates a Merkle tree account and creates its Bubblegum TreeConfig in
/// one transaction signed by `payer` and the fresh `merkle_tree_keypair`.
pub async fn create_tree<R: RpcConnection>(
    rpc: &mut R,
    payer: &Keypair,
    merkle_tree_keypair: Keypair,
    params: CreateTreeParams,
) -> Result<ProvisionedTree, TokenClientError> {
    let merkle_tree = merkle_tree_keypair.pubkey();
    let instructions =
        create_tree_instructions(rpc, &payer.pubkey(), &merkle_tree, &params).await?;
    let signature = rpc
        .create_and_send_transaction(
            &instructions.instructions,
            &payer.pubkey(),
            &[payer, &merkle_tree_keypair],
        )
        .await?;
    info!(
        "Created tree {} with TreeConfig {}: {}",
        merkle_tree, instructions.tree_config, signature
    );
    Ok(ProvisionedTree {
        merkle_tree,
        tree_config: instructions.tree_config,
        merkle_tree_keypair,
        signature,
    })
}

/// Allocates and initializes an account-compression tree with `payer` as
/// tree authority, without a TreeConfig. Bubblegum cannot mint into it.
pub async fn create_standalone_tree<R: RpcConnection>(
    rpc: &mut R,
    payer: &Keypair,
    merkle_tree_keypair: &Keypair,
    params: CreateTreeParams,
) -> Result<Signature, TokenClientError> {
    let merkle_tree = merkle_tree_keypair.pubkey();
    let instructions =
        create_standalone_tree_instructions(rpc, &payer.pubkey(), &merkle_tree, &params).await?;
    let signature = rpc
        .create_and_send_transaction(
            &instructions,
            &payer.pubkey(),
            &[payer, merkle_tree_keypair],
        )
        .await?;
    info!("Created standalone tree {}: {}", merkle_tree, signature);
    Ok(signature)
}
