use cnft_client::rpc::RpcConnection;
use cnft_sdk::{
    derive_tree_config_address,
    instructions::{
        create_tree_account_instruction, create_tree_config_instruction,
        init_empty_merkle_tree_instruction,
    },
    merkle_tree_account_size, program_ids, DepthSizePair,
};
use solana_sdk::{instruction::Instruction, pubkey::Pubkey};
use tracing::debug;

use crate::error::TokenClientError;

/// Shape of a new Merkle tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateTreeParams {
    pub max_depth: u32,
    pub max_buffer_size: u32,
    /// Levels of the tree cached on chain. Only changes the account size.
    pub canopy_depth: u32,
    /// Lets anyone mint into the tree. `None` keeps Bubblegum's default.
    pub public: Option<bool>,
}

impl Default for CreateTreeParams {
    fn default() -> Self {
        Self {
            max_depth: 14,
            max_buffer_size: 64,
            canopy_depth: 0,
            public: None,
        }
    }
}

impl CreateTreeParams {
    pub fn new(max_depth: u32, max_buffer_size: u32) -> Self {
        Self {
            max_depth,
            max_buffer_size,
            ..Default::default()
        }
    }

    pub fn depth_size_pair(&self) -> Result<DepthSizePair, TokenClientError> {
        Ok(DepthSizePair::new(self.max_depth, self.max_buffer_size)?)
    }

    pub fn account_size(&self) -> Result<usize, TokenClientError> {
        Ok(merkle_tree_account_size(
            self.max_depth,
            self.max_buffer_size,
            self.canopy_depth,
        )?)
    }
}

/// Instructions provisioning a Bubblegum tree.
#[derive(Debug, Clone)]
pub struct CreateTreeInstructions {
    pub tree_config: Pubkey,
    pub instructions: Vec<Instruction>,
}

async fn allocate_tree_instruction<R: RpcConnection>(
    rpc: &R,
    payer: &Pubkey,
    merkle_tree: &Pubkey,
    params: &CreateTreeParams,
) -> Result<(DepthSizePair, Instruction), TokenClientError> {
    let pair = params.depth_size_pair()?;
    let space = params.account_size()?;
    let lamports = rpc.get_minimum_balance_for_rent_exemption(space).await?;
    debug!(
        "Merkle tree {} depth {} buffer {} canopy {}: {} bytes, {} lamports",
        merkle_tree,
        pair.max_depth(),
        pair.max_buffer_size(),
        params.canopy_depth,
        space,
        lamports
    );
    let instruction =
        create_tree_account_instruction(program_ids(), payer, merkle_tree, lamports, space);
    Ok((pair, instruction))
}

/// Allocates the tree account and creates its TreeConfig through Bubblegum,
/// which also initializes the empty tree. The payer is the tree creator.
/// Fetches the rent exemption minimum, nothing else.
pub async fn create_tree_instructions<R: RpcConnection>(
    rpc: &R,
    payer: &Pubkey,
    merkle_tree: &Pubkey,
    params: &CreateTreeParams,
) -> Result<CreateTreeInstructions, TokenClientError> {
    // Invalid shapes fail before the rent request.
    params.account_size()?;
    let programs = program_ids();
    let (tree_config, _) = derive_tree_config_address(programs, merkle_tree);
    debug!("TreeConfig of {}: {}", merkle_tree, tree_config);

    let (pair, allocate) = allocate_tree_instruction(rpc, payer, merkle_tree, params).await?;
    let create_tree = create_tree_config_instruction(
        programs,
        &tree_config,
        merkle_tree,
        payer,
        payer,
        pair,
        params.public,
    )?;
    Ok(CreateTreeInstructions {
        tree_config,
        instructions: vec![allocate, create_tree],
    })
}

/// Allocates and initializes a bare account-compression tree owned by
/// `payer`. No TreeConfig is created.
pub async fn create_standalone_tree_instructions<R: RpcConnection>(
    rpc: &R,
    payer: &Pubkey,
    merkle_tree: &Pubkey,
    params: &CreateTreeParams,
) -> Result<Vec<Instruction>, TokenClientError> {
    params.account_size()?;
    let (pair, allocate) = allocate_tree_instruction(rpc, payer, merkle_tree, params).await?;
    let init = init_empty_merkle_tree_instruction(program_ids(), merkle_tree, payer, pair)?;
    Ok(vec![allocate, init])
}
