use borsh::{BorshDeserialize, BorshSerialize};
use cnft_tree_size::DepthSizePair;
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    system_instruction,
};

use crate::{
    constants::{CREATE_TREE_DISCRIMINATOR, INIT_EMPTY_MERKLE_TREE_DISCRIMINATOR},
    error::CnftSdkError,
    program_ids::ProgramIds,
};

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitEmptyMerkleTreeArgs {
    pub max_depth: u32,
    pub max_buffer_size: u32,
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateTreeArgs {
    pub max_depth: u32,
    pub max_buffer_size: u32,
    pub public: Option<bool>,
}

pub(crate) fn instruction_data<T: BorshSerialize>(
    discriminator: &[u8; 8],
    args: &T,
) -> Result<Vec<u8>, CnftSdkError> {
    let mut data = discriminator.to_vec();
    args.serialize(&mut data)
        .map_err(|e| CnftSdkError::Serialization(e.to_string()))?;
    Ok(data)
}

/// Allocates the Merkle tree account, owned by the account compression program.
pub fn create_tree_account_instruction(
    programs: &ProgramIds,
    payer: &Pubkey,
    merkle_tree: &Pubkey,
    lamports: u64,
    space: usize,
) -> Instruction {
    system_instruction::create_account(
        payer,
        merkle_tree,
        lamports,
        space as u64,
        &programs.account_compression,
    )
}

/// Initializes an allocated account as an empty concurrent Merkle tree
/// with `authority` as tree authority.
pub fn init_empty_merkle_tree_instruction(
    programs: &ProgramIds,
    merkle_tree: &Pubkey,
    authority: &Pubkey,
    pair: DepthSizePair,
) -> Result<Instruction, CnftSdkError> {
    let data = instruction_data(
        &INIT_EMPTY_MERKLE_TREE_DISCRIMINATOR,
        &InitEmptyMerkleTreeArgs {
            max_depth: pair.max_depth(),
            max_buffer_size: pair.max_buffer_size(),
        },
    )?;
    Ok(Instruction {
        program_id: programs.account_compression,
        accounts: vec![
            AccountMeta::new(*merkle_tree, false),
            AccountMeta::new_readonly(*authority, true),
            AccountMeta::new_readonly(programs.noop, false),
        ],
        data,
    })
}

/// Bubblegum `create_tree`. Creates the TreeConfig account and initializes
/// the empty Merkle tree through the compression program.
pub fn create_tree_config_instruction(
    programs: &ProgramIds,
    tree_config: &Pubkey,
    merkle_tree: &Pubkey,
    payer: &Pubkey,
    tree_creator: &Pubkey,
    pair: DepthSizePair,
    public: Option<bool>,
) -> Result<Instruction, CnftSdkError> {
    let data = instruction_data(
        &CREATE_TREE_DISCRIMINATOR,
        &CreateTreeArgs {
            max_depth: pair.max_depth(),
            max_buffer_size: pair.max_buffer_size(),
            public,
        },
    )?;
    Ok(Instruction {
        program_id: programs.bubblegum,
        accounts: vec![
            AccountMeta::new(*tree_config, false),
            AccountMeta::new(*merkle_tree, false),
            AccountMeta::new(*payer, true),
            AccountMeta::new_readonly(*tree_creator, true),
            AccountMeta::new_readonly(programs.noop, false),
            AccountMeta::new_readonly(programs.account_compression, false),
            AccountMeta::new_readonly(programs.system_program, false),
        ],
        data,
    })
}
