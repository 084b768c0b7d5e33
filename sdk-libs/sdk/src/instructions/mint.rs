use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};

use super::create_tree::instruction_data;
use crate::{
    constants::MINT_V1_DISCRIMINATOR, error::CnftSdkError, program_ids::ProgramIds,
    types::MetadataArgs,
};

/// Accounts of a Bubblegum `mint_v1` instruction, excluding program ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MintV1Accounts {
    pub tree_config: Pubkey,
    pub leaf_owner: Pubkey,
    pub leaf_delegate: Pubkey,
    pub merkle_tree: Pubkey,
    pub payer: Pubkey,
    /// Must be the tree creator or delegate stored in TreeConfig.
    pub tree_creator_or_delegate: Pubkey,
}

impl MintV1Accounts {
    /// The leaf owner is also the leaf delegate.
    pub fn new(
        tree_config: Pubkey,
        merkle_tree: Pubkey,
        leaf_owner: Pubkey,
        payer: Pubkey,
        tree_creator_or_delegate: Pubkey,
    ) -> Self {
        Self {
            tree_config,
            leaf_owner,
            leaf_delegate: leaf_owner,
            merkle_tree,
            payer,
            tree_creator_or_delegate,
        }
    }
}

pub fn mint_v1_instruction(
    programs: &ProgramIds,
    accounts: MintV1Accounts,
    metadata: &MetadataArgs,
) -> Result<Instruction, CnftSdkError> {
    let data = instruction_data(&MINT_V1_DISCRIMINATOR, metadata)?;
    Ok(Instruction {
        program_id: programs.bubblegum,
        accounts: vec![
            AccountMeta::new(accounts.tree_config, false),
            AccountMeta::new_readonly(accounts.leaf_owner, false),
            AccountMeta::new_readonly(accounts.leaf_delegate, false),
            AccountMeta::new(accounts.merkle_tree, false),
            AccountMeta::new_readonly(accounts.payer, true),
            AccountMeta::new_readonly(accounts.tree_creator_or_delegate, true),
            AccountMeta::new_readonly(programs.noop, false),
            AccountMeta::new_readonly(programs.account_compression, false),
            AccountMeta::new_readonly(programs.system_program, false),
            AccountMeta::new_readonly(programs.token_metadata, false),
        ],
        data,
    })
}
