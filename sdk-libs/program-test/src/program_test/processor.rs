use std::collections::HashMap;

use borsh::BorshDeserialize;
use cnft_sdk::{
    constants::{
        CREATE_TREE_DISCRIMINATOR, INIT_EMPTY_MERKLE_TREE_DISCRIMINATOR, MINT_V1_DISCRIMINATOR,
        TREE_CONFIG_SIZE,
    },
    derive_tree_config_address,
    instructions::{CreateTreeArgs, InitEmptyMerkleTreeArgs},
    merkle_tree_account_size,
    state::DecompressibleState,
    MetadataArgs, ProgramIds, TreeConfig,
};
use solana_sdk::{
    account::Account,
    instruction::{AccountMeta, Instruction, InstructionError},
    program_utils::limited_deserialize,
    pubkey::Pubkey,
    rent::Rent,
    system_instruction::SystemInstruction,
};

/// Custom program errors raised by the in-memory programs.
pub mod error_codes {
    /// System program `AccountAlreadyInUse`.
    pub const ACCOUNT_ALREADY_IN_USE: u32 = 0;
    /// System program `ResultWithNegativeLamports`.
    pub const RESULT_WITH_NEGATIVE_LAMPORTS: u32 = 1;
    /// Anchor `ConstraintSeeds`.
    pub const CONSTRAINT_SEEDS: u32 = 2006;
    /// Anchor `AccountOwnedByWrongProgram`.
    pub const ACCOUNT_OWNED_BY_WRONG_PROGRAM: u32 = 3007;
    /// Anchor `AccountNotInitialized`.
    pub const ACCOUNT_NOT_INITIALIZED: u32 = 3012;
    pub const CREATOR_SHARE_TOTAL_MUST_BE_100: u32 = 6004;
    pub const CREATOR_DID_NOT_VERIFY: u32 = 6006;
    pub const TREE_AUTHORITY_INCORRECT: u32 = 6016;
    pub const INSUFFICIENT_MINT_CAPACITY: u32 = 6017;
}

use error_codes::*;

// Concurrent Merkle tree account layout: 2 byte account tag, then
// max_buffer_size u32, max_depth u32, authority, creation slot, padding.
const MERKLE_TREE_ACCOUNT_TYPE: u8 = 1;
const HEADER_MAX_BUFFER_SIZE: usize = 2;
const HEADER_MAX_DEPTH: usize = 6;
const HEADER_AUTHORITY: usize = 10;
const HEADER_CREATION_SLOT: usize = 42;
const TREE_SEQUENCE_NUMBER: usize = 56;
const TREE_BUFFER_SIZE: usize = 72;

/// Executes instructions against `accounts`. Callers pass a copy and keep it
/// only if the whole transaction succeeds.
pub(crate) struct Processor<'a> {
    pub programs: &'a ProgramIds,
    pub rent: &'a Rent,
    pub slot: u64,
    pub accounts: &'a mut HashMap<Pubkey, Account>,
}

impl Processor<'_> {
    pub fn process(&mut self, instruction: &Instruction) -> Result<(), InstructionError> {
        let program_id = instruction.program_id;
        if program_id == self.programs.system_program {
            self.process_system(instruction)
        } else if program_id == self.programs.account_compression {
            self.process_compression(instruction)
        } else if program_id == self.programs.bubblegum {
            self.process_bubblegum(instruction)
        } else {
            Err(InstructionError::UnsupportedProgramId)
        }
    }

    fn process_system(&mut self, instruction: &Instruction) -> Result<(), InstructionError> {
        match limited_deserialize::<SystemInstruction>(&instruction.data)? {
            SystemInstruction::CreateAccount {
                lamports,
                space,
                owner,
            } => {
                let funder = account_meta(instruction, 0)?;
                let new_account = account_meta(instruction, 1)?;
                require_signer(funder)?;
                require_signer(new_account)?;
                self.create_account(
                    &funder.pubkey,
                    &new_account.pubkey,
                    lamports,
                    space as usize,
                    &owner,
                )
            }
            SystemInstruction::Transfer { lamports } => {
                let from = account_meta(instruction, 0)?;
                let to = account_meta(instruction, 1)?;
                require_signer(from)?;
                self.debit(&from.pubkey, lamports)?;
                let system_program = self.programs.system_program;
                self.accounts
                    .entry(to.pubkey)
                    .or_insert_with(|| Account::new(0, 0, &system_program))
                    .lamports += lamports;
                Ok(())
            }
            _ => Err(InstructionError::InvalidInstructionData),
        }
    }

    fn process_compression(&mut self, instruction: &Instruction) -> Result<(), InstructionError> {
        let data = strip_discriminator(&instruction.data, &INIT_EMPTY_MERKLE_TREE_DISCRIMINATOR)?;
        let args = InitEmptyMerkleTreeArgs::try_from_slice(data)
            .map_err(|_| InstructionError::InvalidInstructionData)?;
        let merkle_tree = account_meta(instruction, 0)?;
        let authority = account_meta(instruction, 1)?;
        let noop = account_meta(instruction, 2)?;
        require_signer(authority)?;
        if noop.pubkey != self.programs.noop {
            return Err(InstructionError::IncorrectProgramId);
        }
        self.init_merkle_tree(merkle_tree, &authority.pubkey, args.max_depth, args.max_buffer_size)
    }

    fn process_bubblegum(&mut self, instruction: &Instruction) -> Result<(), InstructionError> {
        if instruction.data.len() < 8 {
            return Err(InstructionError::InvalidInstructionData);
        }
        match &instruction.data[..8] {
            d if d == CREATE_TREE_DISCRIMINATOR => self.process_create_tree(instruction),
            d if d == MINT_V1_DISCRIMINATOR => self.process_mint_v1(instruction),
            _ => Err(InstructionError::InvalidInstructionData),
        }
    }

    fn process_create_tree(&mut self, instruction: &Instruction) -> Result<(), InstructionError> {
        let args = CreateTreeArgs::try_from_slice(&instruction.data[8..])
            .map_err(|_| InstructionError::InvalidInstructionData)?;
        let tree_config = account_meta(instruction, 0)?;
        let merkle_tree = account_meta(instruction, 1)?;
        let payer = account_meta(instruction, 2)?;
        let tree_creator = account_meta(instruction, 3)?;
        self.check_program_accounts(instruction, 4)?;
        require_writable(tree_config)?;
        require_signer(payer)?;
        require_signer(tree_creator)?;

        let (expected, _) = derive_tree_config_address(self.programs, &merkle_tree.pubkey);
        if tree_config.pubkey != expected {
            return Err(InstructionError::Custom(CONSTRAINT_SEEDS));
        }
        let owner = self
            .accounts
            .get(&merkle_tree.pubkey)
            .map(|account| account.owner)
            .ok_or(InstructionError::Custom(ACCOUNT_NOT_INITIALIZED))?;
        if owner != self.programs.account_compression {
            return Err(InstructionError::Custom(ACCOUNT_OWNED_BY_WRONG_PROGRAM));
        }

        let config = TreeConfig {
            tree_creator: tree_creator.pubkey,
            tree_delegate: tree_creator.pubkey,
            total_mint_capacity: 1u64 << args.max_depth,
            num_minted: 0,
            is_public: args.public.unwrap_or(false),
            is_decompressible: DecompressibleState::Disabled,
        };
        let lamports = self.rent.minimum_balance(TREE_CONFIG_SIZE);
        let bubblegum = self.programs.bubblegum;
        self.create_account(
            &payer.pubkey,
            &tree_config.pubkey,
            lamports,
            TREE_CONFIG_SIZE,
            &bubblegum,
        )?;
        self.write_tree_config(&tree_config.pubkey, &config)?;
        // TreeConfig is the authority of trees created through Bubblegum.
        self.init_merkle_tree(
            merkle_tree,
            &tree_config.pubkey,
            args.max_depth,
            args.max_buffer_size,
        )
    }

    fn process_mint_v1(&mut self, instruction: &Instruction) -> Result<(), InstructionError> {
        let metadata = MetadataArgs::try_from_slice(&instruction.data[8..])
            .map_err(|_| InstructionError::InvalidInstructionData)?;
        let tree_config = account_meta(instruction, 0)?;
        let merkle_tree = account_meta(instruction, 3)?;
        let payer = account_meta(instruction, 4)?;
        let tree_creator_or_delegate = account_meta(instruction, 5)?;
        self.check_program_accounts(instruction, 6)?;
        require_writable(tree_config)?;
        require_writable(merkle_tree)?;
        require_signer(payer)?;
        require_signer(tree_creator_or_delegate)?;

        let (expected, _) = derive_tree_config_address(self.programs, &merkle_tree.pubkey);
        if tree_config.pubkey != expected {
            return Err(InstructionError::Custom(CONSTRAINT_SEEDS));
        }
        let mut config = self.read_tree_config(&tree_config.pubkey)?;
        if !config.can_mint(&tree_creator_or_delegate.pubkey) {
            return Err(InstructionError::Custom(TREE_AUTHORITY_INCORRECT));
        }
        if config.remaining_capacity() == 0 {
            return Err(InstructionError::Custom(INSUFFICIENT_MINT_CAPACITY));
        }
        if !metadata.creators.is_empty()
            && metadata.creators.iter().map(|c| c.share as u32).sum::<u32>() != 100
        {
            return Err(InstructionError::Custom(CREATOR_SHARE_TOTAL_MUST_BE_100));
        }
        let verified_signers = instruction
            .accounts
            .iter()
            .filter(|meta| meta.is_signer)
            .map(|meta| meta.pubkey)
            .collect::<Vec<_>>();
        if metadata
            .creators
            .iter()
            .any(|c| c.verified && !verified_signers.contains(&c.address))
        {
            return Err(InstructionError::Custom(CREATOR_DID_NOT_VERIFY));
        }

        self.append_leaf(&merkle_tree.pubkey, &tree_config.pubkey)?;
        config.num_minted += 1;
        self.write_tree_config(&tree_config.pubkey, &config)
    }

    fn check_program_accounts(
        &self,
        instruction: &Instruction,
        offset: usize,
    ) -> Result<(), InstructionError> {
        let expected = [
            self.programs.noop,
            self.programs.account_compression,
            self.programs.system_program,
        ];
        for (i, program) in expected.iter().enumerate() {
            if account_meta(instruction, offset + i)?.pubkey != *program {
                return Err(InstructionError::IncorrectProgramId);
            }
        }
        Ok(())
    }

    fn create_account(
        &mut self,
        funder: &Pubkey,
        address: &Pubkey,
        lamports: u64,
        space: usize,
        owner: &Pubkey,
    ) -> Result<(), InstructionError> {
        if let Some(existing) = self.accounts.get(address) {
            if existing.lamports > 0 || !existing.data.is_empty() {
                return Err(InstructionError::Custom(ACCOUNT_ALREADY_IN_USE));
            }
        }
        if lamports < self.rent.minimum_balance(space) {
            return Err(InstructionError::InsufficientFunds);
        }
        self.debit(funder, lamports)?;
        self.accounts
            .insert(*address, Account::new(lamports, space, owner));
        Ok(())
    }

    fn debit(&mut self, address: &Pubkey, lamports: u64) -> Result<(), InstructionError> {
        let account = self
            .accounts
            .get_mut(address)
            .ok_or(InstructionError::Custom(RESULT_WITH_NEGATIVE_LAMPORTS))?;
        account.lamports = account
            .lamports
            .checked_sub(lamports)
            .ok_or(InstructionError::Custom(RESULT_WITH_NEGATIVE_LAMPORTS))?;
        Ok(())
    }

    fn init_merkle_tree(
        &mut self,
        merkle_tree: &AccountMeta,
        authority: &Pubkey,
        max_depth: u32,
        max_buffer_size: u32,
    ) -> Result<(), InstructionError> {
        require_writable(merkle_tree)?;
        let slot = self.slot;
        let compression = self.programs.account_compression;
        let account = self
            .accounts
            .get_mut(&merkle_tree.pubkey)
            .ok_or(InstructionError::UninitializedAccount)?;
        if account.owner != compression {
            return Err(InstructionError::IncorrectProgramId);
        }
        if account.data.iter().any(|byte| *byte != 0) {
            return Err(InstructionError::AccountAlreadyInitialized);
        }
        let fits = (0..=max_depth).any(|canopy_depth| {
            merkle_tree_account_size(max_depth, max_buffer_size, canopy_depth)
                .map(|size| size == account.data.len())
                .unwrap_or(false)
        });
        if !fits {
            return Err(InstructionError::InvalidAccountData);
        }
        let data = &mut account.data;
        data[0] = MERKLE_TREE_ACCOUNT_TYPE;
        write_bytes(data, HEADER_MAX_BUFFER_SIZE, &max_buffer_size.to_le_bytes());
        write_bytes(data, HEADER_MAX_DEPTH, &max_depth.to_le_bytes());
        write_bytes(data, HEADER_AUTHORITY, authority.as_ref());
        write_bytes(data, HEADER_CREATION_SLOT, &slot.to_le_bytes());
        write_bytes(data, TREE_BUFFER_SIZE, &1u64.to_le_bytes());
        Ok(())
    }

    fn append_leaf(&mut self, merkle_tree: &Pubkey, authority: &Pubkey) -> Result<(), InstructionError> {
        let compression = self.programs.account_compression;
        let account = self
            .accounts
            .get_mut(merkle_tree)
            .ok_or(InstructionError::UninitializedAccount)?;
        if account.owner != compression {
            return Err(InstructionError::IncorrectProgramId);
        }
        if account.data.first() != Some(&MERKLE_TREE_ACCOUNT_TYPE) {
            return Err(InstructionError::UninitializedAccount);
        }
        if &account.data[HEADER_AUTHORITY..HEADER_AUTHORITY + 32] != authority.as_ref() {
            return Err(InstructionError::IncorrectAuthority);
        }
        let sequence_number = read_u64(&account.data, TREE_SEQUENCE_NUMBER) + 1;
        write_bytes(
            &mut account.data,
            TREE_SEQUENCE_NUMBER,
            &sequence_number.to_le_bytes(),
        );
        Ok(())
    }

    fn read_tree_config(&self, address: &Pubkey) -> Result<TreeConfig, InstructionError> {
        let account = self
            .accounts
            .get(address)
            .ok_or(InstructionError::Custom(ACCOUNT_NOT_INITIALIZED))?;
        if account.owner != self.programs.bubblegum {
            return Err(InstructionError::Custom(ACCOUNT_OWNED_BY_WRONG_PROGRAM));
        }
        TreeConfig::try_deserialize(&account.data).map_err(|_| InstructionError::InvalidAccountData)
    }

    fn write_tree_config(
        &mut self,
        address: &Pubkey,
        config: &TreeConfig,
    ) -> Result<(), InstructionError> {
        let data = config
            .to_account_data()
            .map_err(|_| InstructionError::InvalidAccountData)?;
        let account = self
            .accounts
            .get_mut(address)
            .ok_or(InstructionError::UninitializedAccount)?;
        account.data = data;
        Ok(())
    }
}

/// Sequence number of an initialized Merkle tree account, i.e. the number of
/// leaves appended so far.
pub(crate) fn merkle_tree_sequence_number(data: &[u8]) -> Option<u64> {
    if data.first() != Some(&MERKLE_TREE_ACCOUNT_TYPE) || data.len() < TREE_SEQUENCE_NUMBER + 8 {
        return None;
    }
    Some(read_u64(data, TREE_SEQUENCE_NUMBER))
}

/// Authority stored in the header of an initialized Merkle tree account.
pub(crate) fn merkle_tree_authority(data: &[u8]) -> Option<Pubkey> {
    if data.first() != Some(&MERKLE_TREE_ACCOUNT_TYPE) || data.len() < HEADER_AUTHORITY + 32 {
        return None;
    }
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&data[HEADER_AUTHORITY..HEADER_AUTHORITY + 32]);
    Some(Pubkey::new_from_array(bytes))
}

fn account_meta(instruction: &Instruction, index: usize) -> Result<&AccountMeta, InstructionError> {
    instruction
        .accounts
        .get(index)
        .ok_or(InstructionError::NotEnoughAccountKeys)
}

fn require_signer(meta: &AccountMeta) -> Result<(), InstructionError> {
    if meta.is_signer {
        Ok(())
    } else {
        Err(InstructionError::MissingRequiredSignature)
    }
}

fn require_writable(meta: &AccountMeta) -> Result<(), InstructionError> {
    if meta.is_writable {
        Ok(())
    } else {
        Err(InstructionError::ReadonlyDataModified)
    }
}

fn strip_discriminator<'a>(
    data: &'a [u8],
    discriminator: &[u8; 8],
) -> Result<&'a [u8], InstructionError> {
    if data.len() < discriminator.len() || data[..8] != discriminator[..] {
        return Err(InstructionError::InvalidInstructionData);
    }
    Ok(&data[8..])
}

fn write_bytes(data: &mut [u8], offset: usize, bytes: &[u8]) {
    data[offset..offset + bytes.len()].copy_from_slice(bytes);
}

fn read_u64(data: &[u8], offset: usize) -> u64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&data[offset..offset + 8]);
    u64::from_le_bytes(bytes)
}
