use std::{
    collections::{HashMap, HashSet},
    sync::atomic::{AtomicUsize, Ordering},
};

use cnft_client::rpc::RpcError;
use cnft_sdk::{ProgramIds, TreeConfig};
use solana_sdk::{
    account::Account,
    hash::Hash,
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    rent::Rent,
    signature::{Keypair, Signature, Signer},
    transaction::{Transaction, TransactionError},
};
use solana_transaction_status::{TransactionConfirmationStatus, TransactionStatus};
use tracing::debug;

use super::{
    config::ProgramTestConfig,
    processor::{merkle_tree_authority, merkle_tree_sequence_number, Processor},
};

pub const LAMPORTS_PER_SIGNATURE: u64 = 5_000;

#[derive(Debug)]
pub struct CnftProgramTest {
    pub payer: Keypair,
    pub programs: ProgramIds,
    pub(crate) rent: Rent,
    pub(crate) accounts: HashMap<Pubkey, Account>,
    pub(crate) statuses: HashMap<Signature, TransactionStatus>,
    pub(crate) valid_blockhashes: HashSet<Hash>,
    pub(crate) slot: u64,
    pub(crate) failing_airdrops: u32,
    pub(crate) transactions: Vec<Transaction>,
    pub(crate) account_fetches: AtomicUsize,
}

impl CnftProgramTest {
    pub fn new(config: ProgramTestConfig) -> Self {
        let payer = Keypair::new();
        let mut accounts = HashMap::new();
        accounts.insert(
            payer.pubkey(),
            Account::new(config.payer_lamports, 0, &config.programs.system_program),
        );
        Self {
            payer,
            programs: config.programs,
            rent: config.rent,
            accounts,
            statuses: HashMap::new(),
            valid_blockhashes: HashSet::new(),
            slot: 1,
            failing_airdrops: config.failing_airdrops,
            transactions: Vec::new(),
            account_fetches: AtomicUsize::new(0),
        }
    }

    pub fn get_payer(&self) -> &Keypair {
        &self.payer
    }

    pub fn set_account(&mut self, address: Pubkey, account: Account) {
        self.accounts.insert(address, account);
    }

    pub fn account(&self, address: &Pubkey) -> Option<&Account> {
        self.accounts.get(address)
    }

    /// Number of `get_account` requests served so far.
    pub fn account_fetches(&self) -> usize {
        self.account_fetches.load(Ordering::SeqCst)
    }

    /// Every transaction handed to `process_transaction`, including rejected
    /// ones.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Invalidates all blockhashes handed out so far.
    pub fn expire_blockhashes(&mut self) {
        self.valid_blockhashes.clear();
    }

    /// Number of leaves appended to `merkle_tree`.
    pub fn leaf_count(&self, merkle_tree: &Pubkey) -> Option<u64> {
        merkle_tree_sequence_number(&self.accounts.get(merkle_tree)?.data)
    }

    pub fn merkle_tree_authority(&self, merkle_tree: &Pubkey) -> Option<Pubkey> {
        merkle_tree_authority(&self.accounts.get(merkle_tree)?.data)
    }

    pub fn tree_config(&self, address: &Pubkey) -> Option<TreeConfig> {
        TreeConfig::try_deserialize(&self.accounts.get(address)?.data).ok()
    }

    pub(crate) fn new_blockhash(&mut self) -> Hash {
        let blockhash = Hash::new_unique();
        self.valid_blockhashes.insert(blockhash);
        blockhash
    }

    pub(crate) fn record_success(&mut self, signature: Signature) {
        self.record_status(signature, Ok(()));
    }

    fn record_status(&mut self, signature: Signature, status: Result<(), TransactionError>) {
        self.statuses.insert(
            signature,
            TransactionStatus {
                slot: self.slot,
                confirmations: None,
                err: status.clone().err(),
                status,
                confirmation_status: Some(TransactionConfirmationStatus::Finalized),
            },
        );
        self.slot += 1;
    }

    /// Verifies signatures and the blockhash, charges the fee and runs every
    /// instruction against a copy of the accounts. The copy replaces the
    /// accounts only if all instructions succeed; a failed transaction still
    /// pays its fee and is recorded with its error.
    pub(crate) fn execute_transaction(
        &mut self,
        transaction: &Transaction,
    ) -> Result<Signature, RpcError> {
        transaction.verify()?;
        if !self
            .valid_blockhashes
            .contains(&transaction.message.recent_blockhash)
        {
            return Err(TransactionError::BlockhashNotFound.into());
        }
        let signature = transaction
            .signatures
            .first()
            .copied()
            .ok_or(TransactionError::MissingSignatureForFee)?;
        if self.statuses.contains_key(&signature) {
            return Err(TransactionError::AlreadyProcessed.into());
        }

        let message = &transaction.message;
        let fee = LAMPORTS_PER_SIGNATURE * message.header.num_required_signatures as u64;
        let fee_payer = message
            .account_keys
            .first()
            .and_then(|key| self.accounts.get_mut(key))
            .ok_or(TransactionError::AccountNotFound)?;
        fee_payer.lamports = fee_payer
            .lamports
            .checked_sub(fee)
            .ok_or(TransactionError::InsufficientFundsForFee)?;

        // The fee stays charged even if an instruction fails.
        let mut accounts = self.accounts.clone();
        let mut processor = Processor {
            programs: &self.programs,
            rent: &self.rent,
            slot: self.slot,
            accounts: &mut accounts,
        };
        for (index, instruction) in decompile_instructions(transaction).iter().enumerate() {
            if let Err(e) = processor.process(instruction) {
                let error = TransactionError::InstructionError(index as u8, e);
                self.record_status(signature, Err(error.clone()));
                debug!("Transaction {} failed: {:?}", signature, error);
                return Err(error.into());
            }
        }

        self.accounts = accounts;
        self.record_success(signature);
        debug!("Executed transaction {}", signature);
        Ok(signature)
    }
}

fn decompile_instructions(transaction: &Transaction) -> Vec<Instruction> {
    let message = &transaction.message;
    let header = &message.header;
    let num_keys = message.account_keys.len();
    let num_signed = header.num_required_signatures as usize;
    let is_writable = |i: usize| {
        if i < num_signed {
            i < num_signed - header.num_readonly_signed_accounts as usize
        } else {
            i < num_keys - header.num_readonly_unsigned_accounts as usize
        }
    };
    message
        .instructions
        .iter()
        .map(|compiled| Instruction {
            program_id: message.account_keys[compiled.program_id_index as usize],
            accounts: compiled
                .accounts
                .iter()
                .map(|&index| {
                    let index = index as usize;
                    AccountMeta {
                        pubkey: message.account_keys[index],
                        is_signer: index < num_signed,
                        is_writable: is_writable(index),
                    }
                })
                .collect(),
            data: compiled.data.clone(),
        })
        .collect()
}
