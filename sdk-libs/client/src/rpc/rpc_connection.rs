use std::fmt::Debug;

use async_trait::async_trait;
use solana_sdk::{
    account::Account,
    commitment_config::CommitmentConfig,
    hash::Hash,
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    transaction::Transaction,
};
use solana_transaction_status::TransactionStatus;

use crate::rpc::errors::RpcError;

#[async_trait]
pub trait RpcConnection: Send + Sync + Debug + 'static {
    fn get_url(&self) -> String;
    fn commitment_config(&self) -> CommitmentConfig;

    async fn get_account(&self, address: Pubkey) -> Result<Option<Account>, RpcError>;
    async fn get_minimum_balance_for_rent_exemption(
        &self,
        data_len: usize,
    ) -> Result<u64, RpcError>;
    async fn get_latest_blockhash(&mut self) -> Result<Hash, RpcError>;
    async fn get_balance(&self, pubkey: &Pubkey) -> Result<u64, RpcError>;

    /// Submits a signed transaction and waits until it reaches the
    /// configured commitment. Submissions are never retried.
    async fn process_transaction(
        &mut self,
        transaction: Transaction,
    ) -> Result<Signature, RpcError>;

    async fn confirm_transaction(&self, signature: Signature) -> Result<bool, RpcError>;

    /// Status of a past transaction, `None` until it reaches the configured
    /// commitment.
    async fn get_signature_status(
        &self,
        signature: &Signature,
    ) -> Result<Option<TransactionStatus>, RpcError>;

    async fn request_airdrop(&mut self, to: &Pubkey, lamports: u64)
        -> Result<Signature, RpcError>;

    async fn create_and_send_transaction<'a>(
        &'a mut self,
        instructions: &'a [Instruction],
        payer: &'a Pubkey,
        signers: &'a [&'a Keypair],
    ) -> Result<Signature, RpcError> {
        let blockhash = self.get_latest_blockhash().await?;
        let mut transaction = Transaction::new_with_payer(instructions, Some(payer));
        transaction.try_sign(&signers.to_vec(), blockhash)?;
        self.process_transaction(transaction).await
    }
}
