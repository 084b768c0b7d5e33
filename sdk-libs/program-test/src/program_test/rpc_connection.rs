use std::sync::atomic::Ordering;

use async_trait::async_trait;
use cnft_client::rpc::{RpcConnection, RpcError};
use solana_sdk::{
    account::Account,
    commitment_config::CommitmentConfig,
    hash::Hash,
    pubkey::Pubkey,
    signature::Signature,
    transaction::Transaction,
};
use solana_transaction_status::TransactionStatus;

use super::cnft_program_test::CnftProgramTest;

#[async_trait]
impl RpcConnection for CnftProgramTest {
    fn get_url(&self) -> String {
        "get_url doesn't make sense for CnftProgramTest".to_string()
    }

    fn commitment_config(&self) -> CommitmentConfig {
        CommitmentConfig::confirmed()
    }

    async fn get_account(&self, address: Pubkey) -> Result<Option<Account>, RpcError> {
        self.account_fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.accounts.get(&address).cloned())
    }

    async fn get_minimum_balance_for_rent_exemption(
        &self,
        data_len: usize,
    ) -> Result<u64, RpcError> {
        Ok(self.rent.minimum_balance(data_len))
    }

    async fn get_latest_blockhash(&mut self) -> Result<Hash, RpcError> {
        Ok(self.new_blockhash())
    }

    async fn get_balance(&self, pubkey: &Pubkey) -> Result<u64, RpcError> {
        Ok(self
            .accounts
            .get(pubkey)
            .map(|account| account.lamports)
            .unwrap_or_default())
    }

    async fn process_transaction(
        &mut self,
        transaction: Transaction,
    ) -> Result<Signature, RpcError> {
        self.transactions.push(transaction.clone());
        self.execute_transaction(&transaction)
    }

    async fn confirm_transaction(&self, signature: Signature) -> Result<bool, RpcError> {
        Ok(self
            .statuses
            .get(&signature)
            .map(|status| status.err.is_none())
            .unwrap_or(false))
    }

    async fn get_signature_status(
        &self,
        signature: &Signature,
    ) -> Result<Option<TransactionStatus>, RpcError> {
        let commitment = self.commitment_config();
        Ok(self
            .statuses
            .get(signature)
            .filter(|status| status.satisfies_commitment(commitment))
            .cloned())
    }

    async fn request_airdrop(
        &mut self,
        to: &Pubkey,
        lamports: u64,
    ) -> Result<Signature, RpcError> {
        if self.failing_airdrops > 0 {
            self.failing_airdrops -= 1;
            return Err(RpcError::CustomError(format!(
                "Airdrop of {} lamports to {} failed",
                lamports, to
            )));
        }
        let system_program = self.programs.system_program;
        self.accounts
            .entry(*to)
            .or_insert_with(|| Account::new(0, 0, &system_program))
            .lamports += lamports;
        let signature = Signature::new_unique();
        self.record_success(signature);
        Ok(signature)
    }
}

#[cfg(test)]
mod test {
    use solana_sdk::{
        native_token::LAMPORTS_PER_SOL, signature::Keypair, signer::Signer, system_instruction,
        transaction::TransactionError,
    };

    use super::*;
    use crate::{ProgramTestConfig, LAMPORTS_PER_SIGNATURE};

    #[tokio::test]
    async fn test_transfer_is_executed() {
        let mut rpc = CnftProgramTest::new(ProgramTestConfig::default());
        let payer = rpc.get_payer().insecure_clone();
        let recipient = Pubkey::new_unique();
        let before = rpc.get_balance(&payer.pubkey()).await.unwrap();

        let signature = rpc
            .create_and_send_transaction(
                &[system_instruction::transfer(&payer.pubkey(), &recipient, 1_000)],
                &payer.pubkey(),
                &[&payer],
            )
            .await
            .unwrap();

        assert_eq!(rpc.get_balance(&recipient).await.unwrap(), 1_000);
        assert_eq!(
            rpc.get_balance(&payer.pubkey()).await.unwrap(),
            before - 1_000 - LAMPORTS_PER_SIGNATURE
        );
        assert!(rpc.confirm_transaction(signature).await.unwrap());
        let status = rpc.get_signature_status(&signature).await.unwrap().unwrap();
        assert!(status.status.is_ok());
    }

    #[tokio::test]
    async fn test_failed_transaction_is_rolled_back_but_pays_fee() {
        let mut rpc = CnftProgramTest::new(ProgramTestConfig::default());
        let payer = rpc.get_payer().insecure_clone();
        let recipient = Pubkey::new_unique();
        let before = rpc.get_balance(&payer.pubkey()).await.unwrap();

        let instructions = [
            system_instruction::transfer(&payer.pubkey(), &recipient, 1_000),
            system_instruction::transfer(&payer.pubkey(), &recipient, 1_000 * LAMPORTS_PER_SOL),
        ];
        let blockhash = rpc.get_latest_blockhash().await.unwrap();
        let transaction = Transaction::new_signed_with_payer(
            &instructions,
            Some(&payer.pubkey()),
            &[&payer],
            blockhash,
        );
        let signature = transaction.signatures[0];
        let result = rpc.process_transaction(transaction).await;

        assert!(matches!(
            result,
            Err(RpcError::TransactionError(ref e))
                if matches!(**e, TransactionError::InstructionError(1, _))
        ));
        assert_eq!(rpc.get_balance(&recipient).await.unwrap(), 0);
        assert_eq!(
            rpc.get_balance(&payer.pubkey()).await.unwrap(),
            before - LAMPORTS_PER_SIGNATURE
        );
        assert_eq!(rpc.transactions().len(), 1);
        assert!(!rpc.confirm_transaction(signature).await.unwrap());
        let status = rpc.get_signature_status(&signature).await.unwrap().unwrap();
        assert!(matches!(
            status.err,
            Some(TransactionError::InstructionError(1, _))
        ));
    }

    #[tokio::test]
    async fn test_missing_signer_fails_before_submission() {
        let mut rpc = CnftProgramTest::new(ProgramTestConfig::default());
        let payer = rpc.get_payer().insecure_clone();
        let other = Keypair::new();

        let result = rpc
            .create_and_send_transaction(
                &[system_instruction::transfer(&other.pubkey(), &payer.pubkey(), 1)],
                &payer.pubkey(),
                &[&payer],
            )
            .await;

        assert!(matches!(result, Err(RpcError::Signer(_))));
        assert!(rpc.transactions().is_empty());
    }

    #[tokio::test]
    async fn test_expired_blockhash() {
        let mut rpc = CnftProgramTest::new(ProgramTestConfig::default());
        let payer = rpc.get_payer().insecure_clone();
        let blockhash = rpc.get_latest_blockhash().await.unwrap();
        rpc.expire_blockhashes();
        let transaction = Transaction::new_signed_with_payer(
            &[system_instruction::transfer(&payer.pubkey(), &Pubkey::new_unique(), 1)],
            Some(&payer.pubkey()),
            &[&payer],
            blockhash,
        );

        let result = rpc.process_transaction(transaction).await;
        assert!(matches!(
            result,
            Err(RpcError::TransactionError(ref e)) if **e == TransactionError::BlockhashNotFound
        ));
    }

    #[tokio::test]
    async fn test_failing_airdrops() {
        let mut rpc =
            CnftProgramTest::new(ProgramTestConfig::default().with_failing_airdrops(1));
        let recipient = Pubkey::new_unique();

        assert!(rpc.request_airdrop(&recipient, 10).await.is_err());
        let signature = rpc.request_airdrop(&recipient, 10).await.unwrap();
        assert!(rpc.confirm_transaction(signature).await.unwrap());
        assert_eq!(rpc.get_balance(&recipient).await.unwrap(), 10);
    }
}
