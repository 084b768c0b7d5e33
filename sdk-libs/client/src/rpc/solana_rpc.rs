use std::{
    fmt::{Debug, Formatter},
    time::Duration,
};

use async_trait::async_trait;
use solana_client::{nonblocking::rpc_client::RpcClient, rpc_config::RpcSendTransactionConfig};
use solana_sdk::{
    account::Account,
    commitment_config::CommitmentConfig,
    hash::Hash,
    pubkey::Pubkey,
    signature::Signature,
    transaction::Transaction,
};
use solana_transaction_status::TransactionStatus;
use tokio::time::{sleep, Instant};
use tracing::{debug, info};

use crate::{
    config::RpcConnectionConfig,
    rpc::{errors::RpcError, rpc_connection::RpcConnection},
};

const CONFIRMATION_POLL_INTERVAL: Duration = Duration::from_millis(500);
const AIRDROP_CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(30);

pub struct SolanaRpcConnection {
    pub client: RpcClient,
    pub skip_preflight: bool,
}

impl Debug for SolanaRpcConnection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SolanaRpcConnection {{ client: {:?} }}",
            self.client.url()
        )
    }
}

impl SolanaRpcConnection {
    pub fn new(config: RpcConnectionConfig) -> Self {
        let client = RpcClient::new_with_commitment(config.url.to_string(), config.commitment_config);
        Self {
            client,
            skip_preflight: config.skip_preflight,
        }
    }

    /// Polls until `signature` reaches the client commitment, fails on chain,
    /// or `blockhash` expires.
    async fn wait_for_confirmation(
        &self,
        signature: &Signature,
        blockhash: &Hash,
    ) -> Result<(), RpcError> {
        let commitment = self.client.commitment();
        loop {
            if let Some(result) = self
                .client
                .get_signature_status_with_commitment(signature, commitment)
                .await?
            {
                return result.map_err(RpcError::from);
            }
            if !self.client.is_blockhash_valid(blockhash, commitment).await? {
                // The transaction may have landed between the two requests.
                return match self
                    .client
                    .get_signature_status_with_commitment(signature, commitment)
                    .await?
                {
                    Some(result) => result.map_err(RpcError::from),
                    None => Err(RpcError::BlockhashExpired(*signature)),
                };
            }
            sleep(CONFIRMATION_POLL_INTERVAL).await;
        }
    }
}

#[async_trait]
impl RpcConnection for SolanaRpcConnection {
    fn get_url(&self) -> String {
        self.client.url()
    }

    fn commitment_config(&self) -> CommitmentConfig {
        self.client.commitment()
    }

    async fn get_account(&self, address: Pubkey) -> Result<Option<Account>, RpcError> {
        self.client
            .get_account_with_commitment(&address, self.client.commitment())
            .await
            .map(|response| response.value)
            .map_err(RpcError::from)
    }

    async fn get_minimum_balance_for_rent_exemption(
        &self,
        data_len: usize,
    ) -> Result<u64, RpcError> {
        self.client
            .get_minimum_balance_for_rent_exemption(data_len)
            .await
            .map_err(RpcError::from)
    }

    async fn get_latest_blockhash(&mut self) -> Result<Hash, RpcError> {
        self.client
            .get_latest_blockhash()
            .await
            .map_err(RpcError::from)
    }

    async fn get_balance(&self, pubkey: &Pubkey) -> Result<u64, RpcError> {
        self.client.get_balance(pubkey).await.map_err(RpcError::from)
    }

    async fn process_transaction(
        &mut self,
        transaction: Transaction,
    ) -> Result<Signature, RpcError> {
        let signature = self
            .client
            .send_transaction_with_config(
                &transaction,
                RpcSendTransactionConfig {
                    skip_preflight: self.skip_preflight,
                    preflight_commitment: Some(self.client.commitment().commitment),
                    ..Default::default()
                },
            )
            .await?;
        debug!("Sent transaction {}", signature);
        self.wait_for_confirmation(&signature, &transaction.message.recent_blockhash)
            .await?;
        info!(
            "Transaction {} reached {:?}",
            signature,
            self.client.commitment().commitment
        );
        Ok(signature)
    }

    async fn confirm_transaction(&self, signature: Signature) -> Result<bool, RpcError> {
        self.client
            .confirm_transaction_with_commitment(&signature, self.client.commitment())
            .await
            .map(|response| response.value)
            .map_err(RpcError::from)
    }

    async fn get_signature_status(
        &self,
        signature: &Signature,
    ) -> Result<Option<TransactionStatus>, RpcError> {
        let commitment = self.client.commitment();
        let response = self
            .client
            .get_signature_statuses_with_history(&[*signature])
            .await?;
        Ok(response
            .value
            .into_iter()
            .next()
            .flatten()
            .filter(|status| status.satisfies_commitment(commitment)))
    }

    async fn request_airdrop(
        &mut self,
        to: &Pubkey,
        lamports: u64,
    ) -> Result<Signature, RpcError> {
        let signature = self.client.request_airdrop(to, lamports).await?;
        let start_time = Instant::now();
        while start_time.elapsed() < AIRDROP_CONFIRMATION_TIMEOUT {
            if self.confirm_transaction(signature).await? {
                return Ok(signature);
            }
            sleep(CONFIRMATION_POLL_INTERVAL).await;
        }
        Err(RpcError::CustomError(format!(
            "Airdrop {} not confirmed",
            signature
        )))
    }
}
