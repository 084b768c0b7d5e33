use cnft_client::{rpc::RpcConnection, RetryConfig};
use solana_sdk::{pubkey::Pubkey, signature::Signature};
use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

use crate::error::TokenClientError;

/// Requests an airdrop, retrying failures with a fixed delay until
/// `max_retries` or `timeout` is reached.
pub async fn airdrop_with_retry<R: RpcConnection>(
    rpc: &mut R,
    to: &Pubkey,
    lamports: u64,
    retry_config: RetryConfig,
) -> Result<Signature, TokenClientError> {
    let mut attempts = 0;
    let start_time = Instant::now();
    loop {
        match rpc.request_airdrop(to, lamports).await {
            Ok(signature) => return Ok(signature),
            Err(e) => {
                attempts += 1;
                if attempts > retry_config.max_retries
                    || start_time.elapsed() >= retry_config.timeout
                {
                    return Err(e.into());
                }
                warn!(
                    "Airdrop failed, retrying in {:?} (attempt {}/{}): {:?}",
                    retry_config.retry_delay, attempts, retry_config.max_retries, e
                );
                sleep(retry_config.retry_delay).await;
            }
        }
    }
}

/// Airdrops `airdrop_lamports` to `pubkey` when its balance is below
/// `min_lamports`. Returns the airdrop signature if one was needed.
pub async fn ensure_balance<R: RpcConnection>(
    rpc: &mut R,
    pubkey: &Pubkey,
    min_lamports: u64,
    airdrop_lamports: u64,
    retry_config: RetryConfig,
) -> Result<Option<Signature>, TokenClientError> {
    let balance = rpc.get_balance(pubkey).await?;
    if balance >= min_lamports {
        debug!("{} holds {} lamports, no airdrop needed", pubkey, balance);
        return Ok(None);
    }
    airdrop_with_retry(rpc, pubkey, airdrop_lamports, retry_config)
        .await
        .map(Some)
}
