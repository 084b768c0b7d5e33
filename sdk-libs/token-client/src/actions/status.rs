use cnft_client::rpc::RpcConnection;
use solana_sdk::signature::Signature;
use solana_transaction_status::TransactionStatus;

use crate::error::TokenClientError;

/// Looks up a previously submitted transaction. `None` while it has not
/// reached the connection's commitment.
pub async fn get_transaction_status<R: RpcConnection>(
    rpc: &R,
    signature: &Signature,
) -> Result<Option<TransactionStatus>, TokenClientError> {
    Ok(rpc.get_signature_status(signature).await?)
}
