#![allow(clippy::result_large_err)]

pub mod errors;
mod rpc_connection;
mod solana_rpc;

pub use errors::{assert_rpc_error, RpcError};
pub use rpc_connection::RpcConnection;
pub use solana_rpc::SolanaRpcConnection;
