pub mod config;
pub mod rpc;
pub mod telemetry;

pub use config::{
    load_payer, wallet_path, ConfigError, RetryConfig, RpcConnectionConfig, SolanaRpcUrl,
};
