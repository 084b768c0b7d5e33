use std::{
    env,
    fmt::{Display, Formatter},
    path::PathBuf,
    str::FromStr,
    time::Duration,
};

use solana_sdk::{
    commitment_config::CommitmentConfig,
    signature::{read_keypair_file, Keypair, Signature},
};
use thiserror::Error;

pub const RPC_URL_ENV: &str = "CNFT_RPC_URL";
pub const COMMITMENT_ENV: &str = "CNFT_COMMITMENT";
pub const SKIP_PREFLIGHT_ENV: &str = "CNFT_SKIP_PREFLIGHT";
pub const WALLET_ENV: &str = "ANCHOR_WALLET";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unknown commitment level: {0}")]
    InvalidCommitment(String),
    #[error("Invalid boolean for {name}: {value}")]
    InvalidBool { name: String, value: String },
    #[error("Invalid rpc url: {0}")]
    InvalidUrl(String),
    #[error("Neither ANCHOR_WALLET nor HOME is set")]
    WalletPathNotFound,
    #[error("Failed to read keypair from {path}: {message}")]
    Keypair { path: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolanaRpcUrl {
    Mainnet,
    Devnet,
    Testnet,
    Localnet,
    Custom(String),
}

impl Display for SolanaRpcUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let str = match self {
            SolanaRpcUrl::Mainnet => "https://api.mainnet-beta.solana.com",
            SolanaRpcUrl::Devnet => "https://api.devnet.solana.com",
            SolanaRpcUrl::Testnet => "https://api.testnet.solana.com",
            SolanaRpcUrl::Localnet => "http://localhost:8899",
            SolanaRpcUrl::Custom(url) => url.as_str(),
        };
        write!(f, "{}", str)
    }
}

impl FromStr for SolanaRpcUrl {
    type Err = ConfigError;

    /// Accepts a cluster name or an http(s) url.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "mainnet" | "mainnet-beta" => Ok(SolanaRpcUrl::Mainnet),
            "devnet" => Ok(SolanaRpcUrl::Devnet),
            "testnet" => Ok(SolanaRpcUrl::Testnet),
            "localnet" | "localhost" => Ok(SolanaRpcUrl::Localnet),
            url if url.starts_with("http://") || url.starts_with("https://") => {
                Ok(SolanaRpcUrl::Custom(url.to_string()))
            }
            other => Err(ConfigError::InvalidUrl(other.to_string())),
        }
    }
}

impl SolanaRpcUrl {
    /// Solana explorer link for a transaction on this cluster.
    pub fn explorer_transaction_url(&self, signature: &Signature) -> String {
        let cluster = match self {
            SolanaRpcUrl::Mainnet => String::new(),
            SolanaRpcUrl::Devnet => "?cluster=devnet".to_string(),
            SolanaRpcUrl::Testnet => "?cluster=testnet".to_string(),
            SolanaRpcUrl::Localnet => "?cluster=custom&customUrl=http%3A%2F%2Flocalhost%3A8899"
                .to_string(),
            SolanaRpcUrl::Custom(url) => format!("?cluster=custom&customUrl={}", url),
        };
        format!("https://explorer.solana.com/tx/{}{}", signature, cluster)
    }
}

#[derive(Debug, Clone)]
pub struct RpcConnectionConfig {
    pub url: SolanaRpcUrl,
    pub commitment_config: CommitmentConfig,
    pub skip_preflight: bool,
}

impl Default for RpcConnectionConfig {
    fn default() -> Self {
        Self {
            url: SolanaRpcUrl::Devnet,
            commitment_config: CommitmentConfig::confirmed(),
            skip_preflight: false,
        }
    }
}

impl RpcConnectionConfig {
    pub fn new(url: SolanaRpcUrl) -> Self {
        Self {
            url,
            ..Default::default()
        }
    }

    /// Overrides defaults with `CNFT_RPC_URL`, `CNFT_COMMITMENT` and
    /// `CNFT_SKIP_PREFLIGHT` when set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Ok(url) = env::var(RPC_URL_ENV) {
            config.url = url.parse()?;
        }
        if let Ok(commitment) = env::var(COMMITMENT_ENV) {
            config.commitment_config = CommitmentConfig::from_str(commitment.trim())
                .map_err(|_| ConfigError::InvalidCommitment(commitment))?;
        }
        if let Ok(value) = env::var(SKIP_PREFLIGHT_ENV) {
            config.skip_preflight = match value.trim() {
                "1" | "true" => true,
                "0" | "false" => false,
                _ => {
                    return Err(ConfigError::InvalidBool {
                        name: SKIP_PREFLIGHT_ENV.to_string(),
                        value,
                    })
                }
            };
        }
        Ok(config)
    }
}

/// Bounded retry with fixed backoff. Only funding helpers retry.
#[derive(Clone, Debug, Copy)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub retry_delay: Duration,
    pub timeout: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        RetryConfig {
            max_retries: 3,
            retry_delay: Duration::from_secs(2),
            timeout: Duration::from_secs(60),
        }
    }
}

/// `ANCHOR_WALLET`, else the Solana CLI default keypair.
pub fn wallet_path() -> Result<PathBuf, ConfigError> {
    if let Ok(path) = env::var(WALLET_ENV) {
        return Ok(PathBuf::from(path));
    }
    let home = env::var("HOME").map_err(|_| ConfigError::WalletPathNotFound)?;
    Ok(PathBuf::from(home).join(".config/solana/id.json"))
}

pub fn load_payer(path: &std::path::Path) -> Result<Keypair, ConfigError> {
    read_keypair_file(path).map_err(|e| ConfigError::Keypair {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}
