use std::sync::OnceLock;

use solana_sdk::{pubkey::Pubkey, pubkey::MAX_SEED_LEN, system_program};

use crate::{
    constants::{
        ACCOUNT_COMPRESSION_PROGRAM_ID, BUBBLEGUM_PROGRAM_ID, NOOP_PROGRAM_ID,
        TOKEN_METADATA_PROGRAM_ID,
    },
    error::CnftSdkError,
};

static PROGRAM_IDS: OnceLock<ProgramIds> = OnceLock::new();

/// Addresses of the programs a compressed NFT mint touches.
///
/// Defaults to the deployments shared by mainnet-beta and devnet. A
/// different cluster (e.g. a local validator with redeployed programs) is
/// configured once at startup with [`set_program_ids`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramIds {
    pub bubblegum: Pubkey,
    pub account_compression: Pubkey,
    /// Log wrapper.
    pub noop: Pubkey,
    pub token_metadata: Pubkey,
    pub system_program: Pubkey,
    tree_config_seed_prefix: Vec<u8>,
}

impl Default for ProgramIds {
    fn default() -> Self {
        Self {
            bubblegum: BUBBLEGUM_PROGRAM_ID,
            account_compression: ACCOUNT_COMPRESSION_PROGRAM_ID,
            noop: NOOP_PROGRAM_ID,
            token_metadata: TOKEN_METADATA_PROGRAM_ID,
            system_program: system_program::ID,
            tree_config_seed_prefix: Vec::new(),
        }
    }
}

impl ProgramIds {
    /// Seed prepended to the Merkle tree address when deriving the
    /// TreeConfig PDA. The deployed Bubblegum program uses no prefix.
    pub fn with_tree_config_seed_prefix(
        mut self,
        prefix: impl Into<Vec<u8>>,
    ) -> Result<Self, CnftSdkError> {
        let prefix = prefix.into();
        if prefix.len() > MAX_SEED_LEN {
            return Err(CnftSdkError::InvalidSeed(prefix.len()));
        }
        self.tree_config_seed_prefix = prefix;
        Ok(self)
    }

    pub fn tree_config_seed_prefix(&self) -> &[u8] {
        &self.tree_config_seed_prefix
    }
}

/// Installs the process-wide program ids. Fails if they were already set
/// or already read through [`program_ids`].
pub fn set_program_ids(program_ids: ProgramIds) -> Result<(), CnftSdkError> {
    PROGRAM_IDS
        .set(program_ids)
        .map_err(|_| CnftSdkError::ProgramIdsAlreadySet)
}

pub fn program_ids() -> &'static ProgramIds {
    PROGRAM_IDS.get_or_init(ProgramIds::default)
}

#[test]
fn test_default_program_ids() {
    let ids = ProgramIds::default();
    assert_eq!(ids.bubblegum, BUBBLEGUM_PROGRAM_ID);
    assert_eq!(ids.system_program, Pubkey::default());
    assert!(ids.tree_config_seed_prefix().is_empty());
}

#[test]
fn test_seed_prefix_length() {
    let ids = ProgramIds::default()
        .with_tree_config_seed_prefix(b"tree-config".to_vec())
        .unwrap();
    assert_eq!(ids.tree_config_seed_prefix(), b"tree-config");
    assert_eq!(
        ProgramIds::default().with_tree_config_seed_prefix(vec![0u8; 33]),
        Err(CnftSdkError::InvalidSeed(33))
    );
}
