use borsh::{BorshDeserialize, BorshSerialize};
use solana_sdk::pubkey::Pubkey;

use crate::{
    constants::{TREE_CONFIG_DISCRIMINATOR, TREE_CONFIG_SIZE},
    error::CnftSdkError,
};

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecompressibleState {
    #[default]
    Enabled,
    Disabled,
}

/// Bubblegum account governing who may append leaves to a Merkle tree.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeConfig {
    pub tree_creator: Pubkey,
    pub tree_delegate: Pubkey,
    pub total_mint_capacity: u64,
    pub num_minted: u64,
    pub is_public: bool,
    pub is_decompressible: DecompressibleState,
}

impl TreeConfig {
    pub const DISCRIMINATOR: [u8; 8] = TREE_CONFIG_DISCRIMINATOR;

    /// Decodes raw account data. The discriminator is checked before any
    /// field is read; trailing padding is ignored.
    pub fn try_deserialize(data: &[u8]) -> Result<Self, CnftSdkError> {
        if data.len() < Self::DISCRIMINATOR.len() {
            return Err(CnftSdkError::AccountDiscriminatorNotFound(data.len()));
        }
        let (discriminator, mut body) = data.split_at(Self::DISCRIMINATOR.len());
        if discriminator != Self::DISCRIMINATOR {
            let mut actual = [0u8; 8];
            actual.copy_from_slice(discriminator);
            return Err(CnftSdkError::AccountDiscriminatorMismatch {
                expected: Self::DISCRIMINATOR,
                actual,
            });
        }
        Self::deserialize(&mut body)
            .map_err(|e| CnftSdkError::AccountDidNotDeserialize(e.to_string()))
    }

    /// Account data as Bubblegum lays it out, padded to [`TREE_CONFIG_SIZE`].
    pub fn to_account_data(&self) -> Result<Vec<u8>, CnftSdkError> {
        let mut data = Vec::with_capacity(TREE_CONFIG_SIZE);
        data.extend_from_slice(&Self::DISCRIMINATOR);
        self.serialize(&mut data)
            .map_err(|e| CnftSdkError::Serialization(e.to_string()))?;
        data.resize(TREE_CONFIG_SIZE, 0);
        Ok(data)
    }

    /// Key that signs mints as tree creator or delegate.
    pub fn authority(&self) -> Pubkey {
        self.tree_creator
    }

    pub fn remaining_capacity(&self) -> u64 {
        self.total_mint_capacity.saturating_sub(self.num_minted)
    }

    pub fn can_mint(&self, signer: &Pubkey) -> bool {
        self.is_public || *signer == self.tree_creator || *signer == self.tree_delegate
    }
}
