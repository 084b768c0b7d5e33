use borsh::{BorshDeserialize, BorshSerialize};
use solana_sdk::pubkey::Pubkey;

use crate::{
    constants::{
        MAX_CREATOR_LIMIT, MAX_NAME_LENGTH, MAX_SELLER_FEE_BASIS_POINTS, MAX_SYMBOL_LENGTH,
        MAX_URI_LENGTH,
    },
    error::CnftSdkError,
};

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Creator {
    pub address: Pubkey,
    pub verified: bool,
    /// Share of royalties, in percent.
    pub share: u8,
}

impl Creator {
    pub fn new(address: Pubkey, share: u8, verified: bool) -> Self {
        Self {
            address,
            verified,
            share,
        }
    }

    pub fn unverified(address: Pubkey, share: u8) -> Self {
        Self::new(address, share, false)
    }
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collection {
    pub verified: bool,
    pub key: Pubkey,
}

impl Collection {
    pub fn new(key: Pubkey, verified: bool) -> Self {
        Self { verified, key }
    }

    pub fn unverified(key: Pubkey) -> Self {
        Self::new(key, false)
    }
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UseMethod {
    Burn,
    Multiple,
    Single,
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Uses {
    pub use_method: UseMethod,
    pub remaining: u64,
    pub total: u64,
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenStandard {
    NonFungible,
    FungibleAsset,
    Fungible,
    NonFungibleEdition,
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenProgramVersion {
    #[default]
    Original,
    Token2022,
}

/// Metadata as encoded in the Bubblegum `mint_v1` instruction.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct MetadataArgs {
    pub name: String,
    pub symbol: String,
    pub uri: String,
    pub seller_fee_basis_points: u16,
    pub primary_sale_happened: bool,
    pub is_mutable: bool,
    pub edition_nonce: Option<u8>,
    pub token_standard: Option<TokenStandard>,
    pub collection: Option<Collection>,
    pub uses: Option<Uses>,
    pub token_program_version: TokenProgramVersion,
    pub creators: Vec<Creator>,
}

/// Caller supplied description of a single compressed NFT.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LeafMetadata {
    pub name: String,
    pub symbol: String,
    pub uri: String,
    pub seller_fee_basis_points: u16,
    pub creators: Option<Vec<Creator>>,
    pub collection: Option<Collection>,
}

impl LeafMetadata {
    pub fn validate(&self) -> Result<(), CnftSdkError> {
        if self.seller_fee_basis_points > MAX_SELLER_FEE_BASIS_POINTS {
            return Err(CnftSdkError::InvalidMetadata(format!(
                "seller fee basis points {} exceeds {}",
                self.seller_fee_basis_points, MAX_SELLER_FEE_BASIS_POINTS
            )));
        }
        check_length("name", &self.name, MAX_NAME_LENGTH)?;
        check_length("symbol", &self.symbol, MAX_SYMBOL_LENGTH)?;
        check_length("uri", &self.uri, MAX_URI_LENGTH)?;

        if let Some(creators) = &self.creators {
            if creators.len() > MAX_CREATOR_LIMIT {
                return Err(CnftSdkError::InvalidMetadata(format!(
                    "{} creators exceeds the limit of {}",
                    creators.len(),
                    MAX_CREATOR_LIMIT
                )));
            }
            if let Some(creator) = creators.iter().find(|c| c.share > 100) {
                return Err(CnftSdkError::InvalidMetadata(format!(
                    "creator {} has share {} above 100",
                    creator.address, creator.share
                )));
            }
            if !creators.is_empty() {
                let total: u32 = creators.iter().map(|c| c.share as u32).sum();
                if total != 100 {
                    return Err(CnftSdkError::InvalidMetadata(format!(
                        "creator shares total {} instead of 100",
                        total
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn to_metadata_args(&self) -> MetadataArgs {
        MetadataArgs {
            name: self.name.clone(),
            symbol: self.symbol.clone(),
            uri: self.uri.clone(),
            seller_fee_basis_points: self.seller_fee_basis_points,
            primary_sale_happened: false,
            is_mutable: true,
            edition_nonce: None,
            token_standard: Some(TokenStandard::NonFungible),
            collection: self.collection,
            uses: None,
            token_program_version: TokenProgramVersion::Original,
            creators: self.creators.clone().unwrap_or_default(),
        }
    }
}

fn check_length(field: &str, value: &str, max: usize) -> Result<(), CnftSdkError> {
    if value.len() > max {
        return Err(CnftSdkError::InvalidMetadata(format!(
            "{} is {} bytes, maximum is {}",
            field,
            value.len(),
            max
        )));
    }
    Ok(())
}
