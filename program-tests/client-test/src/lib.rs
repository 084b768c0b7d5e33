//! Fixtures shared by the integration tests.

use cnft_client::telemetry::setup_telemetry;
use cnft_program_test::{CnftProgramTest, ProgramTestConfig};
use cnft_sdk::{Creator, LeafMetadata};
use cnft_token_client::{
    actions::{create_tree, ProvisionedTree},
    instructions::CreateTreeParams,
};
use solana_sdk::{pubkey::Pubkey, signature::Keypair};

pub fn setup() -> (CnftProgramTest, Keypair) {
    setup_telemetry();
    let rpc = CnftProgramTest::new(ProgramTestConfig::default());
    let payer = rpc.get_payer().insecure_clone();
    (rpc, payer)
}

pub async fn provision_tree(rpc: &mut CnftProgramTest, payer: &Keypair) -> ProvisionedTree {
    create_tree(rpc, payer, Keypair::new(), CreateTreeParams::default())
        .await
        .unwrap()
}

pub fn test_metadata(name: &str) -> LeafMetadata {
    LeafMetadata {
        name: name.to_string(),
        symbol: "TCNFT".to_string(),
        uri: "https://example.com/metadata.json".to_string(),
        seller_fee_basis_points: 500,
        creators: None,
        collection: None,
    }
}

pub fn test_metadata_with_creator(name: &str, creator: &Pubkey) -> LeafMetadata {
    LeafMetadata {
        creators: Some(vec![Creator::new(*creator, 100, true)]),
        ..test_metadata(name)
    }
}
