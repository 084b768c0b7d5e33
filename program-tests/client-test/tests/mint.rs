use borsh::BorshDeserialize;
use client_test::{provision_tree, setup, test_metadata, test_metadata_with_creator};
use cnft_client::rpc::{assert_rpc_error, RpcConnection, RpcError};
use cnft_program_test::error_codes::CREATOR_DID_NOT_VERIFY;
use cnft_sdk::{
    constants::{MINT_V1_DISCRIMINATOR, TREE_CONFIG_SIZE},
    derive_tree_config_address, program_ids, tree_config_address, CnftSdkError, Collection,
    Creator, LeafMetadata, MetadataArgs,
};
use cnft_token_client::{
    actions::{get_transaction_status, mint_compressed_nft, mint_compressed_nft_batch},
    instructions::{create_mint_instruction, create_mint_instructions, fetch_tree_config},
    TokenClientError,
};
use solana_sdk::{account::Account, pubkey::Pubkey, signature::Keypair, signer::Signer};

fn decode_metadata(data: &[u8]) -> MetadataArgs {
    assert_eq!(&data[..8], &MINT_V1_DISCRIMINATOR);
    MetadataArgs::try_from_slice(&data[8..]).unwrap()
}

#[tokio::test]
async fn test_provision_and_mint() {
    let (mut rpc, payer) = setup();
    let tree = provision_tree(&mut rpc, &payer).await;
    let leaf_owner = Pubkey::new_unique();
    let metadata = test_metadata_with_creator("Test Compressed NFT", &payer.pubkey());

    let signature = mint_compressed_nft(
        &mut rpc,
        &payer,
        &tree.tree_config,
        &tree.merkle_tree,
        &leaf_owner,
        &metadata,
    )
    .await
    .unwrap();

    let status = get_transaction_status(&rpc, &signature)
        .await
        .unwrap()
        .unwrap();
    assert!(status.err.is_none());
    assert_eq!(rpc.leaf_count(&tree.merkle_tree), Some(1));
    let config = fetch_tree_config(&rpc, &tree.tree_config).await.unwrap();
    assert_eq!(config.num_minted, 1);

    let transaction = rpc.transactions().last().unwrap();
    assert_eq!(transaction.signatures.len(), 1);
    let args = decode_metadata(&transaction.message.instructions[0].data);
    assert_eq!(args, metadata.to_metadata_args());
}

#[tokio::test]
async fn test_mint_instruction_without_creators() {
    let (mut rpc, payer) = setup();
    let tree = provision_tree(&mut rpc, &payer).await;
    let leaf_owner = Pubkey::new_unique();

    let instruction = create_mint_instruction(
        &rpc,
        &payer.pubkey(),
        &tree.tree_config,
        &tree.merkle_tree,
        &leaf_owner,
        &test_metadata("Test Compressed NFT"),
    )
    .await
    .unwrap();

    let args = decode_metadata(&instruction.data);
    assert_eq!(args.seller_fee_basis_points, 500);
    assert!(args.creators.is_empty());
    assert_eq!(args.collection, None);
    assert_eq!(args.uses, None);

    let programs = program_ids();
    assert_eq!(instruction.program_id, programs.bubblegum);
    assert_eq!(instruction.accounts[0].pubkey, tree.tree_config);
    assert_eq!(instruction.accounts[1].pubkey, leaf_owner);
    assert_eq!(instruction.accounts[2].pubkey, leaf_owner);
    assert_eq!(instruction.accounts[3].pubkey, tree.merkle_tree);
    assert_eq!(instruction.accounts[4].pubkey, payer.pubkey());
    // Decoded tree authority signs as creator or delegate.
    assert_eq!(instruction.accounts[5].pubkey, payer.pubkey());
    assert!(instruction.accounts[5].is_signer);
    let auxiliary: Vec<Pubkey> = instruction.accounts[6..]
        .iter()
        .map(|meta| meta.pubkey)
        .collect();
    assert_eq!(
        auxiliary,
        vec![
            programs.noop,
            programs.account_compression,
            programs.system_program,
            programs.token_metadata,
        ]
    );
}

#[tokio::test]
async fn test_mint_with_collection() {
    let (mut rpc, payer) = setup();
    let tree = provision_tree(&mut rpc, &payer).await;
    let collection = Collection::unverified(Pubkey::new_unique());
    let metadata = LeafMetadata {
        collection: Some(collection),
        creators: Some(vec![
            Creator::new(payer.pubkey(), 60, true),
            Creator::unverified(Pubkey::new_unique(), 40),
        ]),
        ..test_metadata("Collection Item")
    };

    mint_compressed_nft(
        &mut rpc,
        &payer,
        &tree.tree_config,
        &tree.merkle_tree,
        &payer.pubkey(),
        &metadata,
    )
    .await
    .unwrap();

    let args = decode_metadata(&rpc.transactions().last().unwrap().message.instructions[0].data);
    assert_eq!(args.collection, Some(collection));
    assert_eq!(args.creators.len(), 2);
}

#[tokio::test]
async fn test_missing_tree_config_fails_without_submission() {
    let (mut rpc, payer) = setup();
    let merkle_tree = Pubkey::new_unique();
    let tree_config = tree_config_address(&merkle_tree);

    let result = mint_compressed_nft(
        &mut rpc,
        &payer,
        &tree_config,
        &merkle_tree,
        &payer.pubkey(),
        &test_metadata("Missing"),
    )
    .await;

    assert!(matches!(
        result,
        Err(TokenClientError::TreeConfigNotFound(address)) if address == tree_config
    ));
    assert_eq!(rpc.account_fetches(), 1);
    assert!(rpc.transactions().is_empty());
}

#[tokio::test]
async fn test_tree_config_owner_and_schema_checks() {
    let (mut rpc, payer) = setup();
    let merkle_tree = Pubkey::new_unique();
    let tree_config = tree_config_address(&merkle_tree);

    rpc.set_account(
        tree_config,
        Account::new(1_000_000, TREE_CONFIG_SIZE, &Pubkey::new_unique()),
    );
    assert!(matches!(
        fetch_tree_config(&rpc, &tree_config).await,
        Err(TokenClientError::TreeConfigOwnerMismatch { .. })
    ));

    // Bubblegum owned but with a foreign discriminator.
    let mut account = Account::new(1_000_000, TREE_CONFIG_SIZE, &program_ids().bubblegum);
    account.data[..8].copy_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]);
    rpc.set_account(tree_config, account);
    let result = mint_compressed_nft(
        &mut rpc,
        &payer,
        &tree_config,
        &merkle_tree,
        &payer.pubkey(),
        &test_metadata("Drift"),
    )
    .await;
    assert!(matches!(
        result,
        Err(TokenClientError::Sdk(
            CnftSdkError::AccountDiscriminatorMismatch { .. }
        ))
    ));

    rpc.set_account(
        tree_config,
        Account::new(1_000_000, 4, &program_ids().bubblegum),
    );
    assert!(matches!(
        fetch_tree_config(&rpc, &tree_config).await,
        Err(TokenClientError::Sdk(
            CnftSdkError::AccountDiscriminatorNotFound(4)
        ))
    ));
    assert!(rpc.transactions().is_empty());
}

#[tokio::test]
async fn test_invalid_metadata_fails_before_network() {
    let (mut rpc, payer) = setup();
    let tree = provision_tree(&mut rpc, &payer).await;
    let fetches = rpc.account_fetches();
    let submitted = rpc.transactions().len();

    let metadata = LeafMetadata {
        seller_fee_basis_points: 10_001,
        ..test_metadata("Too expensive")
    };
    let result = mint_compressed_nft(
        &mut rpc,
        &payer,
        &tree.tree_config,
        &tree.merkle_tree,
        &payer.pubkey(),
        &metadata,
    )
    .await;

    assert!(matches!(
        result,
        Err(TokenClientError::Sdk(CnftSdkError::InvalidMetadata(_)))
    ));
    assert_eq!(rpc.account_fetches(), fetches);
    assert_eq!(rpc.transactions().len(), submitted);
}

#[tokio::test]
async fn test_batch_mint() {
    let (mut rpc, payer) = setup();
    let tree = provision_tree(&mut rpc, &payer).await;
    let leaf_owner = Pubkey::new_unique();
    let batch: Vec<LeafMetadata> = (0..3)
        .map(|i| test_metadata(&format!("Batch NFT #{}", i)))
        .collect();

    let fetches = rpc.account_fetches();
    let instructions = create_mint_instructions(
        &rpc,
        &payer.pubkey(),
        &tree.tree_config,
        &tree.merkle_tree,
        &leaf_owner,
        &batch,
    )
    .await
    .unwrap();
    assert_eq!(rpc.account_fetches(), fetches + 1);
    assert_eq!(instructions.len(), batch.len());
    for (instruction, metadata) in instructions.iter().zip(batch.iter()) {
        assert_eq!(decode_metadata(&instruction.data).name, metadata.name);
    }

    let fetches = rpc.account_fetches();
    let submitted = rpc.transactions().len();
    mint_compressed_nft_batch(
        &mut rpc,
        &payer,
        &tree.tree_config,
        &tree.merkle_tree,
        &leaf_owner,
        &batch,
    )
    .await
    .unwrap();
    assert_eq!(rpc.account_fetches(), fetches + 1);
    assert_eq!(rpc.transactions().len(), submitted + 1);

    let transaction = rpc.transactions().last().unwrap();
    let names: Vec<String> = transaction
        .message
        .instructions
        .iter()
        .map(|instruction| decode_metadata(&instruction.data).name)
        .collect();
    assert_eq!(
        names,
        vec!["Batch NFT #0", "Batch NFT #1", "Batch NFT #2"]
    );
    assert_eq!(rpc.leaf_count(&tree.merkle_tree), Some(3));
    assert_eq!(
        fetch_tree_config(&rpc, &tree.tree_config)
            .await
            .unwrap()
            .num_minted,
        3
    );
}

#[tokio::test]
async fn test_batch_mint_is_atomic() {
    let (mut rpc, payer) = setup();
    let tree = provision_tree(&mut rpc, &payer).await;
    // The second record claims a verified creator that does not sign.
    let batch = vec![
        test_metadata("Atomic #0"),
        test_metadata_with_creator("Atomic #1", &Pubkey::new_unique()),
        test_metadata("Atomic #2"),
    ];

    let result = mint_compressed_nft_batch(
        &mut rpc,
        &payer,
        &tree.tree_config,
        &tree.merkle_tree,
        &payer.pubkey(),
        &batch,
    )
    .await;

    match result {
        Err(TokenClientError::Rpc(error)) => {
            assert_rpc_error::<()>(Err(error), 1, CREATOR_DID_NOT_VERIFY).unwrap()
        }
        other => panic!("unexpected result {:?}", other),
    }
    assert_eq!(rpc.leaf_count(&tree.merkle_tree), Some(0));
    assert_eq!(
        fetch_tree_config(&rpc, &tree.tree_config)
            .await
            .unwrap()
            .num_minted,
        0
    );
}

#[tokio::test]
async fn test_empty_batch() {
    let (mut rpc, payer) = setup();
    let tree = provision_tree(&mut rpc, &payer).await;
    let fetches = rpc.account_fetches();

    let result = mint_compressed_nft_batch(
        &mut rpc,
        &payer,
        &tree.tree_config,
        &tree.merkle_tree,
        &payer.pubkey(),
        &[],
    )
    .await;

    assert!(matches!(result, Err(TokenClientError::EmptyBatch)));
    assert_eq!(rpc.account_fetches(), fetches);
}

#[tokio::test]
async fn test_foreign_payer_cannot_sign_for_tree_authority() {
    let (mut rpc, payer) = setup();
    let tree = provision_tree(&mut rpc, &payer).await;
    let other = Keypair::new();
    rpc.request_airdrop(&other.pubkey(), 1_000_000_000)
        .await
        .unwrap();
    let submitted = rpc.transactions().len();

    let result = mint_compressed_nft(
        &mut rpc,
        &other,
        &tree.tree_config,
        &tree.merkle_tree,
        &other.pubkey(),
        &test_metadata("Not yours"),
    )
    .await;

    assert!(matches!(
        result,
        Err(TokenClientError::Rpc(RpcError::Signer(_)))
    ));
    assert_eq!(rpc.transactions().len(), submitted);
}

#[tokio::test]
async fn test_tree_config_address_is_stable_across_mints() {
    let (mut rpc, payer) = setup();
    let tree = provision_tree(&mut rpc, &payer).await;
    let before = derive_tree_config_address(program_ids(), &tree.merkle_tree);

    for i in 0..3 {
        mint_compressed_nft(
            &mut rpc,
            &payer,
            &tree.tree_config,
            &tree.merkle_tree,
            &payer.pubkey(),
            &test_metadata(&format!("Stable #{}", i)),
        )
        .await
        .unwrap();
    }

    assert_eq!(
        derive_tree_config_address(program_ids(), &tree.merkle_tree),
        before
    );
    assert_eq!(tree_config_address(&tree.merkle_tree), tree.tree_config);
    assert_eq!(rpc.leaf_count(&tree.merkle_tree), Some(3));
}
