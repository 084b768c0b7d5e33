//! In-memory [`RpcConnection`](cnft_client::rpc::RpcConnection) for offline
//! tests.
//!
//! [`CnftProgramTest`] holds accounts in a map and executes every submitted
//! transaction atomically against a copy of them. It understands the system
//! program, account-compression `init_empty_merkle_tree` and Bubblegum
//! `create_tree` / `mint_v1`, checking the signer, ownership and capacity
//! constraints those programs enforce. Merkle tree contents are not hashed:
//! appends only advance the tree's sequence number.

pub mod program_test;

pub use program_test::{
    processor::error_codes, CnftProgramTest, ProgramTestConfig, LAMPORTS_PER_SIGNATURE,
};
