use solana_sdk::pubkey::Pubkey;

use crate::program_ids::{program_ids, ProgramIds};

/// Derives the TreeConfig PDA of `merkle_tree` under the Bubblegum program.
/// Depends only on the tree address, never on tree contents.
pub fn derive_tree_config_address(programs: &ProgramIds, merkle_tree: &Pubkey) -> (Pubkey, u8) {
    let prefix = programs.tree_config_seed_prefix();
    if prefix.is_empty() {
        Pubkey::find_program_address(&[merkle_tree.as_ref()], &programs.bubblegum)
    } else {
        Pubkey::find_program_address(&[prefix, merkle_tree.as_ref()], &programs.bubblegum)
    }
}

/// [`derive_tree_config_address`] with the process-wide program ids.
pub fn tree_config_address(merkle_tree: &Pubkey) -> Pubkey {
    derive_tree_config_address(program_ids(), merkle_tree).0
}

/// Derives a seed-addressed Merkle tree under the Bubblegum program.
/// Such an address has no private key, so it cannot sign its own allocation.
pub fn merkle_tree_address(programs: &ProgramIds, seed: &str) -> Pubkey {
    Pubkey::find_program_address(&[seed.as_bytes()], &programs.bubblegum).0
}
