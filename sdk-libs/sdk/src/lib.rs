pub mod constants;
pub mod error;
pub mod instructions;
pub mod pda;
pub mod program_ids;
pub mod state;
pub mod types;

pub use cnft_tree_size::{
    compute_required_space, merkle_tree_account_size, DepthSizePair, TreeSizeError,
};
pub use error::CnftSdkError;
pub use pda::{derive_tree_config_address, merkle_tree_address, tree_config_address};
pub use program_ids::{program_ids, set_program_ids, ProgramIds};
pub use state::TreeConfig;
pub use types::{Collection, Creator, LeafMetadata, MetadataArgs};
