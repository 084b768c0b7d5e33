mod airdrop;
mod create_tree;
mod mint;
mod status;

pub use airdrop::*;
pub use create_tree::*;
pub use mint::*;
pub use status::*;
