mod create_tree;
mod mint;

pub use create_tree::*;
pub use mint::*;
