pub mod actions;
pub mod error;
pub mod instructions;

pub use error::TokenClientError;
