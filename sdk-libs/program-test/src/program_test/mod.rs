pub mod config;
mod cnft_program_test;
pub mod processor;
mod rpc_connection;

pub use cnft_program_test::{CnftProgramTest, LAMPORTS_PER_SIGNATURE};
pub use config::ProgramTestConfig;
