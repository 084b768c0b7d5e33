use cnft_sdk::{program_ids, ProgramIds};
use solana_sdk::{native_token::LAMPORTS_PER_SOL, rent::Rent};

#[derive(Debug, Clone)]
pub struct ProgramTestConfig {
    pub programs: ProgramIds,
    pub rent: Rent,
    /// Balance of the generated payer.
    pub payer_lamports: u64,
    /// Number of airdrop requests that fail before airdrops succeed.
    pub failing_airdrops: u32,
}

impl Default for ProgramTestConfig {
    fn default() -> Self {
        Self {
            programs: program_ids().clone(),
            rent: Rent::default(),
            payer_lamports: 100 * LAMPORTS_PER_SOL,
            failing_airdrops: 0,
        }
    }
}

impl ProgramTestConfig {
    pub fn with_failing_airdrops(mut self, failing_airdrops: u32) -> Self {
        self.failing_airdrops = failing_airdrops;
        self
    }

    pub fn with_payer_lamports(mut self, payer_lamports: u64) -> Self {
        self.payer_lamports = payer_lamports;
        self
    }
}
