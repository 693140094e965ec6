use anchor_lang::prelude::*;

pub mod dump;
pub mod ledger;
pub mod merkle;

mod errors;
mod events;
mod processor;
mod state;
mod utils;
pub use crate::errors::*;
pub use crate::events::*;
pub use crate::processor::*;
pub use crate::state::*;
pub use crate::utils::*;

declare_id!("3w7hCuBi17BvtKmqBoQEgP5MyQdzAcVRKUhQzLAJiWMy");

#[program]
pub mod merkle_drop {
    use super::*;

    /// Commits `root` and opens the claim window for `claim_period_weeks`.
    pub fn init(
        ctx: Context<InitializeAirdropState>,
        root: [u8; 32],
        claim_period_weeks: u32,
        is_token_2022: bool,
    ) -> Result<()> {
        handle_init(ctx, root, claim_period_weeks, is_token_2022)
    }

    pub fn claim(
        ctx: Context<Claim>,
        _root: [u8; 32],
        index: u64,
        amount: u64,
        proof: Vec<[u8; 32]>,
    ) -> Result<()> {
        handle_claim(ctx, index, amount, proof)
    }

    /// Sweeps the unclaimed balance to the owner after the deadline.
    pub fn withdraw_from_vault(ctx: Context<WithdrawTokensFromVault>, _root: [u8; 32]) -> Result<()> {
        handle_withdraw_tokens_from_vault(ctx)
    }
}
