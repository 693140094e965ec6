use crate::*;
use crate::ledger::deadline_after_weeks;

use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{Mint, TokenAccount, TokenInterface},
};

#[derive(Accounts)]
#[instruction(root: [u8; 32])]
pub struct InitializeAirdropState<'info> {
    /// Becomes the airdrop owner.
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        init,
        seeds = [AIRDROP_STATE_SEED, token_mint.key().as_ref(), root.as_ref()],
        bump,
        space = AirdropState::LEN,
        payer = authority
    )]
    pub airdrop_state: Account<'info, AirdropState>,

    #[account(mint::token_program = spl_token_program)]
    pub token_mint: InterfaceAccount<'info, Mint>,

    /// Funded afterwards by a plain token transfer.
    #[account(
        init,
        payer = authority,
        associated_token::mint = token_mint,
        associated_token::authority = airdrop_state,
        associated_token::token_program = spl_token_program,
    )]
    pub vault: InterfaceAccount<'info, TokenAccount>,

    /// The SPL token program account
    pub spl_token_program: Interface<'info, TokenInterface>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

pub fn handle_init(
    ctx: Context<InitializeAirdropState>,
    root: [u8; 32],
    claim_period_weeks: u32,
    is_token_2022: bool,
) -> Result<()> {
    assert_keys_equal(ctx.accounts.spl_token_program.key(), token_program_id(is_token_2022))?;

    let now = Clock::get()?.unix_timestamp;
    let deadline = deadline_after_weeks(now, claim_period_weeks)?;

    msg!("Root {:02X?}", root);
    msg!("Claiming open until {}", deadline);

    let airdrop_state = &mut ctx.accounts.airdrop_state;
    airdrop_state.root = root;
    airdrop_state.authority = ctx.accounts.authority.key();
    airdrop_state.token_mint = ctx.accounts.token_mint.key();
    airdrop_state.deadline = deadline;
    airdrop_state.is_token_2022 = is_token_2022;

    Ok(())
}
