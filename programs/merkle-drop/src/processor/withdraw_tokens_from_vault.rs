use crate::*;
use crate::ledger::check_sweep;

use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{Mint, TokenAccount, TokenInterface},
};

#[derive(Accounts)]
#[instruction(root: [u8; 32])]
pub struct WithdrawTokensFromVault<'info> {
    /// Must match the airdrop state authority, checked in the handler so
    /// that an early call reports `AirdropIsActive` first.
    #[account(mut)]
    pub authority: Signer<'info>,

    /// CHECK: checked below
    #[account(mut)]
    pub authority_mint_ata: UncheckedAccount<'info>,

    #[account(mint::token_program = spl_token_program)]
    pub token_mint: InterfaceAccount<'info, Mint>,

    #[account(
        has_one = token_mint,
        seeds = [AIRDROP_STATE_SEED, token_mint.key().as_ref(), root.as_ref()],
        bump,)]
    pub airdrop_state: Account<'info, AirdropState>,

    #[account(mut,
        token::mint = token_mint,
        token::authority = airdrop_state,
        token::token_program = spl_token_program,
    )]
    pub vault: InterfaceAccount<'info, TokenAccount>,

    /// The SPL token program account
    pub spl_token_program: Interface<'info, TokenInterface>,
    pub ata_program: Program<'info, AssociatedToken>,

    pub system_program: Program<'info, System>,
}

pub fn handle_withdraw_tokens_from_vault(ctx: Context<WithdrawTokensFromVault>) -> Result<()> {
    let authority = &ctx.accounts.authority;
    let token_mint = &ctx.accounts.token_mint;
    let authority_mint_ata = &ctx.accounts.authority_mint_ata;
    let airdrop_state = &ctx.accounts.airdrop_state;
    let vault = &ctx.accounts.vault;

    check_sweep(
        airdrop_state.deadline,
        Clock::get()?.unix_timestamp,
        authority.key,
        &airdrop_state.authority,
    )?;

    // The state account stays open, so a second withdraw is a zero transfer.
    let amount = vault.amount;
    msg!("Withdrawing {:#} tokens", amount);

    if authority_mint_ata.data_is_empty() {
        make_ata(
            authority_mint_ata.to_account_info(),
            authority.to_account_info(),
            token_mint.to_account_info(),
            authority.to_account_info(),
            ctx.accounts.ata_program.to_account_info(),
            ctx.accounts.spl_token_program.to_account_info(),
            ctx.accounts.system_program.to_account_info(),
        )?;
    }

    assert_is_ata(
        authority_mint_ata,
        authority.key,
        &token_mint.key(),
        airdrop_state.is_token_2022,
        false,
    )?;
    assert_is_ata(
        &vault.to_account_info(),
        &airdrop_state.key(),
        &token_mint.key(),
        airdrop_state.is_token_2022,
        false,
    )?;

    transfer_from_vault(
        airdrop_state,
        ctx.bumps.airdrop_state,
        vault,
        token_mint,
        authority_mint_ata.to_account_info(),
        ctx.accounts.spl_token_program.to_account_info(),
        amount,
    )?;

    emit!(OwnerWithdraw {
        owner: authority.key(),
        amount,
    });

    Ok(())
}
