use crate::*;
use crate::ledger::check_claim;

use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{Mint, TokenAccount, TokenInterface},
};

#[derive(Accounts)]
#[instruction(root: [u8; 32], index: u64)]
pub struct Claim<'info> {
    /// The recipient. Its key is part of the leaf, so only the listed
    /// wallet can claim its allocation. Also pays for the receipt rent.
    #[account(mut)]
    pub claimant: Signer<'info>,

    /// CHECK: checked below
    #[account(mut)]
    pub claimant_mint_ata: UncheckedAccount<'info>,

    #[account(mint::token_program = spl_token_program)]
    pub token_mint: InterfaceAccount<'info, Mint>,

    #[account(
        init_if_needed,
        seeds = [RECEIPT_SEED, airdrop_state.key().as_ref(), &index.to_le_bytes()],
        bump,
        space = Receipt::LEN,
        payer = claimant
    )]
    pub receipt: Account<'info, Receipt>,

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

pub fn handle_claim(
    ctx: Context<Claim>,
    index: u64,
    amount: u64,
    proof: Vec<[u8; 32]>,
) -> Result<()> {
    let claimant = &ctx.accounts.claimant;
    let token_mint = &ctx.accounts.token_mint;
    let claimant_mint_ata = &ctx.accounts.claimant_mint_ata;
    let airdrop_state = &ctx.accounts.airdrop_state;
    let vault = &ctx.accounts.vault;

    msg!("Index {}", index);
    msg!("Amount {}", amount);
    msg!("Proof length {}", proof.len());

    // This is the actual verification.
    check_claim(
        &airdrop_state.root,
        airdrop_state.deadline,
        Clock::get()?.unix_timestamp,
        ctx.accounts.receipt.claimed,
        claimant.key,
        index,
        amount,
        &proof,
    )?;

    msg!("Claiming {:#} tokens", amount);

    if claimant_mint_ata.data_is_empty() {
        make_ata(
            claimant_mint_ata.to_account_info(),
            claimant.to_account_info(),
            token_mint.to_account_info(),
            claimant.to_account_info(),
            ctx.accounts.ata_program.to_account_info(),
            ctx.accounts.spl_token_program.to_account_info(),
            ctx.accounts.system_program.to_account_info(),
        )?;
    }

    assert_is_ata(
        claimant_mint_ata,
        claimant.key,
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
        claimant_mint_ata.to_account_info(),
        ctx.accounts.spl_token_program.to_account_info(),
        amount,
    )?;

    // The receipt only counts as claimed once the transfer went through.
    let receipt = &mut ctx.accounts.receipt;
    receipt.index = index;
    receipt.recipient = claimant.key();
    receipt.claimed = true;

    emit!(ClaimedAirDrop {
        recipient: claimant.key(),
        amount,
    });

    Ok(())
}
