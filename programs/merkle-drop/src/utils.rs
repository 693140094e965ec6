use anchor_lang::{prelude::*, solana_program::{program::invoke_signed, program_memory::sol_memcmp, program_pack::{IsInitialized, Pack}, pubkey::PUBKEY_BYTES}};
use anchor_spl::associated_token::get_associated_token_address_with_program_id;
use anchor_spl::token_interface::{Mint, TokenAccount};

use crate::{AirdropState, MerkleDropError, AIRDROP_STATE_SEED};

pub fn assert_initialized<T: Pack + IsInitialized>(account_info: &AccountInfo) -> Result<T> {
    let account: T = T::unpack_unchecked(&account_info.data.borrow())?;
    if !account.is_initialized() {
        Err(MerkleDropError::UninitializedAccount.into())
    } else {
        Ok(account)
    }
}

/// Token program that owns mints of the given flavor.
pub fn token_program_id(is_token_2022: bool) -> Pubkey {
    if is_token_2022 {
        spl_token_2022::id()
    } else {
        spl_token::id()
    }
}

/// Checks that `ata` is the associated token account of `wallet` for
/// `mint`. Classic token accounts are also checked for content; token-2022
/// accounts only when `initialized` is set.
pub fn assert_is_ata(
    ata: &AccountInfo,
    wallet: &Pubkey,
    mint: &Pubkey,
    is_token_2022: bool,
    initialized: bool,
) -> Result<()> {
    if is_token_2022 {
        if initialized {
            let ata_account: spl_token_2022::state::Account = assert_initialized(ata)?;
            assert_owned_by(ata, &spl_token_2022::id())?;
            assert_keys_equal(ata_account.owner, *wallet)?;
            assert_keys_equal(ata_account.mint, *mint)?;
        }
    } else {
        let ata_account: spl_token::state::Account = assert_initialized(ata)?;
        assert_owned_by(ata, &spl_token::id())?;
        assert_keys_equal(ata_account.owner, *wallet)?;
        assert_keys_equal(ata_account.mint, *mint)?;
    }

    assert_keys_equal(
        get_associated_token_address_with_program_id(wallet, mint, &token_program_id(is_token_2022)),
        *ata.key,
    )
}

pub fn assert_owned_by(account: &AccountInfo, owner: &Pubkey) -> Result<()> {
    if account.owner != owner {
        msg!("Wrong account owner: {} should be {}", account.owner, owner);
        return Err(MerkleDropError::WrongAccountOwner.into());
    }
    Ok(())
}

pub fn assert_keys_equal(key1: Pubkey, key2: Pubkey) -> Result<()> {
    if sol_memcmp(key1.as_ref(), key2.as_ref(), PUBKEY_BYTES) != 0 {
        msg!("Wrong public key: {} should be {}", key1, key2);
        return err!(MerkleDropError::PublicKeyMismatch);
    } else {
        Ok(())
    }
}

pub fn make_ata<'a>(
    ata: AccountInfo<'a>,
    wallet: AccountInfo<'a>,
    mint: AccountInfo<'a>,
    fee_payer: AccountInfo<'a>,
    ata_program: AccountInfo<'a>,
    token_program: AccountInfo<'a>,
    system_program: AccountInfo<'a>,
) -> Result<()> {
    invoke_signed(
        &spl_associated_token_account::instruction::create_associated_token_account(
            fee_payer.key,
            wallet.key,
            mint.key,
            token_program.key,
        ),
        &[
            ata,
            wallet,
            mint,
            fee_payer,
            ata_program,
            system_program,
            token_program,
        ],
        &[],
    )?;

    Ok(())
}

/// Moves `amount` out of the vault, signed by the airdrop state PDA.
///
/// The token program's own errors, insufficient funds included, are
/// returned as is.
pub fn transfer_from_vault<'a>(
    airdrop_state: &Account<'a, AirdropState>,
    airdrop_state_bump: u8,
    vault: &InterfaceAccount<'a, TokenAccount>,
    token_mint: &InterfaceAccount<'a, Mint>,
    destination: AccountInfo<'a>,
    token_program: AccountInfo<'a>,
    amount: u64,
) -> Result<()> {
    let transfer_ix = if airdrop_state.is_token_2022 {
        spl_token_2022::instruction::transfer_checked(
            token_program.key,
            &vault.key(),
            &token_mint.key(),
            destination.key,
            &airdrop_state.key(),
            &[],
            amount,
            token_mint.decimals,
        )?
    } else {
        spl_token::instruction::transfer(
            token_program.key,
            &vault.key(),
            destination.key,
            &airdrop_state.key(),
            &[],
            amount,
        )?
    };

    let token_mint_key = token_mint.key();
    let signer_seeds: &[&[u8]] = &[
        AIRDROP_STATE_SEED,
        token_mint_key.as_ref(),
        airdrop_state.root.as_ref(),
        &[airdrop_state_bump],
    ];

    let mut invoke_args = vec![
        destination,
        vault.to_account_info(),
        token_program,
        airdrop_state.to_account_info(),
    ];

    if airdrop_state.is_token_2022 {
        invoke_args.push(token_mint.to_account_info());
    }

    invoke_signed(&transfer_ix, &invoke_args, &[signer_seeds])?;
    Ok(())
}
