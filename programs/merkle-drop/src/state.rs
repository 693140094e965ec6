use anchor_lang::prelude::*;

pub const AIRDROP_STATE_SEED: &[u8] = b"airdrop_state";
pub const RECEIPT_SEED: &[u8] = b"receipt";

/// State for the verifier
#[account]
pub struct AirdropState {
    /// Owner, the only key allowed to sweep the vault.
    pub authority: Pubkey,
    pub token_mint: Pubkey,
    pub root: [u8; 32],
    /// Unix timestamp at which claiming stops and sweeping opens.
    pub deadline: i64,
    pub is_token_2022: bool,
}

impl AirdropState {
    pub const LEN: usize = 8 + std::mem::size_of::<AirdropState>();
}

/// Receipt for claiming. One per allocation index, so an index can only
/// ever pay out once no matter who submits it.
#[account]
pub struct Receipt {
    pub index: u64,
    pub recipient: Pubkey,
    pub claimed: bool,
}

impl Receipt {
    pub const LEN: usize = 8 + std::mem::size_of::<Receipt>();
}
