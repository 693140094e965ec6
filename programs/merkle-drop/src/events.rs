use anchor_lang::prelude::*;

#[event]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimedAirDrop {
    pub recipient: Pubkey,
    pub amount: u64,
}

#[event]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerWithdraw {
    pub owner: Pubkey,
    pub amount: u64,
}
