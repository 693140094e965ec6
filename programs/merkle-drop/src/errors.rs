use anchor_lang::prelude::*;

#[error_code]
pub enum MerkleDropError {
    // 6000
    #[msg("PublicKeyMismatch")]
    PublicKeyMismatch,
    // 6001
    #[msg("UninitializedAccount")]
    UninitializedAccount,
    // 6002
    #[msg("NumericalOverflow")]
    NumericalOverflow,
    // 6003
    #[msg("Wrong account owner")]
    WrongAccountOwner,
    // 6004
    #[msg("Allocation set is empty")]
    EmptyAllocationSet,
    // 6005
    #[msg("Duplicate allocation index")]
    DuplicateIndex,
    // 6006
    #[msg("Claiming has ended")]
    ClaimingEnded,
    // 6007
    #[msg("Index already claimed")]
    AlreadyClaimed,
    // 6008
    #[msg("Invalid merkle proof")]
    InvalidProof,
    // 6009
    #[msg("Airdrop is still active")]
    AirdropIsActive,
    // 6010
    #[msg("Caller is not the airdrop owner")]
    NotOwner,
}
