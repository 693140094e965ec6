pub mod claim_token;
pub mod initialize_airdrop_state;
pub mod withdraw_tokens_from_vault;

pub use claim_token::*;
pub use initialize_airdrop_state::*;
pub use withdraw_tokens_from_vault::*;
