//! Claim window rules and an in-process claim ledger.
//!
//! The on-chain program and [`ClaimLedger`] run the same admission checks below.
//! [`ClaimLedger`] is the same state machine for hosts that do not run on a
//! serially ordered chain: it takes `&mut self` for every transition, so
//! wrapping it in a `Mutex` is enough to keep check-then-mark atomic.

use std::collections::BTreeSet;

use anchor_lang::prelude::*;

use crate::events::{ClaimedAirDrop, OwnerWithdraw};
use crate::merkle::{leaf_hash, verify_proof, Hash};
use crate::MerkleDropError;

pub const ONE_WEEK: i64 = 7 * 24 * 3600;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropPhase {
    /// `now < deadline`: claims accepted, sweep refused.
    Active,
    /// `now >= deadline`: claims refused, sweep allowed.
    Expired,
}

impl DropPhase {
    pub fn at(deadline: i64, now: i64) -> Self {
        if now < deadline {
            DropPhase::Active
        } else {
            DropPhase::Expired
        }
    }
}

/// `start + weeks * ONE_WEEK`, failing on overflow.
pub fn deadline_after_weeks(start: i64, weeks: u32) -> Result<i64> {
    i64::from(weeks)
        .checked_mul(ONE_WEEK)
        .and_then(|window| start.checked_add(window))
        .ok_or_else(|| error!(MerkleDropError::NumericalOverflow))
}

/// Admission rules for a claim, in the order they are reported:
/// window closed, index already paid, leaf not under `root`.
///
/// `caller` is the authenticated claimant and is hashed into the leaf, so
/// nobody can claim an allocation on another key's behalf.
#[allow(clippy::too_many_arguments)]
pub fn check_claim(
    root: &Hash,
    deadline: i64,
    now: i64,
    already_claimed: bool,
    caller: &Pubkey,
    index: u64,
    amount: u64,
    proof: &[Hash],
) -> Result<()> {
    require!(
        DropPhase::at(deadline, now) == DropPhase::Active,
        MerkleDropError::ClaimingEnded
    );
    require!(!already_claimed, MerkleDropError::AlreadyClaimed);

    let leaf = leaf_hash(caller, index, amount);
    require!(
        verify_proof(proof, root, &leaf),
        MerkleDropError::InvalidProof
    );
    Ok(())
}

/// Admission rules for a sweep: the window must be closed, then the
/// caller must be the owner.
pub fn check_sweep(deadline: i64, now: i64, caller: &Pubkey, owner: &Pubkey) -> Result<()> {
    require!(
        DropPhase::at(deadline, now) == DropPhase::Expired,
        MerkleDropError::AirdropIsActive
    );
    require_keys_eq!(*caller, *owner, MerkleDropError::NotOwner);
    Ok(())
}

/// Source of the current unix timestamp.
pub trait TimeSource {
    fn now(&self) -> i64;
}

/// Token account the ledger pays out of.
///
/// `transfer` must either move the full amount or fail without effect;
/// its errors reach the caller untouched.
pub trait TokenVault {
    fn token(&self) -> Pubkey;
    fn balance(&self) -> u64;
    fn transfer(&mut self, to: &Pubkey, amount: u64) -> Result<()>;
}

pub struct ClaimLedger<V, T> {
    root: Hash,
    deadline: i64,
    owner: Pubkey,
    claimed: BTreeSet<u64>,
    vault: V,
    clock: T,
}

impl<V: TokenVault, T: TimeSource> ClaimLedger<V, T> {
    pub fn new(root: Hash, deadline: i64, owner: Pubkey, vault: V, clock: T) -> Self {
        Self {
            root,
            deadline,
            owner,
            claimed: BTreeSet::new(),
            vault,
            clock,
        }
    }

    pub fn root(&self) -> Hash {
        self.root
    }

    pub fn deadline(&self) -> i64 {
        self.deadline
    }

    pub fn owner(&self) -> Pubkey {
        self.owner
    }

    pub fn token(&self) -> Pubkey {
        self.vault.token()
    }

    pub fn vault(&self) -> &V {
        &self.vault
    }

    pub fn phase(&self) -> DropPhase {
        DropPhase::at(self.deadline, self.clock.now())
    }

    pub fn is_claimed(&self, index: u64) -> bool {
        self.claimed.contains(&index)
    }

    pub fn claimed_count(&self) -> usize {
        self.claimed.len()
    }

    /// Pays `amount` to `caller` for allocation `index`. See [`check_claim`].
    pub fn claim(
        &mut self,
        caller: &Pubkey,
        proof: &[Hash],
        index: u64,
        amount: u64,
    ) -> Result<ClaimedAirDrop> {
        check_claim(
            &self.root,
            self.deadline,
            self.clock.now(),
            self.claimed.contains(&index),
            caller,
            index,
            amount,
            proof,
        )?;

        // Marking cannot fail, so a failed transfer leaves the set untouched.
        self.vault.transfer(caller, amount)?;
        self.claimed.insert(index);

        msg!("Claimed {} tokens for index {}", amount, index);
        Ok(ClaimedAirDrop {
            recipient: *caller,
            amount,
        })
    }

    /// Moves whatever is left in the vault to the owner once the window
    /// has closed. Calling it again on an empty vault is a zero transfer.
    pub fn sweep(&mut self, caller: &Pubkey) -> Result<OwnerWithdraw> {
        check_sweep(self.deadline, self.clock.now(), caller, &self.owner)?;

        let amount = self.vault.balance();
        self.vault.transfer(&self.owner, amount)?;

        msg!("Withdrawing {:#} tokens", amount);
        Ok(OwnerWithdraw {
            owner: self.owner,
            amount,
        })
    }
}
