//! # Types
//!
//! Shared data structures of the launchpad ledger.
//!
//! ## Design decisions
//!
//! ### Meta / Process split
//!
//! A fundraising round is stored as three separate ledger entries:
//!
//! - [`ProjectMeta`] — written once by `set_project_meta`; never mutated.
//! - [`TokenMeta`] — written once by `set_token_meta_data`; never mutated.
//! - [`ProcessInfo`] — created at `open_project`; mutated on every
//!   admitted investment and on close.
//!
//! Investments are the high-frequency write path, so the mutable entry is
//! kept small and the two write-once records are never rewritten.
//!
//! ### Lifecycle as a Finite-State Machine
//!
//! ```text
//! (metas set) ──► Open ──► ClosedSuccess
//!                    └────► ClosedFailed ──► Archived (symbol cleared)
//! ```
//!
//! `open` becomes true exactly once and false exactly once; `succeed` and
//! `failed` are mutually exclusive and terminal. Archival (storage
//! removal) is only reachable from the failed branch, after every refund
//! batch has run.

use soroban_sdk::{contracttype, Address, String};

/// Write-once descriptive metadata of a fundraising round.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectMeta {
    /// Human-readable project name.
    pub project_name: String,
    /// Ledger height after which the round is conceptually eligible.
    /// Informational only; admission is gated by the explicit open flag.
    pub start_block: u32,
    /// Smallest admissible investment per address.
    pub min_invest_per_user: i128,
    /// Largest admissible investment per address.
    pub max_invest_per_user: i128,
}

/// Write-once payout-token configuration of a round.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokenMeta {
    /// Address of the external fungible asset paid out on success.
    pub token_contract: Address,
    /// Native-currency capacity of the round (the admission cap), not the
    /// token's own supply.
    pub total_supply: i128,
    /// Fixed-point conversion rate:
    /// `token_amount = invested * multiplier / SCALE`.
    pub multiplier: i128,
}

/// Mutable per-round accounting and lifecycle state.
///
/// Created at `open_project`; `max_batch_size` is snapshotted there so
/// batch boundaries stay stable for the life of the round even if the
/// global setting changes afterwards.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProcessInfo {
    /// Address credited with the escrowed funds on success-close.
    pub recipient: Address,
    /// Count of distinct admitted investors.
    pub invest_user_num: u32,
    /// Sum of all admitted investments.
    pub total_invested: i128,
    /// Capacity still open to investment: `total_supply - total_invested`.
    /// Zeroed by `remained_token_claim` once the leftover is reclaimed.
    pub remaining_quantity: i128,
    /// Batch size frozen for this round at open time.
    pub max_batch_size: u32,
    /// True strictly between `open_project` and either close call.
    pub open: bool,
    /// Terminal: round closed successfully.
    pub succeed: bool,
    /// Terminal: round closed as failed.
    pub failed: bool,
}
