//! # LaunchPad Contract
//!
//! Crowdfunding ledger for symbol-keyed fundraising rounds. Project
//! owners register a round, investors escrow native-currency
//! contributions under per-user limits and a hard capacity cap, and the
//! administrator resolves the round as success (investors receive a
//! proportional token allocation, the recipient receives the raised
//! funds) or failure (investors are refunded in full). Payouts run in
//! fixed-size, position-indexed batches with per-batch replay guards.
//!
//! | Phase        | Entry Point(s)                                        |
//! |--------------|-------------------------------------------------------|
//! | Bootstrap    | [`LaunchPad::init`]                                   |
//! | Admin        | `transfer_ownership`, `set_max_batch_size`            |
//! | Registration | `set_project_meta`, `set_token_meta_data`             |
//! | Funding      | `open_project`, `investment`                          |
//! | Settlement   | `close_project_success`, `close_project_fail`, `execute_batch_air_drop_token`, `execute_batch_air_drop_coin`, `remained_token_claim`, `refresh_failed_project_symbol` |
//! | Queries      | `get_project_meta_data`, `get_process_info`, `get_user_investment`, `get_batch_length`, … |
//!
//! ## Architecture
//!
//! Authorization is delegated to [`access`], storage access to
//! [`storage`], event emission to [`events`]. Every failure is a panic
//! with an [`Error`] code; the host rolls the call back, so a failed
//! invocation has no effect on state. External transfers happen after
//! all bookkeeping for the call has been written.

#![no_std]

use soroban_sdk::{
    contract, contracterror, contractimpl, panic_with_error, token, Address, Env, String, Symbol,
};

mod access;
mod events;
mod storage;
mod types;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_events;

pub use types::{ProcessInfo, ProjectMeta, TokenMeta};

/// Fixed-point denominator of [`TokenMeta::multiplier`]:
/// `token_amount = invested * multiplier / SCALE`.
pub const SCALE: i128 = 10_000_000;

/// Batch size applied to newly opened rounds until the administrator
/// overrides it via `set_max_batch_size`.
pub const DEFAULT_MAX_BATCH_SIZE: u32 = 5;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    Unauthorized = 3,
    ProjectNotFound = 4,
    MetaAlreadySet = 5,
    TokenMetaAlreadySet = 6,
    MetaNotSet = 7,
    TokenMetaNotSet = 8,
    InvalidInvestLimits = 9,
    InvalidSupply = 10,
    InvalidMultiplier = 11,
    InvalidBatchSize = 12,
    AlreadyOpen = 13,
    AlreadyResolved = 14,
    NotOpen = 15,
    BelowMinimum = 16,
    AboveMaximum = 17,
    DuplicateInvestor = 18,
    CapacityExceeded = 19,
    InsufficientTokenBalance = 20,
    ProjectNotSucceed = 21,
    ProjectNotFailed = 22,
    InvalidBatchIndex = 23,
    BatchAlreadyExecuted = 24,
    BatchesIncomplete = 25,
    AlreadyClaimed = 26,
    Overflow = 27,
}

#[contract]
pub struct LaunchPad;

#[contractimpl]
impl LaunchPad {
    // ─────────────────────────────────────────────────────────
    // Bootstrap
    // ─────────────────────────────────────────────────────────

    /// Initialise the contract with its administrator and the SAC
    /// address of the native asset investments are escrowed in.
    ///
    /// Must be called exactly once after deployment; subsequent calls
    /// panic with `Error::AlreadyInitialized`.
    pub fn init(env: Env, owner: Address, native_token: Address) {
        owner.require_auth();
        access::init_owner(&env, &owner);
        storage::set_native_token(&env, &native_token);
    }

    // ─────────────────────────────────────────────────────────
    // Administration
    // ─────────────────────────────────────────────────────────

    /// Replace the administrator atomically. Has no effect on any
    /// in-flight round state.
    pub fn transfer_ownership(env: Env, caller: Address, new_owner: Address) {
        let old_owner = access::transfer_ownership(&env, &caller, &new_owner);
        events::emit_ownership_transferred(&env, &old_owner, &new_owner);
    }

    /// Set the batch size for rounds opened from now on. Rounds already
    /// opened keep the size snapshotted at their `open_project`.
    pub fn set_max_batch_size(env: Env, caller: Address, size: u32) {
        access::require_owner(&env, &caller);
        if size == 0 {
            panic_with_error!(&env, Error::InvalidBatchSize);
        }
        storage::set_max_batch_size(&env, size);
    }

    // ─────────────────────────────────────────────────────────
    // Registration
    // ─────────────────────────────────────────────────────────

    /// Record the write-once project metadata for `symbol`.
    ///
    /// `start_block` is informational; admission is gated by the
    /// explicit open flag, not by ledger height.
    pub fn set_project_meta(
        env: Env,
        caller: Address,
        symbol: Symbol,
        project_name: String,
        start_block: u32,
        min_invest_per_user: i128,
        max_invest_per_user: i128,
    ) {
        access::require_owner(&env, &caller);
        if storage::has_project_meta(&env, &symbol) {
            panic_with_error!(&env, Error::MetaAlreadySet);
        }
        if min_invest_per_user <= 0 || min_invest_per_user > max_invest_per_user {
            panic_with_error!(&env, Error::InvalidInvestLimits);
        }
        storage::save_project_meta(
            &env,
            &symbol,
            &ProjectMeta {
                project_name,
                start_block,
                min_invest_per_user,
                max_invest_per_user,
            },
        );
    }

    /// Record the write-once token metadata for `symbol`. Fails
    /// `MetaNotSet` if the project metadata has not been recorded first.
    pub fn set_token_meta_data(
        env: Env,
        caller: Address,
        symbol: Symbol,
        token_contract: Address,
        total_supply: i128,
        multiplier: i128,
    ) {
        access::require_owner(&env, &caller);
        if !storage::has_project_meta(&env, &symbol) {
            panic_with_error!(&env, Error::MetaNotSet);
        }
        if storage::has_token_meta(&env, &symbol) {
            panic_with_error!(&env, Error::TokenMetaAlreadySet);
        }
        if total_supply <= 0 {
            panic_with_error!(&env, Error::InvalidSupply);
        }
        if multiplier <= 0 {
            panic_with_error!(&env, Error::InvalidMultiplier);
        }
        storage::save_token_meta(
            &env,
            &symbol,
            &TokenMeta {
                token_contract,
                total_supply,
                multiplier,
            },
        );
    }

    // ─────────────────────────────────────────────────────────
    // Funding
    // ─────────────────────────────────────────────────────────

    /// Open `symbol` for investment. Both metadata records must exist;
    /// a round that was already opened (or resolved) cannot be reopened.
    ///
    /// The current global batch size is frozen into the round here so
    /// batch boundaries stay stable for its whole life.
    pub fn open_project(env: Env, caller: Address, symbol: Symbol, recipient: Address) {
        access::require_owner(&env, &caller);
        if !storage::has_project_meta(&env, &symbol) {
            panic_with_error!(&env, Error::MetaNotSet);
        }
        let token_meta = match storage::load_token_meta(&env, &symbol) {
            Some(meta) => meta,
            None => panic_with_error!(&env, Error::TokenMetaNotSet),
        };
        if let Some(process) = storage::load_process(&env, &symbol) {
            if process.open {
                panic_with_error!(&env, Error::AlreadyOpen);
            }
            panic_with_error!(&env, Error::AlreadyResolved);
        }

        let max_batch_size = storage::get_max_batch_size(&env, DEFAULT_MAX_BATCH_SIZE);
        storage::save_process(
            &env,
            &symbol,
            &ProcessInfo {
                recipient: recipient.clone(),
                invest_user_num: 0,
                total_invested: 0,
                remaining_quantity: token_meta.total_supply,
                max_batch_size,
                open: true,
                succeed: false,
                failed: false,
            },
        );
        events::emit_project_opened(&env, &symbol, &recipient);
    }

    /// Admit an investment of `amount` native units from `investor`.
    ///
    /// One investment per address per round — a second call is rejected
    /// with `DuplicateInvestor`, not added to the first. The amount is
    /// pulled into the contract and held in escrow until settlement.
    pub fn investment(env: Env, investor: Address, symbol: Symbol, amount: i128) {
        investor.require_auth();

        let mut process = match storage::load_process(&env, &symbol) {
            Some(process) if process.open => process,
            _ => panic_with_error!(&env, Error::NotOpen),
        };
        let meta = match storage::load_project_meta(&env, &symbol) {
            Some(meta) => meta,
            None => panic_with_error!(&env, Error::MetaNotSet),
        };

        if amount < meta.min_invest_per_user {
            panic_with_error!(&env, Error::BelowMinimum);
        }
        if amount > meta.max_invest_per_user {
            panic_with_error!(&env, Error::AboveMaximum);
        }
        if storage::get_investment(&env, &symbol, &investor) != 0 {
            panic_with_error!(&env, Error::DuplicateInvestor);
        }
        if amount > process.remaining_quantity {
            panic_with_error!(&env, Error::CapacityExceeded);
        }

        // Escrow the contribution in the contract itself.
        let native = token::Client::new(&env, &storage::get_native_token(&env));
        native.transfer(&investor, &env.current_contract_address(), &amount);

        let mut investors = storage::load_investors(&env, &symbol);
        investors.push_back(investor.clone());
        storage::save_investors(&env, &symbol, &investors);
        storage::set_investment(&env, &symbol, &investor, amount);

        process.invest_user_num += 1;
        process.total_invested = match process.total_invested.checked_add(amount) {
            Some(total) => total,
            None => panic_with_error!(&env, Error::Overflow),
        };
        process.remaining_quantity -= amount;
        storage::save_process(&env, &symbol, &process);

        events::emit_invested(&env, &symbol, &investor, amount, process.invest_user_num);
    }

    // ─────────────────────────────────────────────────────────
    // Settlement
    // ─────────────────────────────────────────────────────────

    /// Resolve `symbol` as a success and forward the escrowed native
    /// total to the round's recipient.
    ///
    /// The contract must already hold enough payout tokens to cover
    /// every investor's allocation (`total_invested * multiplier /
    /// SCALE`) — the owner pre-funds the contract before closing.
    /// Token distribution itself runs in batches afterwards.
    pub fn close_project_success(env: Env, caller: Address, symbol: Symbol) {
        access::require_owner(&env, &caller);
        let mut process = load_open_process(&env, &symbol);
        let token_meta = load_token_meta(&env, &symbol);

        let owed = token_amount(&env, process.total_invested, token_meta.multiplier);
        let payout_token = token::Client::new(&env, &token_meta.token_contract);
        if payout_token.balance(&env.current_contract_address()) < owed {
            panic_with_error!(&env, Error::InsufficientTokenBalance);
        }

        process.open = false;
        process.succeed = true;
        storage::save_process(&env, &symbol, &process);
        events::emit_project_closed(&env, &symbol, true);

        // Value moves only after the resolution is committed.
        let native = token::Client::new(&env, &storage::get_native_token(&env));
        native.transfer(
            &env.current_contract_address(),
            &process.recipient,
            &process.total_invested,
        );
    }

    /// Resolve `symbol` as failed. No value moves here — refunds run in
    /// batches via `execute_batch_air_drop_coin`.
    pub fn close_project_fail(env: Env, caller: Address, symbol: Symbol) {
        access::require_owner(&env, &caller);
        let mut process = load_open_process(&env, &symbol);

        process.open = false;
        process.failed = true;
        storage::save_process(&env, &symbol, &process);
        events::emit_project_closed(&env, &symbol, false);
    }

    /// Pay the token allocation of one batch of a succeeded round.
    ///
    /// Callable by anyone: the distribution is pure mechanics once the
    /// round is resolved. Batches may run in any order; an index runs at
    /// most once and a replay is rejected, not silently ignored.
    pub fn execute_batch_air_drop_token(env: Env, symbol: Symbol, batch_index: u32) {
        let process = match storage::load_process(&env, &symbol) {
            Some(process) if process.succeed => process,
            _ => panic_with_error!(&env, Error::ProjectNotSucceed),
        };
        let token_meta = load_token_meta(&env, &symbol);
        let investors = storage::load_investors(&env, &symbol);
        let batches = batch_length(investors.len(), process.max_batch_size);

        if batch_index >= batches {
            panic_with_error!(&env, Error::InvalidBatchIndex);
        }
        if storage::is_batch_executed(&env, &symbol, batch_index) {
            panic_with_error!(&env, Error::BatchAlreadyExecuted);
        }
        // Flag first; the host discards it with everything else if any
        // transfer below fails.
        storage::mark_batch_executed(&env, &symbol, batch_index);

        let payout_token = token::Client::new(&env, &token_meta.token_contract);
        let start = batch_index * process.max_batch_size;
        let end = (start + process.max_batch_size).min(investors.len());
        for position in start..end {
            let investor = investors.get(position).unwrap();
            let invested = storage::get_investment(&env, &symbol, &investor);
            let allocation = token_amount(&env, invested, token_meta.multiplier);
            payout_token.transfer(&env.current_contract_address(), &investor, &allocation);
        }

        events::emit_batch_executed(&env, &symbol, batch_index, events::BATCH_KIND_TOKEN);
    }

    /// Refund one batch of a failed round: each investor in the slice
    /// receives back exactly the native amount recorded for them.
    pub fn execute_batch_air_drop_coin(env: Env, symbol: Symbol, batch_index: u32) {
        let process = match storage::load_process(&env, &symbol) {
            Some(process) if process.failed => process,
            _ => panic_with_error!(&env, Error::ProjectNotFailed),
        };
        let investors = storage::load_investors(&env, &symbol);
        let batches = batch_length(investors.len(), process.max_batch_size);

        if batch_index >= batches {
            panic_with_error!(&env, Error::InvalidBatchIndex);
        }
        if storage::is_batch_executed(&env, &symbol, batch_index) {
            panic_with_error!(&env, Error::BatchAlreadyExecuted);
        }
        storage::mark_batch_executed(&env, &symbol, batch_index);

        let native = token::Client::new(&env, &storage::get_native_token(&env));
        let start = batch_index * process.max_batch_size;
        let end = (start + process.max_batch_size).min(investors.len());
        for position in start..end {
            let investor = investors.get(position).unwrap();
            let invested = storage::get_investment(&env, &symbol, &investor);
            native.transfer(&env.current_contract_address(), &investor, &invested);
        }

        events::emit_batch_executed(&env, &symbol, batch_index, events::BATCH_KIND_COIN);
    }

    /// Reclaim the unsold token allocation of a succeeded round once
    /// every airdrop batch has run. Single-shot: the remaining quantity
    /// is zeroed, so a second call fails `AlreadyClaimed`.
    pub fn remained_token_claim(env: Env, caller: Address, symbol: Symbol, to: Address) {
        access::require_owner(&env, &caller);
        let mut process = match storage::load_process(&env, &symbol) {
            Some(process) if process.succeed => process,
            _ => panic_with_error!(&env, Error::ProjectNotSucceed),
        };
        let token_meta = load_token_meta(&env, &symbol);
        let investors = storage::load_investors(&env, &symbol);
        let batches = batch_length(investors.len(), process.max_batch_size);

        if !all_batches_executed(&env, &symbol, batches) {
            panic_with_error!(&env, Error::BatchesIncomplete);
        }
        if process.remaining_quantity == 0 {
            panic_with_error!(&env, Error::AlreadyClaimed);
        }

        let leftover = token_amount(&env, process.remaining_quantity, token_meta.multiplier);
        process.remaining_quantity = 0;
        storage::save_process(&env, &symbol, &process);

        let payout_token = token::Client::new(&env, &token_meta.token_contract);
        payout_token.transfer(&env.current_contract_address(), &to, &leftover);
    }

    /// Archive a failed round once every refund batch has run: every
    /// per-symbol entry is removed so the symbol can host a new round.
    pub fn refresh_failed_project_symbol(env: Env, caller: Address, symbol: Symbol) {
        access::require_owner(&env, &caller);
        let process = match storage::load_process(&env, &symbol) {
            Some(process) if process.failed => process,
            _ => panic_with_error!(&env, Error::ProjectNotFailed),
        };
        let investors = storage::load_investors(&env, &symbol);
        let batches = batch_length(investors.len(), process.max_batch_size);

        if !all_batches_executed(&env, &symbol, batches) {
            panic_with_error!(&env, Error::BatchesIncomplete);
        }
        storage::clear_symbol(&env, &symbol, batches);
    }

    // ─────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────

    pub fn get_owner(env: Env) -> Address {
        access::owner(&env)
    }

    pub fn get_native_token(env: Env) -> Address {
        storage::get_native_token(&env)
    }

    /// Batch size that will be frozen into the next opened round.
    pub fn get_max_batch_size(env: Env) -> u32 {
        storage::get_max_batch_size(&env, DEFAULT_MAX_BATCH_SIZE)
    }

    pub fn get_project_meta_data(env: Env, symbol: Symbol) -> ProjectMeta {
        match storage::load_project_meta(&env, &symbol) {
            Some(meta) => meta,
            None => panic_with_error!(&env, Error::ProjectNotFound),
        }
    }

    pub fn get_token_meta_data(env: Env, symbol: Symbol) -> TokenMeta {
        match storage::load_token_meta(&env, &symbol) {
            Some(meta) => meta,
            None => panic_with_error!(&env, Error::ProjectNotFound),
        }
    }

    pub fn get_process_info(env: Env, symbol: Symbol) -> ProcessInfo {
        load_process_or_not_found(&env, &symbol)
    }

    pub fn get_remaining_quantity(env: Env, symbol: Symbol) -> i128 {
        load_process_or_not_found(&env, &symbol).remaining_quantity
    }

    pub fn get_total_invested(env: Env, symbol: Symbol) -> i128 {
        load_process_or_not_found(&env, &symbol).total_invested
    }

    pub fn get_recipient(env: Env, symbol: Symbol) -> Address {
        load_process_or_not_found(&env, &symbol).recipient
    }

    /// True strictly between `open_project` and either close call.
    pub fn is_open(env: Env, symbol: Symbol) -> bool {
        match storage::load_process(&env, &symbol) {
            Some(process) => process.open,
            None => false,
        }
    }

    /// Recorded investment of `user`; zero if never admitted.
    pub fn get_user_investment(env: Env, symbol: Symbol, user: Address) -> i128 {
        storage::get_investment(&env, &symbol, &user)
    }

    pub fn get_invest_user_num(env: Env, symbol: Symbol) -> u32 {
        load_process_or_not_found(&env, &symbol).invest_user_num
    }

    pub fn get_investor_list_length(env: Env, symbol: Symbol) -> u32 {
        storage::load_investors(&env, &symbol).len()
    }

    /// Number of payout batches: `ceil(investor_count / max_batch_size)`.
    pub fn get_batch_length(env: Env, symbol: Symbol) -> u32 {
        let process = load_process_or_not_found(&env, &symbol);
        batch_length(
            storage::load_investors(&env, &symbol).len(),
            process.max_batch_size,
        )
    }

    /// Batch size frozen into this round at open time.
    pub fn get_project_max_batch_size(env: Env, symbol: Symbol) -> u32 {
        load_process_or_not_found(&env, &symbol).max_batch_size
    }

    pub fn is_batch_executed(env: Env, symbol: Symbol, batch_index: u32) -> bool {
        storage::is_batch_executed(&env, &symbol, batch_index)
    }

    /// Token amount batch `batch_index` would receive if airdropped now.
    pub fn get_batch_token_amount(env: Env, symbol: Symbol, batch_index: u32) -> i128 {
        let process = load_process_or_not_found(&env, &symbol);
        let token_meta = load_token_meta(&env, &symbol);
        let investors = storage::load_investors(&env, &symbol);
        let batches = batch_length(investors.len(), process.max_batch_size);
        if batch_index >= batches {
            panic_with_error!(&env, Error::InvalidBatchIndex);
        }

        let start = batch_index * process.max_batch_size;
        let end = (start + process.max_batch_size).min(investors.len());
        let mut total: i128 = 0;
        for position in start..end {
            let investor = investors.get(position).unwrap();
            let invested = storage::get_investment(&env, &symbol, &investor);
            total += token_amount(&env, invested, token_meta.multiplier);
        }
        total
    }
}

// ─────────────────────────────────────────────────────────
// Shared validation helpers
// ─────────────────────────────────────────────────────────

fn load_process_or_not_found(env: &Env, symbol: &Symbol) -> ProcessInfo {
    match storage::load_process(env, symbol) {
        Some(process) => process,
        None => panic_with_error!(env, Error::ProjectNotFound),
    }
}

fn load_open_process(env: &Env, symbol: &Symbol) -> ProcessInfo {
    match storage::load_process(env, symbol) {
        Some(process) if process.open => process,
        _ => panic_with_error!(env, Error::NotOpen),
    }
}

fn load_token_meta(env: &Env, symbol: &Symbol) -> TokenMeta {
    match storage::load_token_meta(env, symbol) {
        Some(meta) => meta,
        None => panic_with_error!(env, Error::TokenMetaNotSet),
    }
}

/// Fixed-point conversion of an invested native amount into its token
/// allocation.
fn token_amount(env: &Env, invested: i128, multiplier: i128) -> i128 {
    match invested.checked_mul(multiplier) {
        Some(product) => product / SCALE,
        None => panic_with_error!(env, Error::Overflow),
    }
}

fn batch_length(investor_count: u32, max_batch_size: u32) -> u32 {
    if investor_count == 0 {
        return 0;
    }
    (investor_count + max_batch_size - 1) / max_batch_size
}

fn all_batches_executed(env: &Env, symbol: &Symbol, batches: u32) -> bool {
    for index in 0..batches {
        if !storage::is_batch_executed(env, symbol, index) {
            return false;
        }
    }
    true
}
