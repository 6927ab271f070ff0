//! # Events
//!
//! Typed events published by the launchpad contract. Each carries enough
//! data for an off-chain indexer to reconstruct the ledger from the log:
//!
//! | Topic      | Data                      | When                         |
//! |------------|---------------------------|------------------------------|
//! | `opened`   | [`ProjectOpened`]         | `open_project`               |
//! | `invested` | [`Invested`]              | each admitted investment     |
//! | `closed`   | [`ProjectClosed`]         | either close call            |
//! | `batch`    | [`BatchExecuted`]         | each executed payout batch   |
//! | `owner`    | [`OwnershipTransferred`]  | `transfer_ownership`         |
//!
//! Round-scoped events carry the project symbol as the second topic so
//! indexers can filter per symbol without decoding the data payload.

use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

/// Kind marker on [`BatchExecuted`]: token airdrop batch.
pub const BATCH_KIND_TOKEN: Symbol = symbol_short!("token");
/// Kind marker on [`BatchExecuted`]: native-coin refund batch.
pub const BATCH_KIND_COIN: Symbol = symbol_short!("coin");

/// A round was opened for investment.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectOpened {
    pub recipient: Address,
}

/// An investment was admitted.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Invested {
    pub investor: Address,
    pub amount: i128,
    /// Distinct-investor count after this admission.
    pub invest_user_num: u32,
}

/// A round was resolved.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectClosed {
    pub succeed: bool,
}

/// A payout batch ran to completion.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BatchExecuted {
    pub batch_index: u32,
    /// [`BATCH_KIND_TOKEN`] or [`BATCH_KIND_COIN`].
    pub kind: Symbol,
}

/// The administrator changed.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OwnershipTransferred {
    pub old_owner: Address,
    pub new_owner: Address,
}

pub fn emit_project_opened(env: &Env, symbol: &Symbol, recipient: &Address) {
    env.events().publish(
        (symbol_short!("opened"), symbol.clone()),
        ProjectOpened {
            recipient: recipient.clone(),
        },
    );
}

pub fn emit_invested(
    env: &Env,
    symbol: &Symbol,
    investor: &Address,
    amount: i128,
    invest_user_num: u32,
) {
    env.events().publish(
        (symbol_short!("invested"), symbol.clone()),
        Invested {
            investor: investor.clone(),
            amount,
            invest_user_num,
        },
    );
}

pub fn emit_project_closed(env: &Env, symbol: &Symbol, succeed: bool) {
    env.events().publish(
        (symbol_short!("closed"), symbol.clone()),
        ProjectClosed { succeed },
    );
}

pub fn emit_batch_executed(env: &Env, symbol: &Symbol, batch_index: u32, kind: Symbol) {
    env.events().publish(
        (symbol_short!("batch"), symbol.clone()),
        BatchExecuted { batch_index, kind },
    );
}

pub fn emit_ownership_transferred(env: &Env, old_owner: &Address, new_owner: &Address) {
    env.events().publish(
        (symbol_short!("owner"),),
        OwnershipTransferred {
            old_owner: old_owner.clone(),
            new_owner: new_owner.clone(),
        },
    );
}
