//! # Storage
//!
//! Typed helpers over Soroban's two storage tiers used by the launchpad:
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key            | Type      | Description                           |
//! |----------------|-----------|---------------------------------------|
//! | `Owner`        | `Address` | Current administrator                 |
//! | `NativeToken`  | `Address` | SAC address of the escrowed native asset |
//! | `MaxBatchSize` | `u32`     | Batch size applied to newly opened rounds |
//!
//! Instance TTL is bumped by **7 days** whenever it falls below 1 day remaining.
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key                        | Type           | Description                     |
//! |----------------------------|----------------|---------------------------------|
//! | `ProjMeta(symbol)`         | `ProjectMeta`  | Write-once project metadata     |
//! | `TokMeta(symbol)`          | `TokenMeta`    | Write-once token metadata       |
//! | `Process(symbol)`          | `ProcessInfo`  | Mutable round state             |
//! | `Investors(symbol)`        | `Vec<Address>` | Admission-ordered investor list |
//! | `Investment(symbol, addr)` | `i128`         | Recorded investment per address |
//! | `BatchDone(symbol, index)` | `bool`         | Batch payout replay guard       |
//!
//! Persistent TTL is bumped by **30 days** whenever it falls below 7 days remaining.
//!
//! Presence of `ProjMeta`/`TokMeta` entries doubles as the write-once
//! `metaSet` flags; `refresh_failed_project_symbol` removes every
//! per-symbol entry so the symbol can host a new round.

use soroban_sdk::{contracttype, Address, Env, Symbol, Vec};

use crate::types::{ProcessInfo, ProjectMeta, TokenMeta};

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

/// Instance storage: bump by 7 days when below 1 day remaining.
const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

/// Persistent storage: bump by 30 days when below 7 days remaining.
const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

// ── Storage Keys ─────────────────────────────────────────────────────

/// All contract storage keys.
///
/// Instance-tier keys (`Owner`, `NativeToken`, `MaxBatchSize`) live as
/// long as the contract. Persistent-tier keys hold per-symbol round data
/// with independent TTLs.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Current administrator (Instance).
    Owner,
    /// SAC address of the native asset investments are escrowed in (Instance).
    NativeToken,
    /// Batch size for rounds opened from now on (Instance).
    MaxBatchSize,
    /// Write-once project metadata keyed by symbol (Persistent).
    ProjMeta(Symbol),
    /// Write-once token metadata keyed by symbol (Persistent).
    TokMeta(Symbol),
    /// Mutable round state keyed by symbol (Persistent).
    Process(Symbol),
    /// Admission-ordered investor list keyed by symbol (Persistent).
    Investors(Symbol),
    /// Recorded investment per investor (Persistent).
    Investment(Symbol, Address),
    /// Replay guard per executed batch index (Persistent).
    BatchDone(Symbol, u32),
}

// ── Instance Storage Helpers ─────────────────────────────────────────

/// Extend instance storage TTL if it falls below the threshold.
fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

pub fn has_owner(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Owner)
}

pub fn set_owner(env: &Env, owner: &Address) {
    env.storage().instance().set(&DataKey::Owner, owner);
    bump_instance(env);
}

/// Retrieve the administrator address.
/// Panics if the contract has not been initialized.
pub fn get_owner(env: &Env) -> Address {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Owner)
        .expect("owner not set")
}

pub fn set_native_token(env: &Env, token: &Address) {
    env.storage().instance().set(&DataKey::NativeToken, token);
    bump_instance(env);
}

/// SAC address of the asset investments are escrowed in.
pub fn get_native_token(env: &Env) -> Address {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::NativeToken)
        .expect("native token not set")
}

pub fn set_max_batch_size(env: &Env, size: u32) {
    env.storage().instance().set(&DataKey::MaxBatchSize, &size);
    bump_instance(env);
}

/// Batch size applied to rounds opened from now on.
pub fn get_max_batch_size(env: &Env, default: u32) -> u32 {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::MaxBatchSize)
        .unwrap_or(default)
}

// ── Persistent Storage Helpers ───────────────────────────────────────

/// Extend the TTL for a persistent storage key.
fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

pub fn has_project_meta(env: &Env, symbol: &Symbol) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::ProjMeta(symbol.clone()))
}

pub fn save_project_meta(env: &Env, symbol: &Symbol, meta: &ProjectMeta) {
    let key = DataKey::ProjMeta(symbol.clone());
    env.storage().persistent().set(&key, meta);
    bump_persistent(env, &key);
}

pub fn load_project_meta(env: &Env, symbol: &Symbol) -> Option<ProjectMeta> {
    let key = DataKey::ProjMeta(symbol.clone());
    let meta: Option<ProjectMeta> = env.storage().persistent().get(&key);
    if meta.is_some() {
        bump_persistent(env, &key);
    }
    meta
}

pub fn has_token_meta(env: &Env, symbol: &Symbol) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::TokMeta(symbol.clone()))
}

pub fn save_token_meta(env: &Env, symbol: &Symbol, meta: &TokenMeta) {
    let key = DataKey::TokMeta(symbol.clone());
    env.storage().persistent().set(&key, meta);
    bump_persistent(env, &key);
}

pub fn load_token_meta(env: &Env, symbol: &Symbol) -> Option<TokenMeta> {
    let key = DataKey::TokMeta(symbol.clone());
    let meta: Option<TokenMeta> = env.storage().persistent().get(&key);
    if meta.is_some() {
        bump_persistent(env, &key);
    }
    meta
}

pub fn has_process(env: &Env, symbol: &Symbol) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::Process(symbol.clone()))
}

pub fn save_process(env: &Env, symbol: &Symbol, process: &ProcessInfo) {
    let key = DataKey::Process(symbol.clone());
    env.storage().persistent().set(&key, process);
    bump_persistent(env, &key);
}

pub fn load_process(env: &Env, symbol: &Symbol) -> Option<ProcessInfo> {
    let key = DataKey::Process(symbol.clone());
    let process: Option<ProcessInfo> = env.storage().persistent().get(&key);
    if process.is_some() {
        bump_persistent(env, &key);
    }
    process
}

/// Admission-ordered investor list; empty when no one has invested yet.
pub fn load_investors(env: &Env, symbol: &Symbol) -> Vec<Address> {
    let key = DataKey::Investors(symbol.clone());
    match env.storage().persistent().get(&key) {
        Some(list) => {
            bump_persistent(env, &key);
            list
        }
        None => Vec::new(env),
    }
}

pub fn save_investors(env: &Env, symbol: &Symbol, investors: &Vec<Address>) {
    let key = DataKey::Investors(symbol.clone());
    env.storage().persistent().set(&key, investors);
    bump_persistent(env, &key);
}

/// Recorded investment of one address; zero means never admitted.
pub fn get_investment(env: &Env, symbol: &Symbol, investor: &Address) -> i128 {
    let key = DataKey::Investment(symbol.clone(), investor.clone());
    match env.storage().persistent().get(&key) {
        Some(amount) => {
            bump_persistent(env, &key);
            amount
        }
        None => 0,
    }
}

pub fn set_investment(env: &Env, symbol: &Symbol, investor: &Address, amount: i128) {
    let key = DataKey::Investment(symbol.clone(), investor.clone());
    env.storage().persistent().set(&key, &amount);
    bump_persistent(env, &key);
}

pub fn is_batch_executed(env: &Env, symbol: &Symbol, index: u32) -> bool {
    env.storage()
        .persistent()
        .get(&DataKey::BatchDone(symbol.clone(), index))
        .unwrap_or(false)
}

pub fn mark_batch_executed(env: &Env, symbol: &Symbol, index: u32) {
    let key = DataKey::BatchDone(symbol.clone(), index);
    env.storage().persistent().set(&key, &true);
    bump_persistent(env, &key);
}

/// Remove every per-symbol entry. The caller has already verified the
/// round failed and all refund batches ran; after this the symbol can
/// host a fresh round.
pub fn clear_symbol(env: &Env, symbol: &Symbol, batch_length: u32) {
    let storage = env.storage().persistent();
    let investors = load_investors(env, symbol);
    for investor in investors.iter() {
        storage.remove(&DataKey::Investment(symbol.clone(), investor));
    }
    for index in 0..batch_length {
        storage.remove(&DataKey::BatchDone(symbol.clone(), index));
    }
    storage.remove(&DataKey::Investors(symbol.clone()));
    storage.remove(&DataKey::Process(symbol.clone()));
    storage.remove(&DataKey::TokMeta(symbol.clone()));
    storage.remove(&DataKey::ProjMeta(symbol.clone()));
}
