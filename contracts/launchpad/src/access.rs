//! # Access control
//!
//! Single-owner authorization gate. Every state-mutating entry point
//! except `investment` and the batch-execution calls is wrapped by
//! [`require_owner`] — a capability check composed in front of the
//! operation, so the settlement state machine stays independent of who
//! is authorized to drive it.
//!
//! Ownership is transferred atomically and has no effect on in-flight
//! round state.

use soroban_sdk::{panic_with_error, Address, Env};

use crate::storage;
use crate::Error;

/// Record the initial owner. Panics `AlreadyInitialized` on a second call.
pub fn init_owner(env: &Env, owner: &Address) {
    if storage::has_owner(env) {
        panic_with_error!(env, Error::AlreadyInitialized);
    }
    storage::set_owner(env, owner);
}

/// Current administrator address. Panics `NotInitialized` before `init`.
pub fn owner(env: &Env) -> Address {
    if !storage::has_owner(env) {
        panic_with_error!(env, Error::NotInitialized);
    }
    storage::get_owner(env)
}

/// Authenticate `caller` and verify it is the current administrator.
pub fn require_owner(env: &Env, caller: &Address) {
    caller.require_auth();
    if *caller != owner(env) {
        panic_with_error!(env, Error::Unauthorized);
    }
}

/// Replace the administrator. Returns the previous owner so callers can
/// include it in the emitted event.
pub fn transfer_ownership(env: &Env, caller: &Address, new_owner: &Address) -> Address {
    require_owner(env, caller);
    let old_owner = storage::get_owner(env);
    storage::set_owner(env, new_owner);
    old_owner
}
