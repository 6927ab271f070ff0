#![allow(dead_code)]

extern crate std;

use soroban_sdk::{Address, Vec};

/// INV-1: `total_invested + remaining_quantity == total_supply` at every
/// observation point of an open round.
pub fn assert_capacity_conserved(total_supply: i128, total_invested: i128, remaining: i128) {
    assert_eq!(
        total_invested + remaining,
        total_supply,
        "INV-1 violated: {} invested + {} remaining != {} supply",
        total_invested,
        remaining,
        total_supply
    );
}

/// INV-2: remaining capacity never goes negative.
pub fn assert_remaining_non_negative(remaining: i128) {
    assert!(
        remaining >= 0,
        "INV-2 violated: remaining quantity is negative ({})",
        remaining
    );
}

/// INV-3: each investor appears at most once in the admission-ordered list.
pub fn assert_no_duplicate_investors(investors: &Vec<Address>) {
    for i in 0..investors.len() {
        for j in (i + 1)..investors.len() {
            assert_ne!(
                investors.get(i).unwrap(),
                investors.get(j).unwrap(),
                "INV-3 violated: investor at positions {} and {} is the same address",
                i,
                j
            );
        }
    }
}

/// INV-4: a refund restores exactly the recorded investment, no more, no less.
pub fn assert_refund_exact(balance_before: i128, balance_after: i128, invested: i128) {
    assert_eq!(
        balance_after - balance_before,
        invested,
        "INV-4 violated: refund delta {} != recorded investment {}",
        balance_after - balance_before,
        invested
    );
}

/// INV-5: the distinct-investor count matches the admission list length.
pub fn assert_user_num_matches_list(invest_user_num: u32, list_length: u32) {
    assert_eq!(
        invest_user_num, list_length,
        "INV-5 violated: invest_user_num {} != investor list length {}",
        invest_user_num, list_length
    );
}
