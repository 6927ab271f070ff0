//! Canonical event types emitted by the LaunchPad contract.
//!
//! These mirror the Soroban contract events defined in
//! `contracts/launchpad/src/events.rs`. Together the five kinds carry
//! enough data to rebuild the ledger from the log: every admission, the
//! open/close transitions, each executed payout batch, and every
//! administrator change.

use serde::{Deserialize, Serialize};

/// All recognised event kinds from the LaunchPad contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// An investment was admitted (`invested` topic).
    Invested,
    /// A round was opened for investment (`opened` topic).
    ProjectOpened,
    /// A round was resolved to success or failure (`closed` topic).
    ProjectClosed,
    /// A payout batch ran to completion (`batch` topic).
    BatchExecuted,
    /// The administrator changed (`owner` topic).
    OwnershipTransferred,
    /// An event from this contract that we don't recognise yet.
    Unknown,
}

impl EventKind {
    /// Parse the leading topic symbol string produced by Soroban into an [`EventKind`].
    pub fn from_topic(topic: &str) -> Self {
        match topic {
            "invested" => Self::Invested,
            "opened" => Self::ProjectOpened,
            "closed" => Self::ProjectClosed,
            "batch" => Self::BatchExecuted,
            "owner" => Self::OwnershipTransferred,
            _ => Self::Unknown,
        }
    }

    /// Return a short identifier string suitable for storage in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Invested => "invested",
            Self::ProjectOpened => "project_opened",
            Self::ProjectClosed => "project_closed",
            Self::BatchExecuted => "batch_executed",
            Self::OwnershipTransferred => "ownership_transferred",
            Self::Unknown => "unknown",
        }
    }
}

/// A fully decoded LaunchPad event, ready to be stored in the database.
///
/// `detail` carries the kind-specific payload that `actor`/`amount`
/// cannot: the running investor count, the success flag of a close, the
/// `kind:index` pair of a batch, the previous owner of a transfer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchpadEvent {
    pub event_type: String,
    pub symbol: Option<String>,
    pub actor: Option<String>,
    pub amount: Option<String>,
    pub detail: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
}

/// A raw event record as stored in / read from the database.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventRecord {
    pub id: i64,
    pub event_type: String,
    pub symbol: Option<String>,
    pub actor: Option<String>,
    pub amount: Option<String>,
    pub detail: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
    pub created_at: i64,
}

/// Per-symbol rollup rebuilt purely from the indexed event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolSummary {
    pub symbol: String,
    pub invest_user_num: i64,
    pub total_invested: i128,
    /// `open`, `succeed`, or `failed`.
    pub status: String,
    pub batches_executed: i64,
}

impl SymbolSummary {
    /// Fold a symbol's event history (ledger-ascending) into a summary.
    /// Returns `None` when the log holds no `project_opened` for it.
    pub fn from_events(symbol: &str, events: &[EventRecord]) -> Option<Self> {
        let mut opened = false;
        let mut status = "open".to_string();
        let mut invest_user_num = 0i64;
        let mut total_invested = 0i128;
        let mut batches_executed = 0i64;

        for ev in events {
            match ev.event_type.as_str() {
                "project_opened" => {
                    opened = true;
                    // A reused symbol starts a fresh round; reset the tallies.
                    status = "open".to_string();
                    invest_user_num = 0;
                    total_invested = 0;
                    batches_executed = 0;
                }
                "invested" => {
                    invest_user_num += 1;
                    if let Some(amount) = ev.amount.as_deref().and_then(|a| a.parse::<i128>().ok())
                    {
                        total_invested += amount;
                    }
                }
                "project_closed" => {
                    status = match ev.detail.as_deref() {
                        Some("succeed") => "succeed".to_string(),
                        _ => "failed".to_string(),
                    };
                }
                "batch_executed" => {
                    batches_executed += 1;
                }
                _ => {}
            }
        }

        if !opened {
            return None;
        }
        Some(SymbolSummary {
            symbol: symbol.to_string(),
            invest_user_num,
            total_invested,
            status,
            batches_executed,
        })
    }
}
