//! Soroban RPC client — polls `getEvents` and decodes LaunchPad events.
//!
//! ## Resilience
//!
//! * Exponential back-off is applied when the RPC returns an error or rate-limit
//!   response, up to [`MAX_BACKOFF_SECS`] seconds.
//! * Transient network errors (connection reset, timeout) are retried silently.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::errors::{IndexerError, Result};
use crate::events::{EventKind, LaunchpadEvent};

const MAX_BACKOFF_SECS: u64 = 60;
const INITIAL_BACKOFF_SECS: u64 = 2;

// ─────────────────────────────────────────────────────────
// JSON-RPC response shapes
// ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    pub result: Option<EventsResult>,
    pub error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct EventsResult {
    pub events: Vec<RawEvent>,
    pub cursor: Option<String>,
    #[serde(rename = "latestLedger")]
    pub latest_ledger: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
#[allow(dead_code)]
pub struct RawEvent {
    /// XDR-encoded topic list
    pub topic: Vec<String>,
    /// XDR-encoded event value / data
    pub value: Value,
    #[serde(rename = "contractId")]
    pub contract_id: Option<String>,
    #[serde(rename = "txHash")]
    pub tx_hash: Option<String>,
    pub id: Option<String>,
    pub ledger: Option<u64>,
    #[serde(rename = "ledgerClosedAt")]
    pub ledger_closed_at: Option<String>,
    #[serde(rename = "inSuccessfulContractCall")]
    pub in_successful_contract_call: Option<bool>,
    #[serde(rename = "pagingToken")]
    pub paging_token: Option<String>,
}

// ─────────────────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────────────────

/// Fetch a page of events from the RPC.
///
/// * `start_ledger` — the ledger sequence to scan from (inclusive).
/// * `cursor`       — optional opaque pagination cursor from a previous response.
/// * `limit`        — maximum number of events to return.
///
/// Returns `(events, next_cursor, latest_ledger)`.
pub async fn fetch_events(
    client: &Client,
    rpc_url: &str,
    contract_id: &str,
    start_ledger: u32,
    cursor: Option<&str>,
    limit: u32,
) -> Result<(Vec<RawEvent>, Option<String>, Option<u64>)> {
    let mut backoff = INITIAL_BACKOFF_SECS;

    loop {
        let params = build_params(contract_id, start_ledger, cursor, limit);

        let response = client
            .post(rpc_url)
            .json(&json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "getEvents",
                "params": params,
            }))
            .send()
            .await;

        match response {
            Err(e) => {
                warn!("RPC request failed (will retry in {backoff}s): {e}");
                tokio::time::sleep(Duration::from_secs(backoff)).await;
                backoff = (backoff * 2).min(MAX_BACKOFF_SECS);
                continue;
            }
            Ok(resp) => {
                let status = resp.status();
                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    warn!("Rate-limited by RPC (will retry in {backoff}s)");
                    tokio::time::sleep(Duration::from_secs(backoff)).await;
                    backoff = (backoff * 2).min(MAX_BACKOFF_SECS);
                    continue;
                }

                let body: RpcResponse = resp.json().await?;

                if let Some(err) = body.error {
                    // Code -32600 / -32601 are hard failures; everything else we retry
                    if err.code == -32600 || err.code == -32601 {
                        return Err(IndexerError::EventParse(format!(
                            "RPC hard error {}: {}",
                            err.code, err.message
                        )));
                    }
                    warn!(
                        "RPC soft error (will retry in {backoff}s): {} {}",
                        err.code, err.message
                    );
                    tokio::time::sleep(Duration::from_secs(backoff)).await;
                    backoff = (backoff * 2).min(MAX_BACKOFF_SECS);
                    continue;
                }

                let result = body.result.ok_or_else(|| {
                    IndexerError::EventParse("Empty result from getEvents".to_string())
                })?;

                debug!(
                    "Fetched {} events (latest_ledger={:?})",
                    result.events.len(),
                    result.latest_ledger
                );

                return Ok((result.events, result.cursor, result.latest_ledger));
            }
        }
    }
}

fn build_params(contract_id: &str, start_ledger: u32, cursor: Option<&str>, limit: u32) -> Value {
    let mut params = json!({
        "filters": [
            {
                "type": "contract",
                "contractIds": [contract_id]
            }
        ],
        "pagination": {
            "limit": limit
        }
    });

    if let Some(cur) = cursor {
        params["pagination"]["cursor"] = json!(cur);
    } else {
        params["startLedger"] = json!(start_ledger);
    }

    params
}

// ─────────────────────────────────────────────────────────
// Event decoding
// ─────────────────────────────────────────────────────────

/// Decode a list of raw RPC events into [`LaunchpadEvent`] structs.
pub fn decode_events(raw: &[RawEvent], contract_id: &str) -> Vec<LaunchpadEvent> {
    raw.iter()
        .filter_map(|e| decode_single(e, contract_id))
        .collect()
}

fn decode_single(raw: &RawEvent, contract_id: &str) -> Option<LaunchpadEvent> {
    // Extract leading topic symbol to determine event type.
    let first_topic = raw.topic.first()?;
    let kind = EventKind::from_topic(&extract_symbol(first_topic));

    let ledger = raw.ledger.unwrap_or(0) as i64;
    let timestamp = raw
        .ledger_closed_at
        .as_deref()
        .and_then(parse_iso_to_unix)
        .unwrap_or(0);

    // The second topic is the project symbol on round-scoped events;
    // the ownership event has no symbol topic.
    let symbol = raw.topic.get(1).map(|t| extract_symbol(t));

    let (actor, amount, detail) = decode_data(&raw.value, &kind);

    Some(LaunchpadEvent {
        event_type: kind.as_str().to_string(),
        symbol,
        actor,
        amount,
        detail,
        ledger,
        timestamp,
        contract_id: raw
            .contract_id
            .clone()
            .unwrap_or_else(|| contract_id.to_string()),
        tx_hash: raw.tx_hash.clone(),
    })
}

/// Pull apart the JSON `value` blob that Soroban returns for event data.
/// The XDR is decoded by the RPC into a `{"type":…, …}` JSON object.
///
/// Returns `(actor, amount, detail)`.
fn decode_data(
    value: &Value,
    kind: &EventKind,
) -> (Option<String>, Option<String>, Option<String>) {
    match kind {
        EventKind::Invested => {
            let actor = extract_field(value, &["investor", "address"]);
            let amount = extract_field(value, &["amount"]);
            let detail = extract_field(value, &["invest_user_num"]);
            (actor, amount, detail)
        }
        EventKind::ProjectOpened => {
            let actor = extract_field(value, &["recipient", "address"]);
            (actor, None, None)
        }
        EventKind::ProjectClosed => {
            let detail = value
                .get("succeed")
                .and_then(|v| v.as_bool())
                .map(|succeed| if succeed { "succeed" } else { "failed" }.to_string());
            (None, None, detail)
        }
        EventKind::BatchExecuted => {
            let detail = match (
                extract_field(value, &["kind"]),
                extract_field(value, &["batch_index"]),
            ) {
                (Some(kind), Some(index)) => Some(format!("{kind}:{index}")),
                (kind, index) => kind.or(index),
            };
            (None, None, detail)
        }
        EventKind::OwnershipTransferred => {
            let actor = extract_field(value, &["new_owner"]);
            let detail = extract_field(value, &["old_owner"]);
            (actor, None, detail)
        }
        EventKind::Unknown => (None, None, None),
    }
}

fn extract_field(value: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(v) = value.get(key) {
            let s = match v {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => v.as_str().map(String::from),
            };
            if s.is_some() {
                return s;
            }
        }
    }
    None
}

/// Extract a Soroban Symbol from the XDR-decoded topic string.
/// The RPC may return `{"type":"symbol","value":"invested"}` or just the raw string.
fn extract_symbol(raw: &str) -> String {
    if let Ok(v) = serde_json::from_str::<Value>(raw) {
        if let Some(s) = v.get("value").and_then(|x| x.as_str()) {
            return s.to_string();
        }
    }
    // Fallback: treat the raw string as the symbol
    raw.to_string()
}

/// Parse an ISO-8601 timestamp string into a Unix epoch (seconds).
fn parse_iso_to_unix(s: &str) -> Option<i64> {
    use chrono::DateTime;
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.timestamp())
}

// ─────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_kind_from_topic() {
        assert_eq!(EventKind::from_topic("invested"), EventKind::Invested);
        assert_eq!(EventKind::from_topic("opened"), EventKind::ProjectOpened);
        assert_eq!(EventKind::from_topic("closed"), EventKind::ProjectClosed);
        assert_eq!(EventKind::from_topic("batch"), EventKind::BatchExecuted);
        assert_eq!(
            EventKind::from_topic("owner"),
            EventKind::OwnershipTransferred
        );
        assert_eq!(EventKind::from_topic("something_else"), EventKind::Unknown);
    }

    #[test]
    fn event_kind_as_str() {
        assert_eq!(EventKind::Invested.as_str(), "invested");
        assert_eq!(EventKind::ProjectOpened.as_str(), "project_opened");
        assert_eq!(EventKind::ProjectClosed.as_str(), "project_closed");
        assert_eq!(EventKind::BatchExecuted.as_str(), "batch_executed");
        assert_eq!(
            EventKind::OwnershipTransferred.as_str(),
            "ownership_transferred"
        );
    }

    #[test]
    fn extract_symbol_from_json() {
        let raw = r#"{"type":"symbol","value":"invested"}"#;
        assert_eq!(extract_symbol(raw), "invested");
    }

    #[test]
    fn extract_symbol_raw_fallback() {
        assert_eq!(extract_symbol("LPT"), "LPT");
    }

    #[test]
    fn decode_invested_event() {
        let raw = RawEvent {
            topic: vec![
                r#"{"type":"symbol","value":"invested"}"#.to_string(),
                r#"{"type":"symbol","value":"LPT"}"#.to_string(),
            ],
            value: serde_json::json!({
                "investor": "GABC123",
                "amount": "2",
                "invest_user_num": 7
            }),
            contract_id: Some("CONTRACT1".to_string()),
            tx_hash: Some("TX1".to_string()),
            id: None,
            ledger: Some(1000),
            ledger_closed_at: Some("2024-01-01T00:00:00Z".to_string()),
            in_successful_contract_call: Some(true),
            paging_token: None,
        };

        let events = decode_events(&[raw], "CONTRACT1");
        assert_eq!(events.len(), 1);
        let ev = &events[0];
        assert_eq!(ev.event_type, "invested");
        assert_eq!(ev.symbol.as_deref(), Some("LPT"));
        assert_eq!(ev.actor.as_deref(), Some("GABC123"));
        assert_eq!(ev.amount.as_deref(), Some("2"));
        assert_eq!(ev.detail.as_deref(), Some("7"));
        assert_eq!(ev.ledger, 1000);
    }

    #[test]
    fn decode_closed_event() {
        let raw = RawEvent {
            topic: vec![
                r#"{"type":"symbol","value":"closed"}"#.to_string(),
                r#"{"type":"symbol","value":"LPT"}"#.to_string(),
            ],
            value: serde_json::json!({ "succeed": false }),
            contract_id: Some("CONTRACT1".to_string()),
            tx_hash: Some("TX2".to_string()),
            id: None,
            ledger: Some(1001),
            ledger_closed_at: Some("2024-01-01T00:00:01Z".to_string()),
            in_successful_contract_call: Some(true),
            paging_token: None,
        };

        let events = decode_events(&[raw], "CONTRACT1");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, "project_closed");
        assert_eq!(events[0].symbol.as_deref(), Some("LPT"));
        assert_eq!(events[0].detail.as_deref(), Some("failed"));
    }

    #[test]
    fn decode_batch_event() {
        let raw = RawEvent {
            topic: vec![
                r#"{"type":"symbol","value":"batch"}"#.to_string(),
                r#"{"type":"symbol","value":"LPT"}"#.to_string(),
            ],
            value: serde_json::json!({ "batch_index": 3, "kind": "coin" }),
            contract_id: Some("CONTRACT1".to_string()),
            tx_hash: Some("TX3".to_string()),
            id: None,
            ledger: Some(1002),
            ledger_closed_at: Some("2024-01-01T00:00:02Z".to_string()),
            in_successful_contract_call: Some(true),
            paging_token: None,
        };

        let events = decode_events(&[raw], "CONTRACT1");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, "batch_executed");
        assert_eq!(events[0].detail.as_deref(), Some("coin:3"));
    }

    #[test]
    fn parse_iso_timestamp() {
        let ts = parse_iso_to_unix("2024-01-01T00:00:00Z").unwrap();
        assert_eq!(ts, 1_704_067_200);
    }
}
