//! Contains logic for decoding a whole `eth_getLogs` result under a recovery policy.

use std::{collections::HashMap, fmt, str::FromStr};

use ethlog_common::{DecodeError, LogRecord};
use num::BigUint;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::decode_value;

/// What to do with a log in a batch that fails to decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchPolicy {
    /// Fail the whole batch on the first undecodable log.
    #[default]
    Abort,
    /// Drop undecodable logs and keep the rest.
    Skip,
}

impl FromStr for BatchPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "abort" => Ok(Self::Abort),
            "skip" => Ok(Self::Skip),
            other => Err(format!("unknown batch policy `{other}`, expected `abort` or `skip`")),
        }
    }
}

impl fmt::Display for BatchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Abort => f.write_str("abort"),
            Self::Skip => f.write_str("skip"),
        }
    }
}

/// Batch-level failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BatchError {
    /// The document is neither an array of logs nor a JSON-RPC response carrying one.
    #[error("expected an array of logs or a JSON-RPC response with a `result` array")]
    NotALogArray,
    /// The document is a JSON-RPC error response.
    #[error("JSON-RPC error response: {0}")]
    Rpc(String),
    /// A log failed to decode under [`BatchPolicy::Abort`].
    #[error("log at index {index} could not be decoded: {source}")]
    Record {
        /// Position of the log within the batch.
        index: usize,
        /// Why the log was rejected.
        source: DecodeError,
    },
}

/// Result of decoding a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Decoded records, in input order.
    pub records: Vec<LogRecord>,
    /// Index and error of every log dropped under [`BatchPolicy::Skip`].
    pub skipped: Vec<(usize, DecodeError)>,
}

/// Returns the raw logs held by an `eth_getLogs` document.
///
/// Accepts either the bare result array or the full JSON-RPC response object.
pub fn extract_logs(document: &Value) -> Result<&[Value], BatchError> {
    match document {
        Value::Array(logs) => Ok(logs.as_slice()),
        Value::Object(response) => {
            if let Some(error) = response.get("error").filter(|e| !e.is_null()) {
                let message = error
                    .get("message")
                    .and_then(Value::as_str)
                    .map_or_else(|| error.to_string(), str::to_string);
                return Err(BatchError::Rpc(message));
            }

            response
                .get("result")
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .ok_or(BatchError::NotALogArray)
        }
        _ => Err(BatchError::NotALogArray),
    }
}

/// Decodes every log in `logs`, applying `policy` to the ones that fail.
pub fn decode_batch(logs: &[Value], policy: BatchPolicy) -> Result<BatchOutcome, BatchError> {
    let mut outcome = BatchOutcome::default();

    for (index, raw) in logs.iter().enumerate() {
        match decode_value(raw) {
            Ok(record) => outcome.records.push(record),
            Err(source) => match policy {
                BatchPolicy::Abort => return Err(BatchError::Record { index, source }),
                BatchPolicy::Skip => {
                    warn!(index, error = %source, "Skipping undecodable log");
                    outcome.skipped.push((index, source));
                }
            },
        }
    }

    debug!(
        decoded = outcome.records.len(),
        skipped = outcome.skipped.len(),
        %policy,
        "Decoded log batch"
    );
    Ok(outcome)
}

/// Attaches block timestamps, keyed by block number, to `records`.
///
/// Records from blocks missing in `timestamps` keep an unknown timestamp. Records that already
/// carry a timestamp are left unchanged.
pub fn attach_timestamps(
    records: Vec<LogRecord>,
    timestamps: &HashMap<BigUint, u64>,
) -> Vec<LogRecord> {
    records
        .into_iter()
        .map(|record| {
            if record.timestamp().is_some() {
                return record;
            }
            match timestamps.get(record.block_number()) {
                Some(&timestamp) => record.with_timestamp(timestamp),
                None => record,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use ethlog_common::DecodeError;
    use num::BigUint;
    use serde_json::{json, Value};

    use super::*;

    fn log(block_number: &str) -> Value {
        json!({
            "address": "0x0fbc0a9be1e87391ed2c7d2bb275bec02f53241f",
            "topics": ["0xd78ad95fa46c994b6551d0da85fc275fe613ce37657fb8d5e3d130840159d822"],
            "data": "0x",
            "blockNumber": block_number,
            "transactionHash": "0x8bf2361656e0ea6f338ad17ac3cd616f8eea9bb17e1afa1580802e9d3231c203",
        })
    }

    #[test]
    fn test_extract_logs() {
        let logs = json!([log("0x1")]);
        assert_eq!(extract_logs(&logs).unwrap().len(), 1);

        let response = json!({ "jsonrpc": "2.0", "id": 1, "result": [log("0x1"), log("0x2")] });
        assert_eq!(extract_logs(&response).unwrap().len(), 2);

        let failure = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": { "code": -32005, "message": "query returned more than 10000 results" }
        });
        assert_eq!(
            extract_logs(&failure).unwrap_err(),
            BatchError::Rpc("query returned more than 10000 results".to_string())
        );

        // JSON-RPC 1.0 servers send a null `error` alongside every successful result
        let legacy = json!({ "id": 1, "error": null, "result": [log("0x1")] });
        assert_eq!(extract_logs(&legacy).unwrap().len(), 1);

        assert_eq!(extract_logs(&json!({ "result": null })).unwrap_err(), BatchError::NotALogArray);
        assert_eq!(extract_logs(&json!("0x")).unwrap_err(), BatchError::NotALogArray);
    }

    #[test]
    fn test_abort_reports_failing_index() {
        let logs = [log("0x1"), log("0x2"), log("nope"), log("0x3")];

        assert_eq!(
            decode_batch(&logs, BatchPolicy::Abort).unwrap_err(),
            BatchError::Record { index: 2, source: DecodeError::MalformedHex("blockNumber") }
        );
    }

    #[test]
    fn test_skip_keeps_order() {
        let logs = [log("0x3"), json!(null), log("0x1"), log("0x")];

        let outcome = decode_batch(&logs, BatchPolicy::Skip).unwrap();

        let block_numbers =
            outcome.records.iter().map(|r| r.block_number().clone()).collect::<Vec<_>>();
        assert_eq!(block_numbers, vec![BigUint::from(3u8), BigUint::from(1u8)]);
        assert_eq!(outcome.skipped.iter().map(|(i, _)| *i).collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(outcome.skipped[0].1, DecodeError::MissingField("address"));
    }

    #[test]
    fn test_empty_batch() {
        let outcome = decode_batch(&[], BatchPolicy::Abort).unwrap();
        assert_eq!(outcome, BatchOutcome::default());
    }

    #[test]
    fn test_attach_timestamps() {
        let outcome =
            decode_batch(&[log("0x11feef0"), log("0x11feef1")], BatchPolicy::Abort).unwrap();
        let timestamps = HashMap::from([(BigUint::from(18870000u64), 1703595263u64)]);

        let records = attach_timestamps(outcome.records, &timestamps);

        assert_eq!(records[0].timestamp(), Some(1703595263));
        assert_eq!(records[1].timestamp(), None);

        let stamped = vec![records[0].clone()];
        let later = HashMap::from([(BigUint::from(18870000u64), 1u64)]);
        assert_eq!(attach_timestamps(stamped, &later)[0].timestamp(), Some(1703595263));
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("skip".parse::<BatchPolicy>().unwrap(), BatchPolicy::Skip);
        assert_eq!("abort".parse::<BatchPolicy>().unwrap(), BatchPolicy::Abort);
        assert!("retry".parse::<BatchPolicy>().is_err());
        assert_eq!(
            serde_json::from_value::<BatchPolicy>(json!("skip")).unwrap(),
            BatchPolicy::Skip
        );
        assert_eq!(BatchPolicy::default(), BatchPolicy::Abort);
    }
}
