//! Ethlog: decodes an already-fetched `eth_getLogs` response and prints every log in its
//! canonical wire form.
//!
//! Uses [`ethlog-decoder`] for the decoding itself; this binary only reads input, applies the
//! configured batch policy and attaches block timestamps.

mod config;

use std::{
    io::{self, Read},
    path::{Path, PathBuf},
};

use clap::Parser;
use config::{load_timestamps, Config};
use ethlog_common::LogRecord;
use ethlog_decoder::{attach_timestamps, decode_batch, encode, extract_logs, BatchPolicy};
use eyre::{eyre, Result};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Decode and canonicalize Ethereum event logs.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// `eth_getLogs` response to decode. Reads stdin when omitted.
    input: Option<PathBuf>,
    /// Config file. Defaults to `ethlog.json` in the working directory, if present.
    #[arg(long)]
    config: Option<PathBuf>,
    /// What to do with logs that fail to decode: `abort` or `skip`.
    #[arg(long)]
    policy: Option<BatchPolicy>,
    /// JSON object mapping hex block numbers to block timestamps.
    #[arg(long)]
    timestamps: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Enable backtraces unless a RUST_BACKTRACE value has already been explicitly provided.
    if std::env::var_os("RUST_BACKTRACE").is_none() {
        std::env::set_var("RUST_BACKTRACE", "1");
    }

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config =
        Config::load(args.config.as_deref())?.with_overrides(args.policy, args.timestamps);

    let document = read_document(args.input.as_deref())?;
    let outcome = decode_batch(extract_logs(&document)?, config.policy)?;
    info!(
        decoded = outcome.records.len(),
        skipped = outcome.skipped.len(),
        policy = %config.policy,
        "Decoded logs"
    );

    let records = match &config.timestamps {
        Some(path) => attach_timestamps(outcome.records, &load_timestamps(path)?),
        None => outcome.records,
    };

    let output = records.iter().map(output_entry).collect::<Vec<Value>>();

    serde_json::to_writer_pretty(io::stdout().lock(), &output)
        .map_err(|e| eyre!("failed to write output: {e}"))?;
    println!();

    Ok(())
}

/// Encodes a record for output. The timestamp is not part of the wire record, so it is appended
/// here, when known.
fn output_entry(record: &LogRecord) -> Value {
    let mut entry = encode(record);
    if let Some(timestamp) = record.timestamp() {
        entry.insert("timestamp".to_string(), Value::from(timestamp));
    }
    Value::Object(entry)
}

fn read_document(input: Option<&Path>) -> Result<Value> {
    let contents = match input {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| eyre!("failed to read `{}`: {}", path.display(), e))?,
        None => {
            let mut contents = String::new();
            io::stdin()
                .read_to_string(&mut contents)
                .map_err(|e| eyre!("failed to read stdin: {e}"))?;
            contents
        }
    };

    serde_json::from_str(&contents).map_err(|e| eyre!("input is not valid JSON: {e}"))
}

#[cfg(test)]
mod tests {
    use ethlog_decoder::decode_value;
    use serde_json::json;

    use super::output_entry;

    fn raw_log() -> serde_json::Value {
        json!({
            "address": "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2",
            "topics": ["0xe1fffcc4923d04b559f4d29a8bfc6cda04eb5b0d3c460751c2402c5c5cc9109c"],
            "data": "0x",
            "blockNumber": "0x11feef1",
            "transactionHash": "0xd02dc650cc9a34def3d7a78808a36a8cb2e292613c2989f4313155e8e4af9b0f",
        })
    }

    #[test]
    fn test_output_entry_appends_known_timestamp() {
        let record = decode_value(&raw_log()).unwrap().with_timestamp(1703595275);

        let mut expected = raw_log();
        expected["timestamp"] = json!(1703595275);
        assert_eq!(output_entry(&record), expected);
    }

    #[test]
    fn test_output_entry_omits_unknown_timestamp() {
        let record = decode_value(&raw_log()).unwrap();

        let entry = output_entry(&record);
        assert!(entry.get("timestamp").is_none());
        assert_eq!(entry, raw_log());
    }
}
