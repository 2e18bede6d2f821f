//! Contains logic for turning a raw `eth_getLogs` entry into a [`LogRecord`].

use ethlog_common::{DecodeError, ExpectedLength, LogRecord};
use num::BigUint;
use revm_primitives::{hex, Address, Bytes, B256};
use serde_json::{Map, Value};
use tracing::trace;

pub(crate) const ADDRESS: &str = "address";
pub(crate) const TOPICS: &str = "topics";
pub(crate) const DATA: &str = "data";
pub(crate) const BLOCK_NUMBER: &str = "blockNumber";
pub(crate) const GAS_PRICE: &str = "gasPrice";
pub(crate) const GAS_USED: &str = "gasUsed";
pub(crate) const TRANSACTION_HASH: &str = "transactionHash";

/// Decodes a raw log object into a [`LogRecord`].
///
/// Keys other than the ones a log record is built from are ignored. The returned record has no
/// timestamp; see [`LogRecord::with_timestamp`].
pub fn decode(raw: &Map<String, Value>) -> Result<LogRecord, DecodeError> {
    let address = Address::from_slice(&decode_fixed(ADDRESS, required_str(raw, ADDRESS)?, 20)?);

    let topics = raw
        .get(TOPICS)
        .and_then(Value::as_array)
        .ok_or(DecodeError::MissingField(TOPICS))?
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            entry
                .as_str()
                .ok_or(DecodeError::MalformedHex(TOPICS))
                .and_then(|topic| decode_hash(TOPICS, topic))
                .map_err(|e| DecodeError::InvalidTopicEntry { index, source: Box::new(e) })
        })
        .collect::<Result<Vec<B256>, DecodeError>>()?;

    let data = decode_data(DATA, required_str(raw, DATA)?)?;
    let block_number = decode_quantity(BLOCK_NUMBER, required_str(raw, BLOCK_NUMBER)?)?;
    let gas_price =
        optional_str(raw, GAS_PRICE)?.map(|v| decode_quantity(GAS_PRICE, v)).transpose()?;
    let gas_used = optional_str(raw, GAS_USED)?.map(|v| decode_quantity(GAS_USED, v)).transpose()?;
    let transaction_hash = decode_hash(TRANSACTION_HASH, required_str(raw, TRANSACTION_HASH)?)?;

    let record = LogRecord::new(address, topics, data, block_number, transaction_hash)
        .with_gas_price(gas_price)
        .with_gas_used(gas_used);
    trace!(
        address = %record.address(),
        block_number = %record.block_number(),
        topics = record.topics().len(),
        "Decoded log"
    );
    Ok(record)
}

/// Decodes a raw log given as an arbitrary JSON value.
///
/// Anything other than a JSON object carries none of the required keys, so it is reported as
/// missing the first of them, `address`.
pub fn decode_value(raw: &Value) -> Result<LogRecord, DecodeError> {
    raw.as_object().ok_or(DecodeError::MissingField(ADDRESS)).and_then(decode)
}

/// Decodes a `0x`-prefixed hex integer of any width.
///
/// Leading zeros are accepted; at least one digit is required.
pub fn decode_quantity(key: &'static str, value: &str) -> Result<BigUint, DecodeError> {
    let digits = hex_digits(key, value)?;
    check_length(key, digits, ExpectedLength::AtLeast(1))?;
    BigUint::parse_bytes(digits.as_bytes(), 16).ok_or(DecodeError::MalformedHex(key))
}

/// Decodes a `0x`-prefixed 32-byte hash.
pub fn decode_hash(key: &'static str, value: &str) -> Result<B256, DecodeError> {
    decode_fixed(key, value, 32).map(|bytes| B256::from_slice(&bytes))
}

fn decode_data(key: &'static str, value: &str) -> Result<Bytes, DecodeError> {
    let digits = hex_digits(key, value)?;
    check_length(key, digits, ExpectedLength::Even)?;
    hex::decode(digits).map(Bytes::from).map_err(|_| DecodeError::MalformedHex(key))
}

/// Decodes exactly `len` bytes. The caller's slice conversions rely on this length check.
fn decode_fixed(key: &'static str, value: &str, len: usize) -> Result<Vec<u8>, DecodeError> {
    let digits = hex_digits(key, value)?;
    check_length(key, digits, ExpectedLength::Exact(len * 2))?;
    hex::decode(digits).map_err(|_| DecodeError::MalformedHex(key))
}

/// Strips the `0x` prefix (in either case) and returns the remaining hex digits.
fn hex_digits<'a>(key: &'static str, value: &'a str) -> Result<&'a str, DecodeError> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .ok_or(DecodeError::MalformedHex(key))?;

    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(DecodeError::MalformedHex(key));
    }

    Ok(digits)
}

fn check_length(
    key: &'static str,
    digits: &str,
    expected: ExpectedLength,
) -> Result<(), DecodeError> {
    let actual = digits.len();
    let valid = match expected {
        ExpectedLength::Exact(n) => actual == n,
        ExpectedLength::Even => actual % 2 == 0,
        ExpectedLength::AtLeast(n) => actual >= n,
    };

    if valid {
        Ok(())
    } else {
        Err(DecodeError::InvalidLength { key, expected, actual })
    }
}

fn required_str<'a>(
    raw: &'a Map<String, Value>,
    key: &'static str,
) -> Result<&'a str, DecodeError> {
    raw.get(key).and_then(Value::as_str).ok_or(DecodeError::MissingField(key))
}

/// `null` counts as absent. Any other non-string value is rejected rather than ignored.
fn optional_str<'a>(
    raw: &'a Map<String, Value>,
    key: &'static str,
) -> Result<Option<&'a str>, DecodeError> {
    match raw.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value)),
        Some(_) => Err(DecodeError::MalformedHex(key)),
    }
}
