//! Contains logic for writing a [`LogRecord`] back to its canonical wire form.

use ethlog_common::{LogRecord, ToLowerHex};
use serde_json::{Map, Value};

use crate::decode::{ADDRESS, BLOCK_NUMBER, DATA, GAS_PRICE, GAS_USED, TOPICS, TRANSACTION_HASH};

/// Encodes a record as the object [`decode`](crate::decode()) accepts.
///
/// All hex is lowercase. Unavailable gas fields are omitted, and the timestamp is never written
/// since it is not part of a raw log.
pub fn encode(record: &LogRecord) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert(ADDRESS.to_string(), Value::String(record.address().to_lower_hex()));
    map.insert(
        TOPICS.to_string(),
        Value::Array(
            record.topics().iter().map(|topic| Value::String(topic.to_lower_hex())).collect(),
        ),
    );
    map.insert(DATA.to_string(), Value::String(record.data().to_lower_hex()));
    map.insert(BLOCK_NUMBER.to_string(), Value::String(record.block_number().to_lower_hex()));
    if let Some(gas_price) = record.gas_price() {
        map.insert(GAS_PRICE.to_string(), Value::String(gas_price.to_lower_hex()));
    }
    if let Some(gas_used) = record.gas_used() {
        map.insert(GAS_USED.to_string(), Value::String(gas_used.to_lower_hex()));
    }
    map.insert(
        TRANSACTION_HASH.to_string(),
        Value::String(record.transaction_hash().to_lower_hex()),
    );
    map
}

/// Encodes a record as a JSON object value.
pub fn encode_value(record: &LogRecord) -> Value {
    Value::Object(encode(record))
}
