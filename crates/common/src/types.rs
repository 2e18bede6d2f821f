use num::BigUint;
use revm_primitives::{Address, Bytes, B256};

/// A decoded event log entry.
///
/// Records are normally built by decoding a raw record, and are read-only once built. The
/// block timestamp is not part of the raw record; it is attached once with
/// [`LogRecord::with_timestamp`] before the record is handed to other readers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LogRecord {
    address: Address,
    topics: Vec<B256>,
    data: Bytes,
    block_number: BigUint,
    timestamp: Option<u64>,
    gas_price: Option<BigUint>,
    gas_used: Option<BigUint>,
    transaction_hash: B256,
}

impl LogRecord {
    /// Creates a new instance with an unknown timestamp.
    pub fn new(
        address: Address,
        topics: Vec<B256>,
        data: Bytes,
        block_number: BigUint,
        transaction_hash: B256,
    ) -> Self {
        Self {
            address,
            topics,
            data,
            block_number,
            timestamp: None,
            gas_price: None,
            gas_used: None,
            transaction_hash,
        }
    }

    /// Sets the gas price paid by the emitting transaction.
    pub fn with_gas_price(mut self, gas_price: Option<BigUint>) -> Self {
        self.gas_price = gas_price;
        self
    }

    /// Sets the gas used by the emitting transaction.
    pub fn with_gas_used(mut self, gas_used: Option<BigUint>) -> Self {
        self.gas_used = gas_used;
        self
    }

    /// Attaches the timestamp, in seconds since the UNIX epoch, of the block containing this
    /// log.
    ///
    /// Must be called at most once per record.
    pub fn with_timestamp(mut self, timestamp: u64) -> Self {
        debug_assert!(self.timestamp.is_none(), "timestamp already attached");
        self.timestamp = Some(timestamp);
        self
    }

    /// Contract address from which the log originated.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Indexed topics, in emission order. `topics()[0]` is usually the event signature hash.
    pub fn topics(&self) -> &[B256] {
        &self.topics
    }

    /// Non-indexed, ABI-encoded event payload.
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Block number from which the log originated.
    pub fn block_number(&self) -> &BigUint {
        &self.block_number
    }

    /// Block timestamp, if one has been attached.
    pub fn timestamp(&self) -> Option<u64> {
        self.timestamp
    }

    /// Block timestamp, or `0` (the UNIX epoch) when unknown.
    pub fn timestamp_or_epoch(&self) -> u64 {
        self.timestamp.unwrap_or_default()
    }

    /// Gas price of the emitting transaction, when the source provided one.
    pub fn gas_price(&self) -> Option<&BigUint> {
        self.gas_price.as_ref()
    }

    /// Gas used by the emitting transaction, when the source provided it.
    pub fn gas_used(&self) -> Option<&BigUint> {
        self.gas_used.as_ref()
    }

    /// Hash of the transaction from which the log originated.
    pub fn transaction_hash(&self) -> B256 {
        self.transaction_hash
    }
}
