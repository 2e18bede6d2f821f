use num::BigUint;
use revm_primitives::{hex, Address, Bytes, B256};

/// A trait for converting log primitives to their canonical lowercase wire form.
pub trait ToLowerHex {
    /// Converts the value to a `0x`-prefixed lowercase hexadecimal string.
    ///
    /// Fixed-length values keep every byte, integers use the minimal number of digits.
    ///
    /// ```
    /// use ethlog_common::ToLowerHex;
    /// use num::BigUint;
    /// use revm_primitives::Address;
    ///
    /// let value = Address::ZERO;
    /// assert_eq!(value.to_lower_hex(), "0x0000000000000000000000000000000000000000");
    ///
    /// assert_eq!(BigUint::from(0u8).to_lower_hex(), "0x0");
    /// assert_eq!(BigUint::from(4096u32).to_lower_hex(), "0x1000");
    /// ```
    fn to_lower_hex(&self) -> String;
}

impl ToLowerHex for B256 {
    fn to_lower_hex(&self) -> String {
        hex::encode_prefixed(self)
    }
}

impl ToLowerHex for Address {
    fn to_lower_hex(&self) -> String {
        hex::encode_prefixed(self)
    }
}

impl ToLowerHex for Bytes {
    fn to_lower_hex(&self) -> String {
        hex::encode_prefixed(self)
    }
}

impl ToLowerHex for BigUint {
    fn to_lower_hex(&self) -> String {
        format!("0x{}", self.to_str_radix(16))
    }
}
