//! Decoding of raw `eth_getLogs` entries into [`ethlog_common::LogRecord`]s, and encoding them
//! back to their canonical wire form.
//!
//! Every function here is synchronous and pure, and may be called from any number of threads.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

/// Contains logic for decoding logs in bulk.
mod batch;
mod decode;
mod encode;

// re-exports
pub use batch::*;
pub use decode::*;
pub use encode::*;
