//! Common types used throughout [`ethlog`]: the decoded [`LogRecord`], the errors raised while
//! decoding one, and canonical hex formatting.

mod error;
mod hex;
mod types;

// re-exports
pub use error::*;
pub use hex::*;
pub use types::*;
