//! Error types for the core matching engine.
//!
//! Matching itself is infallible: "no liquidity" and "partially filled"
//! are ordinary outcomes carried by [`OrderStatus`](crate::OrderStatus),
//! not errors. The only fault is a malformed argument handed to the core
//! by a caller, which always indicates a programming error upstream.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A value outside the accepted domain, e.g. a side that is neither
    /// Buy nor Sell.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl EngineError {
    pub(crate) fn invalid_side(value: impl std::fmt::Debug) -> Self {
        EngineError::InvalidArgument(format!("side must be Buy or Sell, got {value:?}"))
    }
}
