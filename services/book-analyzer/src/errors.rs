//! Error types for the analyzer

use crate::events::{OrderId, Side};
use thiserror::Error;

/// Errors raised while applying events to the book
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookError {
    /// An add reused the identifier of an order that is still resting
    #[error("Duplicate order id: {0} is already active")]
    DuplicateOrder(OrderId),

    /// A reduce referenced an order that is not resting
    #[error("Unknown order id: {0}")]
    UnknownOrder(OrderId),

    /// An add would push a side's aggregate volume past `u64::MAX`
    #[error("Volume overflow on {side} side: order {id} of size {size} on top of {volume}")]
    VolumeOverflow {
        /// Order that was refused
        id: OrderId,
        /// Side it targeted
        side: Side,
        /// Aggregate volume before the add
        volume: u64,
        /// Size of the refused order
        size: u64,
    },

    /// The pricer was asked to fill more than the side holds
    #[error("Insufficient liquidity on {side} side: need {needed}, available {available}")]
    InsufficientLiquidity {
        /// Side that was walked
        side: Side,
        /// Requested fill size
        needed: u64,
        /// Aggregate volume on that side
        available: u64,
    },
}

impl BookError {
    /// Whether processing must stop.
    ///
    /// Stream inconsistencies drop the offending event; a pricing
    /// precondition failure means the book's bookkeeping is broken.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::InsufficientLiquidity { .. })
    }
}

/// Errors raised while decoding a feed record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Record has neither 4 nor 6 fields
    #[error("Unexpected field count {count} in record {record:?}")]
    FieldCount {
        /// Number of fields found
        count: usize,
        /// The raw record
        record: String,
    },

    /// Operation code is unknown or does not match the record shape
    #[error("Unsupported operation {code:?} for a {fields}-field record")]
    Operation {
        /// Operation code found
        code: String,
        /// Number of fields in the record
        fields: usize,
    },

    /// Side code is neither `B` nor `S`
    #[error("Unknown side code {0:?}")]
    Side(String),

    /// Price is not a finite non-negative number
    #[error("Invalid price {0:?}")]
    Price(String),

    /// Size is not a positive integer
    #[error("Invalid size {0:?}")]
    Size(String),
}

/// Errors raised while validating startup configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Target size must be strictly positive
    #[error("Target size must be > 0, got {0}")]
    NonPositiveTargetSize(i64),
}
