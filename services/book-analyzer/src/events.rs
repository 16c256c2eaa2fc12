//! Event types flowing into and out of the analyzer
//!
//! Inbound, the book consumes [`OrderEvent`]s: an order is added to one
//! side or an existing order is reduced. Outbound, the analyzer produces
//! [`Emission`]s, one report line each.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Side of the order book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Side {
    /// Resting buyers
    Bid = 0,
    /// Resting sellers
    Ask = 1,
}

impl Side {
    /// Parse the feed's side code (`B` for bids, `S` for asks)
    #[inline]
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "B" => Some(Self::Bid),
            "S" => Some(Self::Ask),
            _ => None,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bid => f.write_str("bid"),
            Self::Ask => f.write_str("ask"),
        }
    }
}

/// Direction of the hypothetical trade being priced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Direction {
    /// Buying the target size, which needs resting asks
    Buy = 0,
    /// Selling the target size, which needs resting bids
    Sell = 1,
}

impl Direction {
    /// The book side that supplies liquidity for this direction
    #[inline]
    #[must_use]
    pub const fn source_side(self) -> Side {
        match self {
            Self::Buy => Side::Ask,
            Self::Sell => Side::Bid,
        }
    }

    /// The direction whose liquidity comes from `side`
    #[inline]
    #[must_use]
    pub const fn fed_by(side: Side) -> Self {
        match side {
            Side::Ask => Self::Buy,
            Side::Bid => Self::Sell,
        }
    }

    /// Report code (`B` or `S`)
    #[inline]
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Buy => "B",
            Self::Sell => "S",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Feed timestamp token, echoed back exactly as it was read
///
/// The feed's timestamp is never interpreted as a time, so leading zeros
/// and non-integer forms survive into the report.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(Box<str>);

impl Timestamp {
    /// Wrap a raw timestamp token
    pub fn new(raw: impl Into<Box<str>>) -> Self {
        Self(raw.into())
    }

    /// The token as read from the feed
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u64> for Timestamp {
    fn from(value: u64) -> Self {
        Self(value.to_string().into_boxed_str())
    }
}

impl From<&str> for Timestamp {
    fn from(raw: &str) -> Self {
        Self(raw.into())
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque order identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OrderId(String);

impl OrderId {
    /// Create an identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for OrderId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for OrderId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Decoded feed event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OrderEvent {
    /// A new resting order
    Add {
        /// Feed timestamp
        timestamp: Timestamp,
        /// Order identifier
        id: OrderId,
        /// Book side
        side: Side,
        /// Limit price, already normalised to two decimals
        price: f64,
        /// Order size, always positive
        size: u64,
    },
    /// A size reduction of an existing order
    Reduce {
        /// Feed timestamp
        timestamp: Timestamp,
        /// Order identifier
        id: OrderId,
        /// Units to remove, always positive
        size: u64,
    },
}

impl OrderEvent {
    /// Convenience constructor for an add
    pub fn add(timestamp: u64, id: impl Into<OrderId>, side: Side, price: f64, size: u64) -> Self {
        Self::Add {
            timestamp: Timestamp::from(timestamp),
            id: id.into(),
            side,
            price,
            size,
        }
    }

    /// Convenience constructor for a reduce
    pub fn reduce(timestamp: u64, id: impl Into<OrderId>, size: u64) -> Self {
        Self::Reduce {
            timestamp: Timestamp::from(timestamp),
            id: id.into(),
            size,
        }
    }

    /// Timestamp of the event
    #[inline]
    #[must_use]
    pub const fn timestamp(&self) -> &Timestamp {
        match self {
            Self::Add { timestamp, .. } | Self::Reduce { timestamp, .. } => timestamp,
        }
    }

    /// Order the event refers to
    #[inline]
    #[must_use]
    pub const fn id(&self) -> &OrderId {
        match self {
            Self::Add { id, .. } | Self::Reduce { id, .. } => id,
        }
    }
}

/// Value carried by an emission
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Quote {
    /// Total cost (or proceeds) of filling the target size
    Total(f64),
    /// The target size can no longer be filled
    NotAvailable,
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Total(total) => write!(f, "{total:.2}"),
            Self::NotAvailable => f.write_str("NA"),
        }
    }
}

/// One line of the report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Emission {
    /// Timestamp of the event that caused the emission
    pub timestamp: Timestamp,
    /// Direction being reported
    pub direction: Direction,
    /// Priced total or the not-available marker
    pub quote: Quote,
}

impl Emission {
    /// Priced emission
    #[must_use]
    pub fn priced(timestamp: Timestamp, direction: Direction, total: f64) -> Self {
        Self {
            timestamp,
            direction,
            quote: Quote::Total(total),
        }
    }

    /// Not-available emission
    #[must_use]
    pub fn not_available(timestamp: Timestamp, direction: Direction) -> Self {
        Self {
            timestamp,
            direction,
            quote: Quote::NotAvailable,
        }
    }

    /// Total if this emission carries one
    #[must_use]
    pub const fn total(&self) -> Option<f64> {
        match self.quote {
            Quote::Total(total) => Some(total),
            Quote::NotAvailable => None,
        }
    }
}

impl fmt::Display for Emission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.timestamp, self.direction, self.quote)
    }
}
