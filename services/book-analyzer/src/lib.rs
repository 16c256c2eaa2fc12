//! # Book Analyzer
//!
//! Follows a limit order book for one instrument and reports, after every
//! add or reduce, what it would cost to buy (or what it would pay to sell)
//! a fixed target size against the resting orders.
//!
//! ## Pipeline
//!
//! 1. [`decoder`] turns feed records into [`OrderEvent`]s
//! 2. [`core::OrderBook`] keeps both sides sorted and tracks volume per side
//! 3. [`tradability::TradabilityState`] decides whether a direction crossed
//!    the target size and, if so, asks [`pricer`] for the fill cost
//! 4. [`replay::ReplayEngine`] strings it together and writes the report
//!
//! A report line is `timestamp B|S total`, or `timestamp B|S NA` when the
//! target size stops being fillable.

#![warn(missing_docs)]

pub mod analyzer;
pub mod config;
pub mod core;
pub mod decoder;
pub mod errors;
pub mod events;
pub mod metrics;
pub mod numeric;
pub mod pricer;
pub mod replay;
pub mod tradability;

// Re-exports for convenience
pub use crate::analyzer::BookAnalyzer;
pub use crate::config::AnalyzerConfig;
pub use crate::core::OrderBook;
pub use crate::errors::{BookError, ConfigError, DecodeError};
pub use crate::events::{Direction, Emission, OrderEvent, OrderId, Quote, Side, Timestamp};
pub use crate::metrics::{MetricsSnapshot, ProcessingMetrics};
pub use crate::replay::{ReplayConfig, ReplayEngine};
