//! Per-direction tradability tracking
//!
//! A direction is tradable while its source side holds at least the
//! target size. Crossing the threshold upward reports a price, crossing it
//! downward reports `NA` once, and while tradable only changed totals are
//! reported.

use crate::core::OrderBook;
use crate::errors::BookError;
use crate::events::{Direction, Emission, Timestamp};
use crate::numeric::approx_eq;
use crate::pricer::price_target;

/// Result of re-evaluating a direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    /// Became tradable at this total
    Opened(f64),
    /// Still tradable, total moved
    Repriced(f64),
    /// Still tradable, total unchanged; nothing to report
    Suppressed,
    /// Stopped being tradable
    Closed,
    /// Still not tradable
    Idle,
}

impl Transition {
    /// Report line for this transition, if any
    #[must_use]
    pub fn emission(self, timestamp: &Timestamp, direction: Direction) -> Option<Emission> {
        match self {
            Self::Opened(total) | Self::Repriced(total) => {
                Some(Emission::priced(timestamp.clone(), direction, total))
            }
            Self::Closed => Some(Emission::not_available(timestamp.clone(), direction)),
            Self::Suppressed | Self::Idle => None,
        }
    }
}

/// Tradability state for one direction
#[derive(Debug, Clone, PartialEq)]
pub struct TradabilityState {
    direction: Direction,
    is_tradable: bool,
    last_emitted_total: Option<f64>,
}

impl TradabilityState {
    /// Not tradable, nothing emitted yet
    #[must_use]
    pub const fn new(direction: Direction) -> Self {
        Self {
            direction,
            is_tradable: false,
            last_emitted_total: None,
        }
    }

    /// Direction tracked
    #[inline]
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Whether the target size is currently fillable
    #[inline]
    #[must_use]
    pub const fn is_tradable(&self) -> bool {
        self.is_tradable
    }

    /// Last total reported while tradable
    #[inline]
    #[must_use]
    pub const fn last_emitted_total(&self) -> Option<f64> {
        self.last_emitted_total
    }

    /// Re-evaluate after the source side's volume may have changed.
    pub fn evaluate(&mut self, book: &OrderBook, target_size: u64) -> Result<Transition, BookError> {
        let side = self.direction.source_side();
        let fillable = book.volume(side) >= target_size;

        let transition = match (self.is_tradable, fillable) {
            (false, true) => {
                let total = price_target(book, side, target_size)?;
                self.is_tradable = true;
                self.last_emitted_total = Some(total);
                Transition::Opened(total)
            }
            (true, true) => {
                let total = price_target(book, side, target_size)?;
                match self.last_emitted_total {
                    Some(last) if approx_eq(last, total) => Transition::Suppressed,
                    _ => {
                        self.last_emitted_total = Some(total);
                        Transition::Repriced(total)
                    }
                }
            }
            (true, false) => {
                self.is_tradable = false;
                Transition::Closed
            }
            (false, false) => Transition::Idle,
        };
        Ok(transition)
    }
}
