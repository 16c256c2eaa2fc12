//! Per-instrument processing instance
//!
//! Owns the order book and both tradability states. Each event mutates
//! the book, then re-evaluates the one direction fed by the side it
//! touched.

use crate::config::AnalyzerConfig;
use crate::core::OrderBook;
use crate::errors::BookError;
use crate::events::{Direction, Emission, OrderEvent, Side};
use crate::tradability::{TradabilityState, Transition};
use tracing::debug;

/// Outcome of applying one event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Applied {
    /// Side whose volume the event touched
    pub side: Side,
    /// What happened to the direction fed by that side
    pub transition: Transition,
}

/// Order book plus tradability tracking for one instrument
#[derive(Debug, Clone)]
pub struct BookAnalyzer {
    config: AnalyzerConfig,
    book: OrderBook,
    buy: TradabilityState,
    sell: TradabilityState,
}

impl BookAnalyzer {
    /// Create an analyzer with an empty book
    #[must_use]
    pub fn new(config: AnalyzerConfig) -> Self {
        Self {
            config,
            book: OrderBook::new(),
            buy: TradabilityState::new(Direction::Buy),
            sell: TradabilityState::new(Direction::Sell),
        }
    }

    /// Apply an event and return the report line it produces, if any.
    ///
    /// `DuplicateOrder` and `UnknownOrder` leave all state untouched.
    pub fn apply(&mut self, event: &OrderEvent) -> Result<Option<Emission>, BookError> {
        let applied = self.apply_event(event)?;
        let direction = Direction::fed_by(applied.side);
        Ok(applied.transition.emission(event.timestamp(), direction))
    }

    /// Apply an event and report the raw transition.
    pub fn apply_event(&mut self, event: &OrderEvent) -> Result<Applied, BookError> {
        let side = match event {
            OrderEvent::Add {
                id,
                side,
                price,
                size,
                ..
            } => {
                self.book.insert(id.clone(), *side, *price, *size)?;
                *side
            }
            OrderEvent::Reduce { id, size, .. } => {
                let reduction = self.book.reduce(id, *size)?;
                if reduction.closed() {
                    debug!(%id, side = %reduction.side, "order closed");
                }
                reduction.side
            }
        };

        let target_size = self.config.target_size();
        let state = match Direction::fed_by(side) {
            Direction::Buy => &mut self.buy,
            Direction::Sell => &mut self.sell,
        };
        let transition = state.evaluate(&self.book, target_size)?;
        debug!(
            ts = %event.timestamp(),
            %side,
            volume = self.book.volume(side),
            best = ?self.book.best_price(side),
            ?transition,
            "event applied"
        );
        Ok(Applied { side, transition })
    }

    /// Configuration in use
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Current book
    #[inline]
    #[must_use]
    pub const fn book(&self) -> &OrderBook {
        &self.book
    }

    /// Tradability state for `direction`
    #[inline]
    #[must_use]
    pub const fn state(&self, direction: Direction) -> &TradabilityState {
        match direction {
            Direction::Buy => &self.buy,
            Direction::Sell => &self.sell,
        }
    }
}
