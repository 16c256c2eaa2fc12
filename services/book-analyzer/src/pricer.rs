//! Cost of filling a target size against one side of the book
//!
//! The walk starts at the best price and consumes orders until exactly
//! `target_size` units are taken. Only the last order touched may be
//! partially consumed, and nothing past it is examined.

use crate::core::OrderBook;
use crate::errors::BookError;
use crate::events::{OrderId, Side};
use crate::numeric::round_price;

/// One leg of a fill
#[derive(Debug, Clone, PartialEq)]
pub struct Fill {
    /// Order consumed
    pub id: OrderId,
    /// Price of that order
    pub price: f64,
    /// Units taken from it
    pub consumed: u64,
}

/// Orders and quantities that fill `target_size` on `side`, best price
/// first.
///
/// Requires the side's aggregate volume to cover `target_size`.
pub fn fill_plan(book: &OrderBook, side: Side, target_size: u64) -> Result<Vec<Fill>, BookError> {
    check_liquidity(book, side, target_size)?;

    let mut fills = Vec::new();
    let mut remaining = target_size;
    for order in book.active_orders_from(side) {
        if remaining == 0 {
            break;
        }
        let consumed = remaining.min(order.size);
        remaining -= consumed;
        fills.push(Fill {
            id: order.id.clone(),
            price: order.price,
            consumed,
        });
    }
    Ok(fills)
}

/// Total cost of filling `target_size` from `side`, rounded to cents.
///
/// Requires the side's aggregate volume to cover `target_size`; the
/// tradability check runs first, so a shortfall here is a bookkeeping
/// defect.
pub fn price_target(book: &OrderBook, side: Side, target_size: u64) -> Result<f64, BookError> {
    check_liquidity(book, side, target_size)?;

    let mut total = 0.0;
    let mut remaining = target_size;
    for order in book.active_orders_from(side) {
        let consumed = remaining.min(order.size);
        total += order.price * consumed as f64;
        remaining -= consumed;
        if remaining == 0 {
            break;
        }
    }

    if remaining > 0 {
        // aggregate volume claimed more than the walk found
        return Err(BookError::InsufficientLiquidity {
            side,
            needed: target_size,
            available: target_size - remaining,
        });
    }
    Ok(round_price(total))
}

fn check_liquidity(book: &OrderBook, side: Side, target_size: u64) -> Result<(), BookError> {
    let available = book.volume(side);
    if available < target_size {
        return Err(BookError::InsufficientLiquidity {
            side,
            needed: target_size,
            available,
        });
    }
    Ok(())
}
