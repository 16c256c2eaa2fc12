//! Order store and aggregate volume tracking
//!
//! Each side keeps its resting orders in a single vector sorted ascending
//! by price. Closed orders are tombstoned in place rather than removed, so
//! a reduction never shifts the vector; tombstones are dropped in bulk once
//! they make up half of a side. Aggregate volume per side is adjusted on
//! every mutation and never recomputed by scanning.
//!
//! Equal prices are ordered so that the walk from the best price visits
//! the earliest order first on both sides.

use crate::errors::BookError;
use crate::events::{OrderId, Side};
use ahash::AHashMap;
use std::cmp::Ordering;

/// Tombstone count below which a side is never compacted
pub const MIN_COMPACTION_TOMBSTONES: usize = 16;

/// Individual resting order
#[derive(Debug, Clone, PartialEq)]
pub struct RestingOrder {
    /// Order identifier
    pub id: OrderId,
    /// Side of the book
    pub side: Side,
    /// Limit price
    pub price: f64,
    /// Remaining size
    pub size: u64,
    /// Insertion sequence, unique per book
    pub sequence: u64,
    /// False once the order has been reduced to zero
    pub active: bool,
}

/// Where an active order lives
#[derive(Debug, Clone, Copy, PartialEq)]
struct OrderLocation {
    side: Side,
    price: f64,
    sequence: u64,
}

/// Outcome of a successful reduce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reduction {
    /// Side the order rested on
    pub side: Side,
    /// Units actually taken off the order
    pub removed: u64,
    /// Size left on the order
    pub remaining: u64,
}

impl Reduction {
    /// Whether the order was closed by this reduce
    #[inline]
    #[must_use]
    pub const fn closed(&self) -> bool {
        self.remaining == 0
    }
}

/// Slot ordering within a side: price ascending, then by sequence so that
/// the best-first walk meets earlier orders first.
#[inline]
fn slot_order(side: Side, price: f64, sequence: u64, other_price: f64, other_sequence: u64) -> Ordering {
    price.total_cmp(&other_price).then_with(|| match side {
        Side::Ask => sequence.cmp(&other_sequence),
        Side::Bid => other_sequence.cmp(&sequence),
    })
}

/// One side of the book
#[derive(Debug, Clone)]
pub struct SideBook {
    side: Side,
    /// Sorted ascending by price, tombstones included
    entries: Vec<RestingOrder>,
    /// Sum of active sizes
    volume: u64,
    /// Number of active entries
    active: usize,
}

impl SideBook {
    /// Create an empty side
    #[must_use]
    pub const fn new(side: Side) -> Self {
        Self {
            side,
            entries: Vec::new(),
            volume: 0,
            active: 0,
        }
    }

    /// Which side this is
    #[inline]
    #[must_use]
    pub const fn side(&self) -> Side {
        self.side
    }

    /// Aggregate active volume
    #[inline]
    #[must_use]
    pub const fn volume(&self) -> u64 {
        self.volume
    }

    /// Number of active orders
    #[inline]
    #[must_use]
    pub const fn active_count(&self) -> usize {
        self.active
    }

    /// Number of tombstoned entries still stored
    #[inline]
    #[must_use]
    pub fn tombstones(&self) -> usize {
        self.entries.len() - self.active
    }

    /// All stored entries in ascending price order, tombstones included
    #[inline]
    #[must_use]
    pub fn entries(&self) -> &[RestingOrder] {
        &self.entries
    }

    /// Walk active orders from the best price outward
    #[inline]
    #[must_use]
    pub fn best_first(&self) -> BestFirst<'_> {
        BestFirst {
            side: self.side,
            inner: self.entries.iter(),
        }
    }

    fn insert(&mut self, order: RestingOrder) {
        let pos = self.entries.partition_point(|o| {
            slot_order(self.side, o.price, o.sequence, order.price, order.sequence) == Ordering::Less
        });
        self.volume += order.size;
        self.active += 1;
        self.entries.insert(pos, order);
    }

    fn position(&self, price: f64, sequence: u64) -> Option<usize> {
        let pos = self.entries.partition_point(|o| {
            slot_order(self.side, o.price, o.sequence, price, sequence) == Ordering::Less
        });
        self.entries
            .get(pos)
            .filter(|o| o.sequence == sequence)
            .map(|_| pos)
    }

    fn reduce_at(&mut self, pos: usize, amount: u64) -> Reduction {
        let order = &mut self.entries[pos];
        let removed = amount.min(order.size);
        order.size -= removed;
        self.volume -= removed;
        if order.size == 0 {
            order.active = false;
            self.active -= 1;
        }
        Reduction {
            side: self.side,
            removed,
            remaining: order.size,
        }
    }

    /// Drop every tombstone, keeping the relative order of active entries
    pub fn compact(&mut self) {
        self.entries.retain(|o| o.active);
    }

    fn needs_compaction(&self) -> bool {
        let tombstones = self.tombstones();
        tombstones >= MIN_COMPACTION_TOMBSTONES && tombstones * 2 >= self.entries.len()
    }
}

/// Best-price-first iterator over one side's active orders
#[derive(Debug, Clone)]
pub struct BestFirst<'a> {
    side: Side,
    inner: std::slice::Iter<'a, RestingOrder>,
}

impl<'a> Iterator for BestFirst<'a> {
    type Item = &'a RestingOrder;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let order = match self.side {
                Side::Ask => self.inner.next()?,
                Side::Bid => self.inner.next_back()?,
            };
            if order.active {
                return Some(order);
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.inner.len()))
    }
}

impl std::iter::FusedIterator for BestFirst<'_> {}

/// Order book for a single instrument
#[derive(Debug, Clone)]
pub struct OrderBook {
    /// Bid side (buyers)
    bids: SideBook,
    /// Ask side (sellers)
    asks: SideBook,
    /// Active order id to its slot
    index: AHashMap<OrderId, OrderLocation>,
    /// Next insertion sequence
    next_sequence: u64,
}

impl Default for OrderBook {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderBook {
    /// Create an empty book
    #[must_use]
    pub fn new() -> Self {
        Self {
            bids: SideBook::new(Side::Bid),
            asks: SideBook::new(Side::Ask),
            index: AHashMap::new(),
            next_sequence: 0,
        }
    }

    /// Add a resting order.
    ///
    /// Fails if `id` belongs to an order that is still active, or if the
    /// side's aggregate volume could not hold `size` more units. An id
    /// whose order was closed may be reused.
    pub fn insert(&mut self, id: OrderId, side: Side, price: f64, size: u64) -> Result<(), BookError> {
        debug_assert!(size > 0, "resting orders must have a positive size");
        if self.index.contains_key(&id) {
            return Err(BookError::DuplicateOrder(id));
        }
        let volume = self.volume(side);
        if volume.checked_add(size).is_none() {
            return Err(BookError::VolumeOverflow { id, side, volume, size });
        }

        let sequence = self.next_sequence;
        self.next_sequence += 1;

        self.index.insert(
            id.clone(),
            OrderLocation {
                side,
                price,
                sequence,
            },
        );
        self.side_mut(side).insert(RestingOrder {
            id,
            side,
            price,
            size,
            sequence,
            active: true,
        });
        Ok(())
    }

    /// Take up to `amount` units off an active order.
    ///
    /// Reducing by more than the remaining size closes the order; the excess
    /// is ignored. Unknown ids leave the book untouched.
    pub fn reduce(&mut self, id: &OrderId, amount: u64) -> Result<Reduction, BookError> {
        let location = *self
            .index
            .get(id)
            .ok_or_else(|| BookError::UnknownOrder(id.clone()))?;

        let book = self.side_mut(location.side);
        let Some(pos) = book.position(location.price, location.sequence) else {
            // index and side disagree; treat the id as gone
            self.index.remove(id);
            return Err(BookError::UnknownOrder(id.clone()));
        };

        let reduction = book.reduce_at(pos, amount);
        if reduction.closed() {
            if book.needs_compaction() {
                book.compact();
            }
            self.index.remove(id);
        }
        Ok(reduction)
    }

    /// Active orders on `side`, best price first
    #[inline]
    #[must_use]
    pub fn active_orders_from(&self, side: Side) -> BestFirst<'_> {
        self.side(side).best_first()
    }

    /// Aggregate active volume on `side`
    #[inline]
    #[must_use]
    pub const fn volume(&self, side: Side) -> u64 {
        match side {
            Side::Bid => self.bids.volume,
            Side::Ask => self.asks.volume,
        }
    }

    /// Number of active orders on `side`
    #[inline]
    #[must_use]
    pub const fn active_count(&self, side: Side) -> usize {
        match side {
            Side::Bid => self.bids.active,
            Side::Ask => self.asks.active,
        }
    }

    /// Total number of active orders
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Check if no order is resting
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Look up an active order
    #[must_use]
    pub fn get(&self, id: &OrderId) -> Option<&RestingOrder> {
        let location = self.index.get(id)?;
        let book = self.side(location.side);
        book.position(location.price, location.sequence)
            .map(|pos| &book.entries[pos])
    }

    /// Best price on `side`
    #[must_use]
    pub fn best_price(&self, side: Side) -> Option<f64> {
        self.active_orders_from(side).next().map(|o| o.price)
    }

    /// Borrow one side
    #[inline]
    #[must_use]
    pub const fn side(&self, side: Side) -> &SideBook {
        match side {
            Side::Bid => &self.bids,
            Side::Ask => &self.asks,
        }
    }

    /// Drop tombstones on `side` immediately
    pub fn compact(&mut self, side: Side) {
        self.side_mut(side).compact();
    }

    #[inline]
    fn side_mut(&mut self, side: Side) -> &mut SideBook {
        match side {
            Side::Bid => &mut self.bids,
            Side::Ask => &mut self.asks,
        }
    }
}
