//! Single-instrument order book with price-time priority.
//!
//! - Bids: best = highest price.
//! - Asks: best = lowest price.
//! - FIFO (time priority) within each price level.
//!
//! Each side is a `BTreeMap` from price to a `VecDeque` of resting orders,
//! giving `O(log L)` insert and best-level lookup and `O(1)` amortized
//! append / pop at the head of a level. Removing an order from the middle
//! of a level is linear in the size of that level.
//!
//! The book has no concurrency awareness of its own; callers serialize
//! access (see the `engine-intake` crate).

use std::collections::{BTreeMap, VecDeque};

use crate::order::{LimitOrder, LimitPrice, OrderKey};
use crate::order_type::OrderStatus;
use crate::side::Side;
use crate::top_of_book::{BestLevel, TopOfBookSnapshot};

type Levels = BTreeMap<LimitPrice, VecDeque<LimitOrder>>;

/// The contract the matching engine needs from a book.
///
/// `OrderBook` is the reference implementation; any structure honouring
/// price-time priority may be substituted.
pub trait PriceTimeBook {
    /// Append `order` to the FIFO at its price on its side.
    fn add_order(&mut self, order: LimitOrder);

    /// Remove the order identified by `key`, wherever it sits in its level.
    /// Returns `None` (and does nothing) if it is not in the book.
    fn remove_order(&mut self, key: OrderKey) -> Option<LimitOrder>;

    /// Most favourable resting order an incoming order on `incoming` could
    /// trade with, i.e. searched on the *opposite* side.
    ///
    /// With `limit`, returns `None` as soon as the best level fails the
    /// crossing test (ask <= limit for a Buy, bid >= limit for a Sell).
    fn best_order(&self, incoming: Side, limit: Option<LimitPrice>) -> Option<&LimitOrder>;

    /// Trade against the best crossing level for an incoming order on
    /// `incoming`, head of the FIFO first.
    ///
    /// The level's price is tested against `limit` once per call. `take` is
    /// handed each live order in turn and returns whether the incoming order
    /// wants more; orders it leaves with nothing to match are removed from the
    /// book. Returns `false` if there is no crossing level with a live order.
    fn match_best_level<F>(&mut self, incoming: Side, limit: Option<LimitPrice>, take: F) -> bool
    where
        F: FnMut(&mut LimitOrder) -> bool;

    /// Remove every level on both sides.
    fn clear(&mut self);
}

/// Book policy knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookConfig {
    /// Drop a price level as soon as its queue becomes empty. When `false`
    /// empty levels are kept around for reuse.
    pub prune_empty_levels: bool,
}

impl Default for BookConfig {
    fn default() -> Self {
        BookConfig {
            prune_empty_levels: true,
        }
    }
}

/// Price-time priority book for one instrument.
#[derive(Debug, Default)]
pub struct OrderBook {
    /// Bids: price -> FIFO queue. Sorted ascending; highest key is best.
    bids: Levels,

    /// Asks: price -> FIFO queue. Sorted ascending; lowest key is best.
    asks: Levels,

    config: BookConfig,

    /// Number of resting orders across both sides.
    order_count: usize,
}

impl OrderBook {
    /// Create an empty book that prunes empty levels.
    pub fn new() -> Self {
        OrderBook::default()
    }

    pub fn with_config(config: BookConfig) -> Self {
        OrderBook {
            config,
            ..OrderBook::default()
        }
    }

    pub fn config(&self) -> BookConfig {
        self.config
    }

    /// Remove a resting order and mark it `Cancelled`.
    ///
    /// This is the only way an order reaches the `Cancelled` state.
    pub fn cancel_order(&mut self, key: OrderKey) -> Option<LimitOrder> {
        let mut order = self.remove_order(key)?;
        order.details.status = OrderStatus::Cancelled;
        Some(order)
    }

    /// Number of resting orders on both sides.
    pub fn order_count(&self) -> usize {
        self.order_count
    }

    pub fn is_empty(&self) -> bool {
        self.order_count == 0
    }

    /// Number of non-empty price levels on `side`.
    pub fn level_count(&self, side: Side) -> usize {
        self.levels(side).values().filter(|q| !q.is_empty()).count()
    }

    /// The FIFO queue at `price` on `side`, if that level exists.
    pub fn level(&self, side: Side, price: LimitPrice) -> Option<&VecDeque<LimitOrder>> {
        self.levels(side).get(&price)
    }

    /// Non-empty bid levels, best (highest) first.
    pub fn bids(&self) -> impl Iterator<Item = (&LimitPrice, &VecDeque<LimitOrder>)> {
        self.bids.iter().rev().filter(|(_, q)| !q.is_empty())
    }

    /// Non-empty ask levels, best (lowest) first.
    pub fn asks(&self) -> impl Iterator<Item = (&LimitPrice, &VecDeque<LimitOrder>)> {
        self.asks.iter().filter(|(_, q)| !q.is_empty())
    }

    pub fn best_bid_price(&self) -> Option<LimitPrice> {
        self.bids().next().map(|(p, _)| *p)
    }

    pub fn best_ask_price(&self) -> Option<LimitPrice> {
        self.asks().next().map(|(p, _)| *p)
    }

    /// Total quantity at best bid (0 if none).
    pub fn best_bid_quantity(&self) -> u64 {
        self.bids().next().map_or(0, |(_, q)| total_quantity(q))
    }

    /// Total quantity at best ask (0 if none).
    pub fn best_ask_quantity(&self) -> u64 {
        self.asks().next().map_or(0, |(_, q)| total_quantity(q))
    }

    pub fn top_of_book(&self) -> TopOfBookSnapshot {
        let bid = self.bids().next().map(|(p, q)| BestLevel {
            price: *p,
            quantity: total_quantity(q),
        });
        let ask = self.asks().next().map(|(p, q)| BestLevel {
            price: *p,
            quantity: total_quantity(q),
        });
        TopOfBookSnapshot::new(bid, ask)
    }

    // -------------------------------------------------------------------------
    // Internal helpers
    // -------------------------------------------------------------------------

    fn levels(&self, side: Side) -> &Levels {
        match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        }
    }

    fn levels_mut(&mut self, side: Side) -> &mut Levels {
        match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        }
    }
}

impl PriceTimeBook for OrderBook {
    /// Orders with nothing left to match are not inserted.
    fn add_order(&mut self, order: LimitOrder) {
        if order.details.is_filled() {
            return;
        }
        let side = order.details.side;
        self.levels_mut(side)
            .entry(order.price)
            .or_default()
            .push_back(order);
        self.order_count += 1;
    }

    fn remove_order(&mut self, key: OrderKey) -> Option<LimitOrder> {
        let prune = self.config.prune_empty_levels;
        let levels = self.levels_mut(key.side);

        let level = levels.get_mut(&key.price)?;
        let pos = level.iter().position(|o| o.details.id == key.id)?;
        let removed = level.remove(pos);

        if prune && level.is_empty() {
            levels.remove(&key.price);
        }
        if removed.is_some() {
            self.order_count -= 1;
        }
        removed
    }

    fn best_order(&self, incoming: Side, limit: Option<LimitPrice>) -> Option<&LimitOrder> {
        match incoming {
            Side::Buy => scan(self.asks.iter(), incoming, limit),
            Side::Sell => scan(self.bids.iter().rev(), incoming, limit),
        }
    }

    fn match_best_level<F>(
        &mut self,
        incoming: Side,
        limit: Option<LimitPrice>,
        mut take: F,
    ) -> bool
    where
        F: FnMut(&mut LimitOrder) -> bool,
    {
        let Some(price) = self.best_order(incoming, limit).map(|o| o.price) else {
            return false;
        };
        let prune = self.config.prune_empty_levels;
        let levels = self.levels_mut(incoming.opposite());
        let Some(level) = levels.get_mut(&price) else {
            return false;
        };

        let mut consumed = 0;
        while let Some(maker) = level.front_mut() {
            let wants_more = maker.details.is_filled() || take(&mut *maker);
            if maker.details.is_filled() {
                level.pop_front();
                consumed += 1;
            }
            if !wants_more {
                break;
            }
        }

        if prune && level.is_empty() {
            levels.remove(&price);
        }
        self.order_count -= consumed;
        true
    }

    fn clear(&mut self) {
        self.bids.clear();
        self.asks.clear();
        self.order_count = 0;
    }
}

/// Whether a resting level at `level_price` is acceptable to an incoming
/// order on `incoming` with limit `limit`.
#[inline]
fn crosses(incoming: Side, level_price: LimitPrice, limit: LimitPrice) -> bool {
    match incoming {
        Side::Buy => level_price <= limit,
        Side::Sell => level_price >= limit,
    }
}

/// Walk levels best-first and return the first live order. Empty levels are
/// skipped; the first live level that fails the crossing test ends the scan,
/// since later levels are only worse.
fn scan<'a, I>(levels: I, incoming: Side, limit: Option<LimitPrice>) -> Option<&'a LimitOrder>
where
    I: Iterator<Item = (&'a LimitPrice, &'a VecDeque<LimitOrder>)>,
{
    for (price, level) in levels {
        let Some(order) = level.iter().find(|o| !o.details.is_filled()) else {
            continue;
        };
        return match limit {
            Some(limit) if !crosses(incoming, *price, limit) => None,
            _ => Some(order),
        };
    }
    None
}

/// Sum of remaining quantity across all orders at one price level.
fn total_quantity(orders: &VecDeque<LimitOrder>) -> u64 {
    orders.iter().map(|o| o.details.remaining_quantity).sum()
}
