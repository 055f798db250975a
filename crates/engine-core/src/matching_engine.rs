//! Price-time matching of one incoming order against a book.
//!
//! The engine holds no book state. Each call takes an incoming order plus
//! a mutable book, sweeps the opposite side best-first and then settles the
//! incoming order's status:
//!
//! | incoming | remaining after sweep | status            | book          |
//! |----------|-----------------------|-------------------|---------------|
//! | market   | == original           | `NoLiquidity`     | untouched     |
//! | market   | 0 < r < original      | `PartiallyFilled` | makers taken  |
//! | market   | 0                     | `Filled`          | makers taken  |
//! | limit    | > 0                   | `Open`            | rests at limit|
//! | limit    | 0                     | `Filled`          | not added     |
//!
//! Execution is always at the resting order's price. The sweep works one
//! price level at a time, so each level's price is checked against a limit
//! once. Fills are reported to the injected [`MatchObserver`]; the sweep loop
//! allocates nothing.

use crate::observer::{Fill, MatchObserver, NoopObserver};
use crate::order::{LimitOrder, LimitPrice, MarketOrder, Order, OrderDetails, OrderId, OrderKey};
use crate::order_book::PriceTimeBook;
use crate::order_type::OrderStatus;

/// Result of matching a limit order.
#[derive(Debug, Clone, PartialEq)]
pub enum LimitMatch {
    /// Some quantity is left; the order now rests in the book under `key`
    /// with `remaining` still to match.
    Resting {
        key: OrderKey,
        matched: u64,
        remaining: u64,
    },
    /// Fully matched. The order never entered the book.
    Filled(LimitOrder),
}

/// Result of matching an order of either kind.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome {
    /// The order is back in the caller's hands with a final status.
    Completed(Order),
    /// A limit order now resting in the book.
    Resting {
        key: OrderKey,
        matched: u64,
        remaining: u64,
    },
}

impl MatchOutcome {
    pub fn order_id(&self) -> OrderId {
        match self {
            MatchOutcome::Completed(order) => order.id(),
            MatchOutcome::Resting { key, .. } => key.id,
        }
    }

    pub fn status(&self) -> OrderStatus {
        match self {
            MatchOutcome::Completed(order) => order.details().status,
            MatchOutcome::Resting { .. } => OrderStatus::Open,
        }
    }

    /// Quantity left unmatched when the pass finished.
    pub fn remaining_quantity(&self) -> u64 {
        match self {
            MatchOutcome::Completed(order) => order.details().remaining_quantity,
            MatchOutcome::Resting { remaining, .. } => *remaining,
        }
    }
}

/// Stateless matcher; the only thing it carries is the observer.
#[derive(Debug, Default, Clone)]
pub struct MatchingEngine<O = NoopObserver> {
    observer: O,
}

impl MatchingEngine<NoopObserver> {
    pub fn new() -> Self {
        MatchingEngine::default()
    }
}

impl<O: MatchObserver> MatchingEngine<O> {
    pub fn with_observer(observer: O) -> Self {
        MatchingEngine { observer }
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Match `order` by tag.
    pub fn process<B: PriceTimeBook>(&self, order: Order, book: &mut B) -> MatchOutcome {
        match order {
            Order::Market(mut market) => {
                self.match_market(&mut market, book);
                MatchOutcome::Completed(Order::Market(market))
            }
            Order::Limit(limit) => match self.match_limit(limit, book) {
                LimitMatch::Resting {
                    key,
                    matched,
                    remaining,
                } => MatchOutcome::Resting {
                    key,
                    matched,
                    remaining,
                },
                LimitMatch::Filled(limit) => MatchOutcome::Completed(Order::Limit(limit)),
            },
        }
    }

    /// Sweep the book with no price constraint. The order never rests.
    pub fn match_market<B: PriceTimeBook>(&self, order: &mut MarketOrder, book: &mut B) {
        let details = &mut order.details;
        let previous = details.status;

        self.sweep(details, None, book);

        details.status = if details.remaining_quantity == details.quantity {
            OrderStatus::NoLiquidity
        } else if details.remaining_quantity > 0 {
            OrderStatus::PartiallyFilled
        } else {
            OrderStatus::Filled
        };
        self.observer.on_status(details, previous);
    }

    /// Sweep the book up to the order's limit price, then rest whatever is
    /// left. The order is moved into the book if it rests.
    pub fn match_limit<B: PriceTimeBook>(
        &self,
        mut order: LimitOrder,
        book: &mut B,
    ) -> LimitMatch {
        let previous = order.details.status;
        let limit = order.price;

        let matched = self.sweep(&mut order.details, Some(limit), book);

        if order.details.remaining_quantity > 0 {
            order.details.status = OrderStatus::Open;
            self.observer.on_status(&order.details, previous);
            let key = order.key();
            let remaining = order.details.remaining_quantity;
            book.add_order(order);
            LimitMatch::Resting {
                key,
                matched,
                remaining,
            }
        } else {
            order.details.status = OrderStatus::Filled;
            self.observer.on_status(&order.details, previous);
            LimitMatch::Filled(order)
        }
    }

    // -------------------------------------------------------------------------
    // Internal helpers
    // -------------------------------------------------------------------------

    /// Consume resting liquidity level by level until the taker is done or
    /// the book has nothing acceptable left. Returns the total quantity
    /// matched.
    fn sweep<B: PriceTimeBook>(
        &self,
        taker: &mut OrderDetails,
        limit: Option<LimitPrice>,
        book: &mut B,
    ) -> u64 {
        let mut matched = 0;

        while taker.remaining_quantity > 0 {
            let found = book.match_best_level(taker.side, limit, |maker| {
                let qty = taker.remaining_quantity.min(maker.details.remaining_quantity);
                taker.fill(qty);
                maker.details.fill(qty);
                matched += qty;

                self.observer.on_fill(&Fill {
                    taker: taker.id,
                    maker: maker.details.id,
                    taker_side: taker.side,
                    price: maker.price,
                    quantity: qty,
                });

                if maker.details.is_filled() {
                    let previous = maker.details.status;
                    maker.details.status = OrderStatus::Filled;
                    self.observer.on_status(&maker.details, previous);
                }

                taker.remaining_quantity > 0
            });
            if !found {
                break;
            }
        }

        matched
    }
}
