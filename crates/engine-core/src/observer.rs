//! Optional hook for observing what a matching pass does.
//!
//! The matching loop itself performs no I/O. Anything that wants to see
//! fills or status transitions (logging, metrics, a notification layer)
//! implements [`MatchObserver`] and is injected into the
//! [`MatchingEngine`](crate::MatchingEngine).

use std::sync::Arc;

use crate::order::{LimitPrice, OrderDetails, OrderId};
use crate::order_type::OrderStatus;
use crate::side::Side;

/// One match between an incoming (taker) order and a resting (maker) order.
///
/// Passed by reference and never stored by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fill {
    pub taker: OrderId,
    pub maker: OrderId,
    /// Side of the incoming order.
    pub taker_side: Side,
    /// Execution price: always the resting order's price.
    pub price: LimitPrice,
    pub quantity: u64,
}

/// Receives matching events. All methods default to doing nothing.
///
/// Called synchronously from inside the matching loop, so implementations
/// should be cheap.
pub trait MatchObserver: Send + Sync {
    fn on_fill(&self, _fill: &Fill) {}

    /// `order.status` already holds the new state.
    fn on_status(&self, _order: &OrderDetails, _previous: OrderStatus) {}
}

impl<T: MatchObserver + ?Sized> MatchObserver for Arc<T> {
    fn on_fill(&self, fill: &Fill) {
        (**self).on_fill(fill)
    }

    fn on_status(&self, order: &OrderDetails, previous: OrderStatus) {
        (**self).on_status(order, previous)
    }
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl MatchObserver for NoopObserver {}

/// Emits fills and status changes as `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl MatchObserver for TracingObserver {
    fn on_fill(&self, fill: &Fill) {
        tracing::debug!(
            taker = %fill.taker,
            maker = %fill.maker,
            side = %fill.taker_side,
            price = %fill.price,
            quantity = fill.quantity,
            "matched"
        );
    }

    fn on_status(&self, order: &OrderDetails, previous: OrderStatus) {
        tracing::debug!(
            order_id = %order.id,
            instrument = %order.instrument.symbol,
            from = %previous,
            to = %order.status,
            remaining = order.remaining_quantity,
            quantity = order.quantity,
            "order status changed"
        );
    }
}
