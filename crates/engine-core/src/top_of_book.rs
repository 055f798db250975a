//! Snapshot of the best bid and ask of a book.

use crate::order::LimitPrice;

/// Best price and aggregate quantity at that price, for one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BestLevel {
    pub price: LimitPrice,
    /// Sum of `remaining_quantity` over all orders at `price`.
    pub quantity: u64,
}

/// A snapshot of top-of-book.
///
/// `None` on a side means that side has no resting liquidity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TopOfBookSnapshot {
    pub bid: Option<BestLevel>,
    pub ask: Option<BestLevel>,
}

impl TopOfBookSnapshot {
    pub fn new(bid: Option<BestLevel>, ask: Option<BestLevel>) -> Self {
        TopOfBookSnapshot { bid, ask }
    }

    /// Returns `true` if there is *no* bid and *no* ask.
    pub fn is_empty(&self) -> bool {
        self.bid.is_none() && self.ask.is_none()
    }

    /// Best ask minus best bid, when both sides are present.
    pub fn spread(&self) -> Option<rust_decimal::Decimal> {
        match (self.bid, self.ask) {
            (Some(bid), Some(ask)) => Some(ask.price.amount() - bid.price.amount()),
            _ => None,
        }
    }
}
