//! Order type (Market vs Limit) and order status lifecycle.

use std::fmt;

/// Discriminant of an [`Order`](crate::Order).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum OrderType {
    Market,
    Limit,
}

/// Lifecycle state of an order.
///
/// ```text
/// Pending ─┬─> Open             (limit order now resting)
///          ├─> Filled
///          ├─> PartiallyFilled  (market order only)
///          └─> NoLiquidity      (market order only)
///
/// Open ──────> Cancelled        (explicit cancel only)
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum OrderStatus {
    /// Submitted, not yet seen by a matching pass.
    #[default]
    Pending,
    /// Resting in the book, possibly after a partial match.
    Open,
    /// Market order that matched some but not all of its quantity.
    PartiallyFilled,
    /// Entire quantity matched.
    Filled,
    /// Market order that found nothing to match against.
    NoLiquidity,
    /// Removed from the book by an explicit cancel.
    Cancelled,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Open => "Open",
            OrderStatus::PartiallyFilled => "PartiallyFilled",
            OrderStatus::Filled => "Filled",
            OrderStatus::NoLiquidity => "NoLiquidity",
            OrderStatus::Cancelled => "Cancelled",
        };
        f.write_str(s)
    }
}
