//! Order representation used by the book and the matching engine.
//!
//! An order is a tagged variant: [`OrderDetails`] carries everything the
//! two kinds share (identity, side, quantities, instrument, timestamp,
//! status) and [`LimitOrder`] adds its limit price. Matching dispatches on
//! the [`Order`] tag.
//!
//! Ownership of an order moves between the submitter, the intake queue and
//! the book; it is never shared.

use std::fmt;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::order_type::{OrderStatus, OrderType};
use crate::side::Side;

/// Opaque, unique order identity.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OrderId(Uuid);

impl OrderId {
    /// A fresh random id.
    pub fn new() -> Self {
        OrderId(Uuid::new_v4())
    }

    /// Deterministic id from a small integer.
    pub fn from_u128(n: u128) -> Self {
        OrderId(Uuid::from_u128(n))
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Limit price of a resting order.
///
/// Used directly as the ordered-map key for price levels.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct LimitPrice(Decimal);

impl LimitPrice {
    pub fn new(amount: Decimal) -> Self {
        LimitPrice(amount)
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }
}

impl From<Decimal> for LimitPrice {
    fn from(amount: Decimal) -> Self {
        LimitPrice(amount)
    }
}

impl From<u64> for LimitPrice {
    fn from(amount: u64) -> Self {
        LimitPrice(Decimal::from(amount))
    }
}

impl fmt::Display for LimitPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Asset class of an instrument.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum AssetType {
    #[default]
    Stock,
    Crypto,
    Forex,
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetType::Stock => f.write_str("Stock"),
            AssetType::Crypto => f.write_str("Crypto"),
            AssetType::Forex => f.write_str("Forex"),
        }
    }
}

/// The tradable instrument an order refers to.
///
/// The engine only carries this along; it never looks inside.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Instrument {
    /// Unique identifier, e.g. `"AAPL"` or `"BTC-USD"`.
    pub symbol: String,
    /// Descriptive name.
    pub name: String,
    pub asset_type: AssetType,
}

impl Instrument {
    /// A stock instrument.
    pub fn new(symbol: impl Into<String>, name: impl Into<String>) -> Arc<Self> {
        Self::with_asset_type(symbol, name, AssetType::Stock)
    }

    pub fn with_asset_type(
        symbol: impl Into<String>,
        name: impl Into<String>,
        asset_type: AssetType,
    ) -> Arc<Self> {
        Arc::new(Instrument {
            symbol: symbol.into(),
            name: name.into(),
            asset_type,
        })
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}), {}", self.name, self.symbol, self.asset_type)
    }
}

/// Fields shared by every order kind.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDetails {
    pub id: OrderId,
    pub side: Side,
    /// Original quantity.
    pub quantity: u64,
    /// Quantity still unmatched. Never increases.
    pub remaining_quantity: u64,
    pub instrument: Arc<Instrument>,
    /// Submission time, nanoseconds since the Unix epoch.
    pub timestamp_ns: u64,
    pub status: OrderStatus,
}

impl OrderDetails {
    fn new(
        id: OrderId,
        side: Side,
        quantity: u64,
        instrument: Arc<Instrument>,
        timestamp_ns: u64,
    ) -> Self {
        OrderDetails {
            id,
            side,
            quantity,
            remaining_quantity: quantity,
            instrument,
            timestamp_ns,
            status: OrderStatus::Pending,
        }
    }

    /// Returns `true` if nothing is left to match.
    #[inline]
    pub fn is_filled(&self) -> bool {
        self.remaining_quantity == 0
    }

    /// Quantity matched so far.
    #[inline]
    pub fn filled_quantity(&self) -> u64 {
        self.quantity - self.remaining_quantity
    }

    /// Match up to `qty` units, returning the quantity actually taken
    /// (`<= qty` and `<= remaining_quantity`).
    #[inline]
    pub fn fill(&mut self, qty: u64) -> u64 {
        let filled = qty.min(self.remaining_quantity);
        self.remaining_quantity -= filled;
        filled
    }
}

/// Get the current timestamp in nanoseconds since the Unix epoch.
pub fn current_timestamp_ns() -> u64 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    now.as_secs()
        .saturating_mul(1_000_000_000)
        .saturating_add(now.subsec_nanos() as u64)
}

/// Order without a price constraint: executes against the best available
/// counter-price or not at all.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketOrder {
    pub details: OrderDetails,
}

impl MarketOrder {
    pub fn new(side: Side, quantity: u64, instrument: Arc<Instrument>) -> Self {
        Self::with_id(OrderId::new(), side, quantity, instrument, current_timestamp_ns())
    }

    pub fn with_id(
        id: OrderId,
        side: Side,
        quantity: u64,
        instrument: Arc<Instrument>,
        timestamp_ns: u64,
    ) -> Self {
        MarketOrder {
            details: OrderDetails::new(id, side, quantity, instrument, timestamp_ns),
        }
    }
}

/// Order with a limit price; rests in the book if not fully matched.
#[derive(Debug, Clone, PartialEq)]
pub struct LimitOrder {
    pub details: OrderDetails,
    pub price: LimitPrice,
}

impl LimitOrder {
    pub fn new(
        side: Side,
        quantity: u64,
        instrument: Arc<Instrument>,
        price: impl Into<LimitPrice>,
    ) -> Self {
        Self::with_id(
            OrderId::new(),
            side,
            quantity,
            instrument,
            price,
            current_timestamp_ns(),
        )
    }

    pub fn with_id(
        id: OrderId,
        side: Side,
        quantity: u64,
        instrument: Arc<Instrument>,
        price: impl Into<LimitPrice>,
        timestamp_ns: u64,
    ) -> Self {
        LimitOrder {
            details: OrderDetails::new(id, side, quantity, instrument, timestamp_ns),
            price: price.into(),
        }
    }

    /// Everything the book needs to locate this order again.
    #[inline]
    pub fn key(&self) -> OrderKey {
        OrderKey {
            id: self.details.id,
            side: self.details.side,
            price: self.price,
        }
    }
}

/// Locator for a resting limit order: which side, which level, which order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct OrderKey {
    pub id: OrderId,
    pub side: Side,
    pub price: LimitPrice,
}

/// An order of either kind, as submitted to the intake queue.
#[derive(Debug, Clone, PartialEq)]
pub enum Order {
    Market(MarketOrder),
    Limit(LimitOrder),
}

impl Order {
    pub fn order_type(&self) -> OrderType {
        match self {
            Order::Market(_) => OrderType::Market,
            Order::Limit(_) => OrderType::Limit,
        }
    }

    pub fn details(&self) -> &OrderDetails {
        match self {
            Order::Market(o) => &o.details,
            Order::Limit(o) => &o.details,
        }
    }

    pub fn details_mut(&mut self) -> &mut OrderDetails {
        match self {
            Order::Market(o) => &mut o.details,
            Order::Limit(o) => &mut o.details,
        }
    }

    pub fn id(&self) -> OrderId {
        self.details().id
    }

    /// Limit price, `None` for market orders.
    pub fn price(&self) -> Option<LimitPrice> {
        match self {
            Order::Market(_) => None,
            Order::Limit(o) => Some(o.price),
        }
    }
}

impl From<MarketOrder> for Order {
    fn from(o: MarketOrder) -> Self {
        Order::Market(o)
    }
}

impl From<LimitOrder> for Order {
    fn from(o: LimitOrder) -> Self {
        Order::Limit(o)
    }
}
