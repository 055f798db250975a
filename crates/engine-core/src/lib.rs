//! engine-core
//!
//! Pure matching logic for a single instrument:
//! - order representation (market / limit) and status lifecycle
//! - price-time priority order book
//! - matching engine that sweeps one incoming order against a book
//! - observer hook for fills and status transitions
//!
//! Nothing here is thread-aware; `engine-intake` provides the
//! serialization point in front of the book.

pub mod side;
pub mod order_type;
pub mod order;
pub mod order_book;
pub mod matching_engine;
pub mod observer;
pub mod error;
pub mod top_of_book;

pub use side::Side;
pub use order_type::{OrderStatus, OrderType};

pub use order::{
    current_timestamp_ns,
    AssetType,
    Instrument,
    LimitOrder,
    LimitPrice,
    MarketOrder,
    Order,
    OrderDetails,
    OrderId,
    OrderKey,
};

pub use order_book::{BookConfig, OrderBook, PriceTimeBook};
pub use matching_engine::{LimitMatch, MatchOutcome, MatchingEngine};
pub use observer::{Fill, MatchObserver, NoopObserver, TracingObserver};
pub use error::EngineError;
pub use top_of_book::{BestLevel, TopOfBookSnapshot};
