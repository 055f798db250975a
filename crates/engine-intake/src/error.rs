//! Errors surfaced by the intake layer.

use engine_core::{Order, OrderId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IntakeError {
    /// The queue was shut down; the rejected order is handed back.
    #[error("intake queue is closed, order {} not accepted", .0.id())]
    Closed(Box<Order>),

    /// The order was dropped from the queue by `clear` before any drain
    /// matched it.
    #[error("order {0} was discarded before matching")]
    Discarded(OrderId),

    /// A configuration value could not be parsed.
    #[error("invalid value for {key}: {reason}")]
    Config { key: String, reason: String },
}
