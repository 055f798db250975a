//! engine-intake
//!
//! Concurrent intake in front of a single order book:
//! - producers submit orders from any thread without blocking
//! - a drain (one-shot or continuous) matches them one at a time
//! - the drain critical section is the only place the book is mutated

pub mod config;
pub mod error;
pub mod intake_queue;
pub mod types;

// internal: the continuous worker loop
mod engine_task;

pub use config::IntakeConfig;
pub use error::IntakeError;
pub use intake_queue::{IntakeQueue, SharedObserver};
pub use types::{DrainReport, DrainStats, OrderTicket};

pub use tokio_util::sync::CancellationToken;
