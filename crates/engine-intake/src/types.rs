//! Shared types for the intake layer.
//!
//! This module defines:
//! - channel aliases between producers and the drain
//! - `OrderTicket`: a submitter's handle on one order's outcome
//! - `DrainStats` / `DrainReport`: what a drain did

use engine_core::{MatchOutcome, Order, OrderId, OrderStatus};
use tokio::sync::mpsc;
use tokio::sync::oneshot::{self, error::TryRecvError};

use crate::error::IntakeError;

/// One queued order plus the slot its outcome is delivered to.
#[derive(Debug)]
pub(crate) struct Submission {
    pub(crate) order: Order,
    pub(crate) reply: oneshot::Sender<MatchOutcome>,
}

/// Producers -> drain.
pub(crate) type OrderTx = mpsc::UnboundedSender<Submission>;
pub(crate) type OrderRx = mpsc::UnboundedReceiver<Submission>;

/// Handle returned by [`submit`](crate::IntakeQueue::submit).
///
/// The drain that matches the order fills in its outcome: final status and
/// remaining quantity for orders handed back, key and remainder for limit
/// orders left resting. Poll it with [`try_outcome`](Self::try_outcome)
/// after a drain, or await [`outcome`](Self::outcome). Dropping the ticket
/// does not affect matching.
#[derive(Debug)]
pub struct OrderTicket {
    id: OrderId,
    rx: oneshot::Receiver<MatchOutcome>,
    settled: Option<MatchOutcome>,
}

impl OrderTicket {
    pub(crate) fn new(id: OrderId, rx: oneshot::Receiver<MatchOutcome>) -> Self {
        OrderTicket {
            id,
            rx,
            settled: None,
        }
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    /// The outcome, once a drain has matched the order.
    ///
    /// `Ok(None)` while the order is still queued, `Err(Discarded)` if it
    /// was cleared from the queue.
    pub fn try_outcome(&mut self) -> Result<Option<&MatchOutcome>, IntakeError> {
        if self.settled.is_none() {
            match self.rx.try_recv() {
                Ok(outcome) => self.settled = Some(outcome),
                Err(TryRecvError::Empty) => return Ok(None),
                Err(TryRecvError::Closed) => return Err(IntakeError::Discarded(self.id)),
            }
        }
        Ok(self.settled.as_ref())
    }

    /// Status after matching, `Pending` while still queued.
    pub fn status(&mut self) -> Result<OrderStatus, IntakeError> {
        Ok(self
            .try_outcome()?
            .map_or(OrderStatus::Pending, MatchOutcome::status))
    }

    /// Wait for the drain that matches this order.
    pub async fn outcome(self) -> Result<MatchOutcome, IntakeError> {
        if let Some(outcome) = self.settled {
            return Ok(outcome);
        }
        let id = self.id;
        self.rx.await.map_err(|_| IntakeError::Discarded(id))
    }
}

/// Counts of what one or more drains did with the orders they dequeued.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainStats {
    /// Orders dequeued and matched.
    pub processed: usize,
    pub filled: usize,
    pub partially_filled: usize,
    pub no_liquidity: usize,
    /// Limit orders that ended up resting in the book.
    pub resting: usize,
}

impl DrainStats {
    pub(crate) fn record(&mut self, outcome: &MatchOutcome) {
        self.processed += 1;
        match outcome.status() {
            OrderStatus::Filled => self.filled += 1,
            OrderStatus::PartiallyFilled => self.partially_filled += 1,
            OrderStatus::NoLiquidity => self.no_liquidity += 1,
            OrderStatus::Open => self.resting += 1,
            OrderStatus::Pending | OrderStatus::Cancelled => {}
        }
    }

    pub(crate) fn merge(&mut self, other: DrainStats) {
        self.processed += other.processed;
        self.filled += other.filled;
        self.partially_filled += other.partially_filled;
        self.no_liquidity += other.no_liquidity;
        self.resting += other.resting;
    }
}

/// Result of a one-shot [`start_processing`](crate::IntakeQueue::start_processing).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainReport {
    /// This call ran the drain until the queue was observed empty.
    Drained(DrainStats),
    /// Another drain held the book; this call did nothing.
    AlreadyRunning,
}

impl DrainReport {
    /// Orders this call processed (0 for `AlreadyRunning`).
    pub fn processed(&self) -> usize {
        match self {
            DrainReport::Drained(stats) => stats.processed,
            DrainReport::AlreadyRunning => 0,
        }
    }
}
