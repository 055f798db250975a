//! The concurrency boundary in front of the order book.
//!
//! - Any number of producers call [`IntakeQueue::submit`]; it only pushes
//!   onto an unbounded MPSC channel and never waits for matching.
//! - Matching happens in a *drain*: one critical section that owns the
//!   channel receiver and the book, dequeues orders in channel order and
//!   runs the matching engine on each until the channel is empty.
//! - At most one drain runs at a time. A one-shot drain that finds the
//!   critical section taken returns [`DrainReport::AlreadyRunning`]
//!   instead of waiting.
//!
//! Orders are matched in the order their `submit` calls completed. Two
//! producers racing to submit may land in either order. Each `submit`
//! returns an [`OrderTicket`] the drain resolves with that order's
//! [`MatchOutcome`](engine_core::MatchOutcome).

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use engine_core::{
    LimitOrder, MatchObserver, MatchingEngine, NoopObserver, Order, OrderBook, OrderKey,
    TopOfBookSnapshot, TracingObserver,
};
use parking_lot::Mutex;
use tokio::sync::{mpsc, oneshot, Notify};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

use crate::config::IntakeConfig;
use crate::engine_task;
use crate::error::IntakeError;
use crate::types::{DrainReport, DrainStats, OrderRx, OrderTicket, OrderTx, Submission};

/// Observer type used by queues built from configuration.
pub type SharedObserver = Arc<dyn MatchObserver>;

/// Everything guarded by the drain critical section.
pub(crate) struct DrainState {
    pub(crate) rx: OrderRx,
    pub(crate) book: OrderBook,
}

pub(crate) struct Shared<O> {
    tx: OrderTx,
    pub(crate) drain: Mutex<DrainState>,
    engine: MatchingEngine<O>,

    /// Submitted but not yet dequeued. Incremented before the send, so it
    /// may briefly over-count, never under-count.
    pending: AtomicUsize,

    /// Wakes the continuous worker after a submit.
    pub(crate) wakeup: Notify,
    pub(crate) idle_wait: Duration,
}

impl<O: MatchObserver> Shared<O> {
    /// Dequeue and match until the channel is empty. Caller holds the
    /// drain lock for the whole call.
    pub(crate) fn drain_locked(&self, state: &mut DrainState) -> DrainStats {
        let mut stats = DrainStats::default();

        while let Ok(Submission { order, reply }) = state.rx.try_recv() {
            self.pending.fetch_sub(1, Ordering::AcqRel);
            trace!(order_id = %order.id(), kind = ?order.order_type(), "dequeued");

            let outcome = self.engine.process(order, &mut state.book);
            stats.record(&outcome);
            // The submitter may have dropped its ticket.
            let _ = reply.send(outcome);
        }

        stats
    }
}

/// Handle to an intake queue and the book it serializes access to.
///
/// Cloning is cheap; all clones share the same queue and book.
pub struct IntakeQueue<O = NoopObserver> {
    shared: Arc<Shared<O>>,
}

impl<O> Clone for IntakeQueue<O> {
    fn clone(&self) -> Self {
        IntakeQueue {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl IntakeQueue<NoopObserver> {
    /// Queue in front of `book`, with no observer and default settings.
    pub fn new(book: OrderBook) -> Self {
        Self::with_engine(book, MatchingEngine::new(), IntakeConfig::default().idle_wait)
    }
}

impl IntakeQueue<SharedObserver> {
    /// Build an empty book and queue from `config`.
    pub fn from_config(config: &IntakeConfig) -> Self {
        let observer: SharedObserver = if config.trace_events {
            Arc::new(TracingObserver)
        } else {
            Arc::new(NoopObserver)
        };
        Self::with_engine(
            OrderBook::with_config(config.book),
            MatchingEngine::with_observer(observer),
            config.idle_wait,
        )
    }
}

impl<O: MatchObserver + 'static> IntakeQueue<O> {
    pub fn with_engine(book: OrderBook, engine: MatchingEngine<O>, idle_wait: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        IntakeQueue {
            shared: Arc::new(Shared {
                tx,
                drain: Mutex::new(DrainState { rx, book }),
                engine,
                pending: AtomicUsize::new(0),
                wakeup: Notify::new(),
                idle_wait,
            }),
        }
    }

    /// Enqueue an order. Never blocks; safe from any thread.
    ///
    /// The returned ticket reports the order's outcome once a drain has
    /// matched it. Fails only after [`shutdown`](Self::shutdown), handing
    /// the order back.
    pub fn submit(&self, order: impl Into<Order>) -> Result<OrderTicket, IntakeError> {
        let order = order.into();
        let order_id = order.id();
        let (reply, rx) = oneshot::channel();

        self.shared.pending.fetch_add(1, Ordering::AcqRel);
        let submission = Submission { order, reply };
        if let Err(mpsc::error::SendError(rejected)) = self.shared.tx.send(submission) {
            self.shared.pending.fetch_sub(1, Ordering::AcqRel);
            return Err(IntakeError::Closed(Box::new(rejected.order)));
        }

        trace!(%order_id, "enqueued");
        self.shared.wakeup.notify_one();
        Ok(OrderTicket::new(order_id, rx))
    }

    /// Drain the queue once on the calling thread.
    ///
    /// Returns when the queue is observed empty, or immediately with
    /// [`DrainReport::AlreadyRunning`] if another drain holds the book.
    pub fn start_processing(&self) -> DrainReport {
        let Some(mut state) = self.shared.drain.try_lock() else {
            debug!("drain already in progress, skipping");
            return DrainReport::AlreadyRunning;
        };

        debug!(pending = self.pending(), "drain started");
        let stats = self.shared.drain_locked(&mut state);
        debug!(
            processed = stats.processed,
            resting_orders = state.book.order_count(),
            "drain finished"
        );

        DrainReport::Drained(stats)
    }

    /// Spawn a background task that keeps draining until `cancel` fires.
    ///
    /// Cancellation is checked before each drain, never in the middle of
    /// one; orders still queued at that point stay queued. The task
    /// resolves to the totals of every drain it ran.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start_processing_continuous(
        &self,
        cancel: CancellationToken,
    ) -> JoinHandle<DrainStats> {
        let shared = Arc::clone(&self.shared);
        tokio::spawn(engine_task::run_continuous(shared, cancel))
    }

    /// Discard every queued, not yet matched order. Returns how many.
    ///
    /// Waits for a running drain to finish first. Tickets of discarded
    /// orders report [`IntakeError::Discarded`].
    pub fn clear(&self) -> usize {
        let mut state = self.shared.drain.lock();
        let mut discarded = 0;
        while state.rx.try_recv().is_ok() {
            self.shared.pending.fetch_sub(1, Ordering::AcqRel);
            discarded += 1;
        }
        info!(discarded, "intake queue cleared");
        discarded
    }

    /// Stop accepting orders. Already queued orders can still be drained.
    pub fn shutdown(&self) {
        self.shared.drain.lock().rx.close();
        info!("intake queue closed");
    }

    /// Approximate number of submitted orders not yet dequeued.
    pub fn pending(&self) -> usize {
        self.shared.pending.load(Ordering::Acquire)
    }

    /// Run `f` against the book inside the drain critical section.
    pub fn with_book<R>(&self, f: impl FnOnce(&mut OrderBook) -> R) -> R {
        let mut state = self.shared.drain.lock();
        f(&mut state.book)
    }

    /// Cancel a resting order. `None` if it is no longer in the book.
    pub fn cancel_order(&self, key: OrderKey) -> Option<LimitOrder> {
        let cancelled = self.with_book(|book| book.cancel_order(key));
        match &cancelled {
            Some(_) => debug!(order_id = %key.id, "order cancelled"),
            None => debug!(order_id = %key.id, "cancel ignored, order not resting"),
        }
        cancelled
    }

    pub fn top_of_book(&self) -> TopOfBookSnapshot {
        self.with_book(|book| book.top_of_book())
    }

    pub fn engine(&self) -> &MatchingEngine<O> {
        &self.shared.engine
    }
}
