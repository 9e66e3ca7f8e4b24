// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Operation lifecycle tracking
//!
//! Every query, count and append charges the operation counter for its
//! lifetime; the store may only be closed once the counter has drained to
//! zero. The counter and the close-coordination state are the only mutable
//! state shared between handles, and both live behind one mutex so that the
//! "decrement to zero, fire the drain signal" transition is atomic with the
//! decrement.
//!
//! Charging hands out an [`OperationGuard`]; dropping the guard is the one
//! and only discharge path, which makes the counter symmetric on every exit,
//! including error paths and abandoned result streams.

use crate::error::{StoreError, StoreResult};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::oneshot;

/// The outcome broadcast to every close waiter.
pub(crate) type CloseOutcome = StoreResult<()>;

struct CloseState {
    /// Callers blocked on the in-flight close, resolved all at once.
    waiters: Vec<oneshot::Sender<CloseOutcome>>,
    /// Present while the close is parked behind in-flight operations; fired
    /// by the discharge that drains the counter to zero.
    drain_tx: Option<oneshot::Sender<()>>,
    /// Recorded once the engine close finished; later close calls resolve
    /// with this immediately.
    finished: Option<CloseOutcome>,
}

struct LifecycleState {
    operations: usize,
    close: Option<CloseState>,
}

/// Per-store operation counter and close coordinator.
pub(crate) struct Lifecycle {
    state: Mutex<LifecycleState>,
}

/// How a `close` call participates in the single underlying engine close.
pub(crate) enum CloseRegistration {
    /// First close call: this caller owns driving the engine close. `drain`
    /// is present when in-flight operations must finish first.
    Driver {
        waiter: oneshot::Receiver<CloseOutcome>,
        drain: Option<oneshot::Receiver<()>>,
    },
    /// A close is already pending; wait for its outcome.
    Waiter(oneshot::Receiver<CloseOutcome>),
    /// The close already completed; its recorded outcome.
    Finished(CloseOutcome),
}

impl Lifecycle {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Lifecycle {
            state: Mutex::new(LifecycleState {
                operations: 0,
                close: None,
            }),
        })
    }

    /// Number of in-flight operations.
    pub(crate) fn operations(&self) -> usize {
        self.state.lock().operations
    }

    /// Charge the counter for one operation.
    pub(crate) fn charge(self: &Arc<Self>) -> OperationGuard {
        let mut state = self.state.lock();
        state.operations += 1;
        log::trace!("Operation charged ({} in flight)", state.operations);
        OperationGuard {
            lifecycle: Arc::clone(self),
        }
    }

    /// Register a close call. Exactly one caller ever receives
    /// [`CloseRegistration::Driver`].
    pub(crate) fn register_close(&self) -> CloseRegistration {
        let mut state = self.state.lock();
        if let Some(close) = state.close.as_mut() {
            if let Some(outcome) = &close.finished {
                return CloseRegistration::Finished(outcome.clone());
            }
            let (tx, rx) = oneshot::channel();
            close.waiters.push(tx);
            return CloseRegistration::Waiter(rx);
        }
        let (tx, rx) = oneshot::channel();
        let (drain_tx, drain_rx) = if state.operations > 0 {
            log::debug!(
                "Close requested with {} operations in flight, deferring",
                state.operations
            );
            let (drain_tx, drain_rx) = oneshot::channel();
            (Some(drain_tx), Some(drain_rx))
        } else {
            (None, None)
        };
        state.close = Some(CloseState {
            waiters: vec![tx],
            drain_tx,
            finished: None,
        });
        CloseRegistration::Driver {
            waiter: rx,
            drain: drain_rx,
        }
    }

    /// Record the close outcome and broadcast it to every waiter registered
    /// during the drain. The waiter list is consumed exactly once.
    pub(crate) fn finish_close(&self, outcome: CloseOutcome) {
        let waiters = {
            let mut state = self.state.lock();
            match state.close.as_mut() {
                Some(close) => {
                    close.finished = Some(outcome.clone());
                    std::mem::take(&mut close.waiters)
                }
                None => Vec::new(),
            }
        };
        for waiter in waiters {
            // A caller that dropped its close future is not an error.
            let _ = waiter.send(outcome.clone());
        }
    }
}

/// RAII charge on the operation counter.
///
/// Dropping the guard discharges the operation and, when the counter drains
/// to zero, releases a pending close.
pub(crate) struct OperationGuard {
    lifecycle: Arc<Lifecycle>,
}

impl Drop for OperationGuard {
    fn drop(&mut self) {
        let mut state = self.lifecycle.state.lock();
        state.operations -= 1;
        log::trace!("Operation discharged ({} in flight)", state.operations);
        if state.operations == 0 {
            if let Some(close) = state.close.as_mut() {
                if let Some(drain_tx) = close.drain_tx.take() {
                    log::debug!("Operations drained, releasing pending close");
                    let _ = drain_tx.send(());
                }
            }
        }
    }
}

/// Map a lost close-driver channel to a store error. Only reachable if the
/// close driver task panicked before broadcasting.
pub(crate) fn driver_lost(_: oneshot::error::RecvError) -> StoreError {
    StoreError::OperationFailed("Close driver terminated without an outcome".to_string())
}
