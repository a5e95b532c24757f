use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;
use tokio::task::AbortHandle;

use crate::domain::draft::EstimateRequest;

/// Derived async value for the quoted price. The estimate reacts to
/// route/vehicle/trip/passenger edits and must never be overwritten by
/// a request that was superseded before it resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EstimateState {
    None,
    Pending,
    Ready { price: f64 },
    Failed { error: String },
}

pub struct PriceEstimator {
    state: Arc<Mutex<EstimateState>>,
    seq: Arc<AtomicU64>,
    pending: Option<AbortHandle>,
    debounce: Duration,
}

impl PriceEstimator {
    pub fn new(debounce: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(EstimateState::None)),
            seq: Arc::new(AtomicU64::new(0)),
            pending: None,
            debounce,
        }
    }

    pub fn state(&self) -> EstimateState {
        self.state.lock().unwrap().clone()
    }

    pub fn current_price(&self) -> Option<f64> {
        match self.state() {
            EstimateState::Ready { price } => Some(price),
            _ => None,
        }
    }

    /// Re-derive the estimate for the current draft. A `None` request
    /// (pickup, dropoff or vehicle missing) clears to `None` without a
    /// network call. Otherwise the previous debounce timer is cancelled
    /// and a new fetch is scheduled; the sequence number taken here is
    /// re-checked before the result is applied, so a stale fetch that
    /// resolves late loses to the newer request.
    pub fn refresh<F, Fut>(&mut self, request: Option<EstimateRequest>, fetch: F)
    where
        F: FnOnce(EstimateRequest) -> Fut + Send + 'static,
        Fut: Future<Output = Result<f64, String>> + Send,
    {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
        // The bump and the state write happen under one lock, and the
        // spawned task re-checks the sequence inside that same lock; a
        // task that survives its abort can therefore never interleave
        // between the check and the write.
        let seq;
        {
            let mut current = self.state.lock().unwrap();
            seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
            *current = if request.is_some() {
                EstimateState::Pending
            } else {
                EstimateState::None
            };
        }
        let Some(request) = request else {
            return;
        };

        let state = Arc::clone(&self.state);
        let latest = Arc::clone(&self.seq);
        let debounce = self.debounce;
        let task = tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            let result = fetch(request).await;
            let mut state = state.lock().unwrap();
            if latest.load(Ordering::SeqCst) != seq {
                // Superseded while in flight; drop the result.
                return;
            }
            *state = match result {
                Ok(price) => EstimateState::Ready { price },
                Err(error) => EstimateState::Failed { error },
            };
        });
        self.pending = Some(task.abort_handle());
    }
}

impl Drop for PriceEstimator {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}
