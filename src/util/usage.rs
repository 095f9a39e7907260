//! Usage tracking across calls.

use std::sync::{Arc, PoisonError, RwLock};

use crate::types::ModelUsage;

/// Tracks cumulative usage and cost across generations.
#[derive(Clone)]
pub struct UsageTracker {
    inner: Arc<RwLock<UsageTrackerInner>>,
}

#[derive(Default)]
struct UsageTrackerInner {
    total_usage: ModelUsage,
    total_cost: f64,
    generation_count: u64,
}

impl Default for UsageTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl UsageTracker {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(UsageTrackerInner::default())),
        }
    }

    /// Record usage from one completed generation.
    pub fn record(&self, usage: &ModelUsage, cost: Option<f64>) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.total_usage.merge(usage);
        if let Some(c) = cost {
            inner.total_cost += c;
        }
        inner.generation_count += 1;
    }

    /// Record whatever usage and cost a response carries.
    pub fn record_response(&self, response: &crate::types::ModelResponse) {
        if let Some(usage) = &response.usage {
            self.record(usage, response.cost);
        }
    }

    pub fn total_usage(&self) -> ModelUsage {
        self.read(|inner| inner.total_usage.clone())
    }

    /// Total cost in USD of the generations that had pricing.
    pub fn total_cost(&self) -> f64 {
        self.read(|inner| inner.total_cost)
    }

    pub fn generation_count(&self) -> u64 {
        self.read(|inner| inner.generation_count)
    }

    /// Reset all tracking.
    pub fn reset(&self) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *inner = UsageTrackerInner::default();
    }

    fn read<T>(&self, f: impl FnOnce(&UsageTrackerInner) -> T) -> T {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&inner)
    }
}
