//! Usage reports received during one stream.

use tracing::debug;

use crate::types::{ModelPricing, ModelUsage};

/// Holds the latest usage report of a stream.
///
/// Reports are running totals, so each one supersedes the last rather than
/// being added to it.
#[derive(Debug, Default)]
pub(crate) struct UsageAggregator {
    current: Option<ModelUsage>,
}

impl UsageAggregator {
    pub(crate) fn record(&mut self, usage: ModelUsage) {
        if let Some(held) = &self.current {
            // A coarse repeat of the same totals carries less information
            // than the detailed report already held.
            if held.has_details()
                && !usage.has_details()
                && held.input_tokens == usage.input_tokens
                && held.output_tokens == usage.output_tokens
            {
                debug!("keeping detailed usage over coarse report with equal totals");
                return;
            }
        }
        self.current = Some(usage);
    }

    pub(crate) fn current(&self) -> Option<&ModelUsage> {
        self.current.as_ref()
    }

    /// Final usage plus cost, when pricing is known.
    pub(crate) fn finish(
        self,
        pricing: Option<&ModelPricing>,
    ) -> (Option<ModelUsage>, Option<f64>) {
        let cost = match (&self.current, pricing) {
            (Some(usage), Some(pricing)) => Some(usage.calculate_cost(pricing)),
            _ => None,
        };
        (self.current, cost)
    }
}
