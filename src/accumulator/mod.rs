//! Streaming content accumulation.
//!
//! [`StreamAccumulator`] turns the content deltas of one streaming response
//! into the same [`ModelResponse`] a non-streaming call would return. Deltas
//! are merged per index as they arrive; nothing is parsed or re-encoded until
//! [`StreamAccumulator::compute_response`].
//!
//! ```
//! use unillm::accumulator::{IndexPolicy, StreamAccumulator};
//! use unillm::types::{ContentDelta, Part, PartDelta};
//!
//! # fn main() -> unillm::error::Result<()> {
//! let mut acc = StreamAccumulator::new(IndexPolicy::Explicit);
//! acc.add_chunks(vec![ContentDelta::at(0, PartDelta::text("He"))])?;
//! acc.add_chunks(vec![ContentDelta::at(0, PartDelta::text("llo"))])?;
//! let response = acc.compute_response(None)?;
//! assert_eq!(response.content, vec![Part::text("Hello")]);
//! # Ok(())
//! # }
//! ```

mod entry;
mod index;
mod materialize;
mod usage;

pub use index::IndexPolicy;

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::Result;
use crate::models::ProviderKind;
use crate::types::{ContentDelta, ModelPricing, ModelResponse, ModelUsage, PartialModelResponse};

use entry::AccumulatorEntry;
use index::DeltaIndexResolver;
use usage::UsageAggregator;

/// Merge engine for the deltas of a single stream.
///
/// One instance per stream. It performs no locking; deltas must be applied
/// in arrival order from one task. Any error invalidates the whole stream.
#[derive(Debug, Default)]
pub struct StreamAccumulator {
    entries: BTreeMap<usize, AccumulatorEntry>,
    resolver: DeltaIndexResolver,
    usage: UsageAggregator,
}

impl StreamAccumulator {
    pub fn new(policy: IndexPolicy) -> Self {
        Self {
            entries: BTreeMap::new(),
            resolver: DeltaIndexResolver::new(policy),
            usage: UsageAggregator::default(),
        }
    }

    /// Accumulator using the provider's native index convention.
    pub fn for_provider(provider: ProviderKind) -> Self {
        Self::new(provider.index_policy())
    }

    pub fn policy(&self) -> IndexPolicy {
        self.resolver.policy()
    }

    /// Apply the deltas of one transport event, in order.
    pub fn add_chunks(&mut self, deltas: impl IntoIterator<Item = ContentDelta>) -> Result<()> {
        for delta in deltas {
            self.add_delta(delta)?;
        }
        Ok(())
    }

    /// Apply one delta and return the index it was merged into.
    pub fn add_delta(&mut self, delta: ContentDelta) -> Result<usize> {
        let index = self.resolver.resolve(&delta, &self.entries)?;
        let entry = match self.entries.entry(index) {
            std::collections::btree_map::Entry::Occupied(slot) => slot.into_mut(),
            std::collections::btree_map::Entry::Vacant(slot) => {
                self.resolver.note_opened(index);
                slot.insert(AccumulatorEntry::open(index, delta.part.kind()))
            }
        };
        entry.merge(delta.part)?;
        Ok(index)
    }

    /// Record a usage report. The latest report wins.
    pub fn add_usage(&mut self, usage: ModelUsage) {
        self.usage.record(usage);
    }

    /// Apply a whole transport event and return its deltas with resolved
    /// indices, ready to forward to live consumers.
    pub fn add_partial(&mut self, partial: PartialModelResponse) -> Result<PartialModelResponse> {
        let mut resolved = Vec::with_capacity(partial.deltas.len());
        for delta in partial.deltas {
            let part = delta.part.clone();
            let index = self.add_delta(delta)?;
            resolved.push(ContentDelta::at(index, part));
        }
        if let Some(usage) = &partial.usage {
            self.add_usage(usage.clone());
        }
        Ok(PartialModelResponse {
            deltas: resolved,
            usage: partial.usage,
        })
    }

    /// Number of open entries, including ones that may be dropped at
    /// materialization.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Latest usage report, if any.
    pub fn usage(&self) -> Option<&ModelUsage> {
        self.usage.current()
    }

    /// Finalize all entries in ascending index order.
    ///
    /// Consumes the accumulator. Cost is computed here, once, when both a
    /// usage report and `pricing` are available.
    pub fn compute_response(self, pricing: Option<&ModelPricing>) -> Result<ModelResponse> {
        let entry_count = self.entries.len();
        let mut content = Vec::with_capacity(entry_count);
        for entry in self.entries.into_values() {
            if let Some(part) = materialize::materialize(entry)? {
                content.push(part);
            }
        }
        let (usage, cost) = self.usage.finish(pricing);
        debug!(
            entries = entry_count,
            parts = content.len(),
            has_usage = usage.is_some(),
            "computed streamed response"
        );
        Ok(ModelResponse {
            content,
            usage,
            cost,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UnillmError;
    use crate::types::{Part, PartDelta, ToolCallPartDelta};

    #[test]
    fn entries_materialize_in_ascending_index_order() {
        let mut acc = StreamAccumulator::new(IndexPolicy::Explicit);
        acc.add_chunks(vec![
            ContentDelta::at(5, PartDelta::text("second")),
            ContentDelta::at(2, PartDelta::text("first")),
        ])
        .unwrap();
        let response = acc.compute_response(None).unwrap();
        assert_eq!(
            response.content,
            vec![Part::text("first"), Part::text("second")]
        );
    }

    #[test]
    fn failed_merge_leaves_accumulator_usable_for_inspection() {
        let mut acc = StreamAccumulator::new(IndexPolicy::Explicit);
        acc.add_delta(ContentDelta::at(0, PartDelta::text("hi"))).unwrap();
        let err = acc
            .add_delta(ContentDelta::at(0, PartDelta::tool_args("{}")))
            .unwrap_err();
        assert!(matches!(err, UnillmError::TagMismatch { index: 0, .. }));
        assert_eq!(acc.len(), 1);
    }

    #[test]
    fn add_partial_reports_resolved_indices() {
        let mut acc = StreamAccumulator::for_provider(ProviderKind::Google);
        let first = acc
            .add_partial(PartialModelResponse::from_deltas(vec![ContentDelta::unindexed(
                PartDelta::text("a"),
            )]))
            .unwrap();
        let second = acc
            .add_partial(PartialModelResponse {
                deltas: vec![ContentDelta::unindexed(PartDelta::ToolCall(
                    ToolCallPartDelta {
                        tool_call_id: Some("c".into()),
                        tool_name: Some("f".into()),
                        args: Some("{}".into()),
                        id: None,
                    },
                ))],
                usage: Some(ModelUsage::new(3, 4)),
            })
            .unwrap();
        assert_eq!(first.deltas[0].index, Some(0));
        assert_eq!(second.deltas[0].index, Some(1));
        assert_eq!(acc.usage(), Some(&ModelUsage::new(3, 4)));
    }

    #[test]
    fn empty_event_is_a_no_op() {
        let mut acc = StreamAccumulator::default();
        acc.add_chunks(Vec::new()).unwrap();
        assert!(acc.is_empty());
        assert_eq!(acc.compute_response(None).unwrap(), ModelResponse::default());
    }
}
