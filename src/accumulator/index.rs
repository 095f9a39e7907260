//! Resolution of a delta's position in the final content sequence.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::trace;

use super::entry::AccumulatorEntry;
use crate::error::{Result, UnillmError};
use crate::types::{ContentDelta, PartDelta, PartKind};

/// How a provider's stream positions its deltas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum IndexPolicy {
    /// Deltas carry stable indices; a present index is used as-is.
    #[default]
    Explicit,
    /// Any index the provider sends is unreliable and ignored.
    Guess,
}

/// Assigns indices to incoming deltas.
///
/// Tracks the order in which entries were opened so that index-less deltas
/// can be matched against the most recently opened entry of the same kind.
#[derive(Debug, Default)]
pub(crate) struct DeltaIndexResolver {
    policy: IndexPolicy,
    open_order: Vec<usize>,
}

impl DeltaIndexResolver {
    pub(crate) fn new(policy: IndexPolicy) -> Self {
        Self {
            policy,
            open_order: Vec::new(),
        }
    }

    pub(crate) fn policy(&self) -> IndexPolicy {
        self.policy
    }

    /// Record that an entry was created at `index`.
    pub(crate) fn note_opened(&mut self, index: usize) {
        self.open_order.push(index);
    }

    /// Determine the index `delta` merges into.
    ///
    /// A kind conflict at the returned index is detected when the delta is
    /// merged, not here. Fails only when no index is left above the highest
    /// one in use.
    pub(crate) fn resolve(
        &self,
        delta: &ContentDelta,
        entries: &BTreeMap<usize, AccumulatorEntry>,
    ) -> Result<usize> {
        if let (IndexPolicy::Explicit, Some(index)) = (self.policy, delta.index) {
            return Ok(index);
        }

        let matched = match &delta.part {
            PartDelta::ToolCall(tc) => tc
                .tool_call_id
                .as_deref()
                .filter(|id| !id.is_empty())
                .and_then(|id| self.find_open_tool_call(id, entries)),
            part => self.find_latest_of_kind(part.kind(), entries),
        };

        let index = match matched {
            Some(index) => index,
            None => next_free_index(entries)?,
        };
        trace!(
            kind = %delta.part.kind(),
            provided = ?delta.index,
            resolved = index,
            "resolved delta index"
        );
        Ok(index)
    }

    fn find_latest_of_kind(
        &self,
        kind: PartKind,
        entries: &BTreeMap<usize, AccumulatorEntry>,
    ) -> Option<usize> {
        self.open_order
            .iter()
            .rev()
            .copied()
            .find(|index| entries.get(index).is_some_and(|e| e.kind() == kind))
    }

    fn find_open_tool_call(
        &self,
        tool_call_id: &str,
        entries: &BTreeMap<usize, AccumulatorEntry>,
    ) -> Option<usize> {
        self.open_order.iter().rev().copied().find(|index| {
            entries
                .get(index)
                .and_then(AccumulatorEntry::tool_call_id)
                .is_some_and(|id| id == tool_call_id)
        })
    }
}

/// One past the highest index seen so far; 0 for an empty stream.
fn next_free_index(entries: &BTreeMap<usize, AccumulatorEntry>) -> Result<usize> {
    match entries.keys().next_back() {
        None => Ok(0),
        Some(&max) => max
            .checked_add(1)
            .ok_or(UnillmError::IndexOverflow { index: max }),
    }
}
