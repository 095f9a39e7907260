//! Stream transformations for partial-response streams.
//!
//! Transforms sit between a provider and its consumer. They may regroup
//! deltas but must not change what the stream materializes to.

use std::sync::Arc;

use futures::StreamExt;

use crate::provider::PartialResponseStream;
use crate::types::{ContentDelta, PartDelta, PartialModelResponse, TextPartDelta};

/// Trait for transforming a stream of partial responses.
pub trait StreamTransform: Send + Sync {
    /// Transform the stream.
    fn transform(&self, stream: PartialResponseStream) -> PartialResponseStream;
}

/// Drop deltas that fail a predicate. Usage reports always pass through.
///
/// Unlike [`CoalesceTextTransform`] this changes the materialized result.
pub struct FilterTransform {
    predicate: Arc<dyn Fn(&ContentDelta) -> bool + Send + Sync>,
}

impl FilterTransform {
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&ContentDelta) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Arc::new(predicate),
        }
    }
}

impl StreamTransform for FilterTransform {
    fn transform(&self, stream: PartialResponseStream) -> PartialResponseStream {
        let predicate = self.predicate.clone();
        let transformed = async_stream::stream! {
            let mut inner = stream;
            while let Some(item) = inner.next().await {
                match item {
                    Ok(mut partial) => {
                        partial.deltas.retain(|d| (predicate)(d));
                        if !partial.deltas.is_empty() || partial.usage.is_some() {
                            yield Ok(partial);
                        }
                    }
                    Err(e) => {
                        yield Err(e);
                        break;
                    }
                }
            }
        };
        Box::pin(transformed)
    }
}

/// Merge consecutive plain text fragments aimed at the same explicit index
/// until at least `min_chars` characters are buffered.
///
/// Fragments carrying citations, fragments without an index, and all other
/// events flush the buffer first so arrival order is preserved.
pub struct CoalesceTextTransform {
    min_chars: usize,
}

impl CoalesceTextTransform {
    pub fn new(min_chars: usize) -> Self {
        Self { min_chars }
    }
}

struct PendingText {
    index: usize,
    text: String,
    chars: usize,
}

impl PendingText {
    fn into_partial(self) -> PartialModelResponse {
        PartialModelResponse::from_deltas(vec![ContentDelta::at(
            self.index,
            PartDelta::text(self.text),
        )])
    }
}

/// The index and text of a delta the coalescer may buffer.
fn coalescible(delta: &ContentDelta) -> Option<(usize, &str)> {
    match (&delta.index, &delta.part) {
        (
            Some(index),
            PartDelta::Text(TextPartDelta {
                text,
                citation: None,
            }),
        ) => Some((*index, text.as_str())),
        _ => None,
    }
}

impl StreamTransform for CoalesceTextTransform {
    fn transform(&self, stream: PartialResponseStream) -> PartialResponseStream {
        let min_chars = self.min_chars;
        let transformed = async_stream::stream! {
            let mut pending: Option<PendingText> = None;
            let mut inner = stream;

            while let Some(item) = inner.next().await {
                let partial = match item {
                    Ok(p) => p,
                    Err(e) => {
                        if let Some(p) = pending.take() {
                            yield Ok(p.into_partial());
                        }
                        yield Err(e);
                        break;
                    }
                };

                let mut passthrough = PartialModelResponse {
                    deltas: Vec::new(),
                    usage: partial.usage,
                };
                for delta in partial.deltas {
                    match coalescible(&delta) {
                        Some((index, text)) if passthrough.deltas.is_empty() => {
                            match pending.as_mut() {
                                Some(p) if p.index == index => {
                                    p.text.push_str(text);
                                    p.chars += text.chars().count();
                                }
                                _ => {
                                    if let Some(p) = pending.replace(PendingText {
                                        index,
                                        text: text.to_string(),
                                        chars: text.chars().count(),
                                    }) {
                                        yield Ok(p.into_partial());
                                    }
                                }
                            }
                            if pending.as_ref().is_some_and(|p| p.chars >= min_chars) {
                                if let Some(p) = pending.take() {
                                    yield Ok(p.into_partial());
                                }
                            }
                        }
                        _ => {
                            if let Some(p) = pending.take() {
                                yield Ok(p.into_partial());
                            }
                            passthrough.deltas.push(delta);
                        }
                    }
                }

                if !passthrough.deltas.is_empty() || passthrough.usage.is_some() {
                    if let Some(p) = pending.take() {
                        yield Ok(p.into_partial());
                    }
                    yield Ok(passthrough);
                }
            }

            if let Some(p) = pending.take() {
                yield Ok(p.into_partial());
            }
        };

        Box::pin(transformed)
    }
}
