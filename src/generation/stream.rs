//! Streaming generation: drive a provider stream into a [`ModelResponse`].

use std::sync::Arc;

use futures::stream::BoxStream;
use futures::StreamExt;
use tracing::debug;

use crate::accumulator::{IndexPolicy, StreamAccumulator};
use crate::config::UnillmConfig;
use crate::error::UnillmError;
use crate::provider::{ModelProvider, PartialResponseStream, ProviderRequest};
use crate::types::*;

/// Receives each event after it has been applied, with resolved indices.
pub type DeltaSink = Arc<dyn Fn(&PartialModelResponse) + Send + Sync>;

/// An item of [`stream_events`].
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// One applied transport event; every delta carries its resolved index.
    Partial(PartialModelResponse),
    /// The materialized response, emitted once after the provider stream ends.
    Completed(ModelResponse),
}

/// Open a raw provider stream.
pub async fn stream(
    provider: &dyn ModelProvider,
    request: &ProviderRequest,
) -> Result<PartialResponseStream, UnillmError> {
    debug!(
        provider = %provider.provider_kind(),
        model = provider.model_id(),
        "opening stream"
    );
    provider.stream(request).await
}

/// Consume a stream to completion and materialize the response.
///
/// Each event is applied before being forwarded to `sink`. The first error
/// aborts the stream; no partial response is returned.
pub async fn collect_stream(
    mut stream: PartialResponseStream,
    policy: IndexPolicy,
    pricing: Option<&ModelPricing>,
    sink: Option<&DeltaSink>,
) -> Result<ModelResponse, UnillmError> {
    let mut accumulator = StreamAccumulator::new(policy);
    let mut events = 0usize;

    while let Some(partial) = stream.next().await {
        let applied = accumulator.add_partial(partial?)?;
        events += 1;
        if let Some(sink) = sink {
            sink(&applied);
        }
    }

    debug!(events, "stream finished");
    accumulator.compute_response(pricing)
}

/// Stream from `provider` and collect the response, using `config` for the
/// index policy and for pricing the provider does not supply itself.
pub async fn stream_response(
    provider: &dyn ModelProvider,
    request: &ProviderRequest,
    config: &UnillmConfig,
    sink: Option<&DeltaSink>,
) -> Result<ModelResponse, UnillmError> {
    let policy = config.index_policy_for(provider.provider_kind());
    let pricing = resolve_pricing(provider, config);
    let inner = stream(provider, request).await?;
    collect_stream(inner, policy, pricing.as_ref(), sink).await
}

/// Wrap a provider stream so consumers see resolved partials live and the
/// materialized response at the end.
pub fn stream_events(
    stream: PartialResponseStream,
    policy: IndexPolicy,
    pricing: Option<ModelPricing>,
) -> BoxStream<'static, Result<StreamEvent, UnillmError>> {
    let events = async_stream::stream! {
        let mut accumulator = StreamAccumulator::new(policy);
        let mut inner = stream;
        let mut failed = false;

        while let Some(item) = inner.next().await {
            match item.and_then(|partial| accumulator.add_partial(partial)) {
                Ok(applied) => yield Ok(StreamEvent::Partial(applied)),
                Err(e) => {
                    failed = true;
                    yield Err(e);
                    break;
                }
            }
        }

        if !failed {
            yield accumulator
                .compute_response(pricing.as_ref())
                .map(StreamEvent::Completed);
        }
    };
    Box::pin(events)
}

pub(crate) fn resolve_pricing(
    provider: &dyn ModelProvider,
    config: &UnillmConfig,
) -> Option<ModelPricing> {
    provider
        .pricing()
        .cloned()
        .or_else(|| config.pricing_for(&provider.language_model_id()))
}
