//! Streaming and non-streaming generation.

pub mod convenience;
pub mod stream;

pub use convenience::{generate_text, stream_text};
pub use stream::{collect_stream, stream, stream_events, stream_response, DeltaSink, StreamEvent};

use tracing::debug;

use crate::config::UnillmConfig;
use crate::error::UnillmError;
use crate::provider::{ModelProvider, ProviderRequest};
use crate::types::ModelResponse;

/// Generate a complete response without streaming.
///
/// Fills in the cost from known pricing when the provider left it empty.
pub async fn generate(
    provider: &dyn ModelProvider,
    request: &ProviderRequest,
    config: &UnillmConfig,
) -> Result<ModelResponse, UnillmError> {
    debug!(
        provider = %provider.provider_kind(),
        model = provider.model_id(),
        "generate"
    );
    let mut response = provider.generate(request).await?;
    if response.cost.is_none() {
        if let (Some(usage), Some(pricing)) =
            (&response.usage, stream::resolve_pricing(provider, config))
        {
            response.cost = Some(usage.calculate_cost(&pricing));
        }
    }
    Ok(response)
}
