//! Convenience functions for common generation patterns.

use crate::config::UnillmConfig;
use crate::error::UnillmError;
use crate::provider::{ModelProvider, ProviderRequest};
use crate::types::*;

use super::stream::{stream_response, DeltaSink};

/// Simple text generation: provider + prompt → text.
pub async fn generate_text(
    provider: &dyn ModelProvider,
    prompt: impl Into<String>,
) -> Result<String, UnillmError> {
    let request = ProviderRequest::new(vec![ModelMessage::user(prompt)]);
    let response = super::generate(provider, &request, UnillmConfig::global()).await?;
    Ok(response.text())
}

/// Simple streaming generation: provider + prompt → text, with each applied
/// event forwarded to `sink` as it arrives.
pub async fn stream_text(
    provider: &dyn ModelProvider,
    prompt: impl Into<String>,
    sink: Option<&DeltaSink>,
) -> Result<String, UnillmError> {
    let request = ProviderRequest::new(vec![ModelMessage::user(prompt)]);
    let response = stream_response(provider, &request, UnillmConfig::global(), sink).await?;
    Ok(response.text())
}
