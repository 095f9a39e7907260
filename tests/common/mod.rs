//! Shared test helpers and scripted provider.

#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;

use unillm::error::UnillmError;
use unillm::models::ProviderKind;
use unillm::provider::{ModelProvider, PartialResponseStream, ProviderRequest};
use unillm::types::*;

/// A provider that replays a fixed response and a fixed event script.
pub struct ScriptedProvider {
    kind: ProviderKind,
    model_id: String,
    pricing: Option<ModelPricing>,
    response: ModelResponse,
    events: Vec<Result<PartialModelResponse, String>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    pub fn new(kind: ProviderKind, model_id: &str) -> Self {
        Self {
            kind,
            model_id: model_id.to_string(),
            pricing: None,
            response: ModelResponse::default(),
            events: Vec::new(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Response returned by the non-streaming path.
    pub fn with_response(mut self, response: ModelResponse) -> Self {
        self.response = response;
        self
    }

    pub fn with_pricing(mut self, pricing: ModelPricing) -> Self {
        self.pricing = Some(pricing);
        self
    }

    pub fn push_event(mut self, event: PartialModelResponse) -> Self {
        self.events.push(Ok(event));
        self
    }

    /// Make the stream fail at this point with a stream error.
    pub fn push_failure(mut self, message: &str) -> Self {
        self.events.push(Err(message.to_string()));
        self
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ModelProvider for ScriptedProvider {
    fn provider_kind(&self) -> ProviderKind {
        self.kind
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn pricing(&self) -> Option<&ModelPricing> {
        self.pricing.as_ref()
    }

    async fn generate(&self, request: &ProviderRequest) -> Result<ModelResponse, UnillmError> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(self.response.clone())
    }

    async fn stream(
        &self,
        request: &ProviderRequest,
    ) -> Result<PartialResponseStream, UnillmError> {
        self.requests.lock().unwrap().push(request.clone());
        let events = self.events.clone();
        let stream = async_stream::stream! {
            for event in events {
                yield event.map_err(UnillmError::Stream);
            }
        };
        Ok(Box::pin(stream))
    }
}

/// Build a stream directly from a list of events.
pub fn stream_of(events: Vec<PartialModelResponse>) -> PartialResponseStream {
    Box::pin(futures::stream::iter(events.into_iter().map(Ok)))
}

/// Single-delta event.
pub fn event(delta: ContentDelta) -> PartialModelResponse {
    PartialModelResponse::from_deltas(vec![delta])
}

/// Tool call delta with every field optional.
pub fn tool_delta(id: Option<&str>, name: Option<&str>, args: Option<&str>) -> PartDelta {
    PartDelta::ToolCall(ToolCallPartDelta {
        tool_call_id: id.map(str::to_string),
        tool_name: name.map(str::to_string),
        args: args.map(str::to_string),
        id: None,
    })
}

/// Linear16 audio delta carrying `bytes` as base64.
pub fn audio_delta(bytes: &[u8]) -> PartDelta {
    use base64::Engine;
    PartDelta::Audio(AudioPartDelta {
        data: Some(base64::engine::general_purpose::STANDARD.encode(bytes)),
        format: Some(AudioFormat::Linear16),
        ..Default::default()
    })
}
