//! Model provider trait.
//!
//! Concrete adapters (request mapping, HTTP, SSE framing) live outside this
//! crate. An adapter's only obligation here is to translate its provider's
//! events into [`PartialModelResponse`]s, in arrival order.

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::error::UnillmError;
use crate::models::{LanguageModelId, ProviderKind};
use crate::types::{
    GenerationSettings, ModelMessage, ModelPricing, ModelResponse, PartialModelResponse,
};

/// A request sent to a model provider.
#[derive(Debug, Clone, Default)]
pub struct ProviderRequest {
    pub messages: Vec<ModelMessage>,
    pub settings: GenerationSettings,
    pub tools: Option<Vec<ToolDefinition>>,
}

impl ProviderRequest {
    pub fn new(messages: Vec<ModelMessage>) -> Self {
        Self {
            messages,
            ..Default::default()
        }
    }
}

/// Tool definition sent to the provider API.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// JSON schema of the arguments object.
    pub parameters: serde_json::Value,
}

/// Stream of per-event partial responses.
pub type PartialResponseStream = BoxStream<'static, Result<PartialModelResponse, UnillmError>>;

/// Core trait implemented by all model providers.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    fn provider_kind(&self) -> ProviderKind;

    /// The model ID this provider instance serves.
    fn model_id(&self) -> &str;

    /// Pricing for this model, if known.
    fn pricing(&self) -> Option<&ModelPricing> {
        None
    }

    fn language_model_id(&self) -> LanguageModelId {
        LanguageModelId::new(self.provider_kind(), self.model_id())
    }

    /// Generate a complete response (non-streaming).
    async fn generate(&self, request: &ProviderRequest) -> Result<ModelResponse, UnillmError>;

    /// Open a streaming response.
    async fn stream(&self, request: &ProviderRequest) -> Result<PartialResponseStream, UnillmError>;
}
