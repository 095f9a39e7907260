//! Convenience re-exports for common use.

pub use crate::accumulator::{IndexPolicy, StreamAccumulator};
pub use crate::config::UnillmConfig;
pub use crate::error::{Result, UnillmError};
pub use crate::generation::{DeltaSink, StreamEvent};
pub use crate::models::{LanguageModelId, ProviderKind};
pub use crate::provider::{ModelProvider, PartialResponseStream, ProviderRequest};
pub use crate::types::{
    ContentDelta, GenerationSettings, ModelMessage, ModelPricing, ModelResponse, ModelUsage, Part,
    PartDelta, PartialModelResponse, Role,
};
