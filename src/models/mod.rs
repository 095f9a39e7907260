//! Model identifiers.

pub mod provider_kind;

pub use provider_kind::ProviderKind;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::UnillmError;

/// A model addressed as `provider:model_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct LanguageModelId {
    pub provider: ProviderKind,
    pub model_id: String,
}

impl LanguageModelId {
    pub fn new(provider: ProviderKind, model_id: impl Into<String>) -> Self {
        Self {
            provider,
            model_id: model_id.into(),
        }
    }
}

impl fmt::Display for LanguageModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.provider, self.model_id)
    }
}

impl FromStr for LanguageModelId {
    type Err = UnillmError;

    /// Parse "provider:model_id" format.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (provider, model_id) = s.split_once(':').ok_or_else(|| {
            UnillmError::InvalidArgument(format!(
                "Invalid model format: '{s}'. Expected 'provider:model'"
            ))
        })?;
        let provider = ProviderKind::parse(provider).ok_or_else(|| {
            UnillmError::InvalidArgument(format!("Unknown provider: '{provider}'"))
        })?;
        if model_id.is_empty() {
            return Err(UnillmError::InvalidArgument(format!(
                "Missing model id in '{s}'"
            )));
        }
        Ok(Self::new(provider, model_id))
    }
}
