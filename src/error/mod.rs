//! Error types for unillm.

pub mod unified;

pub use unified::{ErrorCategory, RecoverySuggestion};

use thiserror::Error;

use crate::types::PartKind;

/// Primary error type for all unillm operations.
#[derive(Error, Debug)]
pub enum UnillmError {
    #[error("part kind mismatch at index {index}: existing {existing}, incoming {incoming}")]
    TagMismatch {
        index: usize,
        existing: PartKind,
        incoming: PartKind,
    },

    #[error("no free index after {index}")]
    IndexOverflow { index: usize },

    #[error(
        "incomplete tool call at index {index} \
         (tool_call_id: {tool_call_id:?}, tool_name: {tool_name:?})"
    )]
    IncompleteToolCall {
        index: usize,
        tool_call_id: Option<String>,
        tool_name: Option<String>,
    },

    #[error("malformed tool call arguments at index {index}: {raw}")]
    MalformedArguments {
        index: usize,
        raw: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(
        "cannot concatenate streamed audio at index {index} in format '{format}' \
         (only linear16 is supported)"
    )]
    UnsupportedAudioConcatenation { index: usize, format: String },

    #[error("incomplete image at index {index}: missing mime type")]
    IncompleteImage { index: usize },

    #[error("invalid base64 {kind} data at index {index}: {source}")]
    InvalidBinaryData {
        index: usize,
        kind: PartKind,
        #[source]
        source: base64::DecodeError,
    },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Provider error: {provider}: {message}")]
    Provider { provider: String, message: String },

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl UnillmError {
    /// Create a provider error.
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::TagMismatch { .. }
            | Self::IndexOverflow { .. }
            | Self::IncompleteToolCall { .. }
            | Self::MalformedArguments { .. }
            | Self::UnsupportedAudioConcatenation { .. }
            | Self::IncompleteImage { .. }
            | Self::InvalidBinaryData { .. } => ErrorCategory::Content,
            Self::Configuration(_) | Self::TomlParse(_) => ErrorCategory::Configuration,
            Self::Serialization(_) => ErrorCategory::Serialization,
            Self::Io(_) => ErrorCategory::Io,
            Self::Provider { .. } => ErrorCategory::Provider,
            Self::Stream(_) => ErrorCategory::Stream,
            Self::InvalidArgument(_) => ErrorCategory::Unknown,
        }
    }

    /// Whether a fresh attempt could plausibly succeed.
    ///
    /// A retry always means opening a new stream with a new accumulator;
    /// a partially consumed stream is never resumed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Stream | ErrorCategory::Provider
        )
    }

    /// Suggest recovery actions.
    pub fn recovery_suggestion(&self) -> RecoverySuggestion {
        match self.category() {
            ErrorCategory::Stream | ErrorCategory::Provider => RecoverySuggestion::RestartStream,
            ErrorCategory::Configuration => RecoverySuggestion::CheckConfiguration,
            ErrorCategory::Content => RecoverySuggestion::ReportProviderBug,
            _ => RecoverySuggestion::ContactSupport,
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, UnillmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_errors_are_not_retryable() {
        let err = UnillmError::TagMismatch {
            index: 0,
            existing: PartKind::Text,
            incoming: PartKind::ToolCall,
        };
        assert_eq!(err.category(), ErrorCategory::Content);
        assert!(!err.is_retryable());
        assert_eq!(err.recovery_suggestion(), RecoverySuggestion::ReportProviderBug);
    }

    #[test]
    fn stream_errors_suggest_a_fresh_stream() {
        let err = UnillmError::Stream("connection reset".into());
        assert!(err.is_retryable());
        assert_eq!(err.recovery_suggestion(), RecoverySuggestion::RestartStream);
    }

    #[test]
    fn tag_mismatch_message_names_both_kinds() {
        let err = UnillmError::TagMismatch {
            index: 2,
            existing: PartKind::Text,
            incoming: PartKind::ToolCall,
        };
        assert_eq!(
            err.to_string(),
            "part kind mismatch at index 2: existing text, incoming tool_call"
        );
    }
}
