//! In-flight content fragments emitted while a model is still generating.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::part::AudioFormat;
use super::usage::ModelUsage;

/// Tag identifying which kind of part a delta contributes to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PartKind {
    Text,
    Image,
    Audio,
    ToolCall,
    Reasoning,
}

/// A fragment of a not-yet-complete part. Every field is optional.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PartDelta {
    Text(TextPartDelta),
    Image(ImagePartDelta),
    Audio(AudioPartDelta),
    ToolCall(ToolCallPartDelta),
    Reasoning(ReasoningPartDelta),
}

impl PartDelta {
    pub fn kind(&self) -> PartKind {
        match self {
            Self::Text(_) => PartKind::Text,
            Self::Image(_) => PartKind::Image,
            Self::Audio(_) => PartKind::Audio,
            Self::ToolCall(_) => PartKind::ToolCall,
            Self::Reasoning(_) => PartKind::Reasoning,
        }
    }

    /// A text fragment.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(TextPartDelta {
            text: text.into(),
            citation: None,
        })
    }

    /// A reasoning text fragment.
    pub fn reasoning(text: impl Into<String>) -> Self {
        Self::Reasoning(ReasoningPartDelta {
            text: Some(text.into()),
            ..Default::default()
        })
    }

    /// An argument fragment for a tool call, without identity fields.
    pub fn tool_args(args: impl Into<String>) -> Self {
        Self::ToolCall(ToolCallPartDelta {
            args: Some(args.into()),
            ..Default::default()
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TextPartDelta {
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citation: Option<CitationDelta>,
}

/// A citation fragment attached to a text part.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CitationDelta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cited_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_index: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ImagePartDelta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// Base64-encoded fragment of the image bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AudioPartDelta {
    /// Base64-encoded fragment of the audio bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<AudioFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channels: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ToolCallPartDelta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
    /// Raw JSON text fragment of the arguments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ReasoningPartDelta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// A delta addressed to a position in the final content sequence.
///
/// `index` is `None` when the provider does not report one; the accumulator
/// resolves it from the deltas it has already seen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContentDelta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    pub part: PartDelta,
}

impl ContentDelta {
    /// A delta with an explicit provider index.
    pub fn at(index: usize, part: PartDelta) -> Self {
        Self {
            index: Some(index),
            part,
        }
    }

    /// A delta whose position must be inferred.
    pub fn unindexed(part: PartDelta) -> Self {
        Self { index: None, part }
    }
}

/// Everything one transport event contributed to a streaming response.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PartialModelResponse {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deltas: Vec<ContentDelta>,
    /// Running usage total as of this event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<ModelUsage>,
}

impl PartialModelResponse {
    pub fn from_deltas(deltas: Vec<ContentDelta>) -> Self {
        Self {
            deltas,
            usage: None,
        }
    }

    pub fn from_usage(usage: ModelUsage) -> Self {
        Self {
            deltas: Vec::new(),
            usage: Some(usage),
        }
    }
}
