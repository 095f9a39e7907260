//! Finalized content parts.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// A complete unit of model input or output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Part {
    Text(TextPart),
    Image(ImagePart),
    Audio(AudioPart),
    ToolCall(ToolCallPart),
    ToolResult(ToolResultPart),
    Reasoning(ReasoningPart),
    Source(SourcePart),
    Document(DocumentPart),
}

impl Part {
    /// Shorthand for a text part without citations.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(TextPart {
            text: text.into(),
            citations: Vec::new(),
        })
    }

    /// Shorthand for a tool call part.
    pub fn tool_call(
        tool_call_id: impl Into<String>,
        tool_name: impl Into<String>,
        args: serde_json::Value,
    ) -> Self {
        Self::ToolCall(ToolCallPart {
            tool_call_id: tool_call_id.into(),
            tool_name: tool_name.into(),
            args,
            id: None,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TextPart {
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub citations: Vec<Citation>,
}

/// A reference from a span of generated text to a source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Citation {
    /// URL or identifier of the cited source.
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cited_text: Option<String>,
    /// Start of the cited span in the generated text (inclusive).
    pub start_index: usize,
    /// End of the cited span in the generated text (exclusive).
    pub end_index: usize,
}

/// Image content. `data` is base64-encoded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImagePart {
    pub mime_type: String,
    pub data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Audio content. `data` is base64-encoded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AudioPart {
    pub data: String,
    pub format: AudioFormat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channels: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Audio encoding.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AudioFormat {
    Wav,
    Mp3,
    /// Uncompressed 16-bit linear PCM.
    Linear16,
    Flac,
    Mulaw,
    Alaw,
    Aac,
    Opus,
}

impl AudioFormat {
    /// Whether raw fragments in this format can be joined byte-for-byte.
    pub fn is_concatenable(self) -> bool {
        matches!(self, Self::Linear16)
    }
}

/// A tool call requested by the model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolCallPart {
    pub tool_call_id: String,
    pub tool_name: String,
    pub args: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// The result of executing a tool call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolResultPart {
    pub tool_call_id: String,
    pub tool_name: String,
    pub content: Vec<Part>,
    #[serde(default)]
    pub is_error: bool,
}

/// Model reasoning / thinking output.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ReasoningPart {
    pub text: String,
    /// Opaque provider signature used to replay reasoning in later turns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Retrieved source material supplied as context.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourcePart {
    pub source: String,
    pub title: String,
    pub content: Vec<Part>,
}

/// A document (PDF, plain text, ...). `data` is base64-encoded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentPart {
    pub mime_type: String,
    pub data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn part_serializes_with_snake_case_tag() {
        let part = Part::tool_call("call_1", "lookup", serde_json::json!({"q": "rust"}));
        let json = serde_json::to_value(&part).unwrap();
        assert_eq!(json["type"], "tool_call");
        assert_eq!(json["tool_name"], "lookup");
    }

    #[test]
    fn text_part_omits_empty_citations() {
        let json = serde_json::to_value(Part::text("hi")).unwrap();
        assert!(json.get("citations").is_none());
    }

    #[test]
    fn audio_format_parses_and_reports_concatenability() {
        assert_eq!(AudioFormat::from_str("linear16").unwrap(), AudioFormat::Linear16);
        assert!(AudioFormat::Linear16.is_concatenable());
        assert!(!AudioFormat::Mp3.is_concatenable());
        assert_eq!(AudioFormat::Opus.to_string(), "opus");
    }
}
