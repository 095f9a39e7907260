//! Model response types.

use serde::{Deserialize, Serialize};

use super::message::{ModelMessage, Role};
use super::part::{Part, ToolCallPart};
use super::usage::ModelUsage;

/// A complete model response, streamed or not.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ModelResponse {
    pub content: Vec<Part>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<ModelUsage>,
    /// Cost in USD, present only when pricing was known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
}

impl ModelResponse {
    /// Concatenate all text parts.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|part| match part {
                Part::Text(t) => Some(t.text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("")
    }

    pub fn tool_calls(&self) -> Vec<&ToolCallPart> {
        self.content
            .iter()
            .filter_map(|part| match part {
                Part::ToolCall(tc) => Some(tc),
                _ => None,
            })
            .collect()
    }

    /// Turn this response into the assistant message for the next request.
    pub fn into_message(self) -> ModelMessage {
        ModelMessage {
            role: Role::Assistant,
            content: self.content,
            name: None,
            timestamp: Some(chrono::Utc::now()),
        }
    }
}
