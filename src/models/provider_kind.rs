//! Closed set of supported providers and their streaming conventions.

use serde::{Deserialize, Serialize};

use crate::accumulator::IndexPolicy;

/// Canonical provider identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderKind {
    /// OpenAI Responses API.
    OpenAi,
    /// OpenAI-style chat completions (also used by compatible servers).
    OpenAiChat,
    Anthropic,
    Google,
    Mistral,
    Cohere,
    Ollama,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 7] = [
        Self::OpenAi,
        Self::OpenAiChat,
        Self::Anthropic,
        Self::Google,
        Self::Mistral,
        Self::Cohere,
        Self::Ollama,
    ];

    /// Canonical provider key string.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::OpenAiChat => "openai-chat",
            Self::Anthropic => "anthropic",
            Self::Google => "google",
            Self::Mistral => "mistral",
            Self::Cohere => "cohere",
            Self::Ollama => "ollama",
        }
    }

    /// Parse user-facing provider aliases.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "openai" | "openai-responses" => Some(Self::OpenAi),
            "openai-chat" | "openai_chat" | "openai-compatible" | "openai_compatible" => {
                Some(Self::OpenAiChat)
            }
            "anthropic" | "claude" => Some(Self::Anthropic),
            "google" | "gemini" => Some(Self::Google),
            "mistral" => Some(Self::Mistral),
            "cohere" => Some(Self::Cohere),
            "ollama" => Some(Self::Ollama),
            _ => None,
        }
    }

    /// How this provider's stream positions its deltas.
    ///
    /// Google and Ollama send parts without a usable position, so their
    /// deltas are placed by inference.
    pub const fn index_policy(self) -> IndexPolicy {
        match self {
            Self::Google | Self::Ollama => IndexPolicy::Guess,
            Self::OpenAi | Self::OpenAiChat | Self::Anthropic | Self::Mistral | Self::Cohere => {
                IndexPolicy::Explicit
            }
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
