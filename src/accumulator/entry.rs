//! Per-index in-flight buffers and their merge rules.

use crate::error::{Result, UnillmError};
use crate::types::{
    AudioFormat, AudioPartDelta, CitationDelta, ImagePartDelta, PartDelta, PartKind,
    ReasoningPartDelta, TextPartDelta, ToolCallPartDelta,
};
use crate::util::binary;

/// Growing state for one position in the response.
///
/// Created on first sight of its index and only ever merged into.
#[derive(Debug)]
pub(crate) struct AccumulatorEntry {
    pub(crate) index: usize,
    pub(crate) part: InternalPartDelta,
}

/// Owned, mutable buffers mirroring [`PartDelta`].
#[derive(Debug)]
pub(crate) enum InternalPartDelta {
    Text {
        text: String,
        citations: Vec<CitationDelta>,
    },
    Image {
        mime_type: Option<String>,
        chunks: Vec<Vec<u8>>,
        width: Option<u32>,
        height: Option<u32>,
        id: Option<String>,
    },
    Audio {
        /// Decoded bytes, one buffer per received fragment.
        chunks: Vec<Vec<u8>>,
        format: Option<AudioFormat>,
        sample_rate: Option<u32>,
        channels: Option<u32>,
        transcript: Option<String>,
        id: Option<String>,
    },
    ToolCall {
        tool_call_id: Option<String>,
        tool_name: String,
        /// Raw argument text, parsed only at materialization.
        args: String,
        id: Option<String>,
    },
    Reasoning {
        text: String,
        signature: Option<String>,
        id: Option<String>,
    },
}

impl AccumulatorEntry {
    /// Create an empty entry of the given kind.
    pub(crate) fn open(index: usize, kind: PartKind) -> Self {
        let part = match kind {
            PartKind::Text => InternalPartDelta::Text {
                text: String::new(),
                citations: Vec::new(),
            },
            PartKind::Image => InternalPartDelta::Image {
                mime_type: None,
                chunks: Vec::new(),
                width: None,
                height: None,
                id: None,
            },
            PartKind::Audio => InternalPartDelta::Audio {
                chunks: Vec::new(),
                format: None,
                sample_rate: None,
                channels: None,
                transcript: None,
                id: None,
            },
            PartKind::ToolCall => InternalPartDelta::ToolCall {
                tool_call_id: None,
                tool_name: String::new(),
                args: String::new(),
                id: None,
            },
            PartKind::Reasoning => InternalPartDelta::Reasoning {
                text: String::new(),
                signature: None,
                id: None,
            },
        };
        Self { index, part }
    }

    pub(crate) fn kind(&self) -> PartKind {
        match self.part {
            InternalPartDelta::Text { .. } => PartKind::Text,
            InternalPartDelta::Image { .. } => PartKind::Image,
            InternalPartDelta::Audio { .. } => PartKind::Audio,
            InternalPartDelta::ToolCall { .. } => PartKind::ToolCall,
            InternalPartDelta::Reasoning { .. } => PartKind::Reasoning,
        }
    }

    /// The tool call id, once one has been received.
    pub(crate) fn tool_call_id(&self) -> Option<&str> {
        match &self.part {
            InternalPartDelta::ToolCall { tool_call_id, .. } => tool_call_id.as_deref(),
            _ => None,
        }
    }

    /// Merge one fragment into this entry.
    ///
    /// Fails without modifying the entry if the fragment is of a different
    /// kind or carries undecodable binary data.
    pub(crate) fn merge(&mut self, delta: PartDelta) -> Result<()> {
        let index = self.index;
        let existing = self.kind();
        match (&mut self.part, delta) {
            (InternalPartDelta::Text { text, citations }, PartDelta::Text(d)) => {
                let TextPartDelta { text: fragment, citation } = d;
                text.push_str(&fragment);
                citations.extend(citation);
            }
            (
                InternalPartDelta::Image {
                    mime_type,
                    chunks,
                    width,
                    height,
                    id,
                },
                PartDelta::Image(d),
            ) => {
                let ImagePartDelta {
                    mime_type: d_mime,
                    data,
                    width: d_width,
                    height: d_height,
                    id: d_id,
                } = d;
                if let Some(bytes) = decode_fragment(index, PartKind::Image, data)? {
                    chunks.push(bytes);
                }
                replace_if_non_empty(mime_type, d_mime);
                replace_if_some(width, d_width);
                replace_if_some(height, d_height);
                replace_if_non_empty(id, d_id);
            }
            (
                InternalPartDelta::Audio {
                    chunks,
                    format,
                    sample_rate,
                    channels,
                    transcript,
                    id,
                },
                PartDelta::Audio(d),
            ) => {
                let AudioPartDelta {
                    data,
                    format: d_format,
                    sample_rate: d_rate,
                    channels: d_channels,
                    transcript: d_transcript,
                    id: d_id,
                } = d;
                if let Some(bytes) = decode_fragment(index, PartKind::Audio, data)? {
                    chunks.push(bytes);
                }
                replace_if_some(format, d_format);
                replace_if_some(sample_rate, d_rate);
                replace_if_some(channels, d_channels);
                if let Some(fragment) = d_transcript.filter(|t| !t.is_empty()) {
                    transcript.get_or_insert_with(String::new).push_str(&fragment);
                }
                replace_if_non_empty(id, d_id);
            }
            (
                InternalPartDelta::ToolCall {
                    tool_call_id,
                    tool_name,
                    args,
                    id,
                },
                PartDelta::ToolCall(d),
            ) => {
                let ToolCallPartDelta {
                    tool_call_id: d_call_id,
                    tool_name: d_name,
                    args: d_args,
                    id: d_id,
                } = d;
                if tool_call_id.is_none() {
                    *tool_call_id = d_call_id.filter(|v| !v.is_empty());
                }
                if let Some(fragment) = d_name {
                    tool_name.push_str(&fragment);
                }
                if let Some(fragment) = d_args {
                    args.push_str(&fragment);
                }
                replace_if_non_empty(id, d_id);
            }
            (
                InternalPartDelta::Reasoning {
                    text,
                    signature,
                    id,
                },
                PartDelta::Reasoning(d),
            ) => {
                let ReasoningPartDelta {
                    text: d_text,
                    signature: d_signature,
                    id: d_id,
                } = d;
                if let Some(fragment) = d_text {
                    text.push_str(&fragment);
                }
                replace_if_non_empty(signature, d_signature);
                replace_if_non_empty(id, d_id);
            }
            (_, delta) => {
                return Err(UnillmError::TagMismatch {
                    index,
                    existing,
                    incoming: delta.kind(),
                });
            }
        }
        Ok(())
    }
}

/// Decode a base64 fragment on receipt. Empty fragments contribute nothing.
fn decode_fragment(index: usize, kind: PartKind, data: Option<String>) -> Result<Option<Vec<u8>>> {
    match data.filter(|d| !d.is_empty()) {
        Some(encoded) => binary::decode_chunk(&encoded)
            .map(Some)
            .map_err(|source| UnillmError::InvalidBinaryData {
                index,
                kind,
                source,
            }),
        None => Ok(None),
    }
}

fn replace_if_non_empty(target: &mut Option<String>, value: Option<String>) {
    if let Some(v) = value.filter(|v| !v.is_empty()) {
        *target = Some(v);
    }
}

fn replace_if_some<T>(target: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *target = value;
    }
}
