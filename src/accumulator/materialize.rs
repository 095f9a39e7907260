//! Conversion of accumulated buffers into finalized parts.

use tracing::warn;

use super::entry::{AccumulatorEntry, InternalPartDelta};
use crate::error::{Result, UnillmError};
use crate::types::{
    AudioPart, Citation, CitationDelta, ImagePart, Part, ReasoningPart, TextPart,
    ToolCallPart,
};
use crate::util::binary;

/// Finalize one entry.
///
/// Returns `Ok(None)` for entries that never accumulated anything worth
/// emitting (empty text some providers send as protocol artifacts).
pub(crate) fn materialize(entry: AccumulatorEntry) -> Result<Option<Part>> {
    let index = entry.index;
    match entry.part {
        InternalPartDelta::Text { text, citations } => {
            let citations: Vec<Citation> = citations
                .into_iter()
                .filter_map(|c| finalize_citation(index, c))
                .collect();
            if text.is_empty() && citations.is_empty() {
                return Ok(None);
            }
            Ok(Some(Part::Text(TextPart { text, citations })))
        }
        InternalPartDelta::ToolCall {
            tool_call_id,
            tool_name,
            args,
            id,
        } => {
            let tool_call_id = match tool_call_id {
                Some(tool_call_id) if !tool_name.is_empty() => tool_call_id,
                tool_call_id => {
                    return Err(UnillmError::IncompleteToolCall {
                        index,
                        tool_call_id,
                        tool_name: Some(tool_name).filter(|n| !n.is_empty()),
                    });
                }
            };
            Ok(Some(Part::ToolCall(ToolCallPart {
                tool_call_id,
                tool_name,
                args: parse_arguments(index, args)?,
                id,
            })))
        }
        InternalPartDelta::Audio {
            chunks,
            format,
            sample_rate,
            channels,
            transcript,
            id,
        } => {
            let format = match format {
                Some(format) if format.is_concatenable() => format,
                other => {
                    return Err(UnillmError::UnsupportedAudioConcatenation {
                        index,
                        format: other.map_or_else(|| "unspecified".to_string(), |f| f.to_string()),
                    });
                }
            };
            Ok(Some(Part::Audio(AudioPart {
                data: binary::encode_chunks(&chunks),
                format,
                sample_rate,
                channels,
                transcript,
                id,
            })))
        }
        InternalPartDelta::Image {
            mime_type,
            chunks,
            width,
            height,
            id,
        } => {
            let mime_type = mime_type.ok_or(UnillmError::IncompleteImage { index })?;
            Ok(Some(Part::Image(ImagePart {
                mime_type,
                data: binary::encode_chunks(&chunks),
                width,
                height,
                id,
            })))
        }
        InternalPartDelta::Reasoning {
            text,
            signature,
            id,
        } => Ok(Some(Part::Reasoning(ReasoningPart {
            text,
            signature,
            id,
        }))),
    }
}

/// Parse the argument buffer once. An empty buffer means "no arguments".
fn parse_arguments(index: usize, raw: String) -> Result<serde_json::Value> {
    if raw.trim().is_empty() {
        return Ok(serde_json::Value::Object(serde_json::Map::new()));
    }
    serde_json::from_str(&raw)
        .map_err(|source| UnillmError::MalformedArguments { index, raw, source })
}

fn finalize_citation(index: usize, delta: CitationDelta) -> Option<Citation> {
    match (delta.source, delta.start_index, delta.end_index) {
        (Some(source), Some(start_index), Some(end_index)) => Some(Citation {
            source,
            title: delta.title,
            cited_text: delta.cited_text,
            start_index,
            end_index,
        }),
        (source, start, end) => {
            warn!(
                index,
                ?source,
                ?start,
                ?end,
                "dropping incomplete citation"
            );
            None
        }
    }
}
