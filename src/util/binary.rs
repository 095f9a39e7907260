//! Base64 handling for streamed binary content.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Decode one independently encoded base64 fragment.
pub fn decode_chunk(data: &str) -> Result<Vec<u8>, base64::DecodeError> {
    STANDARD.decode(data)
}

/// Join decoded fragments byte-for-byte and encode the result once.
pub fn encode_chunks(chunks: &[Vec<u8>]) -> String {
    STANDARD.encode(chunks.concat())
}
