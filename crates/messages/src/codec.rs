//! Message encoding and decoding for transport payloads.
//!
//! # Wire Format
//!
//! Every message is bincode-encoded then LZ4-compressed with the
//! uncompressed size prepended:
//!
//! ```text
//! [u32 LE uncompressed size][LZ4 block of bincode payload]
//! ```
//!
//! # Tag-Based Type Dispatch
//!
//! The message type is determined by the tag it travels under, not by a
//! field in the payload. Receivers pick the decoder from the tag they asked
//! for.

use crate::WireMessage;
use thiserror::Error;

/// Errors that can occur during message encoding/decoding.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Message too short")]
    MessageTooShort,

    #[error("Bincode encode error: {0}")]
    Encode(String),

    #[error("Bincode decode error: {0}")]
    Decode(String),

    #[error("Decompression error: {0}")]
    Decompress(String),

    #[error("{trailing} trailing bytes after {message}")]
    TrailingBytes {
        message: &'static str,
        trailing: usize,
    },
}

fn bincode_config() -> bincode::config::Configuration {
    bincode::config::standard()
}

/// Encode a message to wire format.
pub fn encode_message<M: WireMessage>(message: &M) -> Result<Vec<u8>, CodecError> {
    let bytes = bincode::encode_to_vec(message, bincode_config())
        .map_err(|e| CodecError::Encode(e.to_string()))?;
    Ok(lz4_flex::compress_prepend_size(&bytes))
}

/// Decode a message from wire format.
///
/// The whole decompressed payload must be consumed; leftovers mean the
/// sender used a different message type under the same tag.
pub fn decode_message<M: WireMessage>(data: &[u8]) -> Result<M, CodecError> {
    if data.len() < 4 {
        return Err(CodecError::MessageTooShort);
    }

    let payload = lz4_flex::decompress_size_prepended(data)
        .map_err(|e| CodecError::Decompress(e.to_string()))?;

    let (message, read) = bincode::decode_from_slice::<M, _>(&payload, bincode_config())
        .map_err(|e| CodecError::Decode(e.to_string()))?;

    if read != payload.len() {
        return Err(CodecError::TrailingBytes {
            message: M::type_name(),
            trailing: payload.len() - read,
        });
    }
    Ok(message)
}
