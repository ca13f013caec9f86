//! PCM16LE ↔ normalized float conversion.
//!
//! Both services speak 16-bit signed little-endian PCM on the wire and
//! normalized `f32` samples internally. Conversion is pure and allocates
//! only the output buffer.

use crate::error::{Result, VostreamError};

/// Decodes a PCM16LE byte buffer into samples normalized to [-1.0, 1.0).
///
/// An odd byte count means a truncated sample and is rejected rather than
/// silently dropped.
pub fn decode_pcm16(bytes: &[u8]) -> Result<Vec<f32>> {
    if bytes.len() % 2 != 0 {
        return Err(VostreamError::MalformedFrame {
            message: format!("odd byte count: {}", bytes.len()),
        });
    }

    Ok(bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]) as f32 / 32768.0)
        .collect())
}

/// Encodes normalized samples into PCM16LE bytes.
///
/// The scale factor mirrors the decoder's /32768 so a round trip stays
/// within one quantization step. Values are clamped to the representable
/// i16 range before truncation, so +1.0 and anything beyond saturate
/// instead of wrapping.
pub fn encode_pcm16(samples: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(samples.len() * 2);
    for &sample in samples {
        let value = (sample * 32768.0).clamp(-32768.0, 32767.0) as i16;
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    bytes
}
