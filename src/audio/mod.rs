//! Audio wire-format handling.
//!
//! PCM16LE codec, the sliding-window accumulator for the transcription
//! direction and the fixed-size framer for the synthesis direction.

pub mod codec;
pub mod framer;
pub mod window;

pub use codec::{decode_pcm16, encode_pcm16};
pub use framer::frame_pcm;
pub use window::{StreamBuffer, WindowConfig};
