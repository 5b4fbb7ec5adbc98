//! Tone signalling inside Codec2 voice payload frames
//!
//! A tone frame is the codec's silence frame with its tail replaced by a tone
//! descriptor: indicator nibble, gain step, tone index and checksum. Receivers
//! recognise the pattern and synthesize 8 kHz PCM for the requested tone in
//! place of running the speech decoder.

pub mod error;
pub mod tone_table;
pub mod frame;
pub mod synth;
pub mod state;
pub mod encoder;
pub mod decoder;

pub use encoder::ToneEncoder;
pub use decoder::ToneDecoder;
pub use error::{ToneError, Result};
pub use frame::{FrameClass, FrameDecoder, FrameEncoder, ToneFrame};
pub use state::ToneState;
pub use tone_table::{FrequencyPair, ToneBank};

// Audio configuration
pub const SAMPLE_RATE: usize = 8000;

// Silence frames per codec rate (only the upper 40 bits are carried on air)
pub const SILENCE_3200: u64 = 0x0100_0943_9CE4_2108;
pub const SILENCE_1600: u64 = 0x0100_0400_2575_DDF2;

// Samples per frame: 20 ms for 3200, 40 ms for 1600
pub const LEN_3200: usize = 160;
pub const LEN_1600: usize = 320;

// Frame layout
pub const FRAME_BYTES: usize = 8;
pub const HEADER_BYTES: usize = 5;
pub const TONE_INDICATOR: u8 = 0xF;
pub const MAX_GAIN_STEP: u8 = 0xF;

// Synthesis output
pub const OUTPUT_SCALE: f32 = 25.0;
pub const CLIP_LIMIT: i16 = 32760;

/// Highest tone index carried by the table (last musical note, B6)
pub const MAX_TONE_INDEX: u8 = tone_table::NOTE_LAST;

/// Gain percentage for a 4-bit gain step: 0 => 6.25%, 15 => 100%
pub fn gain_percent(gain_step: u8) -> f32 {
    (gain_step as f32 + 1.0) * 6.25
}
