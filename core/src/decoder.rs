use crate::error::Result;
use crate::frame::{FrameClass, FrameDecoder, RawFrame};
use crate::state::ToneState;
use crate::synth::ToneSynthesizer;

/// Receiver side: recognises tone frames and renders their audio
pub struct ToneDecoder {
    class: FrameClass,
    synth: ToneSynthesizer,
    state: ToneState,
}

impl ToneDecoder {
    pub fn new(class: FrameClass) -> Self {
        Self {
            class,
            synth: ToneSynthesizer::new(),
            state: ToneState::new(),
        }
    }

    pub fn class(&self) -> FrameClass {
        self.class
    }

    pub fn state(&self) -> &ToneState {
        &self.state
    }

    /// Current tone phase of this decoder's stream
    pub fn phase(&self) -> u32 {
        self.state.phase
    }

    pub fn reset(&mut self) {
        self.state.reset();
    }

    /// Decode `frame` into `audio`, rendering `audio.len()` samples from
    /// `phase`.
    ///
    /// `audio` is zero-filled first, so a frame that is not a tone leaves
    /// silence behind. Returns the phase to pass with the next frame of the
    /// same stream.
    pub fn decode_into(&self, frame: &RawFrame, phase: u32, audio: &mut [i16]) -> Result<u32> {
        audio.fill(0);

        let tone = match FrameDecoder::decode(self.class, frame) {
            Ok(tone) => tone,
            Err(err) => {
                log::trace!("{} frame is not a tone: {}", self.class, err);
                return Err(err);
            }
        };

        let pair = tone.bank.frequencies();
        log::debug!(
            "decode {}: idx 0x{:02X} ({}), gain {:X}, {} / {} Hz",
            self.class,
            tone.tone_index(),
            tone.bank,
            tone.gain_step,
            pair.high,
            pair.low
        );

        Ok(self.synth.synthesize(pair, tone.gain_percent(), phase, audio))
    }

    /// Decode one frame of this decoder's stream at the class's native
    /// length, threading the phase through the decoder's own state.
    ///
    /// The phase only advances for tone frames.
    pub fn decode(&mut self, frame: &RawFrame) -> Result<Vec<i16>> {
        let mut audio = vec![0i16; self.class.samples_per_frame()];
        self.state.phase = self.decode_into(frame, self.state.phase, &mut audio)?;
        Ok(audio)
    }
}
