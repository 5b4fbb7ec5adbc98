use crate::error::{Result, ToneError};
use crate::frame::{FrameClass, FrameEncoder, RawFrame};
use crate::state::ToneState;
use crate::{MAX_GAIN_STEP, MAX_TONE_INDEX};

/// Sender side: emits tone frames in place of codec frames for one stream
pub struct ToneEncoder {
    class: FrameClass,
    state: ToneState,
}

impl ToneEncoder {
    pub fn new(class: FrameClass) -> Self {
        Self {
            class,
            state: ToneState::new(),
        }
    }

    pub fn class(&self) -> FrameClass {
        self.class
    }

    pub fn state(&self) -> &ToneState {
        &self.state
    }

    /// Encode a single tone frame
    pub fn encode(&self, index: u8, gain_step: u8) -> Result<RawFrame> {
        FrameEncoder::encode(self.class, index, gain_step)
    }

    /// Arm a burst of `frames` tone frames, replacing any burst in progress
    pub fn start_tone(&mut self, index: u8, gain_step: u8, frames: u32) -> Result<()> {
        if index > MAX_TONE_INDEX {
            return Err(ToneError::IndexOutOfRange(index));
        }
        if gain_step > MAX_GAIN_STEP {
            return Err(ToneError::GainOutOfRange(gain_step));
        }

        self.state.tone_index = index;
        self.state.gain_step = gain_step;
        self.state.frames_to_send = frames;
        log::debug!(
            "tone 0x{:02X} armed for {} frames ({} ms)",
            index,
            frames,
            frames as usize * self.class.frame_duration_ms()
        );
        Ok(())
    }

    /// Next frame of the armed burst, `None` once it is exhausted
    pub fn next_frame(&mut self) -> Option<RawFrame> {
        if !self.state.is_sending() {
            return None;
        }

        // Index and gain were range checked when the burst was armed
        let frame = self
            .encode(self.state.tone_index, self.state.gain_step)
            .ok()?;
        self.state.frames_to_send -= 1;
        Some(frame)
    }

    /// Drop whatever is left of the current burst
    pub fn cancel(&mut self) {
        self.state.frames_to_send = 0;
    }

    /// Whether a burst still has frames to emit
    pub fn is_sending(&self) -> bool {
        self.state.is_sending()
    }
}
