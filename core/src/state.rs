use crate::MAX_GAIN_STEP;

/// Per-stream tone state owned by the caller.
///
/// `phase` is the running sample count of the synthesized tone and must be
/// threaded from one decoded frame to the next. The remaining fields describe
/// the tone a sender is currently emitting. One stream, one state: a state
/// is never shared between concurrently decoded streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToneState {
    pub phase: u32,
    pub frames_to_send: u32,
    pub tone_index: u8,
    pub gain_step: u8,
}

impl ToneState {
    pub fn new() -> Self {
        Self {
            phase: 0,
            frames_to_send: 0,
            tone_index: 0,
            gain_step: MAX_GAIN_STEP,
        }
    }

    /// Back to session start values
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn is_sending(&self) -> bool {
        self.frames_to_send > 0
    }
}

impl Default for ToneState {
    fn default() -> Self {
        Self::new()
    }
}
