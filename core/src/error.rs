use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ToneError {
    #[error("Frame header does not match the silence frame")]
    HeaderMismatch,

    #[error("Checksum mismatch in tone frame")]
    ChecksumMismatch,

    #[error("Indicator nibble does not mark a tone frame")]
    NotToneIndicator,

    #[error("Unknown tone index 0x{0:02X}")]
    UnknownToneIndex(u8),

    #[error("Tone index 0x{0:02X} out of range")]
    IndexOutOfRange(u8),

    #[error("Gain step {0} out of range")]
    GainOutOfRange(u8),
}

impl ToneError {
    /// True when a decoded frame simply isn't a tone frame and should go to
    /// the speech decoder instead
    pub fn is_not_tone(&self) -> bool {
        matches!(
            self,
            ToneError::HeaderMismatch
                | ToneError::ChecksumMismatch
                | ToneError::NotToneIndicator
                | ToneError::UnknownToneIndex(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ToneError>;
