use crate::error::{Result, ToneError};
use crate::tone_table::ToneBank;
use crate::{
    gain_percent, FRAME_BYTES, HEADER_BYTES, LEN_1600, LEN_3200, MAX_GAIN_STEP, MAX_TONE_INDEX,
    SAMPLE_RATE, SILENCE_1600, SILENCE_3200, TONE_INDICATOR,
};
use std::fmt;

/// Wire frame: 5 header bytes, indicator/gain, tone index, checksum
pub type RawFrame = [u8; FRAME_BYTES];

/// One's complement of the byte sum over everything before the checksum
pub fn checksum(data: &[u8]) -> u8 {
    !data.iter().fold(0u8, |sum, &byte| sum.wrapping_add(byte))
}

/// Codec2 payload class, selecting the silence frame and frame length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameClass {
    Rate3200,
    Rate1600,
}

impl FrameClass {
    pub fn silence_header(&self) -> u64 {
        match self {
            FrameClass::Rate3200 => SILENCE_3200,
            FrameClass::Rate1600 => SILENCE_1600,
        }
    }

    pub fn from_silence_header(silence: u64) -> Option<Self> {
        match silence {
            SILENCE_3200 => Some(FrameClass::Rate3200),
            SILENCE_1600 => Some(FrameClass::Rate1600),
            _ => None,
        }
    }

    /// Codec bit rate in bits per second
    pub fn rate(&self) -> u32 {
        match self {
            FrameClass::Rate3200 => 3200,
            FrameClass::Rate1600 => 1600,
        }
    }

    pub fn from_rate(rate: u32) -> Option<Self> {
        match rate {
            3200 => Some(FrameClass::Rate3200),
            1600 => Some(FrameClass::Rate1600),
            _ => None,
        }
    }

    pub fn samples_per_frame(&self) -> usize {
        match self {
            FrameClass::Rate3200 => LEN_3200,
            FrameClass::Rate1600 => LEN_1600,
        }
    }

    pub fn frame_duration_ms(&self) -> usize {
        self.samples_per_frame() * 1000 / SAMPLE_RATE
    }

    /// The 40 header bits actually carried on air
    pub fn header_bits(&self) -> u64 {
        self.silence_header() >> 24
    }

    fn header_bytes(&self) -> [u8; HEADER_BYTES] {
        let silence = self.silence_header().to_be_bytes();
        let mut header = [0u8; HEADER_BYTES];
        header.copy_from_slice(&silence[..HEADER_BYTES]);
        header
    }
}

impl fmt::Display for FrameClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rate())
    }
}

/// Validated contents of a tone frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToneFrame {
    pub class: FrameClass,
    pub bank: ToneBank,
    pub gain_step: u8,
}

impl ToneFrame {
    pub fn tone_index(&self) -> u8 {
        self.bank.index()
    }

    pub fn gain_percent(&self) -> f32 {
        gain_percent(self.gain_step)
    }
}

pub struct FrameEncoder;
pub struct FrameDecoder;

impl FrameEncoder {
    /// Build the tone frame for `index` at `gain_step` on top of the class's
    /// silence frame
    pub fn encode(class: FrameClass, index: u8, gain_step: u8) -> Result<RawFrame> {
        if index > MAX_TONE_INDEX {
            return Err(ToneError::IndexOutOfRange(index));
        }
        if gain_step > MAX_GAIN_STEP {
            return Err(ToneError::GainOutOfRange(gain_step));
        }

        let mut frame = [0u8; FRAME_BYTES];
        frame[..HEADER_BYTES].copy_from_slice(&class.header_bytes());

        // Indicator in the high nibble, gain step in the low nibble
        frame[5] = (TONE_INDICATOR << 4) | gain_step;
        frame[6] = index;
        frame[7] = checksum(&frame[..7]);

        if let Some(bank) = ToneBank::from_index(index) {
            let pair = bank.frequencies();
            log::debug!(
                "encode {}: idx 0x{:02X} ({}), gain {:X}, {} / {} Hz",
                class,
                index,
                bank,
                gain_step,
                pair.high,
                pair.low
            );
        }

        Ok(frame)
    }
}

impl FrameDecoder {
    /// Validate a received frame as a tone frame.
    ///
    /// Checks run in order header, checksum, indicator, tone index; the first
    /// failure is returned.
    pub fn decode(class: FrameClass, frame: &RawFrame) -> Result<ToneFrame> {
        let header = frame[..HEADER_BYTES]
            .iter()
            .fold(0u64, |acc, &byte| (acc << 8) | byte as u64);
        if header != class.header_bits() {
            return Err(ToneError::HeaderMismatch);
        }

        if checksum(&frame[..7]) != frame[7] {
            return Err(ToneError::ChecksumMismatch);
        }

        let indicator = frame[5] >> 4;
        if indicator != TONE_INDICATOR {
            return Err(ToneError::NotToneIndicator);
        }

        let gain_step = frame[5] & 0x0F;
        let index = frame[6];
        let bank = ToneBank::from_index(index).ok_or(ToneError::UnknownToneIndex(index))?;

        Ok(ToneFrame {
            class,
            bank,
            gain_step,
        })
    }
}

/// Hex rendering of a frame, as printed by diagnostics
pub fn to_hex(frame: &RawFrame) -> String {
    frame.iter().map(|byte| format!("{:02X}", byte)).collect()
}
