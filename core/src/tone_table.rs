//! Tone index to frequency mapping
//!
//! Index ranges:
//! - `0x00..=0x0F`: DTMF keypad tones
//! - `0x10..=0x1F`: Knox keybox release tones (permuted DTMF components)
//! - `0x20..=0x48`: equal-temperament musical notes G3..B6 (A4 = 440 Hz)
//!
//! Frequencies are stored as Hz. A note fills both synthesis slots with the
//! same frequency so the dual-tone synthesizer yields a single tone.

use std::fmt;

pub const DTMF_FIRST: u8 = 0x00;
pub const DTMF_LAST: u8 = 0x0F;
pub const KNOX_FIRST: u8 = 0x10;
pub const KNOX_LAST: u8 = 0x1F;
pub const NOTE_FIRST: u8 = 0x20;
pub const NOTE_LAST: u8 = NOTE_FIRST + NUM_NOTES as u8 - 1; // 0x48

/// DTMF pairs in keypad order 1 2 3 4 5 6 7 8 9 * 0 # A B C D
const DTMF_TONES: [[f32; 2]; 16] = [
    [697.0, 1209.0],
    [697.0, 1336.0],
    [697.0, 1477.0],
    [770.0, 1209.0],
    [770.0, 1336.0],
    [770.0, 1477.0],
    [852.0, 1209.0],
    [852.0, 1336.0],
    [852.0, 1477.0],
    [941.0, 1209.0],
    [941.0, 1336.0],
    [941.0, 1477.0],
    [697.0, 1633.0],
    [770.0, 1633.0],
    [852.0, 1633.0],
    [941.0, 1633.0],
];

const DTMF_KEYS: [char; 16] = [
    '1', '2', '3', '4', '5', '6', '7', '8', '9', '*', '0', '#', 'A', 'B', 'C', 'D',
];

/// Knox rapid entry pairs, DTMF components swapped and re-paired
const KNOX_TONES: [[f32; 2]; 16] = [
    [697.0, 1633.0],
    [1209.0, 697.0],
    [1336.0, 697.0],
    [1477.0, 697.0],
    [1209.0, 770.0],
    [1336.0, 770.0],
    [1477.0, 770.0],
    [1209.0, 852.0],
    [1336.0, 852.0],
    [1477.0, 852.0],
    [1209.0, 941.0],
    [1336.0, 941.0],
    [1477.0, 941.0],
    [1633.0, 697.0],
    [1633.0, 770.0],
    [1633.0, 852.0],
];

const NUM_NOTES: usize = 41;

const NOTE_FREQUENCIES: [f32; NUM_NOTES] = [
    196.00, 207.65, 220.00, 233.08, 246.94, // G3 .. B3
    261.63, 277.18, 293.66, 311.13, 329.63, 349.23, // C4 .. F4
    369.99, 392.00, 415.30, 440.00, 466.16, 493.88, // F#4 .. B4
    523.25, 554.37, 587.33, 622.25, 659.25, 698.46, // C5 .. F5
    739.99, 783.99, 830.61, 880.00, 932.33, 987.77, // F#5 .. B5
    1046.50, 1108.73, 1174.66, 1244.51, 1318.51, 1396.91, // C6 .. F6
    1479.98, 1567.98, 1661.22, 1760.00, 1864.66, 1975.53, // F#6 .. B6
];

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Semitone position of G3 counted from C0
const NOTE_BASE_SEMITONE: usize = 3 * 12 + 7;

/// The two frequencies fed to the synthesizer, in Hz
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyPair {
    pub high: f32,
    pub low: f32,
}

impl FrequencyPair {
    pub const fn new(high: f32, low: f32) -> Self {
        Self { high, low }
    }

    /// Single tone: same frequency in both slots
    pub const fn single(freq: f32) -> Self {
        Self { high: freq, low: freq }
    }

    pub fn is_single(&self) -> bool {
        self.high == self.low
    }
}

/// Tone bank selected by a tone index, holding the offset within that bank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToneBank {
    Dtmf(u8),
    Knox(u8),
    Note(u8),
}

impl ToneBank {
    /// Classify a wire tone index, `None` past the end of the table
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            DTMF_FIRST..=DTMF_LAST => Some(ToneBank::Dtmf(index - DTMF_FIRST)),
            KNOX_FIRST..=KNOX_LAST => Some(ToneBank::Knox(index - KNOX_FIRST)),
            NOTE_FIRST..=NOTE_LAST => Some(ToneBank::Note(index - NOTE_FIRST)),
            _ => None,
        }
    }

    /// Wire tone index for this bank entry
    pub fn index(&self) -> u8 {
        match *self {
            ToneBank::Dtmf(offset) => DTMF_FIRST + offset,
            ToneBank::Knox(offset) => KNOX_FIRST + offset,
            ToneBank::Note(offset) => NOTE_FIRST + offset,
        }
    }

    pub fn frequencies(&self) -> FrequencyPair {
        match *self {
            ToneBank::Dtmf(offset) => {
                let [high, low] = DTMF_TONES[offset as usize];
                FrequencyPair::new(high, low)
            }
            ToneBank::Knox(offset) => {
                let [high, low] = KNOX_TONES[offset as usize];
                FrequencyPair::new(high, low)
            }
            ToneBank::Note(offset) => FrequencyPair::single(NOTE_FREQUENCIES[offset as usize]),
        }
    }

    /// Bank name for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            ToneBank::Dtmf(_) => "dtmf",
            ToneBank::Knox(_) => "knox",
            ToneBank::Note(_) => "note",
        }
    }

    /// Human readable label: keypad key, Knox key or note name (`A4`)
    pub fn label(&self) -> String {
        match *self {
            ToneBank::Dtmf(offset) => DTMF_KEYS[offset as usize].to_string(),
            ToneBank::Knox(offset) => format!("K{:X}", offset),
            ToneBank::Note(offset) => {
                let semitone = NOTE_BASE_SEMITONE + offset as usize;
                format!("{}{}", NOTE_NAMES[semitone % 12], semitone / 12)
            }
        }
    }
}

impl fmt::Display for ToneBank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.label())
    }
}

/// Resolve a tone index straight to its frequency pair
pub fn lookup(index: u8) -> Option<FrequencyPair> {
    ToneBank::from_index(index).map(|bank| bank.frequencies())
}

/// Every supported tone, in index order
pub fn all_tones() -> impl Iterator<Item = ToneBank> {
    (DTMF_FIRST..=NOTE_LAST).filter_map(ToneBank::from_index)
}
