use crate::tone_table::FrequencyPair;
use crate::{CLIP_LIMIT, OUTPUT_SCALE, SAMPLE_RATE};
use std::f64::consts::PI;

/// Dual-sine tone synthesizer at 8 kHz.
///
/// Stateless: the phase is the absolute sample count handed in by the
/// caller, so consecutive frames rendered with a threaded phase form one
/// continuous waveform.
pub struct ToneSynthesizer {
    sample_rate: f64,
}

impl ToneSynthesizer {
    pub fn new() -> Self {
        Self {
            sample_rate: SAMPLE_RATE as f64,
        }
    }

    /// Fill `output` with the tone starting at absolute sample `phase`.
    ///
    /// Each component contributes half of the amplitude, scaled by
    /// `gain_percent` and `OUTPUT_SCALE`, then clamped to `±CLIP_LIMIT`.
    /// Returns the phase following the last written sample.
    pub fn synthesize(
        &self,
        pair: FrequencyPair,
        gain_percent: f32,
        phase: u32,
        output: &mut [i16],
    ) -> u32 {
        let step_high = 2.0 * PI * pair.high as f64 / self.sample_rate;
        let step_low = 2.0 * PI * pair.low as f64 / self.sample_rate;
        let gain = gain_percent as f64;

        let mut n = phase;
        for sample in output.iter_mut() {
            let t = n as f64;
            let value = gain * ((t * step_high).sin() / 2.0 + (t * step_low).sin() / 2.0);
            *sample = to_pcm(value as f32 * OUTPUT_SCALE);
            n = n.wrapping_add(1);
        }

        n
    }

    /// Allocate and render `len` samples, returning them with the next phase
    pub fn render(&self, pair: FrequencyPair, gain_percent: f32, phase: u32, len: usize) -> (Vec<i16>, u32) {
        let mut samples = vec![0i16; len];
        let next = self.synthesize(pair, gain_percent, phase, &mut samples);
        (samples, next)
    }
}

impl Default for ToneSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Truncate to 16-bit PCM with clipping headroom
fn to_pcm(value: f32) -> i16 {
    let limit = CLIP_LIMIT as f32;
    value.max(-limit).min(limit) as i16
}
