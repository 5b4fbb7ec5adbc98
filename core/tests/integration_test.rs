use rand::Rng;
use std::f64::consts::PI;
use tinytones_core::frame::checksum;
use tinytones_core::synth::ToneSynthesizer;
use tinytones_core::tone_table::{self, FrequencyPair};
use tinytones_core::{
    FrameClass, FrameDecoder, FrameEncoder, ToneBank, ToneDecoder, ToneEncoder, ToneError,
    CLIP_LIMIT, MAX_GAIN_STEP, MAX_TONE_INDEX, SAMPLE_RATE,
};

const CLASSES: [FrameClass; 2] = [FrameClass::Rate3200, FrameClass::Rate1600];

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Power at an exact frequency (generalised Goertzel)
fn tone_power(samples: &[i16], freq: f64) -> f64 {
    let omega = 2.0 * PI * freq / SAMPLE_RATE as f64;
    let coeff = 2.0 * omega.cos();

    let mut q1 = 0.0;
    let mut q2 = 0.0;
    for &sample in samples {
        let q0 = coeff * q1 - q2 + sample as f64;
        q2 = q1;
        q1 = q0;
    }

    q1 * q1 + q2 * q2 - coeff * q1 * q2
}

fn peak(samples: &[i16]) -> i32 {
    samples.iter().map(|&s| (s as i32).abs()).max().unwrap_or(0)
}

#[test]
fn test_round_trip_every_index_and_gain() {
    init_logging();

    for class in CLASSES {
        let decoder = ToneDecoder::new(class);
        let mut audio = vec![0i16; class.samples_per_frame()];

        for index in 0..=MAX_TONE_INDEX {
            for gain_step in 0..=MAX_GAIN_STEP {
                let frame = FrameEncoder::encode(class, index, gain_step)
                    .unwrap_or_else(|e| panic!("encode {} 0x{:02X}/{}: {}", class, index, gain_step, e));

                let phase = decoder
                    .decode_into(&frame, 0, &mut audio)
                    .unwrap_or_else(|e| panic!("decode {} 0x{:02X}/{}: {}", class, index, gain_step, e));

                assert_eq!(phase as usize, class.samples_per_frame());
                assert!(audio.iter().any(|&s| s != 0), "silent tone 0x{:02X}", index);
            }
        }
    }
}

#[test]
fn test_dtmf_one_scenario() {
    init_logging();

    let frame = FrameEncoder::encode(FrameClass::Rate3200, 0x00, 0xF).unwrap();
    let decoder = ToneDecoder::new(FrameClass::Rate3200);
    let mut audio = [0i16; 160];
    let phase = decoder.decode_into(&frame, 0, &mut audio).unwrap();
    assert_eq!(phase, 160);

    let row = tone_power(&audio, 697.0);
    let col = tone_power(&audio, 1209.0);
    for other in [770.0, 852.0, 941.0] {
        assert!(row > 4.0 * tone_power(&audio, other), "697 Hz not dominant over {} Hz", other);
    }
    for other in [1336.0, 1477.0, 1633.0] {
        assert!(col > 4.0 * tone_power(&audio, other), "1209 Hz not dominant over {} Hz", other);
    }
}

#[test]
fn test_single_bit_flip_never_decodes() {
    for class in CLASSES {
        for index in [0x00, 0x1A, MAX_TONE_INDEX] {
            let frame = FrameEncoder::encode(class, index, 0x6).unwrap();

            for byte in 0..7 {
                for bit in 0..8 {
                    let mut corrupted = frame;
                    corrupted[byte] ^= 1 << bit;

                    match FrameDecoder::decode(class, &corrupted) {
                        Err(ToneError::HeaderMismatch) | Err(ToneError::ChecksumMismatch) => {}
                        other => panic!(
                            "flip byte {} bit {} of 0x{:02X} gave {:?}",
                            byte, bit, index, other
                        ),
                    }
                }
            }
        }
    }
}

#[test]
fn test_indicator_gating() {
    let frame = FrameEncoder::encode(FrameClass::Rate1600, 0x07, 0x4).unwrap();

    for indicator in 0x0..0xF {
        let mut patched = frame;
        patched[5] = (indicator << 4) | 0x4;
        patched[7] = checksum(&patched[..7]);
        assert_eq!(
            FrameDecoder::decode(FrameClass::Rate1600, &patched),
            Err(ToneError::NotToneIndicator)
        );
    }
}

#[test]
fn test_range_rejection() {
    for index in (MAX_TONE_INDEX + 1)..=0xFF {
        assert_eq!(
            FrameEncoder::encode(FrameClass::Rate3200, index, 0),
            Err(ToneError::IndexOutOfRange(index))
        );

        // Hand-built frame that is valid apart from the index
        let mut frame = FrameEncoder::encode(FrameClass::Rate3200, 0, 0).unwrap();
        frame[6] = index;
        frame[7] = checksum(&frame[..7]);
        let decoder = ToneDecoder::new(FrameClass::Rate3200);
        let mut audio = [7i16; 160];
        assert_eq!(
            decoder.decode_into(&frame, 0, &mut audio),
            Err(ToneError::UnknownToneIndex(index))
        );
        assert!(audio.iter().all(|&s| s == 0));
    }

    for gain_step in 0x10..=0xFF {
        assert_eq!(
            FrameEncoder::encode(FrameClass::Rate1600, 0, gain_step),
            Err(ToneError::GainOutOfRange(gain_step))
        );
    }
}

#[test]
fn test_phase_continuity_across_frames() {
    let synth = ToneSynthesizer::new();

    for class in CLASSES {
        let len = class.samples_per_frame();
        for index in [0x05, 0x18, 0x2E] {
            let frame = FrameEncoder::encode(class, index, 0xF).unwrap();
            let decoder = ToneDecoder::new(class);

            let mut stream = vec![0i16; len * 2];
            let (first, second) = stream.split_at_mut(len);
            let phase1 = decoder.decode_into(&frame, 0, first).unwrap();
            let phase2 = decoder.decode_into(&frame, phase1, second).unwrap();
            assert_eq!(phase2 as usize, 2 * len);

            // Two chained frames equal one uninterrupted rendering
            let pair = tone_table::lookup(index).unwrap();
            let (reference, _) = synth.render(pair, 100.0, 0, len * 2);
            assert_eq!(stream, reference);

            // The splice sample continues the sine argument sequence
            let expected = splice_sample(pair, len as f64);
            assert!((stream[len] as f64 - expected).abs() <= 1.0);
        }
    }
}

fn splice_sample(pair: FrequencyPair, n: f64) -> f64 {
    let fs = SAMPLE_RATE as f64;
    let high = (n * 2.0 * PI * pair.high as f64 / fs).sin() / 2.0;
    let low = (n * 2.0 * PI * pair.low as f64 / fs).sin() / 2.0;
    (100.0 * (high + low) * 25.0).trunc()
}

#[test]
fn test_random_phase_chaining() {
    let mut rng = rand::thread_rng();
    let mut decoder = ToneDecoder::new(FrameClass::Rate3200);
    let synth = ToneSynthesizer::new();

    for _ in 0..20 {
        let start: u32 = rng.gen_range(0..1_000_000);
        let index: u8 = rng.gen_range(0..=MAX_TONE_INDEX);
        let frame = FrameEncoder::encode(FrameClass::Rate3200, index, 0xF).unwrap();

        let mut audio = [0i16; 160];
        let next = decoder.decode_into(&frame, start, &mut audio).unwrap();
        assert_eq!(next, start + 160);

        let (reference, _) = synth.render(tone_table::lookup(index).unwrap(), 100.0, start, 160);
        assert_eq!(audio.to_vec(), reference);
    }

    decoder.reset();
    assert_eq!(decoder.phase(), 0);
}

#[test]
fn test_gain_monotonic() {
    for class in CLASSES {
        for index in [0x00, 0x13, 0x22, MAX_TONE_INDEX] {
            let decoder = ToneDecoder::new(class);
            let mut audio = vec![0i16; class.samples_per_frame()];
            let mut last_peak = 0;

            for gain_step in 0..=MAX_GAIN_STEP {
                let frame = FrameEncoder::encode(class, index, gain_step).unwrap();
                decoder.decode_into(&frame, 1234, &mut audio).unwrap();
                let current = peak(&audio);
                assert!(
                    current >= last_peak,
                    "peak fell from {} to {} at gain step {}",
                    last_peak,
                    current,
                    gain_step
                );
                last_peak = current;
            }
        }
    }
}

#[test]
fn test_output_within_clip_limit() {
    for class in CLASSES {
        let decoder = ToneDecoder::new(class);
        let mut audio = vec![0i16; class.samples_per_frame()];

        for bank in tone_table::all_tones() {
            let frame = FrameEncoder::encode(class, bank.index(), MAX_GAIN_STEP).unwrap();
            decoder.decode_into(&frame, 0, &mut audio).unwrap();
            assert!(peak(&audio) <= CLIP_LIMIT as i32);
        }
    }
}

#[test]
fn test_random_payloads_are_rejected() {
    let mut rng = rand::thread_rng();

    for class in CLASSES {
        let decoder = ToneDecoder::new(class);
        let mut audio = vec![0i16; class.samples_per_frame()];

        for _ in 0..500 {
            let frame: [u8; 8] = rng.gen();
            match decoder.decode_into(&frame, 0, &mut audio) {
                Ok(_) => {
                    // Only a structurally valid tone frame may get through
                    assert_eq!(frame[5] >> 4, 0xF);
                    assert_eq!(frame[7], checksum(&frame[..7]));
                }
                Err(err) => {
                    assert!(err.is_not_tone());
                    assert!(audio.iter().all(|&s| s == 0));
                }
            }
        }
    }
}

#[test]
fn test_tone_burst_end_to_end() {
    init_logging();

    let mut encoder = ToneEncoder::new(FrameClass::Rate1600);
    let mut decoder = ToneDecoder::new(FrameClass::Rate1600);
    encoder.start_tone(0x2E, 0xB, 4).unwrap();

    let mut pcm = Vec::new();
    while let Some(frame) = encoder.next_frame() {
        pcm.extend(decoder.decode(&frame).unwrap());
    }

    assert_eq!(pcm.len(), 4 * 320);
    assert_eq!(decoder.phase(), 4 * 320);
    assert_eq!(ToneBank::from_index(0x2E).unwrap().label(), "A4");

    // A4 at gain step 0xB (75%) peaks near 0.75 * 100 * 25
    let peak = peak(&pcm);
    assert!(peak > 1800 && peak <= 1875, "unexpected A4 peak {}", peak);
    assert!(tone_power(&pcm, 440.0) > 10.0 * tone_power(&pcm, 880.0));
}
