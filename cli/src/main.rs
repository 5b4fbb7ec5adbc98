use clap::{Parser, Subcommand, ValueEnum};
use hound::WavSpec;
use serde::Serialize;
use std::fs::File;
use std::path::PathBuf;
use thiserror::Error;
use tinytones_core::frame::{to_hex, RawFrame};
use tinytones_core::tone_table;
use tinytones_core::{
    FrameClass, FrameEncoder, ToneDecoder, ToneEncoder, FRAME_BYTES, MAX_GAIN_STEP,
    MAX_TONE_INDEX, SAMPLE_RATE,
};

#[derive(Parser)]
#[command(name = "tinytones")]
#[command(about = "Tone frames for Codec2 1600/3200 voice payloads")]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a tone frame and print it as hex
    Encode {
        /// Codec frame class
        #[arg(short, long, value_enum, default_value = "3200")]
        class: ClassArg,

        /// Tone index (decimal or 0x hex)
        #[arg(short, long, value_parser = parse_byte)]
        tone: u8,

        /// Gain step 0-15 (15 = 100%)
        #[arg(short, long, value_parser = parse_byte, default_value = "15")]
        gain: u8,

        /// Number of frames to write
        #[arg(short, long, default_value = "1")]
        frames: u32,

        /// Optional binary file receiving the concatenated frames
        #[arg(value_name = "OUTPUT.BIN")]
        output: Option<PathBuf>,
    },

    /// Decode a stream of 8-byte frames to a WAV file
    Decode {
        /// Codec frame class
        #[arg(short, long, value_enum, default_value = "3200")]
        class: ClassArg,

        /// Input file of concatenated frames
        #[arg(value_name = "INPUT.BIN")]
        input: PathBuf,

        /// Output WAV file
        #[arg(value_name = "OUTPUT.WAV")]
        output: PathBuf,
    },

    /// Render a tone straight to a WAV file
    Render {
        /// Codec frame class
        #[arg(short, long, value_enum, default_value = "3200")]
        class: ClassArg,

        /// Tone index (decimal or 0x hex)
        #[arg(short, long, value_parser = parse_byte)]
        tone: u8,

        /// Gain step 0-15 (15 = 100%)
        #[arg(short, long, value_parser = parse_byte, default_value = "15")]
        gain: u8,

        /// Number of frames to render
        #[arg(short, long, default_value = "50")]
        frames: u32,

        /// Output WAV file
        #[arg(value_name = "OUTPUT.WAV")]
        output: PathBuf,
    },

    /// List the tone table
    Table {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Encode and decode every tone at every gain step for both classes
    Selftest,
}

#[derive(Clone, Copy, ValueEnum)]
enum ClassArg {
    #[value(name = "3200")]
    Rate3200,
    #[value(name = "1600")]
    Rate1600,
}

impl From<ClassArg> for FrameClass {
    fn from(arg: ClassArg) -> Self {
        match arg {
            ClassArg::Rate3200 => FrameClass::Rate3200,
            ClassArg::Rate1600 => FrameClass::Rate1600,
        }
    }
}

#[derive(Debug, Error)]
enum CliError {
    #[error("Frame stream of {0} bytes is not a whole number of 8-byte frames")]
    TruncatedStream(usize),

    #[error("Self test failed for {0} frames")]
    SelfTestFailed(usize),
}

#[derive(Serialize)]
struct ToneEntry {
    index: u8,
    bank: &'static str,
    label: String,
    high_hz: f32,
    low_hz: f32,
}

fn parse_byte(value: &str) -> Result<u8, String> {
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => value.parse::<u8>(),
    };
    parsed.map_err(|e| format!("invalid byte value '{}': {}", value, e))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match cli.command {
        Commands::Encode { class, tone, gain, frames, output } => {
            encode_command(class.into(), tone, gain, frames, output)?
        }
        Commands::Decode { class, input, output } => decode_command(class.into(), &input, &output)?,
        Commands::Render { class, tone, gain, frames, output } => {
            render_command(class.into(), tone, gain, frames, &output)?
        }
        Commands::Table { json } => table_command(json)?,
        Commands::Selftest => selftest_command()?,
    }

    Ok(())
}

fn encode_command(
    class: FrameClass,
    tone: u8,
    gain: u8,
    frames: u32,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let frame = FrameEncoder::encode(class, tone, gain)?;
    println!("{}", to_hex(&frame));

    if let Some(path) = output {
        let data: Vec<u8> = (0..frames).flat_map(|_| frame).collect();
        std::fs::write(&path, &data)?;
        println!("Wrote {} frames ({} bytes) to {}", frames, data.len(), path.display());
    }

    Ok(())
}

fn decode_command(
    class: FrameClass,
    input_path: &PathBuf,
    output_path: &PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    let data = std::fs::read(input_path)?;
    if data.len() % FRAME_BYTES != 0 {
        return Err(CliError::TruncatedStream(data.len()).into());
    }
    println!("Read {} frames from {}", data.len() / FRAME_BYTES, input_path.display());

    let mut decoder = ToneDecoder::new(class);
    let mut writer = create_wav(output_path)?;
    let mut tones = 0usize;
    let mut others = 0usize;

    for chunk in data.chunks_exact(FRAME_BYTES) {
        let mut frame: RawFrame = [0u8; FRAME_BYTES];
        frame.copy_from_slice(chunk);

        // Frames that are not tones would go to the speech decoder; here they
        // become silence
        let audio = match decoder.decode(&frame) {
            Ok(audio) => {
                tones += 1;
                audio
            }
            Err(err) => {
                log::debug!("frame {}: {}", tones + others, err);
                others += 1;
                vec![0i16; class.samples_per_frame()]
            }
        };

        for sample in audio {
            writer.write_sample(sample)?;
        }
    }
    writer.finalize()?;

    println!("Decoded {} tone frames, {} other frames", tones, others);
    println!("Wrote {}", output_path.display());
    Ok(())
}

fn render_command(
    class: FrameClass,
    tone: u8,
    gain: u8,
    frames: u32,
    output_path: &PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut encoder = ToneEncoder::new(class);
    let mut decoder = ToneDecoder::new(class);
    encoder.start_tone(tone, gain, frames)?;

    let mut writer = create_wav(output_path)?;
    let mut samples = 0usize;
    while let Some(frame) = encoder.next_frame() {
        for sample in decoder.decode(&frame)? {
            writer.write_sample(sample)?;
            samples += 1;
        }
    }
    writer.finalize()?;

    println!(
        "Rendered {} samples ({} ms) to {}",
        samples,
        samples * 1000 / SAMPLE_RATE,
        output_path.display()
    );
    Ok(())
}

fn table_command(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let entries: Vec<ToneEntry> = tone_table::all_tones()
        .map(|bank| {
            let pair = bank.frequencies();
            ToneEntry {
                index: bank.index(),
                bank: bank.kind(),
                label: bank.label(),
                high_hz: pair.high,
                low_hz: pair.low,
            }
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for entry in &entries {
        if entry.high_hz == entry.low_hz {
            println!("0x{:02X}  {:<4} {:<4} {:.2} Hz", entry.index, entry.bank, entry.label, entry.high_hz);
        } else {
            println!(
                "0x{:02X}  {:<4} {:<4} {:.0} / {:.0} Hz",
                entry.index, entry.bank, entry.label, entry.high_hz, entry.low_hz
            );
        }
    }
    Ok(())
}

fn selftest_command() -> Result<(), Box<dyn std::error::Error>> {
    let mut failures = 0usize;

    for class in [FrameClass::Rate3200, FrameClass::Rate1600] {
        println!("{} Frames:", class);
        let decoder = ToneDecoder::new(class);
        let mut audio = vec![0i16; class.samples_per_frame()];

        for index in 0..=MAX_TONE_INDEX {
            for gain in 0..=MAX_GAIN_STEP {
                let frame = match FrameEncoder::encode(class, index, gain) {
                    Ok(frame) => frame,
                    Err(err) => {
                        println!("FAIL ({}); 0x{:02X}/{:X}", err, index, gain);
                        failures += 1;
                        continue;
                    }
                };

                match decoder.decode_into(&frame, 0, &mut audio) {
                    Ok(_) => println!("OK; {} -- OK", to_hex(&frame)),
                    Err(err) => {
                        println!("OK; {} -- FAIL ({})", to_hex(&frame), err);
                        failures += 1;
                    }
                }
            }
        }
    }

    if failures > 0 {
        return Err(CliError::SelfTestFailed(failures).into());
    }
    println!("All tone frames passed");
    Ok(())
}

fn create_wav(path: &PathBuf) -> Result<hound::WavWriter<std::io::BufWriter<File>>, hound::Error> {
    let spec = WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE as u32,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    hound::WavWriter::create(path, spec)
}
