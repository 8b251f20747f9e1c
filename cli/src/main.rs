use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use clap::{Parser, Subcommand};
use morsewave_core::{
    decode_wav_file, encode_to_wav_bytes, ChannelParams, DecodeParams, EncodeParams, MorseError,
    TimingParams, ToneParams,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "morsewave", version, about = "Morse code audio encoder and decoder")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode a WAV recording into morse notation and text
    Decode {
        /// Path to a mono or multi-channel WAV file
        file: PathBuf,
        /// Omit the plotting payload from the JSON output
        #[arg(long)]
        no_viz: bool,
    },
    /// Encode text into keyed tone audio
    Encode {
        /// Text to transmit
        text: String,
        /// Write a WAV file here; without it the audio is emitted as base64
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Emit base64 audio in the JSON even when writing a file
        #[arg(long)]
        base64: bool,
        /// Keying speed in words per minute
        #[arg(long, default_value_t = 20)]
        wpm: i32,
        /// Tone frequency in Hz
        #[arg(long, default_value_t = 700.0)]
        frequency: f32,
        #[arg(long, default_value_t = 44100)]
        sample_rate: u32,
        /// Timing jitter, 0.0 (none) to 1.0 (maximum)
        #[arg(long, default_value_t = 0.0)]
        humanize: f32,
        /// Seed for humanization jitter
        #[arg(long, default_value_t = 1)]
        seed: u64,
        /// Add white noise at this signal-to-noise ratio in dB
        #[arg(long)]
        snr_db: Option<f32>,
        /// Modulate amplitude with slow sinusoidal fading
        #[arg(long)]
        fading: bool,
        #[arg(long, default_value_t = 0.5)]
        fade_depth: f32,
        #[arg(long, default_value_t = 0.5)]
        fade_freq: f32,
        /// Let the carrier frequency wander
        #[arg(long)]
        drift: bool,
        #[arg(long, default_value_t = 5.0)]
        drift_amount: f32,
        #[arg(long, default_value_t = 0.2)]
        drift_rate: f32,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    match run(Cli::parse()) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            println!("{}", serde_json::json!({ "error": err.to_string() }));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<String, MorseError> {
    match cli.command {
        Command::Decode { file, no_viz } => {
            let params = DecodeParams {
                include_visualization: !no_viz,
                ..Default::default()
            };
            let output = decode_wav_file(&file, &params)?;
            Ok(serde_json::to_string(&output).expect("decode output serializes"))
        }
        Command::Encode {
            text,
            output,
            base64,
            wpm,
            frequency,
            sample_rate,
            humanize,
            seed,
            snr_db,
            fading,
            fade_depth,
            fade_freq,
            drift,
            drift_amount,
            drift_rate,
        } => {
            let params = EncodeParams {
                timing: TimingParams {
                    wpm,
                    humanization_factor: humanize,
                    random_seed: seed,
                    ..Default::default()
                },
                tone: ToneParams {
                    sample_rate,
                    freq_hz: frequency,
                    ..Default::default()
                },
                channel: ChannelParams {
                    noise_snr_db: snr_db,
                    fading_enabled: fading,
                    fade_depth,
                    fade_freq,
                    drift_enabled: drift,
                    drift_amount,
                    drift_rate,
                    ..Default::default()
                },
            };

            let (encoded, wav) = encode_to_wav_bytes(&text, &params)?;
            let mut json =
                serde_json::to_value(&encoded).expect("encode output serializes");
            if let Some(path) = &output {
                std::fs::write(path, &wav)?;
                log::info!("wrote {} bytes to {}", wav.len(), path.display());
                json["outputFile"] = serde_json::json!(path.display().to_string());
            }
            if base64 || output.is_none() {
                json["audioBase64"] = serde_json::json!(STANDARD.encode(&wav));
            }
            Ok(json.to_string())
        }
    }
}
