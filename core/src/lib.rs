//! Morse audio codec: text to keyed CW audio (with optional channel
//! impairments) and keyed CW audio back to text.
//!
//! The decoder is adaptive: tone frequency, on/off threshold, and the
//! dot/dash/gap duration classes are all learned from the recording itself,
//! so recordings at unknown speeds and pitches decode without configuration.

pub mod audio;
pub mod channel;
pub mod cluster;
pub mod decode;
pub mod envelope;
pub mod error;
pub mod interpret;
pub mod patterns;
pub mod segment;
pub mod timing;
pub mod types;
pub mod wav;

pub use decode::{decode, decode_wav_bytes, decode_wav_file};
pub use error::MorseError;
pub use types::*;

use audio::DriftMod;
use std::path::Path;

/// Encode text into keyed tone audio.
///
/// Returns the morse notation, the synthesized samples, and a description of
/// every channel impairment that was applied. Text with no encodable
/// characters at all is an error; unknown characters inside otherwise valid
/// text are skipped.
pub fn encode(text: &str, params: &EncodeParams) -> Result<EncodeOutput, MorseError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(MorseError::InvalidInput("text must not be empty".into()));
    }

    let elements = timing::morse_elements(text, &params.timing)?;
    if elements.is_empty() {
        return Err(MorseError::InvalidInput(
            "text contains no encodable characters".into(),
        ));
    }

    let drift = params.channel.drift_enabled.then(|| DriftMod {
        amount_hz: params.channel.drift_amount,
        rate_hz: params.channel.drift_rate,
    });
    let mut samples = audio::synthesize(&elements, &params.tone, drift.as_ref())?;
    let channel_effects = channel::apply(&mut samples, params.tone.sample_rate, &params.channel);

    let duration_seconds = samples.len() as f32 / params.tone.sample_rate as f32;
    log::debug!(
        "encoded {} characters into {duration_seconds:.2}s of audio",
        text.chars().count()
    );

    Ok(EncodeOutput {
        morse: timing::morse_string(text),
        samples,
        sample_rate: params.tone.sample_rate,
        duration_seconds,
        channel_effects,
    })
}

/// Encode text and serialize the audio as an in-memory WAV file.
pub fn encode_to_wav_bytes(
    text: &str,
    params: &EncodeParams,
) -> Result<(EncodeOutput, Vec<u8>), MorseError> {
    let output = encode(text, params)?;
    let bytes = wav::wav_bytes(&output.samples, output.sample_rate)?;
    Ok((output, bytes))
}

/// Encode text and write the audio to a WAV file on disk.
pub fn encode_to_wav_file(
    text: &str,
    params: &EncodeParams,
    path: &Path,
) -> Result<EncodeOutput, MorseError> {
    let output = encode(text, params)?;
    wav::write_wav_file(path, &output.samples, output.sample_rate)?;
    Ok(output)
}
