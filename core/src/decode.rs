//! Decode pipeline: audio -> envelope -> adaptive threshold -> runs ->
//! duration clustering -> symbols. Every stage is deterministic, so the same
//! recording always decodes to the same text.

use crate::cluster::{kmeans_1d, merge_close, ClusterModel};
use crate::error::MorseError;
use crate::interpret::assemble;
use crate::types::{
    ClusteringViz, DecodeOutput, DecodeParams, GapClass, OffRunViz, OnRunViz, Run, RunKind,
    Visualization,
};
use crate::{envelope, segment, wav};
use std::path::Path;

// Adjacent duration clusters closer than this ratio are one class split by
// jitter; true Morse classes sit at least 2.33x apart.
const DURATION_MERGE_RATIO: f32 = 1.8;

// Fallback when only one ON duration class exists: bursts shorter than this
// are dots, longer are dashes.
const SINGLE_CLASS_DASH_SEC: f32 = 0.1;

// Gap length relative to the dot length, used when fewer than three gap
// classes are present. 1x is an intra-character gap, 3x a letter gap, 7x a
// word gap; the cuts sit between those.
const LETTER_GAP_MIN_RATIO: f32 = 2.0;
const WORD_GAP_MIN_RATIO: f32 = 5.0;

/// Decode raw mono samples into morse notation and text.
///
/// Degenerate audio (silence, pure noise, no keyed carrier) decodes to empty
/// strings; only structurally invalid input is an error.
pub fn decode(
    samples: &[f32],
    sample_rate: u32,
    params: &DecodeParams,
) -> Result<DecodeOutput, MorseError> {
    if sample_rate == 0 {
        return Err(MorseError::InvalidInput("sample rate must be positive".into()));
    }
    if samples.is_empty() {
        return Err(MorseError::InvalidInput("no audio samples".into()));
    }

    let sr = sample_rate as f32;
    let mut audio = samples.to_vec();

    let mut band_limited = false;
    if params.bandpass_enabled {
        if let Some(freq) =
            envelope::detect_tone(&audio, sample_rate, params.tone_min_hz, params.tone_max_hz)
        {
            log::debug!("carrier detected at {freq:.1} Hz");
            envelope::bandpass(&mut audio, sample_rate, freq, params.bandpass_width_hz);
            band_limited = true;
        }
    }
    if !band_limited {
        // No carrier to center on; at least remove any DC offset.
        let mean = audio.iter().sum::<f32>() / audio.len() as f32;
        for s in audio.iter_mut() {
            *s -= mean;
        }
    }

    let window = (params.envelope_window_sec * sr).round().max(1.0) as usize;
    let env = envelope::envelope(&audio, window);
    let decision = segment::adaptive_threshold(&env);
    let square = segment::digitize(&env, decision.threshold);

    if !decision.signal_present {
        log::info!("no keyed signal found");
        return Ok(DecodeOutput {
            morse: String::new(),
            text: String::new(),
            visualization: build_viz(params, &audio, &env, decision.threshold, &square, None),
        });
    }

    let min_run = ((params.min_run_sec * sr) as usize).max(1);
    let all_runs = segment::merge_short_runs(segment::runs(&square), min_run);

    // Leading and trailing silence carries no symbols.
    let first = all_runs.iter().position(|r| r.kind == RunKind::On);
    let Some(first) = first else {
        return Ok(DecodeOutput {
            morse: String::new(),
            text: String::new(),
            visualization: build_viz(params, &audio, &env, decision.threshold, &square, None),
        });
    };
    let last = all_runs.iter().rposition(|r| r.kind == RunKind::On).unwrap_or(first);
    let message_runs = &all_runs[first..=last];

    let on_durations: Vec<f32> = durations_of(message_runs, RunKind::On);
    let off_durations: Vec<f32> = durations_of(message_runs, RunKind::Off);

    let on_model = merge_close(&kmeans_1d(&on_durations, 2), DURATION_MERGE_RATIO);
    let (glyphs, dot_len) = classify_on_runs(&on_model, on_durations.len(), sr);

    let gap_model = merge_close(&kmeans_1d(&off_durations, 3), DURATION_MERGE_RATIO);
    let gap_labels = classify_gaps(&gap_model, dot_len);

    let symbols = assemble(&glyphs, &gap_labels);
    log::debug!(
        "decoded {} tone bursts into {} characters",
        glyphs.len(),
        symbols.text.chars().count()
    );

    let clustering = ClusteringViz {
        on: message_runs
            .iter()
            .filter(|r| r.kind == RunKind::On)
            .zip(&glyphs)
            .map(|(r, &label)| OnRunViz {
                duration: r.duration as u64,
                label,
            })
            .collect(),
        off: message_runs
            .iter()
            .filter(|r| r.kind == RunKind::Off)
            .zip(&gap_labels)
            .map(|(r, &label)| OffRunViz {
                duration: r.duration as u64,
                label,
            })
            .collect(),
        on_boundaries: on_model.boundaries(),
        off_boundaries: gap_model.boundaries(),
        on_centers: on_model.centers,
        off_centers: gap_model.centers,
    };

    Ok(DecodeOutput {
        morse: symbols.morse,
        text: symbols.text,
        visualization: build_viz(
            params,
            &audio,
            &env,
            decision.threshold,
            &square,
            Some(clustering),
        ),
    })
}

/// Decode an in-memory WAV file.
pub fn decode_wav_bytes(bytes: &[u8], params: &DecodeParams) -> Result<DecodeOutput, MorseError> {
    let (samples, sample_rate) = wav::read_wav_bytes(bytes)?;
    decode(&samples, sample_rate, params)
}

/// Decode a WAV file from disk.
pub fn decode_wav_file(path: &Path, params: &DecodeParams) -> Result<DecodeOutput, MorseError> {
    let (samples, sample_rate) = wav::read_wav_file(path)?;
    decode(&samples, sample_rate, params)
}

fn durations_of(runs: &[Run], kind: RunKind) -> Vec<f32> {
    runs.iter()
        .filter(|r| r.kind == kind)
        .map(|r| r.duration as f32)
        .collect()
}

/// Map each ON run to its glyph and estimate the dot length in samples. With
/// two duration classes the shorter is the dot. A lone class (all-dot or
/// all-dash messages) is split on absolute length instead, and an all-dash
/// message infers its dot length from the 3:1 dash ratio.
fn classify_on_runs(model: &ClusterModel, count: usize, sr: f32) -> (Vec<char>, f32) {
    match model.centers.len() {
        0 => (Vec::new(), 1.0),
        1 => {
            let center = model.centers[0];
            if center > SINGLE_CLASS_DASH_SEC * sr {
                (vec!['-'; count], center / 3.0)
            } else {
                (vec!['.'; count], center)
            }
        }
        _ => {
            let glyphs = model
                .labels
                .iter()
                .map(|&l| if l == 0 { '.' } else { '-' })
                .collect();
            (glyphs, model.centers[0])
        }
    }
}

/// Map each OFF run to a gap class. Three duration classes map directly to
/// intra/letter/word in ascending order; with fewer, each class is placed by
/// its length relative to the dot.
fn classify_gaps(model: &ClusterModel, dot_len: f32) -> Vec<GapClass> {
    if model.centers.len() == 3 {
        const CLASSES: [GapClass; 3] = [GapClass::Intra, GapClass::Letter, GapClass::Word];
        return model.labels.iter().map(|&l| CLASSES[l]).collect();
    }

    let dot_len = dot_len.max(1.0);
    model
        .labels
        .iter()
        .map(|&l| {
            let ratio = model.centers[l] / dot_len;
            if ratio < LETTER_GAP_MIN_RATIO {
                GapClass::Intra
            } else if ratio < WORD_GAP_MIN_RATIO {
                GapClass::Letter
            } else {
                GapClass::Word
            }
        })
        .collect()
}

fn build_viz(
    params: &DecodeParams,
    audio: &[f32],
    env: &[f32],
    threshold: f32,
    square: &[u8],
    clustering: Option<ClusteringViz>,
) -> Option<Visualization> {
    if !params.include_visualization {
        return None;
    }

    let points = params.visualization_points;
    let env_max = env.iter().cloned().fold(0.0f32, f32::max);
    let normalize = |e: f32| if env_max > 0.0 { e / env_max } else { 0.0 };

    Some(Visualization {
        audio: downsample(audio, points),
        envelope: downsample(env, points).into_iter().map(normalize).collect(),
        threshold: normalize(threshold),
        square: downsample(square, points),
        clustering: clustering.unwrap_or_default(),
    })
}

// Plain decimation; plotting front ends need the shape, not the samples.
fn downsample<T: Copy>(data: &[T], points: usize) -> Vec<T> {
    if points == 0 || data.len() <= points {
        return data.to_vec();
    }
    let step = data.len() as f64 / points as f64;
    (0..points).map(|i| data[(i as f64 * step) as usize]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silence_decodes_to_empty_strings() {
        let result = decode(&vec![0.0; 8000], 8000, &DecodeParams::default()).unwrap();
        assert!(result.morse.is_empty());
        assert!(result.text.is_empty());
        let viz = result.visualization.unwrap();
        assert!(viz.clustering.on.is_empty());
        assert!(viz.envelope.iter().all(|e| *e == 0.0));
    }

    #[test]
    fn invalid_input_is_rejected() {
        assert!(decode(&[], 8000, &DecodeParams::default()).is_err());
        assert!(decode(&[0.1, 0.2], 0, &DecodeParams::default()).is_err());
    }

    #[test]
    fn visualization_is_opt_out() {
        let params = DecodeParams {
            include_visualization: false,
            ..Default::default()
        };
        let result = decode(&vec![0.0; 8000], 8000, &params).unwrap();
        assert!(result.visualization.is_none());
    }

    #[test]
    fn downsample_caps_length_and_keeps_endpoints_in_range() {
        let data: Vec<f32> = (0..10_000).map(|i| i as f32).collect();
        let small = downsample(&data, 100);
        assert_eq!(small.len(), 100);
        assert_eq!(small[0], 0.0);
        assert!(*small.last().unwrap() < 10_000.0);

        let short = downsample(&data[..50], 100);
        assert_eq!(short.len(), 50);
    }

    #[test]
    fn gap_ratio_fallback_uses_dot_length() {
        let model = ClusterModel {
            centers: vec![60.0, 190.0],
            labels: vec![0, 1, 0],
        };
        let labels = classify_gaps(&model, 60.0);
        assert_eq!(
            labels,
            vec![GapClass::Intra, GapClass::Letter, GapClass::Intra]
        );
    }
}
