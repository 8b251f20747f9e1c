//! Front end of the decoder: carrier detection, band-limiting, and the
//! amplitude envelope the rest of the pipeline runs on.

use crate::audio::BiquadFilter;
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;
use std::f32::consts::TAU;

const FFT_SIZE: usize = 4096;
const FFT_STEP: usize = 1024;

// Two seconds of audio is plenty to pin down a CW carrier.
const DETECT_MAX_SECONDS: u32 = 2;

/// Estimate the carrier frequency by averaging the power spectrum over
/// overlapping Hamming-windowed frames and taking the strongest bin inside
/// `[min_hz, max_hz]`. Returns `None` when nothing in that band carries
/// meaningful energy, e.g. on silence.
pub fn detect_tone(samples: &[f32], sample_rate: u32, min_hz: f32, max_hz: f32) -> Option<f32> {
    if samples.is_empty() || sample_rate == 0 {
        return None;
    }

    let analyze = &samples[..samples.len().min((sample_rate * DETECT_MAX_SECONDS) as usize)];
    let window: Vec<f32> = (0..FFT_SIZE)
        .map(|i| 0.54 - 0.46 * (TAU * i as f32 / (FFT_SIZE - 1) as f32).cos())
        .collect();

    let fft = FftPlanner::<f32>::new().plan_fft_forward(FFT_SIZE);
    let mut spectrum = vec![0.0f64; FFT_SIZE / 2];
    let mut buffer = vec![Complex::new(0.0f32, 0.0); FFT_SIZE];

    let mut offset = 0;
    loop {
        let frame = &analyze[offset.min(analyze.len())..analyze.len().min(offset + FFT_SIZE)];
        for (i, slot) in buffer.iter_mut().enumerate() {
            // Short final frames are zero-padded.
            let s = frame.get(i).copied().unwrap_or(0.0);
            *slot = Complex::new(s * window[i], 0.0);
        }
        fft.process(&mut buffer);
        for (acc, bin) in spectrum.iter_mut().zip(&buffer[..FFT_SIZE / 2]) {
            *acc += bin.norm_sqr() as f64;
        }

        offset += FFT_STEP;
        if offset >= analyze.len() {
            break;
        }
    }

    let hz_per_bin = sample_rate as f32 / FFT_SIZE as f32;
    let lo = ((min_hz / hz_per_bin).ceil() as usize).max(1);
    let hi = ((max_hz / hz_per_bin).floor() as usize).min(FFT_SIZE / 2 - 1);
    if lo > hi {
        return None;
    }

    let (best_bin, &best_power) = spectrum[lo..=hi]
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, p)| (i + lo, p))?;

    if best_power <= 1e-9 {
        return None;
    }
    Some(best_bin as f32 * hz_per_bin)
}

/// Band-limit the signal around `center_hz` with a highpass/lowpass biquad
/// pair. Degenerate bands (too narrow, or brushing Nyquist) leave the samples
/// untouched.
pub fn bandpass(samples: &mut [f32], sample_rate: u32, center_hz: f32, width_hz: f32) {
    let sr = sample_rate as f32;
    let low_cut = (center_hz - width_hz).max(50.0);
    let high_cut = center_hz + width_hz;
    if low_cut >= high_cut || high_cut >= sr * 0.49 {
        return;
    }

    let mut highpass = BiquadFilter::new_highpass(low_cut, sr);
    let mut lowpass = BiquadFilter::new_lowpass(high_cut, sr);
    for s in samples.iter_mut() {
        *s = lowpass.process(highpass.process(*s));
    }
}

/// Centered moving-RMS amplitude envelope. Prefix sums of squared samples in
/// f64 keep the subtraction stable over long recordings.
pub fn envelope(samples: &[f32], window: usize) -> Vec<f32> {
    if samples.is_empty() {
        return Vec::new();
    }
    let window = window.max(1);

    let mut prefix = vec![0.0f64; samples.len() + 1];
    for (i, &s) in samples.iter().enumerate() {
        prefix[i + 1] = prefix[i] + (s as f64) * (s as f64);
    }

    let half = window / 2;
    (0..samples.len())
        .map(|i| {
            let lo = i.saturating_sub(half);
            let hi = (i + half + 1).min(samples.len());
            let mean_sq = (prefix[hi] - prefix[lo]) / (hi - lo) as f64;
            (mean_sq.max(0.0) as f32).sqrt()
        })
        .collect()
}
