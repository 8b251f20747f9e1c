use crate::error::MorseError;
use crate::types::{MorseElement, MorseElementType, ToneParams};
use std::f32::consts::TAU;

// Envelope ramp times that keep tone edges click-free.
const ATTACK_MS: f32 = 5.0;
const RELEASE_MS: f32 = 5.0;
const SQRT2: f32 = std::f32::consts::SQRT_2;

/// Butterworth-style biquad section (Q = 0.707), used on the decode side to
/// band-limit the signal around the detected carrier.
#[derive(Clone, Default)]
pub(crate) struct BiquadFilter {
    a0: f32,
    a1: f32,
    a2: f32,
    b1: f32,
    b2: f32,
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl BiquadFilter {
    pub(crate) fn new_lowpass(cutoff_freq: f32, sample_rate: f32) -> Self {
        let mut filter = Self::default();

        if cutoff_freq >= sample_rate * 0.49 {
            filter.a0 = 1.0; // bypass
        } else {
            let w = TAU * cutoff_freq / sample_rate;
            let cos_w = w.cos();
            let sin_w = w.sin();
            let alpha = sin_w / SQRT2;

            let norm = 1.0 + alpha;
            filter.a0 = (1.0 - cos_w) / (2.0 * norm);
            filter.a1 = (1.0 - cos_w) / norm;
            filter.a2 = (1.0 - cos_w) / (2.0 * norm);
            filter.b1 = (-2.0 * cos_w) / norm;
            filter.b2 = (1.0 - alpha) / norm;
        }

        filter
    }

    pub(crate) fn new_highpass(cutoff_freq: f32, sample_rate: f32) -> Self {
        let mut filter = Self::default();

        if cutoff_freq <= 1.0 {
            filter.a0 = 1.0; // bypass
        } else {
            let w = TAU * cutoff_freq / sample_rate;
            let cos_w = w.cos();
            let sin_w = w.sin();
            let alpha = sin_w / SQRT2;

            let norm = 1.0 + alpha;
            filter.a0 = (1.0 + cos_w) / (2.0 * norm);
            filter.a1 = -(1.0 + cos_w) / norm;
            filter.a2 = (1.0 + cos_w) / (2.0 * norm);
            filter.b1 = (-2.0 * cos_w) / norm;
            filter.b2 = (1.0 - alpha) / norm;
        }

        filter
    }

    pub(crate) fn process(&mut self, input: f32) -> f32 {
        let output = self.a0 * input + self.a1 * self.x1 + self.a2 * self.x2
            - self.b1 * self.y1
            - self.b2 * self.y2;

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = output;

        output
    }
}

/// Slow sinusoidal carrier-frequency modulation, fed into the phase
/// accumulator during synthesis.
#[derive(Debug, Clone, Copy)]
pub struct DriftMod {
    pub amount_hz: f32,
    pub rate_hz: f32,
}

impl DriftMod {
    fn offset_at(&self, t: f32) -> f32 {
        self.amount_hz * (TAU * self.rate_hz * t).sin()
    }
}

/// Synthesize timing elements into mono PCM: a sine burst per dot/dash with
/// attack/release ramps, silence per gap.
pub fn synthesize(
    elements: &[MorseElement],
    tone: &ToneParams,
    drift: Option<&DriftMod>,
) -> Result<Vec<f32>, MorseError> {
    if tone.sample_rate == 0 || tone.sample_rate > 192_000 {
        return Err(MorseError::InvalidInput("invalid sample rate".into()));
    }
    if tone.freq_hz <= 0.0 || tone.freq_hz >= tone.sample_rate as f32 / 2.0 {
        return Err(MorseError::InvalidInput(
            "tone frequency must be below the Nyquist rate".into(),
        ));
    }

    let sr = tone.sample_rate as f32;
    let volume = tone.volume.clamp(0.0, 1.0);
    let attack_len = ((ATTACK_MS / 1000.0) * sr) as usize;
    let release_len = ((RELEASE_MS / 1000.0) * sr) as usize;

    let total: usize = elements
        .iter()
        .map(|e| (e.duration_seconds * sr) as usize)
        .sum();
    let mut samples = Vec::with_capacity(total);
    let mut phase = 0.0f32;
    let mut clock = 0usize; // global sample index, drives drift

    for elem in elements {
        let n = (elem.duration_seconds * sr) as usize;

        if elem.element_type == MorseElementType::Gap {
            samples.resize(samples.len() + n, 0.0);
            clock += n;
            continue;
        }

        let attack = attack_len.min(n / 2);
        let release = release_len.min(n / 2);
        let release_start = n.saturating_sub(release);

        for j in 0..n {
            let t = (clock + j) as f32 / sr;
            let freq = match drift {
                Some(d) => tone.freq_hz + d.offset_at(t),
                None => tone.freq_hz,
            };
            phase = (phase + TAU * freq / sr) % TAU;

            let envelope = if j < attack {
                j as f32 / attack as f32
            } else if j >= release_start && release > 0 {
                (n - j) as f32 / release as f32
            } else {
                1.0
            };

            samples.push(phase.sin() * volume * envelope);
        }
        // Restart each burst at a zero crossing; bursts are independent.
        phase = 0.0;
        clock += n;
    }

    Ok(samples)
}

/// Total sample count the given elements will synthesize to.
pub fn synthesized_size(elements: &[MorseElement], tone: &ToneParams) -> usize {
    elements
        .iter()
        .map(|e| (e.duration_seconds * tone.sample_rate as f32) as usize)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timing;
    use crate::types::TimingParams;

    fn tone_elements(text: &str) -> Vec<MorseElement> {
        timing::morse_elements(text, &TimingParams::default()).unwrap()
    }

    #[test]
    fn produces_audio_for_simple_text() {
        let samples = synthesize(&tone_elements("E"), &ToneParams::default(), None).unwrap();
        assert!(!samples.is_empty());
        assert!(samples.iter().all(|s| s.abs() <= 1.0));
        // A dot at 20 wpm is 60 ms.
        let expected = (0.06 * 44100.0) as usize;
        assert!((samples.len() as i64 - expected as i64).abs() < 5);
    }

    #[test]
    fn gaps_are_silent() {
        let elements = tone_elements("E E");
        let samples = synthesize(&elements, &ToneParams::default(), None).unwrap();
        // Middle of the word gap must be exactly zero.
        let dot = (0.06 * 44100.0) as usize;
        assert_eq!(samples[dot + dot * 3], 0.0);
    }

    #[test]
    fn rejects_bad_params() {
        let elements = tone_elements("E");
        let bad_rate = ToneParams {
            sample_rate: 0,
            ..Default::default()
        };
        assert!(synthesize(&elements, &bad_rate, None).is_err());

        let bad_freq = ToneParams {
            freq_hz: 30_000.0,
            ..Default::default()
        };
        assert!(synthesize(&elements, &bad_freq, None).is_err());
    }

    #[test]
    fn drift_changes_waveform_but_not_length() {
        let elements = tone_elements("SOS");
        let tone = ToneParams::default();
        let clean = synthesize(&elements, &tone, None).unwrap();
        let drift = DriftMod {
            amount_hz: 10.0,
            rate_hz: 1.0,
        };
        let drifted = synthesize(&elements, &tone, Some(&drift)).unwrap();
        assert_eq!(clean.len(), drifted.len());
        assert!(clean.iter().zip(&drifted).any(|(a, b)| a != b));
    }

    #[test]
    fn size_matches_synthesis() {
        let elements = tone_elements("PARIS");
        let tone = ToneParams::default();
        let samples = synthesize(&elements, &tone, None).unwrap();
        assert_eq!(samples.len(), synthesized_size(&elements, &tone));
    }

    #[test]
    fn lowpass_attenuates_high_frequency() {
        let sr = 44100.0;
        let mut filter = BiquadFilter::new_lowpass(500.0, sr);
        let mut peak = 0.0f32;
        for i in 0..4410 {
            let t = i as f32 / sr;
            let out = filter.process((TAU * 8000.0 * t).sin());
            if i > 1000 {
                peak = peak.max(out.abs());
            }
        }
        assert!(peak < 0.1, "peak {peak}");
    }
}
