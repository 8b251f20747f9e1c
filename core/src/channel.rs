use crate::types::ChannelParams;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::f32::consts::TAU;

// Box-Muller transform over a seeded stream; good enough Gaussian for AWGN.
fn gaussian(rng: &mut ChaCha8Rng) -> f32 {
    let u1: f32 = rng.gen_range(f32::EPSILON..1.0);
    let u2: f32 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()
}

/// Apply fading and AWGN to a synthesized buffer, in that order. Drift is
/// applied earlier, inside the phase accumulator of the synthesizer, since
/// that is the only stage with a true instantaneous frequency; its description
/// is still reported from here so callers get one consolidated effects list.
pub fn apply(samples: &mut [f32], sample_rate: u32, params: &ChannelParams) -> Vec<String> {
    let mut effects = Vec::new();
    let sr = sample_rate as f32;

    if params.drift_enabled {
        effects.push(format!(
            "carrier drift ±{:.1} Hz at {:.2} Hz",
            params.drift_amount, params.drift_rate
        ));
    }

    if params.fading_enabled {
        let depth = params.fade_depth.clamp(0.0, 1.0);
        for (i, s) in samples.iter_mut().enumerate() {
            let t = i as f32 / sr;
            *s *= 1.0 - depth * (TAU * params.fade_freq * t).sin();
        }
        effects.push(format!(
            "sinusoidal fading, depth {:.2} at {:.2} Hz",
            depth, params.fade_freq
        ));
    }

    if let Some(snr_db) = params.noise_snr_db {
        let n = samples.len().max(1) as f32;
        let signal_power = samples.iter().map(|s| s * s).sum::<f32>() / n;
        if signal_power > 0.0 {
            let noise_power = signal_power * 10.0f32.powf(-snr_db / 10.0);
            let sigma = noise_power.sqrt();
            let mut rng = ChaCha8Rng::seed_from_u64(params.noise_seed);
            for s in samples.iter_mut() {
                *s += sigma * gaussian(&mut rng);
            }
            effects.push(format!("AWGN at {snr_db:.1} dB SNR"));
        }
    }

    effects
}
