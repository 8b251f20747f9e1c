use crate::cluster::kmeans_1d;
use crate::types::{Run, RunKind};

/// How the threshold was derived, and whether a keyed signal is believed to
/// exist at all.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdDecision {
    pub threshold: f32,
    pub signal_present: bool,
}

// Envelopes longer than this are strided before clustering; the threshold
// only needs the distribution, not every sample.
const THRESHOLD_SAMPLE_CAP: usize = 1 << 17;

// A bimodal envelope has its ON center well above its OFF center. Below this
// ratio the envelope is considered unimodal: silence or noise without keying.
const BIMODAL_MIN_RATIO: f32 = 2.0;

/// Derive the on/off decision threshold from the envelope itself: a 2-means
/// split of envelope magnitude, threshold at the midpoint of the two centers.
/// Needs no manual calibration and tolerates moderate noise floors and
/// constant-offset fading. Silence-only input parks the threshold above the
/// envelope maximum so everything classifies OFF.
pub fn adaptive_threshold(envelope: &[f32]) -> ThresholdDecision {
    let all_off = |max: f32| ThresholdDecision {
        threshold: max * 1.1 + 1.0,
        signal_present: false,
    };

    if envelope.is_empty() {
        return all_off(0.0);
    }
    let max = envelope.iter().cloned().fold(0.0f32, f32::max);
    if max <= 1e-6 {
        return all_off(max);
    }

    let stride = (envelope.len() / THRESHOLD_SAMPLE_CAP).max(1);
    let sampled: Vec<f32> = envelope.iter().step_by(stride).cloned().collect();
    let model = kmeans_1d(&sampled, 2);
    if model.centers.len() < 2 {
        return all_off(max);
    }

    let (off_center, on_center) = (model.centers[0], model.centers[1]);
    if on_center < BIMODAL_MIN_RATIO * off_center + 1e-6 {
        return all_off(max);
    }

    ThresholdDecision {
        threshold: (off_center + on_center) / 2.0,
        signal_present: true,
    }
}

/// Binarize the envelope. Strictly-greater comparison, so values tied with
/// the threshold classify OFF and no zero-length runs can appear.
pub fn digitize(envelope: &[f32], threshold: f32) -> Vec<u8> {
    envelope.iter().map(|&e| (e > threshold) as u8).collect()
}

/// Collapse the square wave into alternating ON/OFF runs. The runs partition
/// the input exactly.
pub fn runs(square: &[u8]) -> Vec<Run> {
    let mut out = Vec::new();
    let Some(&first) = square.first() else {
        return out;
    };

    let mut current = Run {
        kind: if first != 0 { RunKind::On } else { RunKind::Off },
        start: 0,
        duration: 0,
    };
    for (i, &level) in square.iter().enumerate() {
        let kind = if level != 0 { RunKind::On } else { RunKind::Off };
        if kind == current.kind {
            current.duration += 1;
        } else {
            out.push(current);
            current = Run {
                kind,
                start: i,
                duration: 1,
            };
        }
    }
    out.push(current);
    out
}

/// Debounce: runs shorter than `min_samples` are threshold chatter; absorb
/// them into their predecessor and coalesce equal neighbors. The first run is
/// always kept so the partition still starts at sample zero.
pub fn merge_short_runs(runs: Vec<Run>, min_samples: usize) -> Vec<Run> {
    if min_samples <= 1 {
        return runs;
    }
    let mut out: Vec<Run> = Vec::new();
    for run in runs {
        match out.last_mut() {
            Some(last) if run.duration < min_samples => last.duration += run.duration,
            Some(last) if last.kind == run.kind => last.duration += run.duration,
            _ => out.push(run),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn burst_envelope(pattern: &[(f32, usize)]) -> Vec<f32> {
        pattern
            .iter()
            .flat_map(|&(level, len)| std::iter::repeat(level).take(len))
            .collect()
    }

    #[test]
    fn silence_gets_threshold_above_max() {
        let decision = adaptive_threshold(&vec![0.0; 1000]);
        assert!(!decision.signal_present);
        assert!(decision.threshold > 0.0);

        let decision = adaptive_threshold(&[]);
        assert!(!decision.signal_present);
    }

    #[test]
    fn noise_only_envelope_is_not_a_signal() {
        // Unimodal envelope jittering around a noise floor.
        let envelope: Vec<f32> = (0..10_000)
            .map(|i| 0.1 + 0.01 * ((i as f32) * 0.7).sin())
            .collect();
        let decision = adaptive_threshold(&envelope);
        assert!(!decision.signal_present);
        assert!(decision.threshold > 0.11);
    }

    #[test]
    fn keyed_envelope_splits_between_floor_and_tone() {
        let envelope = burst_envelope(&[(0.02, 500), (0.35, 300), (0.02, 500), (0.35, 900)]);
        let decision = adaptive_threshold(&envelope);
        assert!(decision.signal_present);
        assert!(decision.threshold > 0.02 && decision.threshold < 0.35);
    }

    #[test]
    fn runs_partition_the_input() {
        let square = [0u8, 0, 1, 1, 1, 0, 1, 0, 0];
        let result = runs(&square);
        assert_eq!(result.len(), 5);
        assert_eq!(result[0].kind, RunKind::Off);
        assert_eq!(result[1], Run { kind: RunKind::On, start: 2, duration: 3 });
        let total: usize = result.iter().map(|r| r.duration).sum();
        assert_eq!(total, square.len());
        let mut expected_start = 0;
        for run in &result {
            assert_eq!(run.start, expected_start);
            expected_start += run.duration;
        }
    }

    #[test]
    fn short_runs_are_absorbed() {
        let square = [1u8, 1, 1, 1, 0, 1, 1, 1, 1];
        let merged = merge_short_runs(runs(&square), 2);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].duration, square.len());
        assert_eq!(merged[0].kind, RunKind::On);
    }

    #[test]
    fn threshold_raising_never_adds_on_runs() {
        let envelope = burst_envelope(&[
            (0.0, 100),
            (0.3, 200),
            (0.0, 100),
            (0.8, 200),
            (0.0, 100),
            (0.5, 200),
            (0.0, 100),
        ]);
        let mut last_count = usize::MAX;
        for threshold in [0.1, 0.4, 0.6, 0.9] {
            let count = runs(&digitize(&envelope, threshold))
                .iter()
                .filter(|r| r.kind == RunKind::On)
                .count();
            assert!(count <= last_count);
            last_count = count;
        }
        assert_eq!(last_count, 0);
    }
}
