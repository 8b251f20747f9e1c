use crate::error::MorseError;
use crate::patterns::glyphs_for_char;
use crate::types::{MorseElement, MorseElementType, TimingParams};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

// ITU timing constants
const DOT_LENGTH_WPM: f32 = 1.2; // dot duration = 1.2 / WPM seconds
const DOTS_PER_DASH: f32 = 3.0;
const DOTS_PER_CHAR_GAP: f32 = 3.0;
const DOTS_PER_WORD_GAP: f32 = 7.0;
const HUMANIZATION_MAX_VARIANCE: f32 = 0.3; // fraction of the base duration

// Bounded random variation of a base duration. No-op when the factor is zero.
fn humanize(base: f32, factor: f32, rng: &mut Option<ChaCha8Rng>) -> f32 {
    let rng = match rng {
        Some(rng) if factor > 0.0 => rng,
        _ => return base,
    };
    let max_variation = base * factor * HUMANIZATION_MAX_VARIANCE;
    let variation = rng.gen_range(-1.0f32..1.0) * max_variation;
    (base + variation).clamp(base * 0.1, base * (1.0 + HUMANIZATION_MAX_VARIANCE))
}

/// Expand text into keyed tone/gap timing elements. Unknown characters are
/// skipped; spaces become inter-word gaps.
pub fn morse_elements(
    text: &str,
    params: &TimingParams,
) -> Result<Vec<MorseElement>, MorseError> {
    if params.wpm <= 0 {
        return Err(MorseError::InvalidInput("wpm must be positive".into()));
    }

    let mut rng = (params.humanization_factor > 0.0)
        .then(|| ChaCha8Rng::seed_from_u64(params.random_seed));

    let dot_sec = DOT_LENGTH_WPM / params.wpm as f32;
    let mut elements: Vec<MorseElement> = Vec::new();
    let push = |elements: &mut Vec<MorseElement>, element_type, base, rng: &mut _| {
        elements.push(MorseElement {
            element_type,
            duration_seconds: humanize(base, params.humanization_factor, rng),
        });
    };

    for ch in text.trim().bytes() {
        if ch == b' ' {
            let base = dot_sec * DOTS_PER_WORD_GAP * params.word_gap_multiplier;
            push(&mut elements, MorseElementType::Gap, base, &mut rng);
            continue;
        }
        let Some(glyphs) = glyphs_for_char(ch) else {
            continue;
        };

        // Inter-character gap, unless we are at the start or a word gap was
        // just emitted.
        let needs_char_gap = elements
            .last()
            .map(|e| e.element_type != MorseElementType::Gap)
            .unwrap_or(false);
        if needs_char_gap {
            push(
                &mut elements,
                MorseElementType::Gap,
                dot_sec * DOTS_PER_CHAR_GAP,
                &mut rng,
            );
        }

        for (i, glyph) in glyphs.chars().enumerate() {
            if i > 0 {
                push(&mut elements, MorseElementType::Gap, dot_sec, &mut rng);
            }
            match glyph {
                '.' => push(&mut elements, MorseElementType::Dot, dot_sec, &mut rng),
                '-' => push(
                    &mut elements,
                    MorseElementType::Dash,
                    dot_sec * DOTS_PER_DASH,
                    &mut rng,
                ),
                _ => unreachable!("patterns contain only dots and dashes"),
            }
        }
    }

    Ok(elements)
}

/// Textual Morse representation: glyph groups joined by spaces, `/` between
/// words. Matches what the decoder reconstructs from clean audio.
pub fn morse_string(text: &str) -> String {
    let mut tokens: Vec<&str> = Vec::new();
    for ch in text.trim().bytes() {
        if ch == b' ' {
            if tokens.last().map(|&t| t != "/").unwrap_or(false) {
                tokens.push("/");
            }
        } else if let Some(glyphs) = glyphs_for_char(ch) {
            tokens.push(glyphs);
        }
    }
    while tokens.last() == Some(&"/") {
        tokens.pop();
    }
    tokens.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_dot() {
        let result = morse_elements("E", &TimingParams::default()).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].element_type, MorseElementType::Dot);
    }

    #[test]
    fn multi_character_has_all_element_kinds() {
        let result = morse_elements("SOS", &TimingParams::default()).unwrap();
        assert!(result.len() > 5);
        assert!(result.iter().any(|e| e.element_type == MorseElementType::Dot));
        assert!(result.iter().any(|e| e.element_type == MorseElementType::Dash));
        assert!(result.iter().any(|e| e.element_type == MorseElementType::Gap));
    }

    #[test]
    fn wpm_scales_durations() {
        let fast = TimingParams {
            wpm: 40,
            ..Default::default()
        };
        let slow = TimingParams {
            wpm: 10,
            ..Default::default()
        };
        let fast_result = morse_elements("E", &fast).unwrap();
        let slow_result = morse_elements("E", &slow).unwrap();
        assert!(fast_result[0].duration_seconds < slow_result[0].duration_seconds);
    }

    #[test]
    fn invalid_wpm_rejected() {
        assert!(morse_elements("E", &TimingParams { wpm: 0, ..Default::default() }).is_err());
    }

    #[test]
    fn humanization_is_deterministic_and_bounded() {
        let params = TimingParams {
            humanization_factor: 1.0,
            random_seed: 42,
            ..Default::default()
        };
        let a = morse_elements("PARIS", &params).unwrap();
        let b = morse_elements("PARIS", &params).unwrap();
        let dot_sec = 1.2 / 20.0;
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.duration_seconds, y.duration_seconds);
        }
        for e in &a {
            if e.element_type == MorseElementType::Dot {
                assert!(e.duration_seconds <= dot_sec * (1.0 + HUMANIZATION_MAX_VARIANCE));
                assert!(e.duration_seconds >= dot_sec * 0.1);
            }
        }
    }

    #[test]
    fn morse_string_fixture() {
        assert_eq!(
            morse_string("HELLO WORLD"),
            ".... . .-.. .-.. --- / .-- --- .-. .-.. -.."
        );
        assert_eq!(morse_string("hello world"), morse_string("HELLO WORLD"));
    }

    #[test]
    fn morse_string_collapses_and_trims_spaces() {
        assert_eq!(morse_string("  A  B "), ".- / -...");
        assert_eq!(morse_string("~~~"), "");
    }

    #[test]
    fn unknown_characters_skipped_in_elements() {
        let with = morse_elements("A~B", &TimingParams::default()).unwrap();
        let without = morse_elements("AB", &TimingParams::default()).unwrap();
        assert_eq!(with.len(), without.len());
    }
}
