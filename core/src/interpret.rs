use crate::patterns::char_for_glyphs;
use crate::types::GapClass;

/// Result of reading a classified run sequence back into symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbols {
    pub morse: String,
    pub text: String,
}

/// Rebuild morse notation and text from classified runs. `on_labels[i]` is
/// the glyph of the i-th tone burst ('.' or '-'); `gap_labels[i]` classifies
/// the silence that follows it. A missing trailing gap closes the message.
/// Glyph groups with no dictionary entry decode to '?' so one garbled letter
/// cannot take down the whole transmission.
pub fn assemble(on_labels: &[char], gap_labels: &[GapClass]) -> Symbols {
    let mut morse = String::new();
    let mut text = String::new();
    let mut group = String::new();

    let close_group = |group: &mut String, morse: &mut String, text: &mut String| {
        if group.is_empty() {
            return;
        }
        if !morse.is_empty() {
            morse.push(' ');
        }
        morse.push_str(group);
        text.push(char_for_glyphs(group).unwrap_or('?'));
        group.clear();
    };

    for (i, &glyph) in on_labels.iter().enumerate() {
        group.push(glyph);
        match gap_labels.get(i).copied() {
            Some(GapClass::Intra) => {}
            Some(GapClass::Letter) => close_group(&mut group, &mut morse, &mut text),
            Some(GapClass::Word) | None => {
                close_group(&mut group, &mut morse, &mut text);
                if gap_labels.get(i).copied() == Some(GapClass::Word) && i + 1 < on_labels.len() {
                    morse.push_str(" /");
                    text.push(' ');
                }
            }
        }
    }
    close_group(&mut group, &mut morse, &mut text);

    Symbols { morse, text }
}

#[cfg(test)]
mod tests {
    use super::*;
    use GapClass::{Intra, Letter, Word};

    #[test]
    fn assembles_a_single_letter() {
        let symbols = assemble(&['.', '-'], &[Intra]);
        assert_eq!(symbols.morse, ".-");
        assert_eq!(symbols.text, "A");
    }

    #[test]
    fn assembles_hello() {
        let on: Vec<char> = ".... . .-.. .-.. ---".chars().filter(|c| *c != ' ').collect();
        let gaps = [
            Intra, Intra, Intra, Letter, // H
            Letter, // E
            Intra, Intra, Intra, Letter, // L
            Intra, Intra, Intra, Letter, // L
            Intra, Intra, // O, trailing gap absent
        ];
        let symbols = assemble(&on, &gaps);
        assert_eq!(symbols.morse, ".... . .-.. .-.. ---");
        assert_eq!(symbols.text, "HELLO");
    }

    #[test]
    fn word_gap_separates_words() {
        // "E E" as two words.
        let symbols = assemble(&['.', '.'], &[Word, Letter]);
        assert_eq!(symbols.morse, ". / .");
        assert_eq!(symbols.text, "E E");
    }

    #[test]
    fn trailing_word_gap_adds_nothing() {
        let symbols = assemble(&['.'], &[Word]);
        assert_eq!(symbols.morse, ".");
        assert_eq!(symbols.text, "E");
    }

    #[test]
    fn unknown_glyph_group_becomes_question_mark() {
        let on: Vec<char> = "........".chars().collect();
        let gaps = vec![Intra; 8];
        let symbols = assemble(&on, &gaps);
        assert_eq!(symbols.text, "?");
        assert_eq!(symbols.morse, "........");
    }

    #[test]
    fn empty_input_is_empty_output() {
        let symbols = assemble(&[], &[]);
        assert!(symbols.morse.is_empty());
        assert!(symbols.text.is_empty());
    }
}
