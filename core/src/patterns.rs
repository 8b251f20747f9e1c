// International Morse table as a byte-indexed glyph lookup - O(1) in both the
// encode direction and (via a linear scan over a small table) the decode
// direction.

/// Glyph pattern for a character: a string over {'.', '-'}.
pub type GlyphPattern = &'static str;

// Direct lookup table for all possible bytes. Lowercase letters share the
// uppercase patterns.
static MORSE_PATTERNS: [Option<GlyphPattern>; 256] = {
    let mut patterns: [Option<GlyphPattern>; 256] = [None; 256];

    patterns[b'A' as usize] = Some(".-");
    patterns[b'B' as usize] = Some("-...");
    patterns[b'C' as usize] = Some("-.-.");
    patterns[b'D' as usize] = Some("-..");
    patterns[b'E' as usize] = Some(".");
    patterns[b'F' as usize] = Some("..-.");
    patterns[b'G' as usize] = Some("--.");
    patterns[b'H' as usize] = Some("....");
    patterns[b'I' as usize] = Some("..");
    patterns[b'J' as usize] = Some(".---");
    patterns[b'K' as usize] = Some("-.-");
    patterns[b'L' as usize] = Some(".-..");
    patterns[b'M' as usize] = Some("--");
    patterns[b'N' as usize] = Some("-.");
    patterns[b'O' as usize] = Some("---");
    patterns[b'P' as usize] = Some(".--.");
    patterns[b'Q' as usize] = Some("--.-");
    patterns[b'R' as usize] = Some(".-.");
    patterns[b'S' as usize] = Some("...");
    patterns[b'T' as usize] = Some("-");
    patterns[b'U' as usize] = Some("..-");
    patterns[b'V' as usize] = Some("...-");
    patterns[b'W' as usize] = Some(".--");
    patterns[b'X' as usize] = Some("-..-");
    patterns[b'Y' as usize] = Some("-.--");
    patterns[b'Z' as usize] = Some("--..");

    patterns[b'a' as usize] = Some(".-");
    patterns[b'b' as usize] = Some("-...");
    patterns[b'c' as usize] = Some("-.-.");
    patterns[b'd' as usize] = Some("-..");
    patterns[b'e' as usize] = Some(".");
    patterns[b'f' as usize] = Some("..-.");
    patterns[b'g' as usize] = Some("--.");
    patterns[b'h' as usize] = Some("....");
    patterns[b'i' as usize] = Some("..");
    patterns[b'j' as usize] = Some(".---");
    patterns[b'k' as usize] = Some("-.-");
    patterns[b'l' as usize] = Some(".-..");
    patterns[b'm' as usize] = Some("--");
    patterns[b'n' as usize] = Some("-.");
    patterns[b'o' as usize] = Some("---");
    patterns[b'p' as usize] = Some(".--.");
    patterns[b'q' as usize] = Some("--.-");
    patterns[b'r' as usize] = Some(".-.");
    patterns[b's' as usize] = Some("...");
    patterns[b't' as usize] = Some("-");
    patterns[b'u' as usize] = Some("..-");
    patterns[b'v' as usize] = Some("...-");
    patterns[b'w' as usize] = Some(".--");
    patterns[b'x' as usize] = Some("-..-");
    patterns[b'y' as usize] = Some("-.--");
    patterns[b'z' as usize] = Some("--..");

    patterns[b'0' as usize] = Some("-----");
    patterns[b'1' as usize] = Some(".----");
    patterns[b'2' as usize] = Some("..---");
    patterns[b'3' as usize] = Some("...--");
    patterns[b'4' as usize] = Some("....-");
    patterns[b'5' as usize] = Some(".....");
    patterns[b'6' as usize] = Some("-....");
    patterns[b'7' as usize] = Some("--...");
    patterns[b'8' as usize] = Some("---..");
    patterns[b'9' as usize] = Some("----.");

    patterns[b'.' as usize] = Some(".-.-.-");
    patterns[b',' as usize] = Some("--..--");
    patterns[b'?' as usize] = Some("..--..");
    patterns[b'\'' as usize] = Some(".----.");
    patterns[b'!' as usize] = Some("-.-.--");
    patterns[b'/' as usize] = Some("-..-.");
    patterns[b'(' as usize] = Some("-.--.");
    patterns[b')' as usize] = Some("-.--.-");
    patterns[b'&' as usize] = Some(".-...");
    patterns[b':' as usize] = Some("---...");
    patterns[b';' as usize] = Some("-.-.-.");
    patterns[b'=' as usize] = Some("-...-");
    patterns[b'+' as usize] = Some(".-.-.");
    patterns[b'-' as usize] = Some("-....-");
    patterns[b'_' as usize] = Some("..--.-");
    patterns[b'"' as usize] = Some(".-..-.");
    patterns[b'$' as usize] = Some("...-..-");
    patterns[b'@' as usize] = Some(".--.-.");

    patterns
};

/// Glyph pattern for a character, O(1) lookup. Unknown bytes map to `None`.
pub fn glyphs_for_char(ch: u8) -> Option<GlyphPattern> {
    MORSE_PATTERNS[ch as usize]
}

/// Reverse lookup: a glyph group back to its character. Returns the canonical
/// (uppercase) form since digits and punctuation precede lowercase bytes.
pub fn char_for_glyphs(glyphs: &str) -> Option<char> {
    (0u8..=255)
        .find(|&ch| MORSE_PATTERNS[ch as usize] == Some(glyphs))
        .map(|ch| ch as char)
}
