//! Text helpers for the standard Type1 fonts.

/// Average Helvetica advance width as a fraction of the font size.
const AVERAGE_CHAR_WIDTH: f32 = 0.5;

/// Encodes a string for a `WinAnsiEncoding` font (Windows code page 1252).
/// Characters the code page cannot show are replaced with `?`.
pub fn encode_win_ansi(s: &str) -> Vec<u8> {
    s.chars().map(win_ansi_byte).collect()
}

fn win_ansi_byte(c: char) -> u8 {
    match c {
        '\u{00}'..='\u{7F}' | '\u{A0}'..='\u{FF}' => c as u8,
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8A,
        '‹' => 0x8B,
        'Œ' => 0x8C,
        'Ž' => 0x8E,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '\u{2014}' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9A,
        '›' => 0x9B,
        'œ' => 0x9C,
        'ž' => 0x9E,
        'Ÿ' => 0x9F,
        // C1 controls share these byte values with the glyphs above
        _ => b'?',
    }
}

/// Approximate rendered width of `s` in points.
pub fn text_width(s: &str, font_size: f32) -> f32 {
    s.chars().count() as f32 * font_size * AVERAGE_CHAR_WIDTH
}

/// Shortens `s` so that it fits in `max_width`, marking the cut with `..`.
pub(crate) fn fit_text(s: &str, font_size: f32, max_width: f32) -> String {
    if text_width(s, font_size) <= max_width {
        return s.to_string();
    }
    let per_char = font_size * AVERAGE_CHAR_WIDTH;
    if per_char <= 0.0 {
        return String::new();
    }
    let capacity = (max_width / per_char).floor() as usize;
    if capacity <= 2 {
        return s.chars().take(capacity).collect();
    }
    let mut out: String = s.chars().take(capacity - 2).collect();
    out.push_str("..");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_latin1_passthrough() {
        assert_eq!(encode_win_ansi("Café"), vec![b'C', b'a', b'f', 0xE9]);
    }

    #[test]
    fn test_encode_cp1252_extras() {
        assert_eq!(encode_win_ansi("€5"), vec![0x80, b'5']);
        assert_eq!(
            encode_win_ansi("\u{201C}Tea\u{201D} \u{2014} Œuvre™"),
            vec![0x93, b'T', b'e', b'a', 0x94, b' ', 0x97, b' ', 0x8C, b'u', b'v', b'r', b'e', 0x99]
        );
    }

    #[test]
    fn test_encode_replaces_unmappable_chars() {
        assert_eq!(encode_win_ansi("a\u{81}b"), b"a?b".to_vec());
        assert_eq!(encode_win_ansi("a\u{80}b"), b"a?b".to_vec());
        assert_eq!(encode_win_ansi("日本"), b"??".to_vec());
    }

    #[test]
    fn test_fit_text_keeps_short_strings() {
        assert_eq!(fit_text("Apple", 10.0, 100.0), "Apple");
    }

    #[test]
    fn test_fit_text_truncates() {
        // 5pt per char, 30pt holds 6 chars
        let fitted = fit_text("Watermelon", 10.0, 30.0);
        assert_eq!(fitted, "Wate..");
        assert!(text_width(&fitted, 10.0) <= 30.0);
    }
}
