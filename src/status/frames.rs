// src/status/frames.rs

//! Spinner glyphs and status-line composition.

/// Spinner animation, one glyph per 100 ms tick.
pub const FRAMES: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Glyph for a (monotonically increasing) frame index.
pub fn glyph(frame: usize) -> char {
    FRAMES[frame % FRAMES.len()]
}

/// Compose `"<glyph> <text>"` padded or truncated to exactly `width` chars.
///
/// Newlines and other control characters in `text` are replaced by spaces so
/// the bar can never spill onto a second row.
pub fn compose_bar(text: &str, frame: usize, width: usize) -> String {
    let raw = format!("{} {}", glyph(frame), text);
    let mut line: String = raw
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .take(width)
        .collect();
    let len = line.chars().count();
    if len < width {
        line.extend(std::iter::repeat_n(' ', width - len));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glyph_wraps_around() {
        assert_eq!(glyph(0), FRAMES[0]);
        assert_eq!(glyph(FRAMES.len() + 3), FRAMES[3]);
    }

    #[test]
    fn short_text_is_padded_to_width() {
        let bar = compose_bar("1/3 | A (esp32c3) | building", 0, 40);
        assert_eq!(bar.chars().count(), 40);
        assert!(bar.starts_with("⠋ 1/3 | A (esp32c3) | building"));
        assert!(bar.ends_with(' '));
    }

    #[test]
    fn long_text_is_truncated_to_width() {
        let bar = compose_bar(&"x".repeat(200), 1, 20);
        assert_eq!(bar.chars().count(), 20);
        assert!(bar.starts_with("⠙ xxx"));
    }

    #[test]
    fn control_characters_are_flattened() {
        let bar = compose_bar("a\nb\tc", 0, 8);
        assert_eq!(bar, "⠋ a b c ");
    }

    #[test]
    fn zero_width_is_empty() {
        assert_eq!(compose_bar("abc", 0, 0), "");
    }
}
