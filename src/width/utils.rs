//! ANSI-aware width calculation so page copy stays centered and padded.

/// Compute the display width of a string after stripping ANSI escapes.
pub fn display_width(text: &str) -> usize {
    let clean = strip_ansi_escapes::strip(text);
    let clean_str = String::from_utf8_lossy(&clean);
    unicode_width::UnicodeWidthStr::width(&*clean_str)
}

/// Truncate `text` to `max_width` cells, marking the cut with an ellipsis.
pub fn truncate_display(text: &str, max_width: usize) -> String {
    if display_width(text) <= max_width {
        return text.to_string();
    }

    let mut result = String::new();
    let mut width = 0usize;
    for ch in text.chars() {
        let w = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if width + w >= max_width {
            if width < max_width {
                result.push('…');
            }
            break;
        }
        width += w;
        result.push(ch);
    }
    result
}

/// Left-pad `text` so it sits centered within `width` cells.
pub fn center_line(text: &str, width: u16) -> String {
    let text = truncate_display(text, width as usize);
    let used = display_width(&text);
    let left = (width as usize).saturating_sub(used) / 2;
    let mut line = " ".repeat(left);
    line.push_str(&text);
    line
}

/// Greedy word wrap by display width. Words wider than `width` are truncated.
pub fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let word = truncate_display(word, width);
        if current.is_empty() {
            current = word;
        } else if display_width(&current) + 1 + display_width(&word) <= width {
            current.push(' ');
            current.push_str(&word);
        } else {
            lines.push(std::mem::take(&mut current));
            current = word;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_ignores_ansi() {
        assert_eq!(display_width("\x1b[1mhi\x1b[0m"), 2);
    }

    #[test]
    fn truncation_marks_cut() {
        assert_eq!(truncate_display("Localização", 6), "Local…");
        assert_eq!(truncate_display("Menu", 6), "Menu");
    }

    #[test]
    fn centering_pads_left_side() {
        assert_eq!(center_line("ab", 6), "  ab");
    }

    #[test]
    fn wrapping_breaks_on_words() {
        assert_eq!(
            wrap_words("Peça agora e saboreie.", 10),
            vec!["Peça agora", "e", "saboreie."]
        );
        assert!(wrap_words("   ", 10).is_empty());
    }
}
