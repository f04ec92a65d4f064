//! Character-count line wrapping and ellipsis truncation.
//!
//! Widths are measured in characters, not pixels: the card layout converts
//! a column's pixel width into a character budget using the approximate
//! glyph width of the configured font size. Full-width (CJK) glyphs are as
//! wide as the font size, so a line of `width` characters never spills out
//! of its column.

use std::collections::VecDeque;

/// Default marker appended to the last kept line of a truncated block.
pub const DEFAULT_ELLIPSIS: &str = "…";

/// Wrap `text` into lines of at most `width` characters.
///
/// Every whitespace character is treated as a plain space. Lines break at
/// whitespace where possible; a word longer than `width` is split across
/// lines, filling the remainder of the current line first. Whitespace at the
/// start and end of each produced line is dropped. Empty or whitespace-only
/// input produces no lines. A `width` of zero is treated as one.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut chunks = split_chunks(text);
    let mut lines = Vec::new();

    while !chunks.is_empty() {
        if chunks.front().is_some_and(|c| is_space(c)) {
            chunks.pop_front();
        }

        let mut line: Vec<char> = Vec::with_capacity(width);
        while let Some(chunk) = chunks.pop_front() {
            if line.len() + chunk.len() <= width {
                line.extend(chunk);
                continue;
            }

            if !is_space(&chunk) && chunk.len() > width {
                let (head, tail) = chunk.split_at(width - line.len());
                line.extend_from_slice(head);
                chunks.push_front(tail.to_vec());
            } else {
                chunks.push_front(chunk);
            }
            break;
        }

        while line.last() == Some(&' ') {
            line.pop();
        }
        if !line.is_empty() {
            lines.push(line.into_iter().collect());
        }
    }

    lines
}

/// Cap `lines` at `max_lines`.
///
/// Returns the kept lines and whether anything was cut. When lines are cut,
/// the last kept line is shortened so that it ends with `marker` and stays
/// within `width` characters. A block with exactly `max_lines` lines is
/// returned unchanged.
pub fn truncate_lines(
    mut lines: Vec<String>,
    max_lines: usize,
    width: usize,
    marker: &str,
) -> (Vec<String>, bool) {
    if lines.len() <= max_lines {
        return (lines, false);
    }
    if max_lines == 0 {
        return (Vec::new(), true);
    }

    lines.truncate(max_lines);
    let width = width.max(1);
    let marker: String = marker.chars().take(width).collect();
    let keep = width - marker.chars().count();

    if let Some(last) = lines.last_mut() {
        let mut kept: String = last.chars().take(keep).collect();
        kept.truncate(kept.trim_end().len());
        kept.push_str(&marker);
        *last = kept;
    }

    (lines, true)
}

/// Split into alternating runs of spaces and non-spaces.
fn split_chunks(text: &str) -> VecDeque<Vec<char>> {
    let mut chunks: VecDeque<Vec<char>> = VecDeque::new();
    for c in text.chars() {
        let c = if c.is_whitespace() { ' ' } else { c };
        match chunks.back_mut() {
            Some(current) if (current[0] == ' ') == (c == ' ') => current.push(c),
            _ => chunks.push_back(vec![c]),
        }
    }
    chunks
}

fn is_space(chunk: &[char]) -> bool {
    chunk.first() == Some(&' ')
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORTY_FIVE: &str = "あいうえおかきくけこさしすせそたちつてとなにぬねのはひふへほまみむめもやゆよらりるれろわを";

    #[test]
    fn unbroken_text_produces_ceil_len_over_width_lines() {
        assert_eq!(FORTY_FIVE.chars().count(), 45);
        for width in [1, 7, 10, 15, 20, 44, 45, 46, 100] {
            let lines = wrap(FORTY_FIVE, width);
            assert_eq!(lines.len(), 45usize.div_ceil(width), "width {width}");
            assert!(lines.iter().all(|l| l.chars().count() <= width));
            assert_eq!(lines.concat(), FORTY_FIVE);
        }
    }

    #[test]
    fn breaks_at_whitespace() {
        assert_eq!(
            wrap("the quick brown fox jumps", 10),
            ["the quick", "brown fox", "jumps"]
        );
    }

    #[test]
    fn long_word_fills_remaining_space_first() {
        assert_eq!(wrap("ab cdefghij", 5), ["ab cd", "efghi", "j"]);
    }

    #[test]
    fn newlines_and_tabs_are_spaces() {
        assert_eq!(wrap("a\nb\tc", 10), ["a b c"]);
    }

    #[test]
    fn empty_and_blank_text_has_no_lines() {
        assert!(wrap("", 10).is_empty());
        assert!(wrap("   \n ", 10).is_empty());
    }

    #[test]
    fn zero_width_is_treated_as_one() {
        assert_eq!(wrap("abc", 0), ["a", "b", "c"]);
    }

    #[test]
    fn truncation_marks_last_kept_line() {
        let lines = wrap(FORTY_FIVE, 10);
        let (kept, cut) = truncate_lines(lines, 2, 10, DEFAULT_ELLIPSIS);
        assert!(cut);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0], "あいうえおかきくけこ");
        assert_eq!(kept[1], "さしすせそたちつて…");
        assert!(kept[1].chars().count() <= 10);
    }

    #[test]
    fn exactly_budget_lines_are_untouched() {
        let lines = wrap(FORTY_FIVE, 15);
        assert_eq!(lines.len(), 3);
        let (kept, cut) = truncate_lines(lines.clone(), 3, 15, DEFAULT_ELLIPSIS);
        assert!(!cut);
        assert_eq!(kept, lines);
    }

    #[test]
    fn zero_budget_drops_everything() {
        let (kept, cut) = truncate_lines(vec!["a".into()], 0, 5, DEFAULT_ELLIPSIS);
        assert!(kept.is_empty());
        assert!(cut);
    }

    #[test]
    fn marker_longer_than_width_is_clipped() {
        let (kept, _) = truncate_lines(vec!["ab".into(), "cd".into()], 1, 2, "...");
        assert_eq!(kept, [".."]);
    }

    #[test]
    fn trailing_space_before_marker_is_trimmed() {
        let (kept, _) = truncate_lines(vec!["ab cd".into(), "x".into()], 1, 4, "…");
        assert_eq!(kept, ["ab…"]);
    }
}
