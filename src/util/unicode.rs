use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Display width in terminal cells. Tabs count as 4 cells.
pub fn display_width(s: &str) -> usize {
    s.graphemes(true).map(grapheme_width).sum()
}

/// Cut `s` down to `max_cells`, ending in `…` when anything was dropped.
/// Never splits a grapheme cluster.
pub fn truncate_to_width(s: &str, max_cells: usize) -> String {
    if max_cells == 0 {
        return String::new();
    }
    if display_width(s) <= max_cells {
        return s.to_string();
    }
    let budget = max_cells - 1;
    let mut used = 0;
    let mut out = String::new();
    for g in s.graphemes(true) {
        let w = grapheme_width(g);
        if used + w > budget {
            break;
        }
        used += w;
        out.push_str(g);
    }
    out.push('\u{2026}');
    out
}

/// Byte offset of the grapheme after the one at `byte_offset`, or None at the end.
pub fn next_grapheme_boundary(s: &str, byte_offset: usize) -> Option<usize> {
    if byte_offset >= s.len() {
        return None;
    }
    let step = s[byte_offset..]
        .graphemes(true)
        .next()
        .map_or(s.len() - byte_offset, str::len);
    Some(byte_offset + step)
}

/// Byte offset of the grapheme before `byte_offset`, or None at the start.
pub fn prev_grapheme_boundary(s: &str, byte_offset: usize) -> Option<usize> {
    if byte_offset == 0 {
        return None;
    }
    s[..byte_offset]
        .grapheme_indices(true)
        .next_back()
        .map(|(i, _)| i)
}

/// Byte offset of the grapheme covering display column `col`. A column in
/// the middle of a wide character snaps to its start; past the end gives `s.len()`.
pub fn display_col_to_byte_offset(s: &str, col: usize) -> usize {
    let mut used = 0;
    for (i, g) in s.grapheme_indices(true) {
        let w = grapheme_width(g);
        if used + w > col {
            return i;
        }
        used += w;
    }
    s.len()
}

/// Start of the word left of `byte_offset`, skipping any whitespace first.
pub fn word_boundary_left(s: &str, byte_offset: usize) -> usize {
    let graphemes: Vec<(usize, &str)> = s[..byte_offset].grapheme_indices(true).collect();
    let is_space = |g: &str| g.chars().all(char::is_whitespace);

    let mut idx = graphemes.len();
    while idx > 0 && is_space(graphemes[idx - 1].1) {
        idx -= 1;
    }
    while idx > 0 && !is_space(graphemes[idx - 1].1) {
        idx -= 1;
    }
    graphemes.get(idx).map_or(byte_offset, |(i, _)| *i)
}

fn grapheme_width(g: &str) -> usize {
    if g == "\t" {
        4
    } else {
        UnicodeWidthStr::width(g)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_counts_cells() {
        assert_eq!(display_width("work"), 4);
        assert_eq!(display_width("仕事"), 4);
        assert_eq!(display_width("🎉 party"), 8);
        assert_eq!(display_width("cafe\u{0301}"), 4);
        assert_eq!(display_width("a\tb"), 6);
        assert_eq!(display_width("─│╭╮"), 4);
        assert_eq!(display_width(""), 0);
    }

    #[test]
    fn truncation_adds_ellipsis() {
        assert_eq!(truncate_to_width("Inbox", 10), "Inbox");
        assert_eq!(truncate_to_width("Inbox", 5), "Inbox");
        assert_eq!(truncate_to_width("Write report", 8), "Write r\u{2026}");
        assert_eq!(truncate_to_width("Write report", 1), "\u{2026}");
        assert_eq!(truncate_to_width("Write report", 0), "");
    }

    #[test]
    fn truncation_respects_wide_characters() {
        assert_eq!(truncate_to_width("買い物リスト", 5), "買い\u{2026}");
        let cut = truncate_to_width("買い物リスト", 4);
        assert_eq!(cut, "買\u{2026}");
        assert_eq!(truncate_to_width("🎉🚀💫", 4), "🎉\u{2026}");
    }

    #[test]
    fn grapheme_steps() {
        assert_eq!(next_grapheme_boundary("milk", 0), Some(1));
        assert_eq!(next_grapheme_boundary("milk", 4), None);
        assert_eq!(prev_grapheme_boundary("milk", 4), Some(3));
        assert_eq!(prev_grapheme_boundary("milk", 0), None);

        assert_eq!(next_grapheme_boundary("a🎉b", 1), Some(5));
        assert_eq!(prev_grapheme_boundary("cafe\u{0301}!", 6), Some(3));
        let family = "👨\u{200D}👩\u{200D}👧";
        assert_eq!(next_grapheme_boundary(family, 0), Some(family.len()));
    }

    #[test]
    fn column_to_byte_offset() {
        assert_eq!(display_col_to_byte_offset("work", 2), 2);
        assert_eq!(display_col_to_byte_offset("仕事", 2), 3);
        assert_eq!(display_col_to_byte_offset("仕事", 1), 0);
        assert_eq!(display_col_to_byte_offset("ok", 10), 2);
    }

    #[test]
    fn word_left() {
        let s = "buy oat milk";
        assert_eq!(word_boundary_left(s, s.len()), 8);
        assert_eq!(word_boundary_left(s, 8), 4);
        assert_eq!(word_boundary_left(s, 4), 0);
        assert_eq!(word_boundary_left(s, 0), 0);
        assert_eq!(word_boundary_left("call 母", "call 母".len()), 5);
    }
}
