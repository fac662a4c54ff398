//! Text manipulation utilities for working with raw source lines.
//!
//! Columns are byte offsets into the line, matching [`crate::base::Position`].

use std::ops::Range;

/// Check if a character is considered part of a word (identifier).
///
/// Uses Unicode Standard Annex #31 rules for identifier characters.
#[inline]
pub fn is_word_character(c: char) -> bool {
    unicode_ident::is_xid_continue(c)
}

fn clamp_to_boundary(line: &str, column: usize) -> usize {
    let mut column = column.min(line.len());
    while !line.is_char_boundary(column) {
        column -= 1;
    }
    column
}

/// Byte range of the word touching `column`.
///
/// A cursor just past the last character of a word still selects it, so
/// `pri|` yields `pri`. Returns `None` when no word touches the cursor.
pub fn find_word_boundaries(line: &str, column: usize) -> Option<Range<usize>> {
    let column = clamp_to_boundary(line, column);
    let start = line[..column]
        .char_indices()
        .rev()
        .take_while(|(_, c)| is_word_character(*c))
        .last()
        .map_or(column, |(i, _)| i);
    let end = line[column..]
        .char_indices()
        .find(|(_, c)| !is_word_character(*c))
        .map_or(line.len(), |(i, _)| column + i);
    (start < end).then_some(start..end)
}

/// Extract the word (identifier) at the cursor position in a line of text.
///
/// # Example
/// ```
/// use lunar::ide::text_utils::extract_word_at_cursor;
///
/// let line = "local foo = bar";
/// assert_eq!(extract_word_at_cursor(line, 7), Some("foo".to_string()));
/// assert_eq!(extract_word_at_cursor(line, 15), Some("bar".to_string()));
/// assert_eq!(extract_word_at_cursor(line, 11), None);
/// ```
pub fn extract_word_at_cursor(line: &str, column: usize) -> Option<String> {
    find_word_boundaries(line, column).map(|range| line[range].to_string())
}

/// The identifier before a `.` or `:` that ends right at `word_start`.
///
/// For `a.b.c` with `word_start` at `c` this is `b`.
pub fn qualifier_before(line: &str, word_start: usize) -> Option<(String, char)> {
    let head = line[..clamp_to_boundary(line, word_start)].trim_end();
    let separator = head.chars().next_back().filter(|c| matches!(c, '.' | ':'))?;
    let head = head[..head.len() - 1].trim_end();
    let range = find_word_boundaries(head, head.len())?;
    Some((head[range].to_string(), separator))
}
