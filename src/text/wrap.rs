//! Word wrapping with a hard-break fallback.
//!
//! The wrapper is pure: it never changes the document, it only decides
//! where a rendering line ends.
//!
//! # Policy
//!
//! 1. Every `\n` starts a new output line. Empty segments produce empty
//!    lines so vertical spacing survives.
//! 2. A segment longer than the width breaks at the last whitespace at or
//!    before column `width`. The remainder is left-trimmed.
//! 3. A single token longer than the width is hard-broken at exactly
//!    `width` graphemes without trimming.

use unicode_segmentation::UnicodeSegmentation;

/// Wrap `text` into lines of at most `line_width` graphemes.
///
/// A width of 0 is treated as 1. An empty string yields one empty line.
///
/// # Example
///
/// ```
/// use pocket_writer::text::wrap;
///
/// assert_eq!(wrap("hello world foo", 10), vec!["hello", "world foo"]);
/// ```
pub fn wrap(text: &str, line_width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    wrap_into(text, line_width, &mut lines);
    lines
}

/// Wrap `text` into `out`, replacing its contents.
///
/// Reuses the vector's allocation across re-wraps.
pub fn wrap_into(text: &str, line_width: usize, out: &mut Vec<String>) {
    out.clear();
    for_each_line(text, line_width, |line| out.push(line.concat()));
}

/// Number of lines [`wrap`] would produce, without building them.
pub fn wrapped_len(text: &str, line_width: usize) -> usize {
    let mut count = 0;
    for_each_line(text, line_width, |_| count += 1);
    count
}

fn for_each_line<'a>(text: &'a str, line_width: usize, mut emit: impl FnMut(&[&'a str])) {
    let width = line_width.max(1);
    let mut graphemes: Vec<&'a str> = Vec::new();

    for segment in text.split('\n') {
        let segment = segment.strip_suffix('\r').unwrap_or(segment);
        graphemes.clear();
        graphemes.extend(segment.graphemes(true));

        let mut rest: &[&'a str] = &graphemes;
        while rest.len() > width {
            let (end, next) = break_point(rest, width);
            emit(&rest[..end]);
            rest = &rest[next..];
        }
        emit(rest);
    }
}

/// Find where the current line ends and where the next one starts.
///
/// `rest` must be longer than `width`.
fn break_point(rest: &[&str], width: usize) -> (usize, usize) {
    match (1..=width).rev().find(|&p| is_whitespace(rest[p])) {
        Some(p) => {
            let next = rest[p..]
                .iter()
                .position(|g| !is_whitespace(g))
                .map_or(rest.len(), |skip| p + skip);
            (p, next)
        }
        None => (width, width),
    }
}

fn is_whitespace(grapheme: &str) -> bool {
    grapheme.chars().next().is_some_and(char::is_whitespace)
}
