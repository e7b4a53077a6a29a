//! Terminal display: A bordered character panel drawn with crossterm.
//!
//! Emulates the physical screen inside the user's terminal. All escape
//! sequences for a frame are accumulated first and flushed in a single
//! `write()` so a repaint never shows half a frame.
//!
//! Lines arrive wrapped by grapheme count, one grapheme per panel cell as
//! on the hardware character displays. A terminal draws CJK and other wide
//! glyphs two cells wide, so such a line can run past the panel edge here;
//! it is cut at the border and the overflow is not shown.

use super::Display;
use crate::view::Frame;
use crossterm::{
    cursor::MoveTo,
    queue,
    style::Print,
    terminal::{Clear, ClearType},
};
use std::io::{self, Stdout, Write};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// A `columns x rows` panel with a one-cell border.
pub struct TerminalDisplay<W: Write + Send = Stdout> {
    /// Where the bytes go.
    out: W,
    /// Top-left corner of the border.
    origin: (u16, u16),
    /// Inner width in terminal columns.
    columns: usize,
    /// Inner height in rows.
    rows: usize,
    /// Pre-allocated output buffer.
    scratch: Vec<u8>,
    /// Whether the border is on screen.
    framed: bool,
}

impl TerminalDisplay<Stdout> {
    /// A panel on standard output at the top-left corner.
    pub fn stdout(columns: usize, rows: usize) -> Self {
        Self::new(io::stdout(), columns, rows)
    }
}

impl<W: Write + Send> TerminalDisplay<W> {
    /// Create a panel writing to `out`.
    pub fn new(out: W, columns: usize, rows: usize) -> Self {
        Self {
            out,
            origin: (0, 0),
            columns: columns.max(1),
            rows: rows.max(1),
            scratch: Vec::with_capacity(4096),
            framed: false,
        }
    }

    /// Move the panel so its border starts at `(x, y)`.
    #[must_use]
    pub const fn with_origin(mut self, x: u16, y: u16) -> Self {
        self.origin = (x, y);
        self
    }

    /// The underlying writer.
    pub const fn writer(&self) -> &W {
        &self.out
    }

    #[allow(clippy::cast_possible_truncation)]
    fn queue_border(&mut self) -> io::Result<()> {
        let (x, y) = self.origin;
        let bar = "─".repeat(self.columns);
        queue!(
            self.scratch,
            MoveTo(x, y),
            Print(format!("┌{bar}┐"))
        )?;
        for row in 0..self.rows {
            let row_y = y + 1 + row as u16;
            queue!(
                self.scratch,
                MoveTo(x, row_y),
                Print('│'),
                MoveTo(x + 1 + self.columns as u16, row_y),
                Print('│')
            )?;
        }
        queue!(
            self.scratch,
            MoveTo(x, y + 1 + self.rows as u16),
            Print(format!("└{bar}┘"))
        )?;
        self.framed = true;
        Ok(())
    }

    fn flush_scratch(&mut self) -> io::Result<()> {
        self.out.write_all(&self.scratch)?;
        self.out.flush()?;
        self.scratch.clear();
        Ok(())
    }
}

impl<W: Write + Send> Display for TerminalDisplay<W> {
    fn grid(&self) -> (usize, usize) {
        (self.columns, self.rows)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn paint(&mut self, frame: &Frame) -> io::Result<()> {
        self.scratch.clear();
        if !self.framed {
            self.queue_border()?;
        }

        let (x, y) = self.origin;
        for row in 0..self.rows {
            let line = frame.lines.get(row).map_or("", String::as_str);
            queue!(
                self.scratch,
                MoveTo(x + 1, y + 1 + row as u16),
                Print(fit(line, self.columns))
            )?;
        }
        self.flush_scratch()
    }

    fn clear(&mut self) -> io::Result<()> {
        self.scratch.clear();
        queue!(self.scratch, Clear(ClearType::All))?;
        self.framed = false;
        self.flush_scratch()
    }
}

/// Pad or cut `line` to exactly `columns` terminal cells.
///
/// Wide glyphs past the edge are dropped, not rewrapped.
fn fit(line: &str, columns: usize) -> String {
    let mut out = String::with_capacity(columns);
    let mut used = 0;
    for grapheme in line.graphemes(true) {
        let width = UnicodeWidthStr::width(grapheme);
        if used + width > columns {
            break;
        }
        out.push_str(grapheme);
        used += width;
    }
    out.extend(std::iter::repeat(' ').take(columns - used));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_pads_and_cuts() {
        assert_eq!(fit("ab", 4), "ab  ");
        assert_eq!(fit("abcdef", 4), "abcd");
        assert_eq!(fit("", 2), "  ");
        // A wide glyph that would straddle the edge is dropped.
        assert_eq!(fit("a漢", 2), "a ");
    }

    #[test]
    fn test_fit_cuts_wide_line_at_panel_edge() {
        let line = "漢".repeat(18);
        let lines = crate::text::wrap(&line, 18);
        assert_eq!(lines, vec![line.clone()]);

        let shown = fit(&lines[0], 18);
        assert_eq!(shown, "漢".repeat(9));
        assert_eq!(UnicodeWidthStr::width(shown.as_str()), 18);
    }

    #[test]
    fn test_terminal_display_paints_lines() {
        let mut display = TerminalDisplay::new(Vec::new(), 6, 2);
        display
            .paint(&Frame::new(vec!["hello".to_string()], 0))
            .unwrap();

        let out = String::from_utf8(display.writer().clone()).unwrap();
        assert!(out.contains("┌──────┐"));
        assert!(out.contains("hello "));
        assert!(out.contains("└──────┘"));
    }

    #[test]
    fn test_terminal_display_border_drawn_once() {
        let mut display = TerminalDisplay::new(Vec::new(), 4, 1);
        display.paint(&Frame::new(vec!["a".to_string()], 0)).unwrap();
        display.paint(&Frame::new(vec!["b".to_string()], 0)).unwrap();

        let out = String::from_utf8(display.writer().clone()).unwrap();
        assert_eq!(out.matches('┌').count(), 1);

        display.clear().unwrap();
        display.paint(&Frame::new(vec!["c".to_string()], 0)).unwrap();
        let out = String::from_utf8(display.writer().clone()).unwrap();
        assert_eq!(out.matches('┌').count(), 2);
    }

    #[test]
    fn test_terminal_display_grid() {
        let display = TerminalDisplay::new(Vec::new(), 0, 3);
        assert_eq!(display.grid(), (1, 3));
    }
}
