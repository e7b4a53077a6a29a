//! Pane: The rendering pipeline from document text to a paintable frame.
//!
//! A pane owns everything derived from the document (the wrapped lines,
//! the scroll window and the change gate). Sessions hand it text and
//! scroll requests; it hands back frames, and only when they differ from
//! what is already on the display.

use super::gate::ChangeGate;
use super::scroll::ScrollWindow;
use crate::text::wrap_into;

/// One paintable screenful.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Visible lines, top to bottom, each within the line width.
    pub lines: Vec<String>,
    /// Index of the first visible line in the wrapped document.
    pub offset: usize,
}

impl Frame {
    /// Create a frame from lines and an offset.
    pub const fn new(lines: Vec<String>, offset: usize) -> Self {
        Self { lines, offset }
    }
}

/// Wrapped lines plus a scroll window and redraw gate.
#[derive(Debug, Clone)]
pub struct Pane {
    /// Column budget per line.
    line_width: usize,
    /// Document text wrapped to `line_width`.
    wrapped: Vec<String>,
    /// Which wrapped lines are visible.
    window: ScrollWindow,
    /// Last frame handed out.
    gate: ChangeGate,
}

impl Pane {
    /// Create an empty pane with the given grid.
    pub fn new(line_width: usize, viewport_height: usize) -> Self {
        let mut pane = Self {
            line_width: line_width.max(1),
            wrapped: Vec::new(),
            window: ScrollWindow::new(viewport_height),
            gate: ChangeGate::new(),
        };
        pane.refresh("");
        pane
    }

    /// The column budget.
    pub const fn line_width(&self) -> usize {
        self.line_width
    }

    /// All wrapped lines.
    pub fn lines(&self) -> &[String] {
        &self.wrapped
    }

    /// The scroll window.
    pub const fn window(&self) -> &ScrollWindow {
        &self.window
    }

    /// Re-wrap `text` and sync the window to the new line count.
    pub fn refresh(&mut self, text: &str) {
        wrap_into(text, self.line_width, &mut self.wrapped);
        self.window.on_content_changed(self.wrapped.len());
    }

    /// Scroll up one line.
    pub fn scroll_up(&mut self) {
        self.window.scroll_up();
    }

    /// Scroll down one line.
    pub fn scroll_down(&mut self) {
        self.window.scroll_down();
    }

    /// Scroll up one page.
    pub fn page_up(&mut self) {
        self.window.page_up();
    }

    /// Scroll down one page.
    pub fn page_down(&mut self) {
        self.window.page_down();
    }

    /// Jump to the end and follow new content.
    pub fn scroll_to_bottom(&mut self) {
        self.window.scroll_to_bottom();
    }

    /// The current visible lines.
    pub fn visible(&self) -> &[String] {
        self.window.visible(&self.wrapped)
    }

    /// Build the current frame regardless of what was rendered before.
    pub fn frame(&self) -> Frame {
        Frame::new(self.visible().to_vec(), self.window.offset())
    }

    /// Check if the current frame differs from the last one taken.
    pub fn needs_redraw(&self) -> bool {
        self.gate.should_redraw(self.visible(), self.window.offset())
    }

    /// Return the current frame if it differs from the last one taken,
    /// recording it as rendered.
    pub fn take_frame(&mut self) -> Option<Frame> {
        if !self.needs_redraw() {
            return None;
        }
        let frame = self.frame();
        self.gate.commit(&frame.lines, frame.offset);
        Some(frame)
    }

    /// Force the next [`take_frame`](Self::take_frame) to return a frame.
    pub fn invalidate(&mut self) {
        self.gate.invalidate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pane_empty_frame() {
        let mut pane = Pane::new(10, 3);
        let frame = pane.take_frame().unwrap();
        assert_eq!(frame, Frame::new(vec![String::new()], 0));
        assert!(pane.take_frame().is_none());
    }

    #[test]
    fn test_pane_refresh_wraps_and_follows() {
        let mut pane = Pane::new(5, 2);
        pane.refresh("one two three four");
        assert_eq!(pane.lines(), &["one", "two", "three", "four"]);

        let frame = pane.take_frame().unwrap();
        assert_eq!(frame.lines, vec!["three", "four"]);
        assert_eq!(frame.offset, 2);
    }

    #[test]
    fn test_pane_unchanged_text_is_suppressed() {
        let mut pane = Pane::new(10, 3);
        pane.refresh("hello");
        assert!(pane.take_frame().is_some());

        pane.refresh("hello");
        assert!(pane.take_frame().is_none());

        pane.refresh("hello!");
        assert_eq!(pane.take_frame().unwrap().lines, vec!["hello!"]);
    }

    #[test]
    fn test_pane_off_screen_change_is_suppressed() {
        let mut pane = Pane::new(10, 1);
        pane.refresh("a\nb\nc");
        pane.take_frame();
        pane.scroll_up();
        pane.scroll_up();
        assert_eq!(pane.take_frame().unwrap().lines, vec!["a"]);

        // The edit lands below the window; nothing visible moved.
        pane.refresh("a\nb\ncd");
        assert!(pane.take_frame().is_none());
    }

    #[test]
    fn test_pane_scroll_triggers_redraw() {
        let mut pane = Pane::new(10, 2);
        pane.refresh("1\n2\n3\n4");
        pane.take_frame();

        pane.scroll_up();
        let frame = pane.take_frame().unwrap();
        assert_eq!(frame.lines, vec!["2", "3"]);
        assert_eq!(frame.offset, 1);

        pane.page_down();
        assert_eq!(pane.take_frame().unwrap().offset, 2);
        assert!(pane.window().is_following());
    }

    #[test]
    fn test_pane_invalidate_forces_frame() {
        let mut pane = Pane::new(10, 2);
        pane.refresh("x");
        pane.take_frame();
        pane.invalidate();
        assert!(pane.take_frame().is_some());
    }
}
