//! Scroll window: Which slice of the wrapped lines is on screen.
//!
//! The window follows the tail of the content by default, so the newest
//! line is always visible while typing or streaming. Scrolling up detaches
//! it; scrolling back down onto the last page re-attaches it.

/// A fixed-height window over a sequence of lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollWindow {
    /// Index of the first visible line.
    offset: usize,
    /// Number of visible lines.
    height: usize,
    /// Length of the line sequence last reported.
    len: usize,
    /// Whether new content snaps the view to the end.
    follow_tail: bool,
}

impl ScrollWindow {
    /// Create a window showing `height` lines (at least one).
    pub fn new(height: usize) -> Self {
        Self {
            offset: 0,
            height: height.max(1),
            len: 0,
            follow_tail: true,
        }
    }

    /// Index of the first visible line.
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Number of visible lines.
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Line count the window was last synced to.
    pub const fn content_len(&self) -> usize {
        self.len
    }

    /// Whether the window follows new content.
    pub const fn is_following(&self) -> bool {
        self.follow_tail
    }

    /// The offset that shows the last page.
    pub const fn max_offset(&self) -> usize {
        self.len.saturating_sub(self.height)
    }

    /// Check if the last line is visible.
    pub const fn at_bottom(&self) -> bool {
        self.offset == self.max_offset()
    }

    /// The visible slice of `lines`.
    ///
    /// Always `min(height, lines.len())` long.
    pub fn visible<'a, T>(&self, lines: &'a [T]) -> &'a [T] {
        let start = self.offset.min(lines.len().saturating_sub(self.height));
        let end = (start + self.height).min(lines.len());
        &lines[start..end]
    }

    /// Sync the window to a new line count.
    ///
    /// When following, jumps to the last page. Otherwise the offset is only
    /// clamped, so a shrinking document never leaves it past the end.
    pub fn on_content_changed(&mut self, len: usize) {
        self.len = len;
        if self.follow_tail {
            self.offset = self.max_offset();
        } else {
            self.offset = self.offset.min(self.max_offset());
        }
    }

    /// Scroll up one line and stop following.
    pub fn scroll_up(&mut self) {
        self.scroll_up_by(1);
    }

    /// Scroll down one line, following again once on the last page.
    pub fn scroll_down(&mut self) {
        self.scroll_down_by(1);
    }

    /// Scroll up one page.
    pub fn page_up(&mut self) {
        self.scroll_up_by(self.height);
    }

    /// Scroll down one page.
    pub fn page_down(&mut self) {
        self.scroll_down_by(self.height);
    }

    /// Jump to the last page and follow new content.
    pub const fn scroll_to_bottom(&mut self) {
        self.offset = self.max_offset();
        self.follow_tail = true;
    }

    fn scroll_up_by(&mut self, lines: usize) {
        self.offset = self.offset.saturating_sub(lines);
        self.follow_tail = false;
    }

    fn scroll_down_by(&mut self, lines: usize) {
        self.offset = (self.offset + lines).min(self.max_offset());
        if self.at_bottom() {
            self.follow_tail = true;
        }
    }

    /// Change the window height, keeping the tail pinned if following.
    pub fn set_height(&mut self, height: usize) {
        self.height = height.max(1);
        self.on_content_changed(self.len);
    }
}
