//! Edit buffer: The logical document behind a writing session.
//!
//! Text is only ever appended to or removed from the end, the way a
//! typewriter-style pocket editor works. The buffer holds exactly the
//! characters the user typed: wrapping and padding are rendering concerns
//! and never reach it, so a save writes the document verbatim.

use crate::error::{Error, Result};
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use unicode_segmentation::UnicodeSegmentation;

/// An append-only-at-the-end text document with a length cap.
#[derive(Debug, Clone)]
pub struct EditBuffer {
    /// The document text.
    text: String,
    /// Length of `text` in characters.
    len: usize,
    /// Maximum length in characters.
    max_len: usize,
}

impl EditBuffer {
    /// Create an empty buffer holding at most `max_len` characters.
    pub const fn new(max_len: usize) -> Self {
        Self {
            text: String::new(),
            len: 0,
            max_len,
        }
    }

    /// The document text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in characters.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Check if the document is empty.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The configured capacity.
    pub const fn max_len(&self) -> usize {
        self.max_len
    }

    /// Characters that can still be inserted.
    pub const fn capacity_left(&self) -> usize {
        self.max_len.saturating_sub(self.len)
    }

    /// Append a character.
    ///
    /// Returns `false` if the buffer is full, in which case the character
    /// is dropped.
    pub fn insert_char(&mut self, c: char) -> bool {
        if self.len >= self.max_len {
            return false;
        }
        self.text.push(c);
        self.len += 1;
        true
    }

    /// Append a line break. Subject to the same capacity rule as
    /// [`insert_char`](Self::insert_char).
    pub fn insert_newline(&mut self) -> bool {
        self.insert_char('\n')
    }

    /// Remove the last character.
    ///
    /// A base character and its combining marks go together. Returns
    /// `false` when the buffer was already empty.
    pub fn backspace(&mut self) -> bool {
        let Some((start, grapheme)) = self.text.grapheme_indices(true).next_back() else {
            return false;
        };
        // A "\r\n" pair is one grapheme but only the newline was typed last.
        let start = if grapheme == "\r\n" { start + 1 } else { start };
        self.len -= self.text[start..].chars().count();
        self.text.truncate(start);
        true
    }

    /// Append every character of `text`, stopping at capacity.
    ///
    /// Returns the number of characters accepted.
    pub fn push_str(&mut self, text: &str) -> usize {
        let mut accepted = 0;
        for c in text.chars() {
            if !self.insert_char(c) {
                break;
            }
            accepted += 1;
        }
        accepted
    }

    /// Discard all content.
    pub fn clear(&mut self) {
        self.text.clear();
        self.len = 0;
    }

    /// Replace the content with everything read from `source`.
    ///
    /// On error the buffer is left unchanged.
    pub fn load_from<R: Read>(&mut self, mut source: R) -> Result<()> {
        let mut bytes = Vec::new();
        source.read_to_end(&mut bytes)?;
        let text = String::from_utf8(bytes).map_err(|_| Error::InvalidEncoding)?;
        let len = text.chars().count();
        if len > self.max_len {
            return Err(Error::DocumentTooLarge {
                len,
                max: self.max_len,
            });
        }
        self.text = text;
        self.len = len;
        Ok(())
    }

    /// Write the whole document to `sink`.
    pub fn save_to<W: Write>(&self, mut sink: W) -> Result<()> {
        sink.write_all(self.text.as_bytes())?;
        sink.flush()?;
        Ok(())
    }

    /// Load the document from a file.
    pub fn load_file(&mut self, path: &Path) -> Result<()> {
        let file = fs::File::open(path).map_err(|e| Error::io(path, e))?;
        self.load_from(file).map_err(|e| match e {
            Error::Stream(source) => Error::io(path, source),
            other => other,
        })?;
        info!(path = %path.display(), chars = self.len, "loaded document");
        Ok(())
    }

    /// Save the document to a file.
    ///
    /// Writes to a sibling temp file first and renames it into place, so a
    /// failed save never leaves a truncated document behind.
    pub fn save_file(&self, path: &Path) -> Result<()> {
        let mut name = path.as_os_str().to_owned();
        name.push(".tmp~");
        let tmp = PathBuf::from(name);
        let result = fs::File::create(&tmp)
            .and_then(|mut file| {
                file.write_all(self.text.as_bytes())?;
                file.sync_all()
            })
            .and_then(|()| fs::rename(&tmp, path));

        if let Err(e) = result {
            let _ = fs::remove_file(&tmp);
            return Err(Error::io(path, e));
        }
        debug!(path = %path.display(), bytes = self.text.len(), "saved document");
        Ok(())
    }
}

impl Default for EditBuffer {
    fn default() -> Self {
        Self::new(crate::config::MAX_TEXT_LENGTH)
    }
}
