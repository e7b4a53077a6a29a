//! The input alphabet understood by sessions.
//!
//! Mapping a concrete keyboard's raw codes onto this alphabet is the job of
//! the input actor; sessions never see device-specific codes.

/// A discrete input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputEvent {
    /// A printable character.
    Char(char),
    /// Enter/Return.
    Enter,
    /// Delete the character before the cursor.
    Backspace,
    /// Scroll the view up one line.
    ScrollUp,
    /// Scroll the view down one line.
    ScrollDown,
    /// Scroll the view up one page.
    PageUp,
    /// Scroll the view down one page.
    PageDown,
    /// Save and close.
    Save,
    /// Close without saving.
    Cancel,
}

impl InputEvent {
    /// Check if this event changes the view rather than the document.
    pub const fn is_scroll(self) -> bool {
        matches!(
            self,
            Self::ScrollUp | Self::ScrollDown | Self::PageUp | Self::PageDown
        )
    }
}

/// A document mutation, the part of the alphabet that gets batched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditOp {
    /// Append a character.
    Insert(char),
    /// Append a line break.
    Newline,
    /// Remove the last character.
    Backspace,
}

impl TryFrom<InputEvent> for EditOp {
    type Error = InputEvent;

    /// Convert an input event into an edit, handing back anything that
    /// isn't one.
    fn try_from(event: InputEvent) -> Result<Self, Self::Error> {
        match event {
            InputEvent::Char('\n' | '\r') | InputEvent::Enter => Ok(Self::Newline),
            InputEvent::Char(c) if !c.is_control() || c == '\t' => Ok(Self::Insert(c)),
            InputEvent::Backspace => Ok(Self::Backspace),
            other => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_op_conversion() {
        assert_eq!(EditOp::try_from(InputEvent::Char('a')), Ok(EditOp::Insert('a')));
        assert_eq!(EditOp::try_from(InputEvent::Enter), Ok(EditOp::Newline));
        assert_eq!(EditOp::try_from(InputEvent::Char('\r')), Ok(EditOp::Newline));
        assert_eq!(EditOp::try_from(InputEvent::Backspace), Ok(EditOp::Backspace));
        assert_eq!(
            EditOp::try_from(InputEvent::ScrollUp),
            Err(InputEvent::ScrollUp)
        );
        assert_eq!(
            EditOp::try_from(InputEvent::Char('\x07')),
            Err(InputEvent::Char('\x07'))
        );
    }

    #[test]
    fn test_scroll_classification() {
        assert!(InputEvent::PageDown.is_scroll());
        assert!(!InputEvent::Enter.is_scroll());
        assert!(!InputEvent::Cancel.is_scroll());
    }
}
