//! Change gate: Skip repaints when nothing visible changed.
//!
//! Small panels are slow to push pixels to (an I2C OLED needs a full frame
//! transfer per update), so identical frames are never sent twice.

/// Remembers the last rendered snapshot and compares new ones against it.
#[derive(Debug, Clone, Default)]
pub struct ChangeGate {
    /// The last committed `(lines, offset)`, if any.
    last: Option<(Vec<String>, usize)>,
}

impl ChangeGate {
    /// Create a gate with nothing rendered yet.
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// Check whether `(lines, offset)` differs from the last commit.
    ///
    /// Pure: calling it any number of times changes nothing. Always `true`
    /// before the first commit or after [`invalidate`](Self::invalidate).
    pub fn should_redraw<S: AsRef<str>>(&self, lines: &[S], offset: usize) -> bool {
        match &self.last {
            None => true,
            Some((last_lines, last_offset)) => {
                *last_offset != offset
                    || last_lines.len() != lines.len()
                    || last_lines
                        .iter()
                        .zip(lines)
                        .any(|(a, b)| a.as_str() != b.as_ref())
            }
        }
    }

    /// Record `(lines, offset)` as what is now on the display.
    pub fn commit<S: AsRef<str>>(&mut self, lines: &[S], offset: usize) {
        match &mut self.last {
            Some((last_lines, last_offset)) => {
                last_lines.clear();
                last_lines.extend(lines.iter().map(|l| l.as_ref().to_owned()));
                *last_offset = offset;
            }
            None => {
                let owned = lines.iter().map(|l| l.as_ref().to_owned()).collect();
                self.last = Some((owned, offset));
            }
        }
    }

    /// Forget the last snapshot so the next check reports a redraw.
    pub fn invalidate(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_first_frame_redraws() {
        let gate = ChangeGate::new();
        assert!(gate.should_redraw(&["a"], 0));
        assert!(gate.should_redraw::<&str>(&[], 0));
    }

    #[test]
    fn test_gate_same_commit_suppresses() {
        let mut gate = ChangeGate::new();
        gate.commit(&["a", "b"], 3);
        assert!(!gate.should_redraw(&["a", "b"], 3));
        // Idempotent without a commit in between.
        assert!(!gate.should_redraw(&["a", "b"], 3));
    }

    #[test]
    fn test_gate_detects_any_difference() {
        let mut gate = ChangeGate::new();
        gate.commit(&["a", "b"], 3);
        assert!(gate.should_redraw(&["a", "c"], 3));
        assert!(gate.should_redraw(&["a", "b"], 4));
        assert!(gate.should_redraw(&["a"], 3));
        assert!(gate.should_redraw(&["a", "b", ""], 3));
    }

    #[test]
    fn test_gate_check_is_pure() {
        let mut gate = ChangeGate::new();
        gate.commit(&["x"], 0);
        assert!(gate.should_redraw(&["y"], 0));
        assert!(gate.should_redraw(&["y"], 0));
        assert!(!gate.should_redraw(&["x"], 0));
    }

    #[test]
    fn test_gate_recommit_tracks_latest() {
        let mut gate = ChangeGate::new();
        gate.commit(&["one"], 0);
        gate.commit(&["two"], 1);
        assert!(!gate.should_redraw(&["two"], 1));
        assert!(gate.should_redraw(&["one"], 0));
    }

    #[test]
    fn test_gate_invalidate() {
        let mut gate = ChangeGate::new();
        gate.commit(&["a"], 0);
        gate.invalidate();
        assert!(gate.should_redraw(&["a"], 0));
    }

    #[test]
    fn test_gate_accepts_owned_lines() {
        let mut gate = ChangeGate::new();
        let lines = vec!["hello".to_string(), "world".to_string()];
        gate.commit(&lines, 0);
        assert!(!gate.should_redraw(&["hello", "world"], 0));
    }
}
