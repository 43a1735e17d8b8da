//! The editable input line.

/// Text the user is composing. Editing happens at the end of the line only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputLine {
    text: String,
}

impl InputLine {
    /// Empty line.
    pub fn new() -> Self {
        Self::default()
    }

    /// Line as typed.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Whether the line is empty or whitespace.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Append `ch`. Control characters are dropped.
    pub fn push(&mut self, ch: char) {
        if !ch.is_control() {
            self.text.push(ch);
        }
    }

    /// Delete the last character. Returns `false` on an empty line.
    pub fn backspace(&mut self) -> bool {
        self.text.pop().is_some()
    }

    /// Replace the whole line.
    pub fn set(&mut self, text: &str) {
        self.text.clear();
        self.text.push_str(text);
    }

    /// Take the line, leaving it empty.
    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_and_backspace() {
        let mut line = InputLine::new();
        for ch in "lss".chars() {
            line.push(ch);
        }
        assert!(line.backspace());
        assert_eq!(line.as_str(), "ls");
    }

    #[test]
    fn backspace_on_empty_line() {
        let mut line = InputLine::new();
        assert!(!line.backspace());
    }

    #[test]
    fn control_characters_are_ignored() {
        let mut line = InputLine::new();
        line.push('\n');
        line.push('\t');
        assert_eq!(line.as_str(), "");
    }

    #[test]
    fn backspace_removes_whole_multibyte_char() {
        let mut line = InputLine::new();
        line.set("café");
        line.backspace();
        assert_eq!(line.as_str(), "caf");
    }

    #[test]
    fn take_empties_line() {
        let mut line = InputLine::new();
        line.set("  help ");
        assert!(!line.is_blank());
        assert_eq!(line.take(), "  help ");
        assert!(line.is_blank());
    }
}
