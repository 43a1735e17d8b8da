//! Command-name autocompletion.

/// Outcome of completing an input line against the vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Exactly one entry matches; replace the input with it.
    Unique(String),
    /// Several entries match; the input stays as typed.
    Ambiguous(Vec<String>),
    /// Nothing matches.
    NoMatch,
}

impl Completion {
    /// Text to put in the input line, if it should change.
    pub fn replacement(&self) -> Option<&str> {
        match self {
            Self::Unique(name) => Some(name),
            Self::Ambiguous(_) | Self::NoMatch => None,
        }
    }
}

/// Complete `input` against `vocabulary` (case-insensitive prefix match).
///
/// Matches keep vocabulary order.
pub fn complete<S: AsRef<str>>(vocabulary: &[S], input: &str) -> Completion {
    let prefix = input.to_lowercase();
    let mut matches = Vec::new();
    for entry in vocabulary {
        let name: &str = entry.as_ref();
        if name.to_lowercase().starts_with(&prefix) {
            matches.push(name.to_string());
        }
    }
    match matches.len() {
        0 => Completion::NoMatch,
        1 => Completion::Unique(matches.remove(0)),
        _ => Completion::Ambiguous(matches),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VOCAB: &[&str] = &["help", "whoami", "about", "skills", "clear", "contact", "cat"];

    #[test]
    fn unique_prefix_completes() {
        assert_eq!(complete(VOCAB, "who"), Completion::Unique("whoami".into()));
        assert_eq!(complete(VOCAB, "sk").replacement(), Some("skills"));
    }

    #[test]
    fn prefix_match_ignores_case() {
        assert_eq!(complete(VOCAB, "WHO"), Completion::Unique("whoami".into()));
    }

    #[test]
    fn several_matches_are_ambiguous() {
        match complete(VOCAB, "c") {
            Completion::Ambiguous(names) => assert_eq!(names, ["clear", "contact", "cat"]),
            other => panic!("expected ambiguous, got {other:?}"),
        }
        assert_eq!(complete(VOCAB, "c").replacement(), None);
    }

    #[test]
    fn unknown_prefix_has_no_match() {
        assert_eq!(complete(VOCAB, "zzz"), Completion::NoMatch);
    }

    #[test]
    fn empty_input_matches_everything() {
        assert!(matches!(complete(VOCAB, ""), Completion::Ambiguous(v) if v.len() == VOCAB.len()));
    }

    #[test]
    fn exact_name_completes_to_itself() {
        assert_eq!(complete(VOCAB, "about"), Completion::Unique("about".into()));
    }

    #[test]
    fn same_input_same_result() {
        assert_eq!(complete(VOCAB, "ab"), complete(VOCAB, "ab"));
    }
}
