//! Session history log and recall navigation.

use crate::interpreter::OutputBlock;

/// Where a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// Synthetic welcome banner; never recalled.
    Banner,
    /// A line the user submitted.
    Command,
}

/// One immutable entry of the session log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRecord {
    pub input: String,
    pub output: OutputBlock,
    pub is_error: bool,
    /// Session clock at submission, in milliseconds.
    pub timestamp_ms: u64,
    pub kind: RecordKind,
}

impl CommandRecord {
    /// Record for a submitted command.
    pub fn command(input: &str, output: OutputBlock, is_error: bool, timestamp_ms: u64) -> Self {
        Self {
            input: input.to_string(),
            output,
            is_error,
            timestamp_ms,
            kind: RecordKind::Command,
        }
    }

    /// Record for the welcome banner; never recalled.
    pub fn banner(input: &str, text: String, timestamp_ms: u64) -> Self {
        Self {
            input: input.to_string(),
            output: OutputBlock::Text(text),
            is_error: false,
            timestamp_ms,
            kind: RecordKind::Banner,
        }
    }
}

/// Append-only log of records, cleared only as a whole.
#[derive(Debug, Clone, Default)]
pub struct SessionHistory {
    records: Vec<CommandRecord>,
}

impl SessionHistory {
    /// Empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record.
    pub fn push(&mut self, record: CommandRecord) {
        self.records.push(record);
    }

    /// Drop every record, the banner included.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Records, oldest first.
    pub fn records(&self) -> &[CommandRecord] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Newest record.
    pub fn last(&self) -> Option<&CommandRecord> {
        self.records.last()
    }

    /// Inputs eligible for recall, oldest first.
    pub fn recallable(&self) -> Vec<&str> {
        self.records
            .iter()
            .filter(|r| r.kind == RecordKind::Command)
            .map(|r| r.input.as_str())
            .collect()
    }
}

/// Result of a recall request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recall {
    /// Leave the input line as it is.
    Unchanged,
    /// Replace the input line with this text.
    Replace(String),
}

/// Recall cursor over the recallable inputs.
///
/// The cursor counts back from the newest entry: `None` is unselected,
/// `Some(0)` the newest, `Some(n - 1)` the oldest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoryNavigator {
    cursor: Option<usize>,
}

impl HistoryNavigator {
    /// Navigator with nothing selected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current position, counted back from the newest entry.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Whether an entry is selected.
    pub fn is_selected(&self) -> bool {
        self.cursor.is_some()
    }

    /// Step toward older entries; bounded at the oldest.
    pub fn previous(&mut self, history: &SessionHistory) -> Recall {
        let entries = history.recallable();
        let next = match self.cursor {
            None => 0,
            Some(i) => i + 1,
        };
        if next >= entries.len() {
            return Recall::Unchanged;
        }
        self.cursor = Some(next);
        Recall::Replace(entries[entries.len() - 1 - next].to_string())
    }

    /// Step toward newer entries; past the newest clears the input.
    pub fn next(&mut self, history: &SessionHistory) -> Recall {
        match self.cursor {
            None => Recall::Unchanged,
            Some(0) => {
                self.cursor = None;
                Recall::Replace(String::new())
            },
            Some(i) => {
                let entries = history.recallable();
                if entries.is_empty() {
                    self.cursor = None;
                    return Recall::Replace(String::new());
                }
                let next = (i - 1).min(entries.len() - 1);
                self.cursor = Some(next);
                Recall::Replace(entries[entries.len() - 1 - next].to_string())
            },
        }
    }

    /// Back to unselected (after a submission or a clear).
    pub fn reset(&mut self) {
        self.cursor = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn history_of(inputs: &[&str]) -> SessionHistory {
        let mut h = SessionHistory::new();
        h.push(CommandRecord::banner("init", "welcome".into(), 0));
        for (i, input) in inputs.iter().enumerate() {
            h.push(CommandRecord::command(
                input,
                OutputBlock::Text(String::new()),
                false,
                i as u64,
            ));
        }
        h
    }

    #[test]
    fn banner_is_not_recallable() {
        let h = history_of(&["whoami"]);
        assert_eq!(h.recallable(), vec!["whoami"]);
    }

    #[test]
    fn literal_init_command_is_recallable() {
        let h = history_of(&["init"]);
        assert_eq!(h.recallable(), vec!["init"]);
    }

    #[test]
    fn previous_walks_back_and_stops_at_oldest() {
        let h = history_of(&["a", "b", "c"]);
        let mut nav = HistoryNavigator::new();
        assert_eq!(nav.previous(&h), Recall::Replace("c".into()));
        assert_eq!(nav.previous(&h), Recall::Replace("b".into()));
        assert_eq!(nav.previous(&h), Recall::Replace("a".into()));
        assert_eq!(nav.previous(&h), Recall::Unchanged);
        assert_eq!(nav.cursor(), Some(2));
    }

    #[test]
    fn next_walks_forward_then_clears() {
        let h = history_of(&["a", "b"]);
        let mut nav = HistoryNavigator::new();
        nav.previous(&h);
        nav.previous(&h);
        assert_eq!(nav.next(&h), Recall::Replace("b".into()));
        assert_eq!(nav.next(&h), Recall::Replace(String::new()));
        assert!(!nav.is_selected());
        assert_eq!(nav.next(&h), Recall::Unchanged);
    }

    #[test]
    fn empty_history_recalls_nothing() {
        let h = history_of(&[]);
        let mut nav = HistoryNavigator::new();
        assert_eq!(nav.previous(&h), Recall::Unchanged);
        assert_eq!(nav.next(&h), Recall::Unchanged);
    }

    #[test]
    fn clear_empties_log() {
        let mut h = history_of(&["a"]);
        h.clear();
        assert!(h.is_empty());
        assert!(h.last().is_none());
    }

    #[test]
    fn next_after_clear_recovers() {
        let mut h = history_of(&["a", "b"]);
        let mut nav = HistoryNavigator::new();
        nav.previous(&h);
        nav.previous(&h);
        h.clear();
        assert_eq!(nav.next(&h), Recall::Replace(String::new()));
        assert!(!nav.is_selected());
    }

    proptest! {
        #[test]
        fn cursor_stays_in_bounds(
            count in 0usize..8,
            moves in proptest::collection::vec(any::<bool>(), 0..40),
        ) {
            let inputs: Vec<String> = (0..count).map(|i| format!("cmd{i}")).collect();
            let refs: Vec<&str> = inputs.iter().map(String::as_str).collect();
            let h = history_of(&refs);
            let mut nav = HistoryNavigator::new();
            for up in moves {
                let recall = if up { nav.previous(&h) } else { nav.next(&h) };
                if let Some(i) = nav.cursor() {
                    prop_assert!(i < count);
                }
                if let Recall::Replace(text) = recall {
                    prop_assert!(text.is_empty() || inputs.contains(&text));
                }
            }
        }
    }
}
