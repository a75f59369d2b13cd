use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogCategory {
    Info,
    Combat,
    Event,
    Gain,
    Loss,
}

impl LogCategory {
    pub fn label(self) -> &'static str {
        match self {
            LogCategory::Info => "info",
            LogCategory::Combat => "combat",
            LogCategory::Event => "event",
            LogCategory::Gain => "gain",
            LogCategory::Loss => "loss",
        }
    }
}

/// One line of the session chronicle. Display only; the engine never reads it back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: Uuid,
    pub text: String,
    pub category: LogCategory,
    pub timestamp: DateTime<Utc>,
}

impl LogEntry {
    pub fn new(category: LogCategory, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            category,
            timestamp: Utc::now(),
        }
    }
}

/// Append-only, insertion-ordered chronicle.
#[derive(Debug, Clone, Default)]
pub struct GameLog {
    entries: Vec<LogEntry>,
}

impl GameLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, category: LogCategory, text: impl Into<String>) -> &LogEntry {
        self.entries.push(LogEntry::new(category, text));
        &self.entries[self.entries.len() - 1]
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Entries appended after the first `cursor` ones.
    pub fn since(&self, cursor: usize) -> &[LogEntry] {
        self.entries.get(cursor..).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }

    pub fn count(&self, category: LogCategory) -> usize {
        self.entries.iter().filter(|e| e.category == category).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn since_returns_only_new_entries() {
        let mut log = GameLog::new();
        log.push(LogCategory::Info, "first");
        let cursor = log.len();
        log.push(LogCategory::Gain, "second");
        log.push(LogCategory::Loss, "third");

        let fresh: Vec<_> = log.since(cursor).iter().map(|e| e.text.as_str()).collect();
        assert_eq!(fresh, vec!["second", "third"]);
        assert!(log.since(10).is_empty());
    }

    #[test]
    fn ids_are_unique() {
        let mut log = GameLog::new();
        let a = log.push(LogCategory::Event, "a").id;
        let b = log.push(LogCategory::Event, "b").id;
        assert_ne!(a, b);
    }
}
