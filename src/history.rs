use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    /// Name of the action that was run.
    pub name: String,
    /// How many times the action was run while it stayed in the history.
    pub count: u32,
    pub last_used: i64,
}

/// Recently activated actions, most recent first.
#[derive(Debug, Clone)]
pub struct ActionHistory {
    entries: VecDeque<HistoryEntry>,
    limit: usize,
}

impl ActionHistory {
    /// Create an empty history keeping at most `limit` entries.
    pub fn new(limit: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            limit,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Change the bound, dropping the oldest entries if needed.
    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit;
        self.entries.truncate(limit);
    }

    /// Record an activation of `name`, moving it to the front.
    pub fn record(&mut self, name: &str) {
        self.record_at(name, chrono::Utc::now().timestamp());
    }

    pub fn record_at(&mut self, name: &str, timestamp: i64) {
        let count = match self.entries.iter().position(|e| e.name == name) {
            Some(idx) => self.entries.remove(idx).map(|e| e.count).unwrap_or(0),
            None => 0,
        };
        self.entries.push_front(HistoryEntry {
            name: name.to_string(),
            count: count.saturating_add(1),
            last_used: timestamp,
        });
        self.entries.truncate(self.limit);
    }

    /// Names of the entries accepted by `matches`, most recent first.
    pub fn search<F>(&self, mut matches: F) -> Vec<&str>
    where
        F: FnMut(&str) -> bool,
    {
        self.entries
            .iter()
            .map(|e| e.name.as_str())
            .filter(|name| matches(*name))
            .collect()
    }

    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for ActionHistory {
    fn default() -> Self {
        Self::new(crate::settings::DEFAULT_HISTORY_SIZE)
    }
}
