use std::cmp::Ordering;

/// Receiver of resolved `(name, code)` language entries.
pub trait LanguageSink {
    fn add(&mut self, name: &str, code: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageEntry {
    /// Language name, localized into the language itself when possible.
    pub name: String,
    pub code: String,
}

/// The list of languages a user can pick from, ordered by name.
#[derive(Debug, Clone, Default)]
pub struct LanguageStore {
    entries: Vec<LanguageEntry>,
}

fn compare(a: &LanguageEntry, name: &str, code: &str) -> Ordering {
    a.name
        .to_lowercase()
        .cmp(&name.to_lowercase())
        .then_with(|| a.code.as_str().cmp(code))
}

impl LanguageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[LanguageEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn name_for(&self, code: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.code == code)
            .map(|e| e.name.as_str())
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.code.as_str())
    }
}

impl LanguageSink for LanguageStore {
    fn add(&mut self, name: &str, code: &str) {
        match self
            .entries
            .binary_search_by(|e| compare(e, name, code))
        {
            Ok(_) => {}
            Err(idx) => self.entries.insert(
                idx,
                LanguageEntry {
                    name: name.to_string(),
                    code: code.to_string(),
                },
            ),
        }
    }
}

impl LanguageSink for Vec<LanguageEntry> {
    fn add(&mut self, name: &str, code: &str) {
        self.push(LanguageEntry {
            name: name.to_string(),
            code: code.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_sorted_by_name() {
        let mut store = LanguageStore::new();
        store.add("français", "fr");
        store.add("Deutsch", "de");
        store.add("English", "en");
        let names: Vec<&str> = store.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Deutsch", "English", "français"]);
        assert_eq!(store.name_for("fr"), Some("français"));
    }

    #[test]
    fn duplicates_ignored() {
        let mut store = LanguageStore::new();
        store.add("Chinese", "zh_CN");
        store.add("Chinese", "zh_TW");
        store.add("Chinese", "zh_CN");
        assert_eq!(store.codes().collect::<Vec<_>>(), vec!["zh_CN", "zh_TW"]);
    }
}
