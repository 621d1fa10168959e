//! Ranked action search.
//!
//! Results from the usage history come first, followed by every other
//! registered action that matches the keyword, ordered by section and then
//! by the order the registry was scanned in.

use std::collections::HashSet;

use crate::actions::{Action, ActionKind, ActionRegistry};
use crate::history::ActionHistory;
use crate::matcher::{match_keyword, normalize_label, Section, SECTION_HISTORY};
use crate::settings::Settings;

/// Name suffixes of menu containers that cannot be run directly.
const EXCLUDED_SUFFIXES: &[&str] = &["-menu", "-popup"];
const EXCLUDED_PREFIXES: &[&str] = &["context-", "plug-in-recent-"];

#[derive(Debug, Clone, Copy)]
pub struct SearchResult<'a> {
    pub action: &'a Action,
    pub section: Section,
}

/// Structural actions (menus, popups, recent plug-in slots) never show up
/// in search results.
pub fn is_excluded(name: &str) -> bool {
    EXCLUDED_SUFFIXES.iter().any(|s| name.ends_with(s))
        || EXCLUDED_PREFIXES.iter().any(|p| name.starts_with(p))
}

fn listable(action: &Action, show_disabled: bool) -> bool {
    !is_excluded(&action.name)
        && (action.enabled || show_disabled)
        && normalize_label(&action.label).is_some()
}

/// Search `registry` for `keyword`.
///
/// `None` lists every available action in section 0, an empty keyword
/// lists nothing. Each action name appears at most once.
pub fn search<'a>(
    keyword: Option<&str>,
    registry: &'a ActionRegistry,
    history: &ActionHistory,
    show_disabled: bool,
) -> Vec<SearchResult<'a>> {
    if keyword == Some("") {
        return Vec::new();
    }

    let mut seen: HashSet<&str> = HashSet::new();
    let mut results: Vec<SearchResult<'a>> = Vec::new();

    let recent = history.search(|name| {
        registry
            .get(name)
            .filter(|a| listable(a, show_disabled))
            .and_then(|a| match_keyword(a, keyword))
            .is_some()
    });
    for name in recent {
        if let Some(action) = registry.get(name) {
            if seen.insert(action.name.as_str()) {
                results.push(SearchResult {
                    action,
                    section: SECTION_HISTORY,
                });
            }
        }
    }

    let mut ranked: Vec<SearchResult<'a>> = Vec::new();
    for group in registry.groups() {
        for action in group.sorted_actions() {
            if !listable(action, show_disabled) {
                continue;
            }
            if seen.contains(action.name.as_str()) {
                continue;
            }
            if let Some(section) = match_keyword(action, keyword) {
                seen.insert(action.name.as_str());
                ranked.push(SearchResult { action, section });
            }
        }
    }
    ranked.sort_by_key(|r| r.section);
    results.extend(ranked);

    tracing::debug!(
        keyword = keyword.unwrap_or("<all>"),
        results = results.len(),
        "action search"
    );
    results
}

/// Icon shown next to a result: toggles show their state.
pub fn display_icon(action: &Action) -> Option<&str> {
    match action.kind {
        ActionKind::Toggle { active: true } => Some("checked"),
        ActionKind::Toggle { active: false } => Some("unchecked"),
        ActionKind::Normal => action.icon.as_deref(),
    }
}

/// One row of the search popup, detached from the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub name: String,
    pub label: String,
    pub tooltip: Option<String>,
    pub icon: Option<String>,
    pub section: Section,
    /// Sensitivity when the list was built; rechecked on confirm.
    pub enabled: bool,
}

impl From<SearchResult<'_>> for SearchHit {
    fn from(r: SearchResult<'_>) -> Self {
        Self {
            name: r.action.name.clone(),
            label: crate::matcher::strip_mnemonic(&r.action.label).trim().to_string(),
            tooltip: r.action.tooltip.clone(),
            icon: display_icon(r.action).map(str::to_string),
            section: r.section,
            enabled: r.action.enabled,
        }
    }
}

/// State of the search popup: the typed text, its results and the current
/// selection.
#[derive(Debug, Clone, Default)]
pub struct ActionSearch {
    query: String,
    results: Vec<SearchHit>,
    selected: usize,
    show_unavailable: bool,
}

impl ActionSearch {
    pub fn new(settings: &Settings) -> Self {
        Self {
            show_unavailable: settings.search_show_unavailable,
            ..Self::default()
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[SearchHit] {
        &self.results
    }

    pub fn selected(&self) -> Option<&SearchHit> {
        self.results.get(self.selected)
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// Update the typed text. Non-empty text reruns the search and selects
    /// the first row, empty text hides the list.
    pub fn set_query(&mut self, text: &str, registry: &ActionRegistry, history: &ActionHistory) {
        self.query = text.to_string();
        if text.is_empty() {
            self.results.clear();
        } else {
            self.fill(Some(text), registry, history);
        }
        self.selected = 0;
    }

    /// List every available action. Only has an effect while the query is
    /// empty.
    pub fn show_all(&mut self, registry: &ActionRegistry, history: &ActionHistory) {
        if self.query.is_empty() {
            self.fill(None, registry, history);
            self.selected = 0;
        }
    }

    fn fill(&mut self, keyword: Option<&str>, registry: &ActionRegistry, history: &ActionHistory) {
        self.results = search(keyword, registry, history, self.show_unavailable)
            .into_iter()
            .map(SearchHit::from)
            .collect();
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.results.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Run the selected action.
    ///
    /// Sensitivity is read from `registry` again since it may have changed
    /// after the list was built. Returns `false` without doing anything if
    /// nothing is selected or the action is disabled now.
    pub fn confirm<F>(
        &mut self,
        registry: &ActionRegistry,
        history: &mut ActionHistory,
        activate: F,
    ) -> bool
    where
        F: FnOnce(&Action),
    {
        let Some(hit) = self.results.get(self.selected) else {
            return false;
        };
        let Some(action) = registry.get(&hit.name) else {
            tracing::warn!(name = %hit.name, "selected action is no longer registered");
            return false;
        };
        if !action.enabled {
            tracing::debug!(name = %action.name, "ignoring disabled action");
            return false;
        }
        activate(action);
        history.record(&action.name);
        self.clear();
        true
    }

    pub fn clear(&mut self) {
        self.query.clear();
        self.results.clear();
        self.selected = 0;
    }
}
