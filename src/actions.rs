use serde::{Deserialize, Serialize};

/// Whether an action is a plain command or a toggle with a current state.
///
/// Only affects how an entry is displayed, never whether it matches.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ActionKind {
    #[default]
    Normal,
    Toggle { active: bool },
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Action {
    /// Stable identifier, unique within a registry.
    pub name: String,
    /// Menu label, may contain `_` mnemonic markers.
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub kind: ActionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

fn default_enabled() -> bool {
    true
}

impl Action {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            tooltip: None,
            enabled: true,
            kind: ActionKind::Normal,
            icon: None,
        }
    }

    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn toggle(mut self, active: bool) -> Self {
        self.kind = ActionKind::Toggle { active };
        self
    }

    pub fn is_toggle(&self) -> bool {
        matches!(self.kind, ActionKind::Toggle { .. })
    }
}

/// A namespace of actions, e.g. everything registered by the filters menu.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ActionGroup {
    pub name: String,
    pub actions: Vec<Action>,
}

impl ActionGroup {
    pub fn new(name: impl Into<String>, actions: Vec<Action>) -> Self {
        Self {
            name: name.into(),
            actions,
        }
    }

    /// Actions of this group ordered by name.
    pub fn sorted_actions(&self) -> Vec<&Action> {
        let mut list: Vec<&Action> = self.actions.iter().collect();
        list.sort_by(|a, b| a.name.cmp(&b.name));
        list
    }
}

/// All actions known to the application, grouped by namespace.
///
/// Groups are kept in registration order.
#[derive(Debug, Default, Clone)]
pub struct ActionRegistry {
    groups: Vec<ActionGroup>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self { groups: Vec::new() }
    }

    pub fn register(&mut self, group: ActionGroup) {
        self.groups.push(group);
    }

    pub fn groups(&self) -> &[ActionGroup] {
        &self.groups
    }

    pub fn get(&self, name: &str) -> Option<&Action> {
        self.groups
            .iter()
            .flat_map(|g| g.actions.iter())
            .find(|a| a.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Action> {
        self.groups
            .iter_mut()
            .flat_map(|g| g.actions.iter_mut())
            .find(|a| a.name == name)
    }

    /// Change the sensitivity of an action. Returns `false` if no action has
    /// that name.
    pub fn set_enabled(&mut self, name: &str, enabled: bool) -> bool {
        match self.get_mut(name) {
            Some(action) => {
                action.enabled = enabled;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.actions.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn load_actions(path: &str) -> anyhow::Result<Vec<ActionGroup>> {
    let content = std::fs::read_to_string(path)?;
    let groups: Vec<ActionGroup> = serde_json::from_str(&content)?;
    Ok(groups)
}

pub fn save_actions(path: &str, groups: &[ActionGroup]) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(groups)?;
    std::fs::write(path, json)?;
    Ok(())
}

impl ActionRegistry {
    /// Build a registry from an action table written by [`save_actions`].
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let mut registry = Self::new();
        for group in load_actions(path)? {
            registry.register(group);
        }
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn action_table_roundtrip() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("actions.json");
        let groups = vec![ActionGroup::new(
            "view",
            vec![
                Action::new("view-zoom-in", "Zoom _In"),
                Action::new("view-show-grid", "Show _Grid").toggle(true),
            ],
        )];

        save_actions(path.to_str().unwrap(), &groups).expect("save actions");
        let registry = ActionRegistry::load(path.to_str().unwrap()).expect("load actions");
        assert_eq!(registry.len(), 2);
        let grid = registry.get("view-show-grid").unwrap();
        assert_eq!(grid.kind, ActionKind::Toggle { active: true });
        assert!(grid.enabled);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let json = r#"[{"name":"file","actions":[{"name":"file-open","label":"_Open..."}]}]"#;
        let groups: Vec<ActionGroup> = serde_json::from_str(json).unwrap();
        let open = &groups[0].actions[0];
        assert!(open.enabled);
        assert_eq!(open.kind, ActionKind::Normal);
        assert!(open.tooltip.is_none());
    }

    #[test]
    fn set_enabled_reports_unknown_names() {
        let mut registry = ActionRegistry::new();
        registry.register(ActionGroup::new("edit", vec![Action::new("edit-undo", "_Undo")]));
        assert!(registry.set_enabled("edit-undo", false));
        assert!(!registry.get("edit-undo").unwrap().enabled);
        assert!(!registry.set_enabled("edit-redo", false));
    }
}
