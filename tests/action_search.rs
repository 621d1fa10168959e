use editor_ui_utils::actions::{Action, ActionGroup, ActionRegistry};
use editor_ui_utils::history::ActionHistory;
use editor_ui_utils::search::ActionSearch;
use editor_ui_utils::settings::Settings;

fn registry() -> ActionRegistry {
    let mut registry = ActionRegistry::new();
    registry.register(ActionGroup::new(
        "layers",
        vec![
            Action::new("layers-new", "_New Layer..."),
            Action::new("layers-duplicate", "D_uplicate Layer"),
            Action::new("layers-merge-down", "Merge Do_wn"),
        ],
    ));
    registry.register(ActionGroup::new(
        "view",
        vec![Action::new("view-show-grid", "Show _Grid").toggle(false)],
    ));
    registry
}

#[test]
fn typing_selects_first_result() {
    let r = registry();
    let h = ActionHistory::new(10);
    let mut popup = ActionSearch::new(&Settings::default());

    popup.set_query("layer", &r, &h);
    assert_eq!(popup.results().len(), 2);
    assert_eq!(popup.selected_index(), 0);
    assert_eq!(popup.selected().unwrap().name, "layers-duplicate");
    assert_eq!(popup.selected().unwrap().label, "Duplicate Layer");

    popup.select_next();
    popup.select_next();
    assert_eq!(popup.selected().unwrap().name, "layers-new");
    popup.select_prev();
    popup.select_prev();
    assert_eq!(popup.selected_index(), 0);
}

#[test]
fn empty_query_hides_results_until_show_all() {
    let r = registry();
    let h = ActionHistory::new(10);
    let mut popup = ActionSearch::new(&Settings::default());

    popup.set_query("grid", &r, &h);
    assert_eq!(popup.results()[0].icon.as_deref(), Some("unchecked"));
    popup.set_query("", &r, &h);
    assert!(popup.results().is_empty());

    popup.show_all(&r, &h);
    assert_eq!(popup.results().len(), 4);
    assert!(popup.results().iter().all(|hit| hit.section == 0));
}

#[test]
fn confirm_runs_action_and_records_history() {
    let r = registry();
    let mut h = ActionHistory::new(10);
    let mut popup = ActionSearch::new(&Settings::default());

    popup.set_query("md", &r, &h);
    let mut ran = Vec::new();
    assert!(popup.confirm(&r, &mut h, |a| ran.push(a.name.clone())));
    assert_eq!(ran, vec!["layers-merge-down".to_string()]);
    assert!(h.contains("layers-merge-down"));
    assert!(popup.results().is_empty());
    assert_eq!(popup.query(), "");

    // history now ranks it first
    popup.set_query("m", &r, &h);
    assert_eq!(popup.results()[0].name, "layers-merge-down");
    assert_eq!(popup.results()[0].section, 0);
}

#[test]
fn confirm_rechecks_sensitivity() {
    let mut r = registry();
    let mut h = ActionHistory::new(10);
    let mut popup = ActionSearch::new(&Settings::default());

    popup.set_query("new", &r, &h);
    assert!(popup.selected().unwrap().enabled);
    r.set_enabled("layers-new", false);

    let mut ran = false;
    assert!(!popup.confirm(&r, &mut h, |_| ran = true));
    assert!(!ran);
    assert!(h.is_empty());
    // the list stays open
    assert_eq!(popup.results().len(), 1);
}

#[test]
fn confirm_without_results_is_noop() {
    let r = registry();
    let mut h = ActionHistory::new(10);
    let mut popup = ActionSearch::new(&Settings::default());
    assert!(!popup.confirm(&r, &mut h, |_| panic!("nothing selected")));
}

#[test]
fn unavailable_actions_follow_settings() {
    let mut r = registry();
    r.set_enabled("layers-new", false);
    let h = ActionHistory::new(10);

    let mut popup = ActionSearch::new(&Settings::default());
    popup.set_query("new", &r, &h);
    assert!(popup.results().is_empty());

    let settings = Settings {
        search_show_unavailable: true,
        ..Settings::default()
    };
    let mut popup = ActionSearch::new(&settings);
    popup.set_query("new", &r, &h);
    assert_eq!(popup.results().len(), 1);
    assert!(!popup.results()[0].enabled);
}
