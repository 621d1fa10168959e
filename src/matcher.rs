//! Keyword matching for the action search.
//!
//! A candidate label is compared against the typed keyword using a fixed
//! list of tests. The first test that succeeds decides the section the
//! result is listed under; lower sections are shown first.

use crate::actions::Action;

/// Priority bucket of a search result. Lower sorts first.
pub type Section = u8;

/// Results taken from the usage history.
pub const SECTION_HISTORY: Section = 0;
/// Two-letter initials, or the keyword starts the label.
pub const SECTION_PREFIX: Section = 1;
/// The keyword appears inside the label.
pub const SECTION_SUBSTRING: Section = 2;
/// The keyword appears inside the tooltip.
pub const SECTION_TOOLTIP: Section = 3;
/// All keyword characters appear in the label in order.
pub const SECTION_FUZZY: Section = 4;

/// Remove mnemonic markers from a menu label.
///
/// A single `_` marks the following character as the mnemonic and is
/// dropped, `__` stands for a literal underscore.
pub fn strip_mnemonic(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut chars = label.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '_' {
            if chars.peek() == Some(&'_') {
                chars.next();
                out.push('_');
            }
            continue;
        }
        out.push(c);
    }
    out
}

/// Label as it is compared against keywords: mnemonic-free and
/// lower-cased, surrounding whitespace kept. `None` when only whitespace
/// is left.
pub fn normalize_label(label: &str) -> Option<String> {
    let stripped = strip_mnemonic(label);
    if stripped.trim().is_empty() {
        None
    } else {
        Some(stripped.to_lowercase())
    }
}

/// True when every character of `key` occurs in `haystack` in the same
/// order, with anything in between. An empty key always matches.
pub fn fuzzy_match(haystack: &str, key: &str) -> bool {
    let mut rest = haystack.chars();
    key.chars().all(|k| rest.any(|c| c == k))
}

/// `gb` matches `gaussian blur...`: the first key character starts the
/// label and the second starts its second word.
fn initials_match(label: &str, key: &str) -> bool {
    let mut key_chars = key.chars();
    let (Some(first), Some(second), None) = (key_chars.next(), key_chars.next(), key_chars.next())
    else {
        return false;
    };
    let Some((head, tail)) = label.split_once(' ') else {
        return false;
    };
    head.starts_with(first) && tail.starts_with(second)
}

/// Test `action` against `keyword` and return the section it belongs to.
///
/// `None` as keyword matches everything in [`SECTION_HISTORY`]. Actions
/// with an empty label never match a keyword.
pub fn match_keyword(action: &Action, keyword: Option<&str>) -> Option<Section> {
    let Some(keyword) = keyword else {
        return Some(SECTION_HISTORY);
    };
    let label = normalize_label(&action.label)?;
    let key = keyword.to_lowercase();

    if initials_match(&label, &key) {
        return Some(SECTION_PREFIX);
    }

    if let Some(pos) = label.find(&key) {
        return Some(if pos == 0 {
            SECTION_PREFIX
        } else {
            SECTION_SUBSTRING
        });
    }

    if key.chars().count() > 2 {
        if let Some(tooltip) = action.tooltip.as_deref().filter(|t| !t.is_empty()) {
            if tooltip.to_lowercase().contains(&key) {
                return Some(SECTION_TOOLTIP);
            }
        }
    }

    if fuzzy_match(&label, &key) {
        return Some(SECTION_FUZZY);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(label: &str, keyword: &str) -> Option<Section> {
        match_keyword(&Action::new("test", label), Some(keyword))
    }

    #[test]
    fn mnemonics_are_stripped() {
        assert_eq!(strip_mnemonic("_Gaussian Blur..."), "Gaussian Blur...");
        assert_eq!(strip_mnemonic("Color T_emperature..."), "Color Temperature...");
        assert_eq!(strip_mnemonic("snake__case"), "snake_case");
        assert_eq!(strip_mnemonic("trailing_"), "trailing");
    }

    #[test]
    fn normalize_rejects_blank_labels() {
        assert_eq!(normalize_label("  _  "), None);
        assert_eq!(normalize_label(" Crop _Image "), Some(" crop image ".into()));
    }

    #[test]
    fn leading_whitespace_demotes_to_substring() {
        assert_eq!(section(" Crop Image", "crop"), Some(SECTION_SUBSTRING));
        assert_eq!(section("Crop Image", "crop"), Some(SECTION_PREFIX));
    }

    #[test]
    fn fuzzy_match_is_subsequence() {
        assert!(fuzzy_match("gimp", ""));
        assert!(fuzzy_match("", ""));
        assert!(!fuzzy_match("", "g"));
        assert!(fuzzy_match("gimp", "gp"));
        assert!(!fuzzy_match("gimp", "pg"));
        assert!(fuzzy_match("gimp", "gimp"));
        assert!(!fuzzy_match("gimp", "gimpp"));
    }

    #[test]
    fn two_letter_initials() {
        assert_eq!(section("Gaussian _Blur...", "gb"), Some(SECTION_PREFIX));
        assert_eq!(section("Gaussian Blur...", "GB"), Some(SECTION_PREFIX));
        // no second word: falls through to the fuzzy test
        assert_eq!(section("Gaussianblur", "gb"), Some(SECTION_FUZZY));
    }

    #[test]
    fn substring_position_decides_section() {
        assert_eq!(section("Crop Image", "crop"), Some(SECTION_PREFIX));
        assert_eq!(section("Crop Image", "Image"), Some(SECTION_SUBSTRING));
    }

    #[test]
    fn tooltip_needs_three_characters() {
        let action = Action::new("filters-c2g", "Color to Gray...")
            .with_tooltip("Remove saturation with perceptual contrast");
        assert_eq!(match_keyword(&action, Some("perc")), Some(SECTION_TOOLTIP));
        // "zq" is nowhere: two characters never reach the tooltip
        let action = action.with_tooltip("zq");
        assert_eq!(match_keyword(&action, Some("zq")), None);
    }

    #[test]
    fn fuzzy_is_last_resort() {
        assert_eq!(section("Color Reduction...", "crdn"), Some(SECTION_FUZZY));
        assert_eq!(section("Color Reduction...", "xyz"), None);
    }

    #[test]
    fn absent_keyword_matches_everything() {
        let action = Action::new("blank", "");
        assert_eq!(match_keyword(&action, None), Some(SECTION_HISTORY));
        assert_eq!(match_keyword(&action, Some("a")), None);
    }
}
