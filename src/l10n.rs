//! Showing language names in their own language.
//!
//! Translations come from a [`MessageCatalog`]. While a name is looked up
//! the process-wide `LANGUAGE` preference is overridden by a
//! [`LanguageScope`], which holds a global lock so concurrent lookups
//! cannot see each other's preference list.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::ffi::OsString;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::language_store::LanguageSink;

pub const LANGUAGE_VAR: &str = "LANGUAGE";

static LOCALE_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

/// Source of translated strings, keyed by language code.
pub trait MessageCatalog {
    /// Translation of `msgid` for exactly `language`, if there is one.
    fn lookup(&self, language: &str, msgid: &str) -> Option<String>;
}

/// Catalog used when no translations are installed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCatalog;

impl MessageCatalog for NoCatalog {
    fn lookup(&self, _language: &str, _msgid: &str) -> Option<String> {
        None
    }
}

/// Translations loaded from a JSON object of the form
/// `{ "fr": { "French": "français" }, ... }`.
#[derive(Debug, Clone, Default)]
pub struct JsonCatalog {
    translations: HashMap<String, HashMap<String, String>>,
}

impl JsonCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let translations: HashMap<String, HashMap<String, String>> = serde_json::from_str(json)?;
        Ok(Self { translations })
    }

    pub fn insert(&mut self, language: &str, msgid: &str, translation: &str) {
        self.translations
            .entry(language.to_string())
            .or_default()
            .insert(msgid.to_string(), translation.to_string());
    }
}

impl MessageCatalog for JsonCatalog {
    fn lookup(&self, language: &str, msgid: &str) -> Option<String> {
        self.translations.get(language)?.get(msgid).cloned()
    }
}

/// The locale the process runs in when no preference overrides it.
pub fn system_default_locale() -> String {
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .filter_map(|key| std::env::var(key).ok())
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
        .unwrap_or_else(|| "C".to_string())
}

/// Catalog keys tried for one locale name: `sr_RS.UTF-8@latin` yields
/// `sr_RS.UTF-8@latin`, `sr_RS`, `sr`.
fn locale_variants(locale: &str) -> Vec<&str> {
    let mut variants = vec![locale];
    let bare = locale
        .split(['.', '@'])
        .next()
        .unwrap_or(locale);
    if bare != locale {
        variants.push(bare);
    }
    if let Some((lang, _region)) = bare.split_once('_') {
        variants.push(lang);
    }
    variants
}

/// Look `msgid` up for each preference in turn. `C` and `POSIX` mean
/// untranslated.
pub fn translate<C: MessageCatalog + ?Sized>(
    catalog: &C,
    preferences: &[String],
    msgid: &str,
) -> Option<String> {
    preferences
        .iter()
        .filter(|p| !p.is_empty() && p.as_str() != "C" && p.as_str() != "POSIX")
        .flat_map(|p| locale_variants(p))
        .find_map(|lang| catalog.lookup(lang, msgid))
}

/// Temporary override of the `LANGUAGE` preference.
///
/// The previous value is restored byte for byte, or the variable removed,
/// when the scope is dropped. Only one scope exists at a time.
pub struct LanguageScope {
    previous: Option<OsString>,
    preferences: Vec<String>,
    _lock: MutexGuard<'static, ()>,
}

impl LanguageScope {
    /// Prefer `code`, then whatever was preferred before, then the system
    /// locale.
    pub fn enter(code: &str) -> Self {
        let lock = LOCALE_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        let previous = std::env::var_os(LANGUAGE_VAR);

        let mut preferences = vec![code.to_string()];
        if let Some(prev) = previous.as_deref().and_then(|v| v.to_str()) {
            preferences.extend(
                prev.split(':')
                    .filter(|p| !p.is_empty())
                    .map(str::to_string),
            );
        }
        preferences.push(system_default_locale());

        std::env::set_var(LANGUAGE_VAR, preferences.join(":"));
        Self {
            previous,
            preferences,
            _lock: lock,
        }
    }

    pub fn preferences(&self) -> &[String] {
        &self.preferences
    }
}

impl Drop for LanguageScope {
    fn drop(&mut self) {
        match &self.previous {
            Some(value) => std::env::set_var(LANGUAGE_VAR, value),
            None => std::env::remove_var(LANGUAGE_VAR),
        }
    }
}

/// Name of the language `code` written in that language, falling back to
/// `name` when no translation is available. Alternate names separated by
/// `;` are reduced to the first.
pub fn localized_name<C: MessageCatalog + ?Sized>(catalog: &C, name: &str, code: &str) -> String {
    let resolved = if code == "en" {
        name.to_string()
    } else {
        let scope = LanguageScope::enter(code);
        translate(catalog, scope.preferences(), name).unwrap_or_else(|| name.to_string())
    };
    match resolved.split_once(';') {
        Some((first, _)) => first.to_string(),
        None => resolved,
    }
}

/// Localize `name` and hand the entry to `sink`. Entries with an empty
/// name or code are dropped.
pub fn add_localized<S, C>(sink: &mut S, catalog: &C, name: &str, code: &str)
where
    S: LanguageSink + ?Sized,
    C: MessageCatalog + ?Sized,
{
    if name.is_empty() || code.is_empty() {
        return;
    }
    let localized = localized_name(catalog, name, code);
    if localized.is_empty() {
        return;
    }
    tracing::debug!(code, name = %localized, "language entry");
    sink.add(&localized, code);
}
