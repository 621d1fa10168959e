pub mod actions;
pub mod history;
pub mod iso_codes;
pub mod l10n;
pub mod language_store;
pub mod logging;
pub mod matcher;
pub mod search;
pub mod settings;

pub use actions::{Action, ActionGroup, ActionKind, ActionRegistry};
pub use history::ActionHistory;
pub use language_store::{LanguageSink, LanguageStore};
pub use search::{search, ActionSearch, SearchResult};
