//! Display-key to localized string lookup.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::trace;

/// Key used for the confirmation "yes" button.
pub const YES_KEY: &str = "yes";
/// Key used for the confirmation "no" button.
pub const NO_KEY: &str = "no";
/// Key of the banner shown above a correct outcome.
pub const RIGHT_OPTION_KEY: &str = "right-option";
/// Key of the button that withdraws a wrong answer.
pub const TRY_AGAIN_KEY: &str = "try-again-button";
/// Key of the button that replays the script.
pub const REPLAY_KEY: &str = "replay-button";

/// One entry of the host's translation list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationEntry {
    pub key: String,
    pub value: String,
}

/// A completed translation table.
///
/// Lookups never fail: a key without an entry resolves to itself so that a
/// content gap shows up as raw text instead of breaking the session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Translations {
    entries: HashMap<String, String>,
}

impl Translations {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the localized string for `key`, or `key` itself when missing.
    #[must_use]
    pub fn resolve<'a>(&'a self, key: &'a str) -> &'a str {
        if let Some(value) = self.entries.get(key) {
            value
        } else {
            trace!(key, "missing translation, showing raw key");
            key
        }
    }

    /// Whether `key` has an entry.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<TranslationEntry> for Translations {
    // Later duplicates win, matching how the host folds its list.
    fn from_iter<I: IntoIterator<Item = TranslationEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|e| (e.key, e.value)).collect(),
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Translations {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
