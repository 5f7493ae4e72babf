//! Game-data bundle: every situation plus the translation table.

use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;

use crossroads_core::error::DomainError;
use serde::Deserialize;
use sha2::{Digest, Sha256};

use super::situation::Situation;
use super::translations::{TranslationEntry, Translations};

const DEFAULT_LEVEL: u32 = 1;

fn default_level() -> u32 {
    DEFAULT_LEVEL
}

/// Serialized layout of the host payload.
#[derive(Debug, Deserialize)]
struct GameData {
    content: Vec<Situation>,
    #[serde(default)]
    translations: Vec<TranslationEntry>,
    #[serde(default = "default_level")]
    level: u32,
}

/// Text encoding of a bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BundleFormat {
    Json,
    Yaml,
}

impl BundleFormat {
    /// Picks the format from a file extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

/// Validated, immutable game content.
#[derive(Debug, Clone)]
pub struct ContentBundle {
    situations: Vec<Arc<Situation>>,
    translations: Arc<Translations>,
    level: u32,
    fingerprint: String,
}

impl ContentBundle {
    /// Parses and validates a bundle.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Content` if the text does not decode and
    /// `DomainError::Validation` if any situation breaks an authoring
    /// invariant.
    pub fn parse(raw: &str, format: BundleFormat) -> Result<Self, DomainError> {
        let data: GameData = match format {
            BundleFormat::Json => serde_json::from_str(raw)
                .map_err(|e| DomainError::Content(format!("invalid JSON game data: {e}")))?,
            BundleFormat::Yaml => serde_yaml::from_str(raw)
                .map_err(|e| DomainError::Content(format!("invalid YAML game data: {e}")))?,
        };

        for situation in &data.content {
            situation.validate()?;
        }

        Ok(Self {
            situations: data.content.into_iter().map(Arc::new).collect(),
            translations: Arc::new(data.translations.into_iter().collect()),
            level: data.level,
            fingerprint: fingerprint(raw),
        })
    }

    /// Builds a bundle from already-decoded parts.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if any situation breaks an authoring
    /// invariant.
    pub fn from_parts(
        situations: Vec<Situation>,
        translations: Translations,
        level: u32,
    ) -> Result<Self, DomainError> {
        for situation in &situations {
            situation.validate()?;
        }
        let fingerprint = fingerprint(&format!("{situations:?}"));
        Ok(Self {
            situations: situations.into_iter().map(Arc::new).collect(),
            translations: Arc::new(translations),
            level,
            fingerprint,
        })
    }

    /// Returns the situation at `index`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SituationNotFound` if `index` is out of range.
    pub fn situation(&self, index: usize) -> Result<&Arc<Situation>, DomainError> {
        self.situations
            .get(index)
            .ok_or(DomainError::SituationNotFound(index))
    }

    #[must_use]
    pub fn situations(&self) -> &[Arc<Situation>] {
        &self.situations
    }

    #[must_use]
    pub fn translations(&self) -> &Arc<Translations> {
        &self.translations
    }

    #[must_use]
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Hex SHA-256 of the source text; identifies the content version.
    #[must_use]
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.situations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.situations.is_empty()
    }
}

fn fingerprint(raw: &str) -> String {
    Sha256::digest(raw.as_bytes())
        .iter()
        .fold(String::with_capacity(64), |mut acc, byte| {
            let _ = write!(acc, "{byte:02x}");
            acc
        })
}
