//! Loads the game-data bundle that ships with the server.

use std::path::Path;

use crossroads_core::error::DomainError;
use tracing::info;

use crate::domain::bundle::{BundleFormat, ContentBundle};

/// Reads and validates the bundle at `path`; the extension selects JSON or
/// YAML decoding.
///
/// # Errors
///
/// Returns `DomainError::Content` for an unsupported extension or undecodable
/// text, `DomainError::Validation` for authoring defects, and
/// `DomainError::Infrastructure` if the file cannot be read.
pub async fn load_bundle(path: &Path) -> Result<ContentBundle, DomainError> {
    let format = BundleFormat::from_path(path).ok_or_else(|| {
        DomainError::Content(format!(
            "unsupported game data extension: {}",
            path.display()
        ))
    })?;

    let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
        DomainError::Infrastructure(format!("failed to read {}: {e}", path.display()))
    })?;

    let bundle = ContentBundle::parse(&raw, format)?;
    info!(
        path = %path.display(),
        situations = bundle.len(),
        level = bundle.level(),
        fingerprint = bundle.fingerprint(),
        "game data loaded"
    );
    Ok(bundle)
}
