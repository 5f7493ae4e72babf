//! Scene composition.
//!
//! The visible scene is always a complete snapshot: an override replaces the
//! situation's default scene wholesale and overrides are never layered.

use crossroads_content::domain::situation::SceneElement;
use serde::Serialize;

/// Where the visible scene came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "source", content = "index", rename_all = "snake_case")]
pub enum SceneSource {
    /// The situation's default scene.
    Default,
    /// The override carried by the step at this index.
    Step(usize),
    /// The scene of the reaction to the option at this index.
    Reaction(usize),
}

/// An override that is currently in force.
#[derive(Debug, Clone, Copy)]
pub struct SceneOverride<'a> {
    pub source: SceneSource,
    pub elements: &'a [SceneElement],
}

/// The resolved set of visible elements.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisibleScene {
    #[serde(flatten)]
    pub source: SceneSource,
    pub elements: Vec<SceneElement>,
}

/// Resolves the visible scene from the base scene and the active override.
#[must_use]
pub fn resolve(base: &[SceneElement], active: Option<SceneOverride<'_>>) -> VisibleScene {
    match active {
        Some(active) => VisibleScene {
            source: active.source,
            elements: active.elements.to_vec(),
        },
        None => VisibleScene {
            source: SceneSource::Default,
            elements: base.to_vec(),
        },
    }
}
