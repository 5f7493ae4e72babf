//! Situation script data.
//!
//! Field names on the wire follow the host's game-data payload (`type`,
//! `text`, `balloonArrowPos`, `scene`, ...); the Rust names describe what the
//! fields mean to the engine.

use crossroads_core::error::DomainError;
use serde::{Deserialize, Serialize};

/// One conflict scenario on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Situation {
    /// Display-key of the situation title.
    pub header: String,
    /// Marker position on the map, in world coordinates.
    #[serde(default)]
    pub position: [f32; 2],
    /// Display-key of the question shown above the options.
    #[serde(default)]
    pub description: String,
    /// The scripted steps, played from index 0 on every (re)play.
    pub sequence: Vec<Step>,
    /// Scene shown when no override is active.
    #[serde(rename = "scene", default)]
    pub default_scene: Vec<SceneElement>,
    /// Display-key of an optional spoken summary of the situation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub situation_speech: Option<String>,
    /// Display-keys of the answer choices, addressed by index only.
    pub options: Vec<String>,
    /// One reaction per option, index-aligned with `options`.
    pub reactions: Vec<Reaction>,
}

impl Situation {
    /// Returns the reaction paired with the option at `option`.
    #[must_use]
    pub fn reaction_for(&self, option: usize) -> Option<&Reaction> {
        self.reactions.get(option)
    }

    /// Number of selectable options.
    #[must_use]
    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    /// Checks the authoring invariants the engine relies on.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the reactions are not index-aligned
    /// with the options or if there is nothing to choose from.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.options.is_empty() {
            return Err(DomainError::Validation(format!(
                "situation '{}' has no options",
                self.header
            )));
        }
        if self.reactions.len() != self.options.len() {
            return Err(DomainError::Validation(format!(
                "situation '{}' has {} options but {} reactions",
                self.header,
                self.options.len(),
                self.reactions.len()
            )));
        }
        Ok(())
    }
}

/// How a step is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    /// Narrator text revealed letter by letter.
    Caption,
    /// Dialogue spoken by a character, with a speech arrow.
    Speech,
    /// A scene change without text.
    Image,
}

impl StepKind {
    /// Whether the step puts text in the dialogue balloon.
    #[must_use]
    pub fn has_text(self) -> bool {
        !matches!(self, Self::Image)
    }
}

/// One element of a situation's scripted sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Presentation kind.
    #[serde(rename = "type")]
    pub kind: StepKind,
    /// Display-key of the balloon text; unused for image steps.
    #[serde(rename = "text", default)]
    pub text_key: String,
    /// Horizontal offset of the speech arrow, as a percentage from the right.
    #[serde(
        rename = "balloonArrowPos",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub arrow_offset: Option<f32>,
    /// Scene that replaces the active one from this step onwards.
    #[serde(rename = "scene", default, skip_serializing_if = "Option::is_none")]
    pub scene_override: Option<Vec<SceneElement>>,
}

/// Rendering kind of a scene element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneElementKind {
    /// A static image.
    #[default]
    Sprite,
    /// The player's chosen avatar.
    Avatar,
}

/// Avatar pose variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AvatarPose {
    Angle,
    Front,
    Side,
    Angry,
}

/// A placed visual in a scene. Elements are values; scenes are replaced
/// wholesale, never edited in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneElement {
    /// Asset identifier.
    #[serde(rename = "image", default, skip_serializing_if = "Option::is_none")]
    pub visual_key: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: SceneElementKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<[f32; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f32>,
    #[serde(default)]
    pub flipped: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pose: Option<AvatarPose>,
}

/// The consequence of picking one option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reaction {
    /// Whether this is the right decision.
    pub correct: bool,
    /// Display-key of the outcome explanation; paragraphs are newline-separated.
    pub text: String,
    /// Scene shown once the choice is confirmed.
    #[serde(default)]
    pub scene: Vec<SceneElement>,
    /// Display-key of the "are you sure" prompt.
    pub confirm_text: String,
    /// Display-key of the motivation next to the yes button.
    pub yes_text: String,
    /// Display-key of the motivation next to the no button.
    pub no_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirm_image: Option<String>,
}
