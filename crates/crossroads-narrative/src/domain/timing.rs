//! How long a step holds the stage.
//!
//! Reading time scales with the length of the localized text so long lines
//! are never cut short; image steps are pure scene transitions.

use crossroads_content::domain::situation::StepKind;

/// Reveal speed of letter-by-letter captions, in seconds per character.
pub const CAPTION_SECONDS_PER_CHAR: f64 = 0.045;

/// Pace of spoken dialogue, in seconds per character.
pub const SPEECH_SECONDS_PER_CHAR: f64 = 0.065;

/// Fixed transition time of an image step.
pub const IMAGE_TRANSITION_SECONDS: f64 = 0.25;

/// Display duration, in seconds, of `text` presented as `kind`.
///
/// Length is counted in characters, not bytes.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn duration(text: &str, kind: StepKind) -> f64 {
    let len = text.chars().count() as f64;
    match kind {
        StepKind::Caption => len * CAPTION_SECONDS_PER_CHAR,
        StepKind::Speech => len * SPEECH_SECONDS_PER_CHAR,
        StepKind::Image => IMAGE_TRANSITION_SECONDS,
    }
}
