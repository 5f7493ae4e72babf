//! Situation and content fixtures.

use crossroads_content::domain::bundle::ContentBundle;
use crossroads_content::domain::situation::{
    AvatarPose, Reaction, SceneElement, SceneElementKind, Situation, Step, StepKind,
};
use crossroads_content::domain::translations::Translations;

/// A sprite at `position`.
#[must_use]
pub fn sprite(key: &str, position: [f32; 2]) -> SceneElement {
    SceneElement {
        visual_key: Some(key.to_owned()),
        kind: SceneElementKind::Sprite,
        position: Some(position),
        scale: None,
        flipped: false,
        pose: None,
    }
}

/// An avatar in `pose` at `position`.
#[must_use]
pub fn avatar(key: &str, pose: AvatarPose, position: [f32; 2]) -> SceneElement {
    SceneElement {
        visual_key: Some(key.to_owned()),
        kind: SceneElementKind::Avatar,
        position: Some(position),
        scale: Some(0.8),
        flipped: false,
        pose: Some(pose),
    }
}

/// A step of `kind` showing `text_key`.
#[must_use]
pub fn step(kind: StepKind, text_key: &str) -> Step {
    Step {
        kind,
        text_key: text_key.to_owned(),
        arrow_offset: None,
        scene_override: None,
    }
}

fn reaction(correct: bool, suffix: &str, scene: Vec<SceneElement>) -> Reaction {
    Reaction {
        correct,
        text: format!("reaction-{suffix}"),
        scene,
        confirm_text: format!("confirm-{suffix}"),
        yes_text: format!("yes-{suffix}"),
        no_text: format!("no-{suffix}"),
        confirm_image: None,
    }
}

/// Caption "a", speech "b", options x/y where only y is right.
#[must_use]
pub fn scenario_situation() -> Situation {
    let mut speech = step(StepKind::Speech, "b");
    speech.arrow_offset = Some(25.0);
    Situation {
        header: "situation-1-header".to_owned(),
        position: [0.25, 0.75],
        description: "situation-1-description".to_owned(),
        sequence: vec![step(StepKind::Caption, "a"), speech],
        default_scene: vec![
            sprite("warehouse", [0.5, 0.5]),
            avatar("colleague", AvatarPose::Angry, [0.7, 0.6]),
        ],
        situation_speech: Some("situation-1-speech".to_owned()),
        options: vec!["x".to_owned(), "y".to_owned()],
        reactions: vec![
            reaction(false, "x", vec![sprite("broken-pallet", [0.5, 0.5])]),
            reaction(true, "y", vec![sprite("handshake", [0.5, 0.5])]),
        ],
    }
}

/// Caption, speech with a scene override, then an image step.
#[must_use]
pub fn three_step_situation() -> Situation {
    let mut speech = step(StepKind::Speech, "question");
    speech.arrow_offset = Some(60.0);
    speech.scene_override = Some(vec![avatar("manager", AvatarPose::Front, [0.4, 0.6])]);
    Situation {
        header: "situation-2-header".to_owned(),
        position: [0.6, 0.3],
        description: "situation-2-description".to_owned(),
        sequence: vec![
            step(StepKind::Caption, "intro"),
            speech,
            step(StepKind::Image, "flashback"),
        ],
        default_scene: vec![sprite("office", [0.5, 0.5])],
        situation_speech: None,
        options: vec!["x".to_owned(), "y".to_owned()],
        reactions: vec![
            reaction(true, "x", Vec::new()),
            reaction(false, "y", vec![sprite("slammed-door", [0.5, 0.5])]),
        ],
    }
}

/// Translations for both fixture situations and the fixed UI keys.
#[must_use]
pub fn scenario_translations() -> Translations {
    [
        ("situation-1-header", "Blocked loading bay"),
        ("situation-1-description", "A colleague parked a pallet in your bay."),
        ("situation-1-speech", "What do you do?"),
        ("situation-2-header", "Late delivery"),
        ("situation-2-description", "The manager wants answers."),
        ("a", "The truck is late."),
        ("b", "Who moved my pallet?"),
        ("intro", "Monday morning."),
        ("question", "Why is this late again?"),
        ("x", "Shout at them"),
        ("y", "Ask calmly"),
        ("confirm-x", "Are you sure you want to shout?"),
        ("confirm-y", "Are you sure you want to ask calmly?"),
        ("yes-x", "It gets results."),
        ("no-x", "It might escalate."),
        ("yes-y", "Staying calm helps."),
        ("no-y", "They might ignore you."),
        (
            "reaction-x",
            "That escalated quickly.\nTry a calmer approach.",
        ),
        ("reaction-y", "Well done.\nThey apologise and move the pallet."),
        ("yes", "Yes"),
        ("no", "No"),
        ("right-option", "Right option!"),
        ("try-again-button", "Try again"),
        ("replay-button", "Replay"),
    ]
    .into_iter()
    .collect()
}

/// A two-situation bundle at level 1.
///
/// # Panics
///
/// Panics if the fixture situations break a content invariant.
#[must_use]
pub fn scenario_bundle() -> ContentBundle {
    ContentBundle::from_parts(
        vec![scenario_situation(), three_step_situation()],
        scenario_translations(),
        1,
    )
    .expect("fixture situations are valid")
}
