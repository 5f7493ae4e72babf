//! Query handlers for the conflict interaction.
//!
//! Builds the read-only render view of a session; every display-key is
//! translated here.

use crossroads_content::domain::situation::StepKind;
use crossroads_content::domain::translations::{
    NO_KEY, REPLAY_KEY, RIGHT_OPTION_KEY, TRY_AGAIN_KEY, Translations, YES_KEY,
};
use crossroads_core::aggregate::AggregateRoot;
use crossroads_core::error::DomainError;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::aggregates::{ConflictSession, InteractionPhase};
use crate::domain::scene::VisibleScene;
use crate::domain::timeline::Checkpoint;

/// Read-only view of the dialogue balloon.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalloonView {
    pub visible: bool,
    pub kind: Option<StepKind>,
    /// Full translated text of the current step.
    pub text: Option<String>,
    /// Number of characters typed out so far.
    pub revealed_chars: usize,
    pub arrow_visible: bool,
    pub arrow_offset: Option<f32>,
}

/// How an option is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionStatus {
    Open,
    Selected,
    Correct,
    Wrong,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionView {
    pub index: usize,
    pub text: String,
    pub status: OptionStatus,
}

/// Reaction panel content.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReactionView {
    /// "Are you sure?" prompt for the selected option.
    Confirmation {
        prompt: String,
        yes_label: String,
        yes_motivation: String,
        no_label: String,
        no_motivation: String,
        image: Option<String>,
    },
    /// Outcome of the confirmed option.
    Outcome {
        correct: bool,
        banner: Option<String>,
        paragraphs: Vec<String>,
        try_again_label: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlsView {
    pub replay_visible: bool,
    pub replay_label: String,
    pub next_visible: bool,
}

/// Read-only render view of a conflict session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub situation_index: usize,
    pub header: String,
    pub description: String,
    pub phase: InteractionPhase,
    pub balloon: BalloonView,
    pub scene: VisibleScene,
    pub decision_panel_visible: bool,
    /// Speech shown above the options while the panel is up.
    pub situation_speech: Option<String>,
    pub options: Vec<OptionView>,
    pub reaction: Option<ReactionView>,
    pub controls: ControlsView,
    pub checkpoint: Option<Checkpoint>,
    /// Current version (event count).
    pub version: i64,
}

/// Renders the active session.
///
/// # Errors
///
/// Returns `DomainError::NoActiveSession` if no situation is open.
pub fn get_session_view(session: Option<&ConflictSession>) -> Result<SessionView, DomainError> {
    let session = session.ok_or(DomainError::NoActiveSession)?;
    let situation = session.situation();
    let translations = session.translations();
    let stage = session.stage();
    let selected = session.selected_option();

    Ok(SessionView {
        session_id: session.aggregate_id(),
        situation_index: session.situation_index(),
        header: translations.resolve(&situation.header).to_owned(),
        description: translations.resolve(&situation.description).to_owned(),
        phase: session.phase(),
        balloon: balloon_view(session),
        scene: session.scene().clone(),
        decision_panel_visible: stage.decision_panel_visible,
        situation_speech: situation
            .situation_speech
            .as_deref()
            .filter(|_| stage.decision_panel_visible)
            .map(|key| translations.resolve(key).to_owned()),
        options: option_views(session),
        reaction: reaction_view(session),
        controls: ControlsView {
            replay_visible: selected.is_none() && session.phase() != InteractionPhase::Closed,
            replay_label: translations.resolve(REPLAY_KEY).to_owned(),
            next_visible: selected.is_none() && stage.next_visible,
        },
        checkpoint: session.checkpoint(),
        version: session.version(),
    })
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
fn revealed_chars(total: usize, progress: f64) -> usize {
    ((total as f64) * progress).floor() as usize
}

fn balloon_view(session: &ConflictSession) -> BalloonView {
    let balloon = &session.stage().balloon;
    let step = balloon
        .step
        .and_then(|index| session.situation().sequence.get(index).map(|step| (index, step)));

    let (kind, text, revealed) = match step {
        Some((index, step)) => {
            let text = session.translations().resolve(&step.text_key);
            let revealed = revealed_chars(text.chars().count(), session.reveal_progress(index));
            (Some(step.kind), Some(text.to_owned()), revealed)
        }
        None => (None, None, 0),
    };

    BalloonView {
        visible: balloon.visible,
        kind,
        text,
        revealed_chars: revealed,
        arrow_visible: balloon.arrow_visible,
        arrow_offset: balloon.arrow_offset,
    }
}

fn option_views(session: &ConflictSession) -> Vec<OptionView> {
    let situation = session.situation();
    let translations = session.translations();
    let view = |index: usize, status: OptionStatus| OptionView {
        index,
        text: translations.resolve(&situation.options[index]).to_owned(),
        status,
    };

    match session.selected_option() {
        None => (0..situation.options.len())
            .map(|index| view(index, OptionStatus::Open))
            .collect(),
        Some(index) if index < situation.options.len() => {
            let status = match session.phase() {
                InteractionPhase::Resolved { correct: true, .. } => OptionStatus::Correct,
                InteractionPhase::Resolved { correct: false, .. } => OptionStatus::Wrong,
                _ => OptionStatus::Selected,
            };
            vec![view(index, status)]
        }
        Some(_) => Vec::new(),
    }
}

fn reaction_view(session: &ConflictSession) -> Option<ReactionView> {
    let translations = session.translations();
    match session.phase() {
        InteractionPhase::AwaitingConfirmation { option } => {
            let reaction = session.situation().reaction_for(option)?;
            Some(ReactionView::Confirmation {
                prompt: translations.resolve(&reaction.confirm_text).to_owned(),
                yes_label: translations.resolve(YES_KEY).to_owned(),
                yes_motivation: translations.resolve(&reaction.yes_text).to_owned(),
                no_label: translations.resolve(NO_KEY).to_owned(),
                no_motivation: translations.resolve(&reaction.no_text).to_owned(),
                image: reaction.confirm_image.clone(),
            })
        }
        InteractionPhase::Resolved { option, correct } => {
            let reaction = session.situation().reaction_for(option)?;
            Some(ReactionView::Outcome {
                correct,
                banner: correct.then(|| translations.resolve(RIGHT_OPTION_KEY).to_owned()),
                paragraphs: paragraphs(translations, &reaction.text),
                try_again_label: (!correct)
                    .then(|| translations.resolve(TRY_AGAIN_KEY).to_owned()),
            })
        }
        _ => None,
    }
}

fn paragraphs(translations: &Translations, key: &str) -> Vec<String> {
    translations
        .resolve(key)
        .split('\n')
        .map(str::trim)
        .filter(|paragraph| !paragraph.is_empty())
        .map(str::to_owned)
        .collect()
}
