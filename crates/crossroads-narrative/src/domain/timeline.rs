//! Sequence timeline player.
//!
//! A play schedule is a finite, time-ordered list of cues plus named
//! checkpoints (`seq-0 .. seq-(n-1)` for the steps and `end`). The player
//! moves a playhead over the schedule and hands back every cue it passes.
//! Time only moves when the host reports elapsed animation time or when a
//! skip/seek jumps the playhead forward.
//!
//! Each (re)start bumps the schedule [`Generation`]; cues carry the
//! generation they were produced under and [`TimelinePlayer::accepts`] rejects
//! anything from an older one, so a cancelled schedule can never touch state
//! owned by a newer one.

use std::fmt;

use crossroads_content::domain::situation::{Step, StepKind};
use crossroads_content::domain::translations::Translations;
use serde::Serialize;
use tracing::debug;

use super::timing::duration;

/// Extra hold after a caption so the reader can finish.
pub const CAPTION_HOLD_SECONDS: f64 = 3.0;
/// Pause between the last step and the balloon fade.
pub const OUTRO_DELAY_SECONDS: f64 = 1.0;
/// Fade-out of the dialogue balloon after the last step.
pub const BALLOON_FADE_SECONDS: f64 = 0.5;
/// Slide-in of the decision panel.
pub const PANEL_SLIDE_SECONDS: f64 = 0.5;

/// A named position on the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Checkpoint {
    /// Start of the step at this index.
    Step(usize),
    /// Terminal checkpoint: the decision panel is on screen.
    End,
}

impl Checkpoint {
    /// The step index, if this is a step checkpoint.
    #[must_use]
    pub fn step_index(self) -> Option<usize> {
        match self {
            Self::Step(index) => Some(index),
            Self::End => None,
        }
    }
}

impl fmt::Display for Checkpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Step(index) => write!(f, "seq-{index}"),
            Self::End => f.write_str("end"),
        }
    }
}

impl Serialize for Checkpoint {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Identifies one build of the schedule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Generation(u64);

impl Generation {
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }

    fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// What happens when the playhead passes a cue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CueKind {
    /// The step at this index takes the stage.
    StepStarted(usize),
    /// The dialogue balloon has faded out.
    BalloonHidden,
    /// The decision panel starts sliding in.
    DecisionPanelRevealed,
    /// The schedule has played to its end.
    Completed,
}

/// A timed effect handed to the session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cue {
    pub generation: Generation,
    /// Schedule time in seconds.
    pub at: f64,
    pub kind: CueKind,
}

#[derive(Debug, Clone, Copy)]
struct Label {
    checkpoint: Checkpoint,
    at: f64,
}

/// Text reveal window of one step.
#[derive(Debug, Clone, Copy)]
struct Reveal {
    start: f64,
    duration: f64,
    typed: bool,
}

#[derive(Debug, Clone)]
struct Schedule {
    cues: Vec<(f64, CueKind)>,
    labels: Vec<Label>,
    reveals: Vec<Reveal>,
    total: f64,
}

impl Schedule {
    fn build(steps: &[Step], translations: &Translations) -> Self {
        let mut cues = Vec::with_capacity(steps.len() + 4);
        let mut labels = Vec::with_capacity(steps.len() + 1);
        let mut reveals = Vec::with_capacity(steps.len());
        let mut t = 0.0;

        for (index, step) in steps.iter().enumerate() {
            labels.push(Label {
                checkpoint: Checkpoint::Step(index),
                at: t,
            });
            cues.push((t, CueKind::StepStarted(index)));

            let text = translations.resolve(&step.text_key);
            let d = duration(text, step.kind);
            reveals.push(Reveal {
                start: t,
                duration: d,
                typed: step.kind == StepKind::Caption,
            });

            match step.kind {
                StepKind::Caption => t += d + CAPTION_HOLD_SECONDS,
                StepKind::Speech => t += d,
                StepKind::Image => {
                    t += d;
                    cues.push((t, CueKind::BalloonHidden));
                }
            }
        }

        t += OUTRO_DELAY_SECONDS + BALLOON_FADE_SECONDS;
        cues.push((t, CueKind::BalloonHidden));
        cues.push((t, CueKind::DecisionPanelRevealed));
        t += PANEL_SLIDE_SECONDS;
        cues.push((t, CueKind::Completed));
        labels.push(Label {
            checkpoint: Checkpoint::End,
            at: t,
        });

        Self {
            cues,
            labels,
            reveals,
            total: t,
        }
    }

    fn label_at(&self, checkpoint: Checkpoint) -> Option<f64> {
        self.labels
            .iter()
            .find(|label| label.checkpoint == checkpoint)
            .map(|label| label.at)
    }
}

/// Plays one schedule at a time.
#[derive(Debug, Clone, Default)]
pub struct TimelinePlayer {
    generation: Generation,
    schedule: Option<Schedule>,
    playhead: f64,
    next_cue: usize,
}

impl TimelinePlayer {
    /// Creates an idle player with no schedule.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancels any live schedule, builds a new one from step 0 and returns
    /// the cues due at time zero.
    pub fn start(&mut self, steps: &[Step], translations: &Translations) -> Vec<Cue> {
        self.cancel();
        let schedule = Schedule::build(steps, translations);
        debug!(
            generation = self.generation.value(),
            steps = steps.len(),
            total_secs = schedule.total,
            "timeline schedule built"
        );
        self.schedule = Some(schedule);
        self.drain_due()
    }

    /// Drops the live schedule. Cues already handed out become stale.
    pub fn cancel(&mut self) {
        self.generation = self.generation.next();
        self.schedule = None;
        self.playhead = 0.0;
        self.next_cue = 0;
    }

    /// Moves the playhead forward by `elapsed` seconds.
    ///
    /// Negative or non-finite deltas are ignored.
    pub fn advance(&mut self, elapsed: f64) -> Vec<Cue> {
        if !elapsed.is_finite() || elapsed <= 0.0 {
            return Vec::new();
        }
        let target = self.playhead + elapsed;
        self.seek(target)
    }

    /// Jumps from the current step checkpoint `seq-k` to `seq-(k+1)`, or to
    /// the end when `seq-k` is the last step. Does nothing when no step
    /// checkpoint is current.
    pub fn skip_to_next(&mut self) -> Vec<Cue> {
        let Some(current) = self.current_checkpoint().and_then(Checkpoint::step_index) else {
            debug!("skip ignored: no step checkpoint is current");
            return Vec::new();
        };
        let Some(schedule) = &self.schedule else {
            return Vec::new();
        };
        let target = schedule
            .label_at(Checkpoint::Step(current + 1))
            .unwrap_or(schedule.total);
        self.seek(target)
    }

    /// Jumps straight to `end`, firing every cue on the way.
    pub fn seek_to_end(&mut self) -> Vec<Cue> {
        let Some(total) = self.total() else {
            return Vec::new();
        };
        self.seek(total)
    }

    /// Most recent checkpoint at or before the playhead.
    #[must_use]
    pub fn current_checkpoint(&self) -> Option<Checkpoint> {
        self.schedule.as_ref().and_then(|schedule| {
            schedule
                .labels
                .iter()
                .take_while(|label| label.at <= self.playhead)
                .last()
                .map(|label| label.checkpoint)
        })
    }

    /// Whether `cue` belongs to the live schedule.
    #[must_use]
    pub fn accepts(&self, cue: &Cue) -> bool {
        self.schedule.is_some() && cue.generation == self.generation
    }

    /// Fraction of the step's text that is revealed, in `0.0..=1.0`.
    ///
    /// Captions type out over their duration; speech shows its text at once.
    #[must_use]
    pub fn reveal_progress(&self, step: usize) -> f64 {
        let Some(reveal) = self
            .schedule
            .as_ref()
            .and_then(|schedule| schedule.reveals.get(step))
        else {
            return 0.0;
        };
        if self.playhead < reveal.start {
            return 0.0;
        }
        if !reveal.typed || reveal.duration <= 0.0 {
            return 1.0;
        }
        ((self.playhead - reveal.start) / reveal.duration).clamp(0.0, 1.0)
    }

    #[must_use]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    #[must_use]
    pub fn playhead(&self) -> f64 {
        self.playhead
    }

    /// Whether a schedule exists.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.schedule.is_some()
    }

    /// Whether the live schedule has played to its end.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.schedule
            .as_ref()
            .is_some_and(|schedule| self.next_cue >= schedule.cues.len())
    }

    /// Total length of the live schedule in seconds.
    #[must_use]
    pub fn total(&self) -> Option<f64> {
        self.schedule.as_ref().map(|schedule| schedule.total)
    }

    // Forward only: a target behind the playhead still fires nothing.
    fn seek(&mut self, target: f64) -> Vec<Cue> {
        let Some(schedule) = &self.schedule else {
            return Vec::new();
        };
        let target = target.min(schedule.total);
        if target > self.playhead {
            self.playhead = target;
        }
        self.drain_due()
    }

    fn drain_due(&mut self) -> Vec<Cue> {
        let Some(schedule) = &self.schedule else {
            return Vec::new();
        };
        let mut due = Vec::new();
        while let Some(&(at, kind)) = schedule.cues.get(self.next_cue) {
            if at > self.playhead {
                break;
            }
            due.push(Cue {
                generation: self.generation,
                at,
                kind,
            });
            self.next_cue += 1;
        }
        due
    }
}
