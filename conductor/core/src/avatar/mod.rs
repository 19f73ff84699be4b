//! Character State Machine
//!
//! Baron's behavioural mode. The Conductor owns the state and drives it with
//! [`CharacterTrigger`]s; surfaces read the state (or the [`Presentation`]
//! derived from it) and draw whatever they like.
//!
//! ```text
//!            FocusGained             SubmissionAccepted
//!   Idle ──────────────► Listening ─────────────────────► Thinking
//!    ▲  ◄──────────────                                     │ ReplyReady
//!    │     FocusLost                                         ▼
//!    │                         MixSkipped                 Talking
//!    ├───────────────────────────────────────────────────────┤ MixingStarted
//!    │ ServingElapsed                                        ▼
//!  Serving ◄──────────────── ArtifactReady ─────────────── Mixing
//! ```
//!
//! `Failure` returns to `Idle` from anywhere. There are no timers in here: the
//! Conductor decides when a trigger fires.

pub mod portrait;

pub use portrait::{render_portrait, PortraitSize};

use serde::{Deserialize, Serialize};

/// What Baron is doing
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharacterState {
    /// Waiting behind the bar
    #[default]
    Idle,
    /// The input has focus
    Listening,
    /// Waiting on the reply
    Thinking,
    /// Reply delivered
    Talking,
    /// Shaking a drink
    Mixing,
    /// Drink on the bar
    Serving,
}

impl CharacterState {
    /// Whether a new submission may start from this state
    #[must_use]
    pub const fn accepts_submission(self) -> bool {
        matches!(self, Self::Idle | Self::Listening)
    }

    /// Whether a turn is in flight
    #[must_use]
    pub const fn is_busy(self) -> bool {
        matches!(self, Self::Thinking | Self::Mixing | Self::Serving)
    }

    /// Lowercase name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Listening => "listening",
            Self::Thinking => "thinking",
            Self::Talking => "talking",
            Self::Mixing => "mixing",
            Self::Serving => "serving",
        }
    }
}

impl std::fmt::Display for CharacterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Events that can move the state machine
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CharacterTrigger {
    /// Input gained focus
    FocusGained,
    /// Input lost focus
    FocusLost,
    /// A submission passed its preconditions
    SubmissionAccepted,
    /// The reply collaborator answered
    ReplyReady,
    /// The mix step began
    MixingStarted,
    /// The mix step finished and its pacing elapsed
    ArtifactReady,
    /// The serving pause elapsed
    ServingElapsed,
    /// The mix policy declined to mix this turn
    MixSkipped,
    /// A collaborator failed
    Failure,
}

/// State machine for Baron
#[derive(Clone, Debug, Default)]
pub struct CharacterStateMachine {
    state: CharacterState,
}

impl CharacterStateMachine {
    /// Start in `Idle`
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> CharacterState {
        self.state
    }

    /// Apply a trigger
    ///
    /// Returns the new state, or `None` when the trigger does not apply to
    /// the current state (the state is left unchanged).
    pub fn trigger(&mut self, trigger: CharacterTrigger) -> Option<CharacterState> {
        let next = Self::next_state(self.state, trigger)?;
        tracing::debug!(from = %self.state, to = %next, ?trigger, "Character transition");
        self.state = next;
        Some(next)
    }

    /// Transition table
    #[must_use]
    pub const fn next_state(
        current: CharacterState,
        trigger: CharacterTrigger,
    ) -> Option<CharacterState> {
        use CharacterState::{Idle, Listening, Mixing, Serving, Talking, Thinking};
        use CharacterTrigger::{
            ArtifactReady, Failure, FocusGained, FocusLost, MixSkipped, MixingStarted, ReplyReady,
            ServingElapsed, SubmissionAccepted,
        };

        match (current, trigger) {
            (_, Failure) => Some(Idle),
            (Idle, FocusGained) => Some(Listening),
            (Listening, FocusLost) => Some(Idle),
            (Idle | Listening, SubmissionAccepted) => Some(Thinking),
            (Thinking, ReplyReady) => Some(Talking),
            (Talking, MixingStarted) => Some(Mixing),
            (Talking, MixSkipped) => Some(Idle),
            (Mixing, ArtifactReady) => Some(Serving),
            (Serving, ServingElapsed) => Some(Idle),
            _ => None,
        }
    }
}

/// Status badge shown next to the portrait
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Badge {
    /// "Mixing"
    Mixing,
    /// "..."
    Ellipsis,
}

impl Badge {
    /// Badge text
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Mixing => "Mixing",
            Self::Ellipsis => "...",
        }
    }
}

/// Presentation flags, a pure function of the state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct Presentation {
    /// Eyes blink
    pub blinking: bool,
    /// Left ear twitches
    pub ear_twitch: bool,
    /// Pupils drift side to side
    pub pupil_drift: bool,
    /// Mouth moves
    pub mouth_moving: bool,
    /// Shaker overlay is drawn and the portrait shakes
    pub shaker: bool,
    /// Status badge
    pub badge: Option<Badge>,
}

impl Presentation {
    /// Flags for a state
    #[must_use]
    pub const fn for_state(state: CharacterState) -> Self {
        let mixing = matches!(state, CharacterState::Mixing);
        let thinking = matches!(state, CharacterState::Thinking);
        let listening = matches!(state, CharacterState::Listening);

        Self {
            blinking: !mixing && !thinking,
            ear_twitch: listening,
            pupil_drift: listening,
            mouth_moving: matches!(state, CharacterState::Talking),
            shaker: mixing,
            badge: if mixing {
                Some(Badge::Mixing)
            } else if thinking {
                Some(Badge::Ellipsis)
            } else {
                None
            },
        }
    }
}

impl From<CharacterState> for Presentation {
    fn from(state: CharacterState) -> Self {
        Self::for_state(state)
    }
}
