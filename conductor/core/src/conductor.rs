//! Conductor - The Orchestration Core
//!
//! The Conductor runs the evening at the bar. It orchestrates:
//! - Baron's state machine
//! - The reply and mix collaborators
//! - The paced timeline that turns one submission into a reply, a mix and a
//!   served cocktail
//! - The reveal/whisper flow
//! - Background music
//!
//! # Design Philosophy
//!
//! The Conductor is UI-agnostic. It communicates through:
//! - `ConductorMessage`: Updates sent TO the UI surface
//! - `SurfaceEvent`: Events received FROM the UI surface
//!
//! `Conductor` is a cheap handle; clones share one session. Operations that
//! wait (collaborator calls, pacing beats) never hold the session lock across
//! the wait, so focus, reveal or music toggles can run while a timeline is
//! suspended and observe its intermediate state.
//!
//! # Submission Timeline
//!
//! ```text
//! submit ─► Thinking ─chat─► Talking ─2000ms─► Mixing ─mix─ 3000ms ─► Serving ─5000ms─► Idle
//!                    └──────── any collaborator failure ─────────────────────────────► Idle
//! ```

use std::str::FromStr;
use std::sync::Arc;

use anyhow::Context;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::audio::{AudioHandle, NoAudio};
use crate::avatar::{CharacterState, CharacterTrigger};
use crate::backend::{BackendError, BistroBackend};
use crate::cocktail::Cocktail;
use crate::events::SurfaceEvent;
use crate::messages::{ConductorMessage, MessageId, MessageRole, SessionId};
use crate::narration::{Narration, GREETING};
use crate::pacing::{Beat, Pacer, PacingConfig, TokioPacer};
use crate::session::{HistoryPolicy, Message, Session, SessionSnapshot};

/// Whether a reply is followed by a cocktail
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MixPolicy {
    /// Every reply is followed by a mix
    #[default]
    Always,
    /// Replies only; Baron goes back to idle after talking
    Never,
}

impl MixPolicy {
    /// Config-file spelling
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Never => "never",
        }
    }

    const fn allows_mix(self) -> bool {
        matches!(self, Self::Always)
    }
}

impl FromStr for MixPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "always" => Ok(Self::Always),
            "never" => Ok(Self::Never),
            other => Err(format!(
                "unknown mix policy '{other}' (expected 'always' or 'never')"
            )),
        }
    }
}

/// Conductor configuration
#[derive(Clone, Debug, PartialEq)]
pub struct ConductorConfig {
    /// Timeline delays
    pub pacing: PacingConfig,
    /// Which earlier messages are replayed to the reply collaborator
    pub history_policy: HistoryPolicy,
    /// Most recent history turns to send (0 = unlimited)
    pub max_history_turns: usize,
    /// Whether replies are followed by a mix
    pub mix_policy: MixPolicy,
    /// Longest accepted submission, in characters
    pub max_input_chars: usize,
}

impl Default for ConductorConfig {
    fn default() -> Self {
        Self {
            pacing: PacingConfig::default(),
            history_policy: HistoryPolicy::PlainOnly,
            max_history_turns: 0,
            mix_policy: MixPolicy::Always,
            max_input_chars: 2000,
        }
    }
}

/// Why a submission was ignored
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SubmitRejection {
    /// Nothing but whitespace
    #[error("submission is empty")]
    Empty,

    /// Baron is still busy with the previous guest turn
    #[error("Baron is busy ({0})")]
    Busy(CharacterState),

    /// Longer than the configured maximum
    #[error("submission has {len} characters, the limit is {max}")]
    TooLong {
        /// Submitted length in characters
        len: usize,
        /// Configured maximum
        max: usize,
    },
}

/// How a submission ended
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The timeline ran to the end and Baron is idle again
    Completed {
        /// Baron's reply
        reply: MessageId,
        /// The served cocktail, if one was mixed
        artifact: Option<MessageId>,
    },

    /// Nothing happened
    Ignored(SubmitRejection),

    /// A collaborator failed and the timeline was abandoned
    Aborted,
}

/// How a reveal ended
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    /// A whisper was appended
    Whispered(MessageId),
    /// The card was turned but this cocktail already has a whisper
    DuplicateWhisper,
    /// The card had been turned before
    AlreadyRevealed,
    /// The message is not a cocktail card
    NotAnArtifact,
    /// No such message
    UnknownMessage,
}

/// Messages collected under the session lock, sent once it is released
#[derive(Debug, Default)]
struct Outbox(Vec<ConductorMessage>);

impl Outbox {
    fn push(&mut self, msg: ConductorMessage) {
        self.0.push(msg);
    }

    fn append(&mut self, session: &mut Session, message: Message) -> MessageId {
        let message = session.push(message);
        let id = message.id.clone();
        self.push(ConductorMessage::MessageAppended { message });
        id
    }

    fn trigger(&mut self, session: &mut Session, trigger: CharacterTrigger) {
        if let Some(state) = session.trigger(trigger) {
            self.push(ConductorMessage::State { state });
        }
    }

    fn narrate(&mut self, session: &mut Session, narration: Option<Narration>) {
        session.set_narration(narration);
        self.push(ConductorMessage::Narration {
            text: session.narration_text(),
        });
    }
}

struct Shared<B> {
    config: ConductorConfig,
    backend: Arc<B>,
    pacer: Arc<dyn Pacer>,
    audio: Mutex<Box<dyn AudioHandle>>,
    session: Mutex<Session>,
    tx: mpsc::Sender<ConductorMessage>,
}

/// The Conductor - headless orchestration core
pub struct Conductor<B: BistroBackend> {
    shared: Arc<Shared<B>>,
}

impl<B: BistroBackend> Clone for Conductor<B> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<B: BistroBackend + 'static> Conductor<B> {
    /// Create a Conductor with real-time pacing and no music
    pub fn new(backend: B, config: ConductorConfig, tx: mpsc::Sender<ConductorMessage>) -> Self {
        Self::with_components(
            backend,
            config,
            Arc::new(TokioPacer),
            Box::new(NoAudio),
            tx,
        )
    }

    /// Create a Conductor with an explicit pacer and audio handle
    pub fn with_components(
        backend: B,
        config: ConductorConfig,
        pacer: Arc<dyn Pacer>,
        audio: Box<dyn AudioHandle>,
        tx: mpsc::Sender<ConductorMessage>,
    ) -> Self {
        let session = Session::new();
        tracing::debug!(
            session = %session.id().0,
            backend = backend.name(),
            mix_policy = config.mix_policy.as_str(),
            history_policy = config.history_policy.as_str(),
            "Conductor created"
        );

        Self {
            shared: Arc::new(Shared {
                config,
                backend: Arc::new(backend),
                pacer,
                audio: Mutex::new(audio),
                session: Mutex::new(session),
                tx,
            }),
        }
    }

    /// Session id
    #[must_use]
    pub fn session_id(&self) -> SessionId {
        self.shared.session.lock().id().clone()
    }

    /// The generative backend
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.shared.backend
    }

    /// Active configuration
    #[must_use]
    pub fn config(&self) -> &ConductorConfig {
        &self.shared.config
    }

    /// Copy of everything a surface draws
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.shared.session.lock().snapshot()
    }

    /// Baron's current state
    #[must_use]
    pub fn character_state(&self) -> CharacterState {
        self.shared.session.lock().character_state()
    }

    // =========================================================================
    // Surface Operations
    // =========================================================================

    /// Leave the intro screen
    ///
    /// Starts the music, sets the opening narration and, after the greeting
    /// beat, appends Baron's greeting. Returns `false` (and does nothing) if
    /// the session was already started.
    pub async fn start_session(&self) -> bool {
        let entered = self
            .apply(|session, out| {
                if !session.enter() {
                    return false;
                }
                out.push(ConductorMessage::ScreenChanged {
                    screen: session.screen(),
                });
                out.narrate(session, Some(Narration::Opening));
                true
            })
            .await;

        if !entered {
            tracing::debug!("Session already started");
            return false;
        }

        let playing = self.start_music();
        self.apply(|session, out| {
            session.set_music_playing(playing);
            out.push(ConductorMessage::Music { playing });
        })
        .await;

        self.beat(Beat::Greeting).await;

        self.apply(|session, out| {
            out.append(session, Message::plain(MessageRole::Assistant, GREETING));
        })
        .await;

        tracing::info!("Session started");
        true
    }

    /// The input box gained focus
    pub async fn focus(&self) {
        self.apply(|session, out| out.trigger(session, CharacterTrigger::FocusGained))
            .await;
    }

    /// The input box lost focus
    pub async fn blur(&self) {
        self.apply(|session, out| out.trigger(session, CharacterTrigger::FocusLost))
            .await;
    }

    /// Replace the pending input text
    pub fn set_input(&self, text: impl Into<String>) {
        self.shared.session.lock().set_pending_input(text);
    }

    /// Submit whatever is in the input box
    pub async fn submit_pending(&self) -> SubmitOutcome {
        let text = self.shared.session.lock().pending_input().to_string();
        self.submit(&text).await
    }

    /// Run one guest turn through the whole timeline
    ///
    /// Returns once Baron is idle again. Invalid or busy submissions are
    /// ignored and reported as [`SubmitOutcome::Ignored`]; collaborator
    /// failures reset Baron to idle and are reported as
    /// [`SubmitOutcome::Aborted`]. Neither is shown to the guest.
    pub async fn submit(&self, input: &str) -> SubmitOutcome {
        // The log keeps the guest's words as typed; gating and collaborators see them trimmed
        let text = input.trim();
        let config = &self.shared.config;

        let accepted = self
            .apply(|session, out| {
                if text.is_empty() {
                    return Err(SubmitRejection::Empty);
                }
                let len = text.chars().count();
                if len > config.max_input_chars {
                    return Err(SubmitRejection::TooLong {
                        len,
                        max: config.max_input_chars,
                    });
                }
                let state = session.character_state();
                if !state.accepts_submission() {
                    return Err(SubmitRejection::Busy(state));
                }

                let history = session.history(config.history_policy, config.max_history_turns);
                out.append(session, Message::plain(MessageRole::User, input));
                session.clear_pending_input();
                out.push(ConductorMessage::InputCleared);
                out.trigger(session, CharacterTrigger::SubmissionAccepted);
                out.narrate(session, Some(Narration::Listening));
                Ok((history, session.music_playing()))
            })
            .await;

        let (history, music_playing) = match accepted {
            Ok(accepted) => accepted,
            Err(rejection) => {
                tracing::debug!(reason = %rejection, "Ignoring submission");
                return SubmitOutcome::Ignored(rejection);
            }
        };

        if music_playing {
            self.keep_music_alive().await;
        }

        // Reply
        let reply = match self.shared.backend.chat(text, &history).await {
            Ok(reply) => reply,
            Err(e) => return self.abort("reply", &e).await,
        };
        let reply = self
            .apply(|session, out| {
                let id = out.append(session, Message::plain(MessageRole::Assistant, reply));
                out.trigger(session, CharacterTrigger::ReplyReady);
                out.narrate(session, Some(Narration::Responding));
                id
            })
            .await;

        self.beat(Beat::ReplyToMix).await;

        if !config.mix_policy.allows_mix() {
            self.apply(|session, out| {
                out.trigger(session, CharacterTrigger::MixSkipped);
                out.narrate(session, None);
            })
            .await;
            return SubmitOutcome::Completed {
                reply,
                artifact: None,
            };
        }

        // Mix
        self.apply(|session, out| {
            out.trigger(session, CharacterTrigger::MixingStarted);
            out.narrate(session, Some(Narration::Mixing));
        })
        .await;

        let cocktail = match self.shared.backend.mix(text).await {
            Ok(cocktail) => cocktail,
            Err(e) => return self.abort("mix", &e).await,
        };
        if cocktail.is_none() {
            tracing::info!("Mix produced no cocktail");
        }

        self.beat(Beat::MixToServe).await;

        // Serve
        let artifact = self
            .apply(|session, out| {
                out.trigger(session, CharacterTrigger::ArtifactReady);
                out.narrate(session, Some(Narration::Serving));
                cocktail.map(|c| out.append(session, Message::artifact(Arc::new(c))))
            })
            .await;

        self.beat(Beat::ServeToIdle).await;

        self.apply(|session, out| {
            out.trigger(session, CharacterTrigger::ServingElapsed);
            out.narrate(session, None);
        })
        .await;

        SubmitOutcome::Completed { reply, artifact }
    }

    /// Turn a cocktail card over
    ///
    /// After the reveal beat a whisper carrying the same cocktail is appended,
    /// unless one for a cocktail of the same name is already in the log.
    pub async fn reveal(&self, message_id: &MessageId) -> RevealOutcome {
        let turned = self
            .apply(|session, out| {
                let cocktail: Arc<Cocktail> = match session.message(message_id) {
                    None => return Err(RevealOutcome::UnknownMessage),
                    Some(m) if !m.is_artifact() => return Err(RevealOutcome::NotAnArtifact),
                    Some(m) => match m.cocktail() {
                        Some(c) => Arc::clone(c),
                        None => return Err(RevealOutcome::NotAnArtifact),
                    },
                };
                if !session.mark_revealed(message_id) {
                    return Err(RevealOutcome::AlreadyRevealed);
                }
                out.push(ConductorMessage::Revealed {
                    message_id: message_id.clone(),
                });
                out.narrate(session, Some(Narration::Revealing));
                Ok(cocktail)
            })
            .await;

        let cocktail = match turned {
            Ok(cocktail) => cocktail,
            Err(outcome) => {
                tracing::debug!(message = %message_id, ?outcome, "Reveal ignored");
                return outcome;
            }
        };

        self.beat(Beat::Reveal).await;

        self.apply(|session, out| {
            if session.has_whisper_for(&cocktail.name) {
                tracing::debug!(cocktail = %cocktail.name, "Whisper already served");
                return RevealOutcome::DuplicateWhisper;
            }
            RevealOutcome::Whispered(out.append(session, Message::whisper(cocktail)))
        })
        .await
    }

    /// Switch the background music; returns whether it is now playing
    pub async fn toggle_music(&self) -> bool {
        let was_playing = self.shared.session.lock().music_playing();

        let playing = if was_playing {
            self.shared.audio.lock().pause();
            false
        } else {
            self.start_music()
        };

        self.apply(|session, out| {
            session.set_music_playing(playing);
            out.push(ConductorMessage::Music { playing });
        })
        .await;
        playing
    }

    /// Dispatch a surface event
    ///
    /// # Errors
    ///
    /// Returns an error if the surface channel closed while announcing `Quit`.
    pub async fn handle_event(&self, event: SurfaceEvent) -> anyhow::Result<()> {
        tracing::trace!(?event, "Surface event");

        match event {
            SurfaceEvent::StartSession => {
                self.start_session().await;
            }
            SurfaceEvent::FocusGained => self.focus().await,
            SurfaceEvent::FocusLost => self.blur().await,
            SurfaceEvent::InputChanged { text } => self.set_input(text),
            SurfaceEvent::Submit { text } => {
                self.submit(&text).await;
            }
            SurfaceEvent::SubmitPending => {
                self.submit_pending().await;
            }
            SurfaceEvent::Reveal { message_id } => {
                self.reveal(&message_id).await;
            }
            SurfaceEvent::ToggleMusic => {
                self.toggle_music().await;
            }
            SurfaceEvent::Quit => {
                self.shared.audio.lock().pause();
                self.shared
                    .tx
                    .send(ConductorMessage::Quit)
                    .await
                    .context("surface channel closed before quit")?;
            }
        }

        Ok(())
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Mutate the session under its lock, then send what was collected
    async fn apply<R>(&self, f: impl FnOnce(&mut Session, &mut Outbox) -> R) -> R {
        let mut out = Outbox::default();
        let result = {
            let mut session = self.shared.session.lock();
            f(&mut session, &mut out)
        };
        for msg in out.0 {
            self.send(msg).await;
        }
        result
    }

    async fn send(&self, msg: ConductorMessage) {
        if let Err(e) = self.shared.tx.send(msg).await {
            tracing::warn!("Failed to send message to surface: {}", e);
        }
    }

    async fn beat(&self, beat: Beat) {
        let duration = self.shared.config.pacing.duration(beat);
        self.shared.pacer.pause(beat, duration).await;
    }

    async fn abort(&self, stage: &'static str, error: &BackendError) -> SubmitOutcome {
        tracing::warn!(
            backend = self.shared.backend.name(),
            stage,
            error = %error,
            "Collaborator failed, returning to idle"
        );
        self.apply(|session, out| {
            out.trigger(session, CharacterTrigger::Failure);
            out.narrate(session, None);
        })
        .await;
        SubmitOutcome::Aborted
    }

    fn start_music(&self) -> bool {
        match self.shared.audio.lock().play() {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Music could not start");
                false
            }
        }
    }

    /// Restart a track that stopped on its own while marked as playing
    async fn keep_music_alive(&self) {
        let paused = self.shared.audio.lock().is_paused();
        if !paused {
            return;
        }

        tracing::debug!("Music stopped unexpectedly, restarting");
        if !self.start_music() {
            self.apply(|session, out| {
                session.set_music_playing(false);
                out.push(ConductorMessage::Music { playing: false });
            })
            .await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioError;
    use crate::cocktail::{Recipe, VisualStructure};
    use crate::pacing::RecordingPacer;
    use crate::session::HistoryTurn;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    struct Bartender {
        reply: String,
        cocktail: Option<Cocktail>,
        histories: Mutex<Vec<Vec<HistoryTurn>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl Bartender {
        fn new(reply: &str, cocktail: Option<Cocktail>) -> Self {
            Self {
                reply: reply.to_string(),
                cocktail,
                histories: Mutex::new(Vec::new()),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl BistroBackend for Bartender {
        fn name(&self) -> &str {
            "test"
        }

        async fn chat(
            &self,
            user_text: &str,
            history: &[HistoryTurn],
        ) -> Result<String, BackendError> {
            self.prompts.lock().push(user_text.to_string());
            self.histories.lock().push(history.to_vec());
            Ok(self.reply.clone())
        }

        async fn mix(&self, _mood: &str) -> Result<Option<Cocktail>, BackendError> {
            Ok(self.cocktail.clone())
        }
    }

    /// Audio that reports itself stopped after every play
    #[derive(Default)]
    struct FlakyAudio {
        plays: Arc<Mutex<u32>>,
    }

    impl AudioHandle for FlakyAudio {
        fn play(&mut self) -> Result<(), AudioError> {
            *self.plays.lock() += 1;
            Ok(())
        }

        fn pause(&mut self) {}

        fn is_paused(&mut self) -> bool {
            true
        }
    }

    fn cocktail(name: &str) -> Cocktail {
        Cocktail {
            name: name.to_string(),
            recipe: Recipe {
                base: "gin".into(),
                adjunct: "sea salt".into(),
                soul: "a slow exhale".into(),
            },
            visual_description: String::new(),
            visual_structure: VisualStructure::default(),
            taste: String::new(),
            whisper: "Rest now, meow".to_string(),
            music_suggestion: String::new(),
            image_keyword: String::new(),
        }
    }

    fn conductor(
        backend: Bartender,
        config: ConductorConfig,
    ) -> (Conductor<Bartender>, mpsc::Receiver<ConductorMessage>) {
        let (tx, rx) = mpsc::channel(256);
        let conductor = Conductor::with_components(
            backend,
            config,
            Arc::new(RecordingPacer::instant()),
            Box::new(NoAudio),
            tx,
        );
        (conductor, rx)
    }

    #[test]
    fn test_mix_policy_parse() {
        assert_eq!("Always".parse::<MixPolicy>(), Ok(MixPolicy::Always));
        assert_eq!("never".parse::<MixPolicy>(), Ok(MixPolicy::Never));
        assert!("often".parse::<MixPolicy>().is_err());
    }

    #[tokio::test]
    async fn test_submit_rejections() {
        let config = ConductorConfig {
            max_input_chars: 5,
            ..ConductorConfig::default()
        };
        let (conductor, _rx) = conductor(Bartender::new("meow", None), config);

        assert_eq!(
            conductor.submit("   ").await,
            SubmitOutcome::Ignored(SubmitRejection::Empty)
        );
        assert_eq!(
            conductor.submit("too long by far").await,
            SubmitOutcome::Ignored(SubmitRejection::TooLong { len: 15, max: 5 })
        );
        assert!(conductor.snapshot().messages.is_empty());
    }

    #[tokio::test]
    async fn test_submit_runs_to_idle() {
        let (conductor, _rx) = conductor(
            Bartender::new("Sit, meow.", Some(cocktail("Low Tide"))),
            ConductorConfig::default(),
        );

        let artifact = match conductor.submit("  rainy day ").await {
            SubmitOutcome::Completed {
                artifact: Some(artifact),
                ..
            } => artifact,
            other => panic!("expected a served cocktail, got {other:?}"),
        };

        let snapshot = conductor.snapshot();
        assert_eq!(snapshot.character_state, CharacterState::Idle);
        assert_eq!(snapshot.narration, None);
        assert_eq!(snapshot.messages.len(), 3);
        assert_eq!(snapshot.messages[0].content, "  rainy day ");
        assert_eq!(snapshot.messages[2].id, artifact);
        assert_eq!(
            conductor.shared.backend.prompts.lock().clone(),
            vec!["rainy day".to_string()]
        );
    }

    #[tokio::test]
    async fn test_never_mix_skips_artifact() {
        let config = ConductorConfig {
            mix_policy: MixPolicy::Never,
            ..ConductorConfig::default()
        };
        let (conductor, _rx) = conductor(Bartender::new("meow", Some(cocktail("X"))), config);

        let outcome = conductor.submit("hello").await;
        assert!(matches!(
            outcome,
            SubmitOutcome::Completed { artifact: None, .. }
        ));
        assert_eq!(conductor.snapshot().messages.len(), 2);
        assert_eq!(conductor.character_state(), CharacterState::Idle);
    }

    #[tokio::test]
    async fn test_history_excludes_current_submission() {
        let backend = Bartender::new("meow", None);
        let (conductor, _rx) = conductor(backend, ConductorConfig::default());

        conductor.submit("first").await;
        conductor.submit("second").await;

        let histories = conductor.shared.backend.histories.lock().clone();
        assert_eq!(histories[0], Vec::<HistoryTurn>::new());
        assert_eq!(
            histories[1],
            vec![
                HistoryTurn::new(MessageRole::User, "first"),
                HistoryTurn::new(MessageRole::Assistant, "meow"),
            ]
        );
    }

    #[tokio::test]
    async fn test_start_session_once() {
        let (conductor, mut rx) = conductor(Bartender::new("meow", None), ConductorConfig::default());

        assert!(conductor.start_session().await);
        assert!(!conductor.start_session().await);

        let snapshot = conductor.snapshot();
        assert_eq!(snapshot.messages.len(), 1);
        assert_eq!(snapshot.messages[0].content, GREETING);
        assert!(!snapshot.music_playing);

        let first = rx.recv().await;
        assert!(matches!(
            first,
            Some(ConductorMessage::ScreenChanged { .. })
        ));
    }

    #[tokio::test]
    async fn test_music_keep_alive_restarts_player() {
        let audio = FlakyAudio::default();
        let plays = Arc::clone(&audio.plays);
        let (tx, _rx) = mpsc::channel(256);
        let conductor = Conductor::with_components(
            Bartender::new("meow", None),
            ConductorConfig {
                mix_policy: MixPolicy::Never,
                ..ConductorConfig::default()
            },
            Arc::new(RecordingPacer::instant()),
            Box::new(audio),
            tx,
        );

        assert!(conductor.toggle_music().await);
        assert_eq!(*plays.lock(), 1);

        conductor.submit("hello").await;
        assert_eq!(*plays.lock(), 2);
        assert!(conductor.snapshot().music_playing);
    }

    #[tokio::test]
    async fn test_toggle_music_without_player_stays_off() {
        let (conductor, _rx) = conductor(Bartender::new("meow", None), ConductorConfig::default());
        assert!(!conductor.toggle_music().await);
        assert!(!conductor.snapshot().music_playing);
    }

    #[tokio::test]
    async fn test_quit_event_is_forwarded() {
        let (conductor, mut rx) = conductor(Bartender::new("meow", None), ConductorConfig::default());
        conductor.handle_event(SurfaceEvent::Quit).await.unwrap();
        assert!(matches!(rx.recv().await, Some(ConductorMessage::Quit)));
    }
}
