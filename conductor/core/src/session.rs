//! Session
//!
//! Everything one evening at the bar needs to remember: which screen is up,
//! Baron's state, the narration line, the message log, what is typed in the
//! input box, and which cocktail cards have been turned over.
//!
//! The log is append-only. Messages are never edited or removed once pushed,
//! and insertion order is display order.

use std::collections::HashSet;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::avatar::{CharacterState, CharacterStateMachine, CharacterTrigger, Presentation};
use crate::cocktail::Cocktail;
use crate::messages::{MessageId, MessageRole, SessionId};
use crate::narration::{Narration, PLACEHOLDER_DEFAULT, PLACEHOLDER_MIXING};

/// Text stored in place of an empty reply
pub const EMPTY_REPLY_PLACEHOLDER: &str = "...";

/// Which screen is showing
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    /// Title screen with the "enter" button
    #[default]
    Intro,
    /// The bar itself
    Chatting,
}

/// What a message carries besides its text
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "cocktail", rename_all = "snake_case")]
pub enum MessageKind {
    /// Ordinary chat bubble
    Plain,
    /// A served cocktail card
    Artifact(Arc<Cocktail>),
    /// The whisper card unlocked by revealing an artifact
    Whisper(Arc<Cocktail>),
}

/// A message in the log
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Unique message ID
    pub id: MessageId,
    /// Who sent this message
    pub role: MessageRole,
    /// Message text (empty for cards)
    pub content: String,
    /// Plain, artifact, or whisper
    pub kind: MessageKind,
    /// When the message was created (Unix timestamp ms)
    pub created_at: i64,
}

impl Message {
    fn with_kind(role: MessageRole, content: String, kind: MessageKind) -> Self {
        Self {
            id: MessageId::new(),
            role,
            content,
            kind,
            created_at: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Plain chat message; blank text becomes `"..."`
    #[must_use]
    pub fn plain(role: MessageRole, content: impl Into<String>) -> Self {
        let mut content = content.into();
        if content.trim().is_empty() {
            content = EMPTY_REPLY_PLACEHOLDER.to_string();
        }
        Self::with_kind(role, content, MessageKind::Plain)
    }

    /// Cocktail card from Baron
    #[must_use]
    pub fn artifact(cocktail: Arc<Cocktail>) -> Self {
        Self::with_kind(
            MessageRole::Assistant,
            String::new(),
            MessageKind::Artifact(cocktail),
        )
    }

    /// Whisper card for a cocktail
    #[must_use]
    pub fn whisper(cocktail: Arc<Cocktail>) -> Self {
        Self::with_kind(
            MessageRole::Assistant,
            String::new(),
            MessageKind::Whisper(cocktail),
        )
    }

    /// The cocktail on an artifact or whisper card
    #[must_use]
    pub fn cocktail(&self) -> Option<&Arc<Cocktail>> {
        match &self.kind {
            MessageKind::Plain => None,
            MessageKind::Artifact(c) | MessageKind::Whisper(c) => Some(c),
        }
    }

    /// Whether this is a cocktail card
    #[must_use]
    pub const fn is_artifact(&self) -> bool {
        matches!(self.kind, MessageKind::Artifact(_))
    }

    /// Whether this is a whisper card
    #[must_use]
    pub const fn is_whisper(&self) -> bool {
        matches!(self.kind, MessageKind::Whisper(_))
    }
}

/// One prior turn handed to the reply collaborator
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryTurn {
    /// Who spoke
    pub role: MessageRole,
    /// What was said
    pub text: String,
}

impl HistoryTurn {
    /// New turn
    #[must_use]
    pub fn new(role: MessageRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }
}

/// Which messages make it into the reply history
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryPolicy {
    /// Plain chat only
    #[default]
    PlainOnly,
    /// Plain chat plus a one-line note for each card
    IncludeArtifacts,
}

impl HistoryPolicy {
    /// Config name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PlainOnly => "plain_only",
            Self::IncludeArtifacts => "include_artifacts",
        }
    }
}

impl FromStr for HistoryPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "plain_only" | "plain" => Ok(Self::PlainOnly),
            "include_artifacts" | "artifacts" => Ok(Self::IncludeArtifacts),
            other => Err(format!(
                "unknown history policy '{other}' (expected plain_only or include_artifacts)"
            )),
        }
    }
}

/// How the input box should look
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputPresentation {
    /// Whether typing is allowed
    pub enabled: bool,
    /// Placeholder text
    pub placeholder: String,
    /// Whether the send button is active
    pub send_enabled: bool,
}

impl InputPresentation {
    /// Input state for a character state and the current input text
    #[must_use]
    pub fn for_state(state: CharacterState, pending_input: &str) -> Self {
        let enabled = !state.is_busy();
        let placeholder = if state == CharacterState::Mixing {
            PLACEHOLDER_MIXING
        } else {
            PLACEHOLDER_DEFAULT
        };
        let send_enabled = !pending_input.trim().is_empty() && state.accepts_submission();

        Self {
            enabled,
            placeholder: placeholder.to_string(),
            send_enabled,
        }
    }
}

/// Read-only copy of everything a surface draws
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Session id
    pub id: SessionId,
    /// Current screen
    pub screen: Screen,
    /// Baron's state
    pub character_state: CharacterState,
    /// Presentation flags for the state
    pub presentation: Presentation,
    /// Narration line
    pub narration: Option<String>,
    /// Whether music is on
    pub music_playing: bool,
    /// The message log, in display order
    pub messages: Vec<Message>,
    /// Text in the input box
    pub pending_input: String,
    /// Input box presentation
    pub input: InputPresentation,
    /// Cards that have been turned over
    pub revealed: Vec<MessageId>,
}

impl SessionSnapshot {
    /// Look up a message
    #[must_use]
    pub fn message(&self, id: &MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| &m.id == id)
    }

    /// Whether a card has been turned over
    #[must_use]
    pub fn is_revealed(&self, id: &MessageId) -> bool {
        self.revealed.contains(id)
    }
}

/// One evening at the bar
#[derive(Debug, Default)]
pub struct Session {
    id: SessionId,
    screen: Screen,
    music_playing: bool,
    character: CharacterStateMachine,
    narration: Option<Narration>,
    messages: Vec<Message>,
    pending_input: String,
    revealed: HashSet<MessageId>,
}

impl Session {
    /// Fresh session on the intro screen
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Session id
    #[must_use]
    pub const fn id(&self) -> &SessionId {
        &self.id
    }

    /// Current screen
    #[must_use]
    pub const fn screen(&self) -> Screen {
        self.screen
    }

    /// Move from the intro to the bar
    ///
    /// Returns `false` if the bar is already open.
    pub fn enter(&mut self) -> bool {
        if self.screen == Screen::Chatting {
            return false;
        }
        self.screen = Screen::Chatting;
        true
    }

    /// Whether music is on
    #[must_use]
    pub const fn music_playing(&self) -> bool {
        self.music_playing
    }

    /// Record the music state
    pub fn set_music_playing(&mut self, playing: bool) {
        self.music_playing = playing;
    }

    /// Baron's state
    #[must_use]
    pub const fn character_state(&self) -> CharacterState {
        self.character.state()
    }

    /// Apply a character trigger
    pub fn trigger(&mut self, trigger: CharacterTrigger) -> Option<CharacterState> {
        self.character.trigger(trigger)
    }

    /// Current narration
    #[must_use]
    pub const fn narration(&self) -> Option<Narration> {
        self.narration
    }

    /// Current narration text
    #[must_use]
    pub fn narration_text(&self) -> Option<String> {
        self.narration.map(|n| n.text().to_string())
    }

    /// Replace the narration line
    pub fn set_narration(&mut self, narration: Option<Narration>) {
        self.narration = narration;
    }

    /// Append a message and return a copy of it
    pub fn push(&mut self, message: Message) -> Message {
        self.messages.push(message.clone());
        message
    }

    /// The log, in display order
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Look up a message
    #[must_use]
    pub fn message(&self, id: &MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| &m.id == id)
    }

    /// Text in the input box
    #[must_use]
    pub fn pending_input(&self) -> &str {
        &self.pending_input
    }

    /// Replace the input text
    pub fn set_pending_input(&mut self, text: impl Into<String>) {
        self.pending_input = text.into();
    }

    /// Empty the input box
    pub fn clear_pending_input(&mut self) {
        self.pending_input.clear();
    }

    /// Turn a card over. Returns `false` if it was already turned.
    pub fn mark_revealed(&mut self, id: &MessageId) -> bool {
        self.revealed.insert(id.clone())
    }

    /// Whether a card has been turned over
    #[must_use]
    pub fn is_revealed(&self, id: &MessageId) -> bool {
        self.revealed.contains(id)
    }

    /// Whether a whisper for a cocktail of this name is already in the log
    #[must_use]
    pub fn has_whisper_for(&self, name: &str) -> bool {
        self.messages
            .iter()
            .any(|m| matches!(&m.kind, MessageKind::Whisper(c) if c.name == name))
    }

    /// Prior turns for the reply collaborator
    ///
    /// `max_turns` keeps only the most recent turns; 0 keeps everything.
    #[must_use]
    pub fn history(&self, policy: HistoryPolicy, max_turns: usize) -> Vec<HistoryTurn> {
        let mut turns: Vec<HistoryTurn> = self
            .messages
            .iter()
            .filter_map(|m| match (&m.kind, policy) {
                (MessageKind::Plain, _) => Some(HistoryTurn::new(m.role, m.content.clone())),
                (MessageKind::Artifact(c), HistoryPolicy::IncludeArtifacts) => Some(
                    HistoryTurn::new(m.role, format!("[Served a cocktail: {}]", c.name)),
                ),
                (MessageKind::Whisper(c), HistoryPolicy::IncludeArtifacts) => Some(
                    HistoryTurn::new(m.role, format!("[Whisper for {}: {}]", c.name, c.whisper)),
                ),
                _ => None,
            })
            .collect();

        if max_turns > 0 && turns.len() > max_turns {
            turns.drain(..turns.len() - max_turns);
        }
        turns
    }

    /// Copy out everything a surface draws
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.character_state();
        let mut revealed: Vec<MessageId> = self.revealed.iter().cloned().collect();
        revealed.sort();

        SessionSnapshot {
            id: self.id.clone(),
            screen: self.screen,
            character_state: state,
            presentation: Presentation::for_state(state),
            narration: self.narration_text(),
            music_playing: self.music_playing,
            messages: self.messages.clone(),
            pending_input: self.pending_input.clone(),
            input: InputPresentation::for_state(state, &self.pending_input),
            revealed,
        }
    }
}
