//! Conductor Messages
//!
//! Updates sent from the Conductor to a rendering surface. A surface that
//! applies every message in order ends up with the same view as
//! [`Conductor::snapshot`](crate::Conductor::snapshot).

use serde::{Deserialize, Serialize};

use crate::avatar::CharacterState;
use crate::session::{Message, Screen};

/// Messages from Conductor to UI Surface
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum ConductorMessage {
    /// Intro screen was left
    ScreenChanged {
        /// The screen now showing
        screen: Screen,
    },

    /// Baron changed state
    State {
        /// New character state
        state: CharacterState,
    },

    /// Narration line under the portrait
    Narration {
        /// Line to show, `None` to clear
        text: Option<String>,
    },

    /// A message was appended to the log
    MessageAppended {
        /// The new message
        message: Message,
    },

    /// A cocktail card was turned over
    Revealed {
        /// The artifact message behind the card
        message_id: MessageId,
    },

    /// Background music switched
    Music {
        /// Whether music is now playing
        playing: bool,
    },

    /// The input box was emptied after a submission
    InputCleared,

    /// The session is over
    Quit,
}

/// Message identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MessageId(pub String);

impl MessageId {
    /// Generate a new unique message ID
    #[must_use]
    pub fn new() -> Self {
        Self(format!("msg_{}", uuid::Uuid::new_v4().simple()))
    }

    /// Borrow the raw id
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MessageId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Session identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    /// Generate a new unique session ID
    ///
    /// Uses an atomic counter combined with timestamp so two sessions created
    /// in the same millisecond still differ.
    #[must_use]
    pub fn new() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};

        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let count = COUNTER.fetch_add(1, Ordering::SeqCst);
        let timestamp = chrono::Utc::now().timestamp_millis();
        Self(format!("bistro_{timestamp}_{count}"))
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

/// Who sent a message
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// The guest at the bar
    User,
    /// Baron
    Assistant,
}
