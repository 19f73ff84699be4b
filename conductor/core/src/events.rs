//! Surface Events
//!
//! Events sent from a rendering surface to the Conductor. Surfaces report
//! what the user did; the Conductor decides what it means.

use serde::{Deserialize, Serialize};

use crate::messages::MessageId;

/// Events from UI Surface to Conductor
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceEvent {
    /// "Enter the bistro" was pressed
    StartSession,

    /// The input box gained focus
    FocusGained,

    /// The input box lost focus
    FocusLost,

    /// The input box text changed
    InputChanged {
        /// Current input text
        text: String,
    },

    /// The user sent a message
    Submit {
        /// Message text
        text: String,
    },

    /// Send whatever is in the input box
    SubmitPending,

    /// A cocktail card was clicked
    Reveal {
        /// The artifact message behind the card
        message_id: MessageId,
    },

    /// The music button was pressed
    ToggleMusic,

    /// The surface is closing
    Quit,
}

impl SurfaceEvent {
    /// Whether handling this event may run a paced timeline
    #[must_use]
    pub const fn is_long_running(&self) -> bool {
        matches!(
            self,
            Self::StartSession | Self::Submit { .. } | Self::SubmitPending | Self::Reveal { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_running_events() {
        assert!(SurfaceEvent::Submit {
            text: "rainy".into()
        }
        .is_long_running());
        assert!(SurfaceEvent::Reveal {
            message_id: MessageId::from("msg_1")
        }
        .is_long_running());
        assert!(!SurfaceEvent::FocusGained.is_long_running());
        assert!(!SurfaceEvent::ToggleMusic.is_long_running());
    }
}
