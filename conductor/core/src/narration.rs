//! House copy: narration lines, the greeting, and input placeholders

use serde::{Deserialize, Serialize};

/// Baron's first message after the greeting delay
pub const GREETING: &str =
    "Welcome to the Mood Bistro... meow. What are we drinking tonight, or shall we talk about how you feel?";

/// Input placeholder while the bar is open
pub const PLACEHOLDER_DEFAULT: &str = "Tell me about your mood...";

/// Input placeholder while a drink is being mixed
pub const PLACEHOLDER_MIXING: &str = "Baron is mixing something for you...";

/// Narration lines shown under the portrait
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Narration {
    /// The bistro has just opened
    Opening,
    /// A submission was accepted
    Listening,
    /// The reply arrived
    Responding,
    /// The shaker is out
    Mixing,
    /// The drink is on the bar
    Serving,
    /// A card was turned over
    Revealing,
}

impl Narration {
    /// The line of copy
    #[must_use]
    pub const fn text(self) -> &'static str {
        match self {
            Self::Opening => "The night is soft and the wind chimes ring. I am Baron, your listener tonight.",
            Self::Listening => "Baron is listening...",
            Self::Responding => "Baron answers softly...",
            Self::Mixing => {
                "Baron picks up the shaker; ice rattles, bright against the night..."
            }
            Self::Serving => {
                "A drink glides down the bar to you, its layers turning in the lamplight..."
            }
            Self::Revealing => "As the drink goes down, a black and gold card rises before your eyes...",
        }
    }
}

impl std::fmt::Display for Narration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.text())
    }
}
