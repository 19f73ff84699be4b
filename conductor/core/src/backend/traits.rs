//! Backend Traits
//!
//! The two collaborators a conversation needs: a reply in Baron's voice, and
//! a cocktail mixed for the guest's mood. Implementations handle provider
//! details (API format, auth); the Conductor only sees this trait.

use async_trait::async_trait;

use crate::cocktail::Cocktail;
use crate::session::HistoryTurn;

/// Errors from a generative backend
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// Transport failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status
    #[error("backend returned {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, for the log
        body: String,
    },

    /// The response (or the cocktail inside it) was not the expected JSON
    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),

    /// No API key in the environment
    #[error("no API key found (set {0})")]
    MissingApiKey(String),

    /// The service answered without any candidate
    #[error("backend returned no candidates")]
    EmptyCandidate,
}

/// Generative backend trait
///
/// Implement this trait to put Baron on a different provider.
#[async_trait]
pub trait BistroBackend: Send + Sync {
    /// Backend name for logs (e.g., "Gemini")
    fn name(&self) -> &str;

    /// Reply to the guest in Baron's voice
    ///
    /// `history` holds the earlier turns, oldest first, and does not include
    /// `user_text`. An empty reply is allowed.
    async fn chat(&self, user_text: &str, history: &[HistoryTurn]) -> Result<String, BackendError>;

    /// Mix a cocktail for a mood
    ///
    /// `Ok(None)` means the backend answered but produced no drink.
    async fn mix(&self, mood: &str) -> Result<Option<Cocktail>, BackendError>;
}
