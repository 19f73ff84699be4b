//! Generative Backend Integration
//!
//! Baron's replies and cocktails come from an external generative model
//! behind the [`BistroBackend`] trait.
//!
//! # Available Backends
//!
//! - **Gemini**: Google `generateContent` REST API (default)
//!
//! # Usage
//!
//! ```ignore
//! use bistro_core::backend::{BistroBackend, GeminiBackend};
//! use bistro_core::config::BackendSettings;
//!
//! let backend = GeminiBackend::from_settings(&BackendSettings::default())?;
//! let reply = backend.chat("A long week.", &[]).await?;
//! ```

mod gemini;
pub mod persona;
mod traits;

pub use gemini::{chat_body, mix_body, parse_cocktail, GeminiBackend};
pub use traits::{BackendError, BistroBackend};
