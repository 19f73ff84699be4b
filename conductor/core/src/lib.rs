//! Bistro Core - Headless Core of the Mood Bistro
//!
//! This crate runs an evening at the Mood Bistro: a guest talks to Baron, a
//! black-cat bartender, and now and then is served a cocktail drawn as an SVG
//! illustration. It is independent of any UI; a terminal driver, a web page or
//! a test harness can all sit on top of it.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                         UI Surfaces                               │
//! │    ┌──────────────┐   ┌──────────────┐   ┌────────────────────┐   │
//! │    │ mood-bistro  │   │   Web page   │   │  Tests / headless  │   │
//! │    │  (terminal)  │   │              │   │                    │   │
//! │    └──────┬───────┘   └──────┬───────┘   └─────────┬──────────┘   │
//! │           └──────────────────┼─────────────────────┘              │
//! │                      SurfaceEvent (up)                            │
//! │                    ConductorMessage (down)                        │
//! └──────────────────────────────┼────────────────────────────────────┘
//!                                │
//! ┌──────────────────────────────┼────────────────────────────────────┐
//! │                        BISTRO CORE                                │
//! │  ┌───────────────────────────┴──────────────────────────────────┐ │
//! │  │                         Conductor                             │ │
//! │  │  ┌──────────┐  ┌───────────┐  ┌─────────┐  ┌──────────────┐   │ │
//! │  │  │ Session  │  │ Character │  │  Pacer  │  │   Backend    │   │ │
//! │  │  │  (log)   │  │  (state)  │  │ (beats) │  │ (chat / mix) │   │ │
//! │  │  └──────────┘  └───────────┘  └─────────┘  └──────────────┘   │ │
//! │  └───────────────────────────────────────────────────────────────┘ │
//! │     render: VisualStructure ──► Illustration ──► SVG               │
//! └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`Conductor`]: Runs the submission timeline and the reveal flow
//! - [`ConductorMessage`]: Updates sent from the Conductor to UI surfaces
//! - [`SurfaceEvent`]: Events sent from UI surfaces to the Conductor
//! - [`Session`]: Message log, screen, narration and music state
//! - [`CharacterStateMachine`]: Baron's behavioural mode
//! - [`Cocktail`]: A generated drink; [`render_cocktail`] draws it
//!
//! # Quick Start
//!
//! ```ignore
//! use bistro_core::{backend::GeminiBackend, config, Conductor, SurfaceEvent};
//! use tokio::sync::mpsc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = config::load_config(&config::ConfigOverrides::default())?;
//!     let backend = GeminiBackend::from_settings(&config.backend)?;
//!
//!     let (tx, mut rx) = mpsc::channel(100);
//!     let conductor = Conductor::new(backend, config.conductor, tx);
//!
//!     conductor.handle_event(SurfaceEvent::StartSession).await?;
//!     conductor
//!         .handle_event(SurfaceEvent::Submit { text: "A long week.".into() })
//!         .await?;
//!
//!     while let Ok(msg) = rx.try_recv() {
//!         // Render message to UI
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Module Overview
//!
//! - [`audio`]: Background music handles
//! - [`avatar`]: Character state machine, presentation flags, portrait
//! - [`backend`]: Generative backend abstraction (Gemini)
//! - [`cocktail`]: The cocktail data model
//! - [`conductor`]: Main Conductor struct
//! - [`config`]: TOML, environment and CLI configuration
//! - [`events`]: Events from UI surfaces to Conductor
//! - [`messages`]: Messages from Conductor to UI surfaces
//! - [`narration`]: Fixed narration lines
//! - [`pacing`]: Timeline beats and the injectable pacer
//! - [`render`]: Cocktail illustration and SVG output
//! - [`session`]: Session state and message log

#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod audio;
pub mod avatar;
pub mod backend;
pub mod cocktail;
pub mod conductor;
pub mod config;
pub mod events;
pub mod messages;
pub mod narration;
pub mod pacing;
pub mod render;
pub mod session;

// Re-exports for convenience
pub use audio::{AudioError, AudioHandle, NoAudio, PlayerProcess};
pub use avatar::{
    render_portrait, Badge, CharacterState, CharacterStateMachine, CharacterTrigger, PortraitSize,
    Presentation,
};
pub use backend::{BackendError, BistroBackend, GeminiBackend};
pub use cocktail::{Cocktail, Garnish, GlassType, Ice, Recipe, VisualStructure};
pub use conductor::{
    Conductor, ConductorConfig, MixPolicy, RevealOutcome, SubmitOutcome, SubmitRejection,
};
pub use events::SurfaceEvent;
pub use messages::{ConductorMessage, MessageId, MessageRole, SessionId};
pub use narration::Narration;
pub use pacing::{Beat, Pacer, PacingConfig, RecordingPacer, TokioPacer};
pub use render::{card_scale, decorate_sparkles, render_cocktail, Illustration, Layer};
pub use session::{
    HistoryPolicy, HistoryTurn, InputPresentation, Message, MessageKind, Screen, Session,
    SessionSnapshot,
};

// Config exports
pub use config::{
    default_config_path, load_config, load_config_from_path, BistroConfig, BistroToml,
    ConfigError, ConfigOverrides, ConfigSource,
};
