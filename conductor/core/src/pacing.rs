//! Pacing
//!
//! Every pause in a conversation timeline goes through a [`Pacer`], so tests
//! can record the beats or run them on virtual time. This is the only module
//! allowed to sleep.

use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// A named pause in a timeline
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Beat {
    /// Between entering the bistro and the greeting
    Greeting,
    /// Between the reply and the start of mixing
    ReplyToMix,
    /// Between the mix result and serving
    MixToServe,
    /// Between serving and returning to idle
    ServeToIdle,
    /// Between turning a card and the whisper
    Reveal,
}

/// Pause lengths for each beat
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacingConfig {
    /// Before the greeting message
    pub greeting: Duration,
    /// Reply to mixing
    pub reply_to_mix: Duration,
    /// Mix result to serving
    pub mix_to_serve: Duration,
    /// Serving to idle
    pub serve_to_idle: Duration,
    /// Card reveal to whisper
    pub reveal: Duration,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            greeting: Duration::from_millis(1000),
            reply_to_mix: Duration::from_millis(2000),
            mix_to_serve: Duration::from_millis(3000),
            serve_to_idle: Duration::from_millis(5000),
            reveal: Duration::from_millis(1500),
        }
    }
}

impl PacingConfig {
    /// Every beat takes no time
    #[must_use]
    pub const fn immediate() -> Self {
        Self {
            greeting: Duration::ZERO,
            reply_to_mix: Duration::ZERO,
            mix_to_serve: Duration::ZERO,
            serve_to_idle: Duration::ZERO,
            reveal: Duration::ZERO,
        }
    }

    /// Length of one beat
    #[must_use]
    pub const fn duration(&self, beat: Beat) -> Duration {
        match beat {
            Beat::Greeting => self.greeting,
            Beat::ReplyToMix => self.reply_to_mix,
            Beat::MixToServe => self.mix_to_serve,
            Beat::ServeToIdle => self.serve_to_idle,
            Beat::Reveal => self.reveal,
        }
    }
}

/// Something that can wait out a beat
#[async_trait]
pub trait Pacer: Send + Sync {
    /// Wait for `duration`
    async fn pause(&self, beat: Beat, duration: Duration);
}

/// Real-time pacing on the tokio timer
#[derive(Clone, Copy, Debug, Default)]
pub struct TokioPacer;

#[async_trait]
impl Pacer for TokioPacer {
    async fn pause(&self, beat: Beat, duration: Duration) {
        tracing::trace!(?beat, ?duration, "Pausing");
        tokio::time::sleep(duration).await;
    }
}

/// Pacer that remembers every beat it was asked for
///
/// By default it still sleeps on the tokio timer, so with a paused clock the
/// intermediate states of a timeline stay observable.
#[derive(Debug, Default)]
pub struct RecordingPacer {
    beats: Mutex<Vec<(Beat, Duration)>>,
    skip_sleep: bool,
}

impl RecordingPacer {
    /// Record and sleep
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record without sleeping
    #[must_use]
    pub fn instant() -> Self {
        Self {
            beats: Mutex::new(Vec::new()),
            skip_sleep: true,
        }
    }

    /// Beats requested so far, in order
    #[must_use]
    pub fn beats(&self) -> Vec<(Beat, Duration)> {
        self.beats.lock().clone()
    }
}

#[async_trait]
impl Pacer for RecordingPacer {
    async fn pause(&self, beat: Beat, duration: Duration) {
        self.beats.lock().push((beat, duration));
        if !self.skip_sleep {
            tokio::time::sleep(duration).await;
        }
    }
}
