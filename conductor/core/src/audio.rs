//! Background music
//!
//! Playback is best-effort. The Conductor only needs to start, stop, and ask
//! whether the track is still going; failures are logged and the music flag
//! stays off.

use tokio::process::{Child, Command};

/// Jazz loop played while the bistro is open
pub const DEFAULT_TRACK_URL: &str =
    "https://cdn.pixabay.com/audio/2022/05/27/audio_1808fbf07a.mp3";

/// Default playback volume (0.0-1.0)
pub const DEFAULT_VOLUME: f32 = 0.3;

/// Audio errors
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    /// No player is configured
    #[error("no audio player configured")]
    Unavailable,

    /// The player command line is empty
    #[error("player command is empty")]
    EmptyCommand,

    /// The player process could not be started
    #[error("failed to start player '{program}': {source}")]
    Spawn {
        /// Program that failed to start
        program: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// A background track that can be started and stopped
pub trait AudioHandle: Send {
    /// Start or resume playback. Calling while already playing is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if playback cannot start.
    fn play(&mut self) -> Result<(), AudioError>;

    /// Stop playback. Calling while stopped is a no-op.
    fn pause(&mut self);

    /// Whether the track is currently stopped
    fn is_paused(&mut self) -> bool;
}

/// Silent handle; every `play` fails with [`AudioError::Unavailable`]
#[derive(Clone, Copy, Debug, Default)]
pub struct NoAudio;

impl AudioHandle for NoAudio {
    fn play(&mut self) -> Result<(), AudioError> {
        Err(AudioError::Unavailable)
    }

    fn pause(&mut self) {}

    fn is_paused(&mut self) -> bool {
        true
    }
}

/// Music played by an external process (mpv, ffplay, ...)
///
/// Pausing kills the process; playing again starts the track over.
#[derive(Debug)]
pub struct PlayerProcess {
    program: String,
    args: Vec<String>,
    child: Option<Child>,
}

impl PlayerProcess {
    /// Build from a command template
    ///
    /// `{url}` is replaced by the track URL and `{volume}` by the volume as a
    /// whole percentage, e.g. `mpv --no-video --loop=inf --volume={volume} {url}`.
    ///
    /// # Errors
    ///
    /// Returns [`AudioError::EmptyCommand`] if the template has no program.
    pub fn from_template(template: &str, url: &str, volume: f32) -> Result<Self, AudioError> {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let percent = (volume.clamp(0.0, 1.0) * 100.0).round() as u32;
        let percent = percent.to_string();

        let mut words = template
            .split_whitespace()
            .map(|w| w.replace("{url}", url).replace("{volume}", &percent));
        let program = words.next().ok_or(AudioError::EmptyCommand)?;

        Ok(Self {
            program,
            args: words.collect(),
            child: None,
        })
    }

    /// Program name
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments after substitution
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    fn running(&mut self) -> bool {
        match self.child.as_mut().map(Child::try_wait) {
            Some(Ok(None)) => true,
            Some(Ok(Some(status))) => {
                tracing::debug!(program = %self.program, %status, "Player exited");
                self.child = None;
                false
            }
            Some(Err(e)) => {
                tracing::warn!(program = %self.program, error = %e, "Lost track of player");
                self.child = None;
                false
            }
            None => false,
        }
    }
}

impl AudioHandle for PlayerProcess {
    fn play(&mut self) -> Result<(), AudioError> {
        if self.running() {
            return Ok(());
        }

        let child = Command::new(&self.program)
            .args(&self.args)
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| AudioError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        tracing::info!(program = %self.program, "Music started");
        self.child = Some(child);
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(mut child) = self.child.take() {
            if let Err(e) = child.start_kill() {
                tracing::debug!(program = %self.program, error = %e, "Player already gone");
            }
            tracing::info!(program = %self.program, "Music stopped");
        }
    }

    fn is_paused(&mut self) -> bool {
        !self.running()
    }
}
