//! Terminal surface
//!
//! [`Printer`] applies `ConductorMessage`s to stdout and the output directory;
//! [`run_stdin`] turns typed lines into `SurfaceEvent`s.
//!
//! ```text
//!   stdin ──► run_stdin ──SurfaceEvent──► Conductor ──ConductorMessage──► Printer ──► stdout
//!                                                                            └──► out_dir/*.svg
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use bistro_core::render::{card_scale, decorate_sparkles, render_cocktail, Color};
use bistro_core::{
    render_portrait, BistroBackend, CharacterState, Cocktail, Conductor, ConductorMessage,
    Message, MessageId, MessageKind, MessageRole, PortraitSize, SurfaceEvent,
};

/// File Baron's portrait is written to
const PORTRAIT_FILE: &str = "baron.svg";

/// Prints conductor updates and keeps the illustrations on disk current
pub struct Printer {
    out_dir: PathBuf,
    rng: StdRng,
    cards: HashMap<MessageId, (Arc<Cocktail>, PathBuf)>,
    served: usize,
}

impl Printer {
    /// Printer writing illustrations into `out_dir`
    pub fn new(out_dir: PathBuf) -> Self {
        Self {
            out_dir,
            rng: StdRng::from_entropy(),
            cards: HashMap::new(),
            served: 0,
        }
    }

    /// Consume updates until `Quit` or until every sender is gone
    pub async fn run(mut self, mut rx: mpsc::Receiver<ConductorMessage>) {
        while let Some(msg) = rx.recv().await {
            if matches!(msg, ConductorMessage::Quit) {
                break;
            }
            self.apply(msg).await;
        }
        debug!("Printer stopped");
    }

    async fn apply(&mut self, msg: ConductorMessage) {
        match msg {
            ConductorMessage::ScreenChanged { screen } => debug!(?screen, "Screen changed"),
            ConductorMessage::State { state } => self.draw_portrait(state).await,
            ConductorMessage::Narration { text: Some(text) } => println!("  ~ {text}"),
            ConductorMessage::Narration { text: None } | ConductorMessage::InputCleared => {}
            ConductorMessage::MessageAppended { message } => self.print_message(&message).await,
            ConductorMessage::Revealed { message_id } => self.turn_card(&message_id).await,
            ConductorMessage::Music { playing } => {
                println!("  {}", if playing { "(music on)" } else { "(music off)" });
            }
            ConductorMessage::Quit => {}
        }
    }

    async fn print_message(&mut self, message: &Message) {
        match &message.kind {
            MessageKind::Plain if message.role == MessageRole::User => {}
            MessageKind::Plain => println!("Baron: {}", message.content),
            MessageKind::Artifact(cocktail) => {
                self.served += 1;
                let path = self.out_dir.join(svg_file_name(&cocktail.name, self.served));
                self.write_card(cocktail, &path, false).await;
                println!("{}", describe_cocktail(cocktail));
                println!("  [{}] type /reveal to turn the card over", path.display());
                self.cards
                    .insert(message.id.clone(), (Arc::clone(cocktail), path));
            }
            MessageKind::Whisper(cocktail) => println!("{}", describe_whisper(cocktail)),
        }
    }

    async fn turn_card(&mut self, message_id: &MessageId) {
        let Some((cocktail, path)) = self.cards.get(message_id).cloned() else {
            debug!(message = %message_id, "Revealed card was never printed");
            return;
        };
        self.write_card(&cocktail, &path, true).await;
    }

    async fn write_card(&mut self, cocktail: &Cocktail, path: &Path, revealed: bool) {
        let visual = &cocktail.visual_structure;
        let mut picture = render_cocktail(visual, card_scale(revealed));
        decorate_sparkles(&mut picture, Color::liquid(&visual.color_hex), &mut self.rng);
        write_svg(path, picture.to_svg()).await;
    }

    async fn draw_portrait(&self, state: CharacterState) {
        debug!(%state, "Baron");
        let picture = render_portrait(state, PortraitSize::Medium);
        write_svg(&self.out_dir.join(PORTRAIT_FILE), picture.to_svg()).await;
    }
}

async fn write_svg(path: &Path, svg: String) {
    if let Err(e) = tokio::fs::write(path, svg).await {
        warn!(path = ?path, error = %e, "Failed to write illustration");
    }
}

/// `Midnight Ember`, 3 -> `03-midnight-ember.svg`
fn svg_file_name(name: &str, index: usize) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    let slug = if slug.is_empty() { "cocktail" } else { slug };
    format!("{index:02}-{slug}.svg")
}

/// Card text for a served cocktail
fn describe_cocktail(cocktail: &Cocktail) -> String {
    let recipe = &cocktail.recipe;
    format!(
        "\n  ── {} ──\n  {}\n  Base: {}  |  Adjunct: {}  |  Soul: {}\n  Taste: {}",
        cocktail.name,
        cocktail.visual_description,
        recipe.base,
        recipe.adjunct,
        recipe.soul,
        cocktail.taste,
    )
}

/// Card text for a whisper
fn describe_whisper(cocktail: &Cocktail) -> String {
    format!(
        "\n  \"{}\"\n  Now playing: {}\n  Backdrop: {}",
        cocktail.whisper,
        cocktail.music_suggestion,
        cocktail.atmosphere_image_url(),
    )
}

/// What a typed line means
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Reveal,
    Music,
    Quit,
    Say(String),
    Nothing,
}

fn parse_line(line: &str) -> Command {
    match line.trim() {
        "" => Command::Nothing,
        "/reveal" => Command::Reveal,
        "/music" => Command::Music,
        "/quit" | "/exit" => Command::Quit,
        text => Command::Say(text.to_string()),
    }
}

/// Latest cocktail card that has not been turned over
fn latest_hidden_card<B: BistroBackend + 'static>(conductor: &Conductor<B>) -> Option<MessageId> {
    let snapshot = conductor.snapshot();
    snapshot
        .messages
        .iter()
        .rev()
        .find(|m| m.is_artifact() && !snapshot.is_revealed(&m.id))
        .map(|m| m.id.clone())
}

/// Dispatch an event; long-running ones get their own task so typing goes on
fn dispatch<B: BistroBackend + 'static>(conductor: &Conductor<B>, event: SurfaceEvent) {
    let conductor = conductor.clone();
    tokio::spawn(async move { run_event(&conductor, event).await });
}

/// Handle one event, then give the prompt back after a submission
async fn run_event<B: BistroBackend + 'static>(conductor: &Conductor<B>, event: SurfaceEvent) {
    let refocus = matches!(event, SurfaceEvent::Submit { .. });
    if let Err(e) = conductor.handle_event(event).await {
        warn!(error = %e, "Event failed");
    }
    if refocus {
        if let Err(e) = conductor.handle_event(SurfaceEvent::FocusGained).await {
            warn!(error = %e, "Refocus failed");
        }
    }
}

/// Read lines from stdin until `/quit` or end of input
///
/// # Errors
///
/// Returns an error if stdin cannot be read or the printer is gone at quit.
pub async fn run_stdin<B: BistroBackend + 'static>(conductor: Conductor<B>) -> Result<()> {
    conductor.handle_event(SurfaceEvent::StartSession).await?;
    conductor.handle_event(SurfaceEvent::FocusGained).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        match parse_line(&line) {
            Command::Nothing => {}
            Command::Quit => break,
            Command::Music => conductor.handle_event(SurfaceEvent::ToggleMusic).await?,
            Command::Reveal => match latest_hidden_card(&conductor) {
                Some(message_id) => dispatch(&conductor, SurfaceEvent::Reveal { message_id }),
                None => println!("  (no card to turn over)"),
            },
            Command::Say(text) => {
                let event = SurfaceEvent::Submit { text };
                if event.is_long_running() {
                    dispatch(&conductor, event);
                } else {
                    conductor.handle_event(event).await?;
                }
            }
        }
    }

    conductor.handle_event(SurfaceEvent::Quit).await
}
