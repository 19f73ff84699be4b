//! Integration tests for the bistro core
//!
//! These tests drive the public API the way a surface would:
//! - Character state traces through the submission timeline
//! - Busy rejection while a timeline is suspended (paused tokio clock)
//! - Collaborator failures
//! - The reveal/whisper flow and whisper de-duplication
//! - Renderer properties
//! - TOML configuration feeding the Conductor

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use tokio::sync::mpsc;

use bistro_core::backend::{BackendError, BistroBackend};
use bistro_core::cocktail::{Cocktail, Garnish, GlassType, Ice, Recipe, VisualStructure};
use bistro_core::config::{load_config_from_path, ConfigOverrides, ConfigSource};
use bistro_core::messages::MessageRole;
use bistro_core::pacing::{Beat, RecordingPacer};
use bistro_core::render::{render_cocktail, Layer, Shape};
use bistro_core::session::{HistoryPolicy, HistoryTurn, MessageKind, Screen};
use bistro_core::{
    CharacterState, Conductor, ConductorConfig, ConductorMessage, NoAudio, RevealOutcome,
    SubmitOutcome, SubmitRejection, SurfaceEvent,
};

// =============================================================================
// Test Helpers
// =============================================================================

#[derive(Clone)]
enum MixScript {
    Serve(Cocktail),
    Nothing,
    Fail,
}

/// Backend with canned answers that records what it was asked
struct ScriptedBackend {
    reply: Option<String>,
    mixes: Mutex<Vec<MixScript>>,
    chat_delay: Duration,
    histories: Mutex<Vec<Vec<HistoryTurn>>>,
    moods: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    fn new(reply: &str, mix: MixScript) -> Self {
        Self {
            reply: Some(reply.to_string()),
            mixes: Mutex::new(vec![mix]),
            chat_delay: Duration::ZERO,
            histories: Mutex::new(Vec::new()),
            moods: Mutex::new(Vec::new()),
        }
    }

    fn failing_chat() -> Self {
        Self {
            reply: None,
            ..Self::new("", MixScript::Nothing)
        }
    }

    fn with_chat_delay(mut self, delay: Duration) -> Self {
        self.chat_delay = delay;
        self
    }
}

#[async_trait]
impl BistroBackend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn chat(&self, _user_text: &str, history: &[HistoryTurn]) -> Result<String, BackendError> {
        self.histories.lock().push(history.to_vec());
        if !self.chat_delay.is_zero() {
            tokio::time::sleep(self.chat_delay).await;
        }
        self.reply.clone().ok_or(BackendError::EmptyCandidate)
    }

    async fn mix(&self, mood: &str) -> Result<Option<Cocktail>, BackendError> {
        self.moods.lock().push(mood.to_string());
        let script = {
            let mut mixes = self.mixes.lock();
            if mixes.len() > 1 {
                mixes.remove(0)
            } else {
                mixes[0].clone()
            }
        };
        match script {
            MixScript::Serve(cocktail) => Ok(Some(cocktail)),
            MixScript::Nothing => Ok(None),
            MixScript::Fail => Err(BackendError::Status {
                status: 503,
                body: "overloaded".to_string(),
            }),
        }
    }
}

fn midnight_ember() -> Cocktail {
    Cocktail {
        name: "Midnight Ember".to_string(),
        recipe: Recipe {
            base: "Smoked bourbon".to_string(),
            adjunct: "Blood orange".to_string(),
            soul: "A sigh at the end of autumn".to_string(),
        },
        visual_description: "Amber in a rocks glass, a cherry on the rim".to_string(),
        visual_structure: VisualStructure::new(GlassType::Rocks, Garnish::Cherry, Ice::Cubes, "#EA580C"),
        taste: "Smoke, then citrus, then warmth".to_string(),
        whisper: "Even embers remember the fire, meow".to_string(),
        music_suggestion: "Chet Baker - Almost Blue".to_string(),
        image_keyword: "city_night".to_string(),
    }
}

struct Harness {
    conductor: Conductor<ScriptedBackend>,
    pacer: Arc<RecordingPacer>,
    rx: mpsc::Receiver<ConductorMessage>,
}

fn harness(backend: ScriptedBackend, config: ConductorConfig, pacer: RecordingPacer) -> Harness {
    let (tx, rx) = mpsc::channel(1024);
    let pacer = Arc::new(pacer);
    let conductor = Conductor::with_components(
        backend,
        config,
        Arc::clone(&pacer) as Arc<dyn bistro_core::Pacer>,
        Box::new(NoAudio),
        tx,
    );
    Harness {
        conductor,
        pacer,
        rx,
    }
}

fn drain(rx: &mut mpsc::Receiver<ConductorMessage>) -> Vec<ConductorMessage> {
    let mut out = Vec::new();
    while let Ok(msg) = rx.try_recv() {
        out.push(msg);
    }
    out
}

fn state_trace(messages: &[ConductorMessage]) -> Vec<CharacterState> {
    messages
        .iter()
        .filter_map(|m| match m {
            ConductorMessage::State { state } => Some(*state),
            _ => None,
        })
        .collect()
}

// =============================================================================
// Submission Timeline
// =============================================================================

#[tokio::test]
async fn test_successful_turn_state_trace() {
    let mut h = harness(
        ScriptedBackend::new("I hear you... meow", MixScript::Serve(midnight_ember())),
        ConductorConfig::default(),
        RecordingPacer::instant(),
    );

    assert_eq!(h.conductor.character_state(), CharacterState::Idle);
    let outcome = h.conductor.submit("I feel lonely tonight").await;
    assert!(matches!(outcome, SubmitOutcome::Completed { artifact: Some(_), .. }));

    assert_eq!(
        state_trace(&drain(&mut h.rx)),
        vec![
            CharacterState::Thinking,
            CharacterState::Talking,
            CharacterState::Mixing,
            CharacterState::Serving,
            CharacterState::Idle,
        ]
    );

    assert_eq!(
        h.pacer.beats(),
        vec![
            (Beat::ReplyToMix, Duration::from_millis(2000)),
            (Beat::MixToServe, Duration::from_millis(3000)),
            (Beat::ServeToIdle, Duration::from_millis(5000)),
        ]
    );
}

#[tokio::test]
async fn test_repeated_turns_repeat_the_trace() {
    let mut h = harness(
        ScriptedBackend::new("meow", MixScript::Serve(midnight_ember())),
        ConductorConfig::default(),
        RecordingPacer::instant(),
    );

    for mood in ["tired", "hopeful", "restless"] {
        h.conductor.submit(mood).await;
        assert_eq!(
            state_trace(&drain(&mut h.rx)),
            vec![
                CharacterState::Thinking,
                CharacterState::Talking,
                CharacterState::Mixing,
                CharacterState::Serving,
                CharacterState::Idle,
            ],
            "trace for {mood}"
        );
    }
    assert_eq!(h.conductor.snapshot().messages.len(), 9);
}

#[tokio::test]
async fn test_midnight_ember_log() {
    let h = harness(
        ScriptedBackend::new("I hear you... 喵", MixScript::Serve(midnight_ember())),
        ConductorConfig::default(),
        RecordingPacer::instant(),
    );

    h.conductor.submit("I feel lonely tonight").await;

    let messages = h.conductor.snapshot().messages;
    assert_eq!(messages.len(), 3);

    assert_eq!(messages[0].role, MessageRole::User);
    assert_eq!(messages[0].content, "I feel lonely tonight");
    assert_eq!(messages[0].kind, MessageKind::Plain);

    assert_eq!(messages[1].role, MessageRole::Assistant);
    assert_eq!(messages[1].content, "I hear you... 喵");

    assert!(messages[2].is_artifact());
    assert_eq!(
        messages[2].cocktail().map(|c| c.name.as_str()),
        Some("Midnight Ember")
    );
}

#[tokio::test]
async fn test_mix_receives_the_submitted_text() {
    let h = harness(
        ScriptedBackend::new("meow", MixScript::Nothing),
        ConductorConfig::default(),
        RecordingPacer::instant(),
    );

    h.conductor.submit("  rain on the window  ").await;
    assert_eq!(
        h.conductor.backend().moods.lock().clone(),
        vec!["rain on the window".to_string()]
    );

    // No cocktail: Baron still serves and returns to idle, but nothing is appended
    let messages = h.conductor.snapshot().messages;
    assert_eq!(messages[0].content, "  rain on the window  ");
    assert_eq!(messages.len(), 2);
    assert_eq!(h.conductor.character_state(), CharacterState::Idle);
}

#[tokio::test]
async fn test_empty_reply_becomes_placeholder() {
    let h = harness(
        ScriptedBackend::new("   ", MixScript::Nothing),
        ConductorConfig::default(),
        RecordingPacer::instant(),
    );

    h.conductor.submit("hello").await;
    assert_eq!(h.conductor.snapshot().messages[1].content, "...");
}

// =============================================================================
// Busy Rejection (paused clock)
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_submit_while_busy_has_no_effect() {
    let h = harness(
        ScriptedBackend::new("meow", MixScript::Serve(midnight_ember()))
            .with_chat_delay(Duration::from_millis(500)),
        ConductorConfig::default(),
        RecordingPacer::new(),
    );

    let timeline = {
        let conductor = h.conductor.clone();
        tokio::spawn(async move { conductor.submit("first").await })
    };

    let busy_checks = [
        // (advance by, expected state)
        (Duration::from_millis(100), CharacterState::Thinking),
        (Duration::from_millis(1000), CharacterState::Talking),
        (Duration::from_millis(2000), CharacterState::Mixing),
        (Duration::from_millis(3000), CharacterState::Serving),
    ];

    for (advance, expected) in busy_checks {
        tokio::time::sleep(advance).await;

        let before = h.conductor.snapshot();
        assert_eq!(before.character_state, expected);

        let outcome = h.conductor.submit("second").await;
        assert_eq!(
            outcome,
            SubmitOutcome::Ignored(SubmitRejection::Busy(expected))
        );

        let after = h.conductor.snapshot();
        assert_eq!(after.messages, before.messages);
        assert_eq!(after.character_state, before.character_state);
    }

    let outcome = timeline.await.unwrap();
    assert!(matches!(outcome, SubmitOutcome::Completed { artifact: Some(_), .. }));
    assert_eq!(h.conductor.character_state(), CharacterState::Idle);
    assert_eq!(h.conductor.snapshot().messages.len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_intermediate_narration_and_input() {
    let h = harness(
        ScriptedBackend::new("meow", MixScript::Serve(midnight_ember())),
        ConductorConfig::default(),
        RecordingPacer::new(),
    );

    let timeline = {
        let conductor = h.conductor.clone();
        tokio::spawn(async move { conductor.submit("first").await })
    };

    tokio::time::sleep(Duration::from_millis(100)).await;
    let talking = h.conductor.snapshot();
    assert_eq!(talking.narration.as_deref(), Some("Baron answers softly..."));
    assert!(talking.input.enabled);

    tokio::time::sleep(Duration::from_millis(2000)).await;
    let mixing = h.conductor.snapshot();
    assert!(!mixing.input.enabled);
    assert_eq!(mixing.input.placeholder, "Baron is mixing something for you...");

    timeline.await.unwrap();
    let idle = h.conductor.snapshot();
    assert_eq!(idle.narration, None);
    assert!(idle.input.enabled);
}

#[tokio::test(start_paused = true)]
async fn test_focus_during_timeline_does_not_disturb_it() {
    let mut h = harness(
        ScriptedBackend::new("meow", MixScript::Nothing),
        ConductorConfig::default(),
        RecordingPacer::new(),
    );

    let timeline = {
        let conductor = h.conductor.clone();
        tokio::spawn(async move { conductor.submit("first").await })
    };

    tokio::time::sleep(Duration::from_millis(100)).await;
    h.conductor.focus().await;
    h.conductor.blur().await;
    assert_eq!(h.conductor.character_state(), CharacterState::Talking);

    timeline.await.unwrap();
    assert_eq!(
        state_trace(&drain(&mut h.rx)),
        vec![
            CharacterState::Thinking,
            CharacterState::Talking,
            CharacterState::Mixing,
            CharacterState::Serving,
            CharacterState::Idle,
        ]
    );
}

// =============================================================================
// Collaborator Failures
// =============================================================================

#[tokio::test]
async fn test_mix_failure_trace() {
    let mut h = harness(
        ScriptedBackend::new("meow", MixScript::Fail),
        ConductorConfig::default(),
        RecordingPacer::instant(),
    );

    let outcome = h.conductor.submit("I feel lonely tonight").await;
    assert_eq!(outcome, SubmitOutcome::Aborted);

    assert_eq!(
        state_trace(&drain(&mut h.rx)),
        vec![
            CharacterState::Thinking,
            CharacterState::Talking,
            CharacterState::Mixing,
            CharacterState::Idle,
        ]
    );

    let snapshot = h.conductor.snapshot();
    assert!(snapshot.messages.iter().all(|m| !m.is_artifact()));
    assert_eq!(snapshot.messages.len(), 2);
    assert_eq!(snapshot.narration, None);
}

#[tokio::test]
async fn test_reply_failure_resets_to_idle() {
    let mut h = harness(
        ScriptedBackend::failing_chat(),
        ConductorConfig::default(),
        RecordingPacer::instant(),
    );

    assert_eq!(h.conductor.submit("hello").await, SubmitOutcome::Aborted);
    assert_eq!(
        state_trace(&drain(&mut h.rx)),
        vec![CharacterState::Thinking, CharacterState::Idle]
    );
    // Only the guest's own message; failures are never shown
    assert_eq!(h.conductor.snapshot().messages.len(), 1);
    assert!(h.pacer.beats().is_empty());

    // The bar is open again
    h.conductor.focus().await;
    assert_eq!(h.conductor.character_state(), CharacterState::Listening);
}

// =============================================================================
// Reveal / Whisper
// =============================================================================

#[tokio::test]
async fn test_reveal_appends_one_whisper() {
    let h = harness(
        ScriptedBackend::new("meow", MixScript::Serve(midnight_ember())),
        ConductorConfig::default(),
        RecordingPacer::instant(),
    );

    let card = match h.conductor.submit("I feel lonely tonight").await {
        SubmitOutcome::Completed {
            artifact: Some(card),
            ..
        } => card,
        other => panic!("expected a served cocktail, got {other:?}"),
    };

    let whisper_id = match h.conductor.reveal(&card).await {
        RevealOutcome::Whispered(id) => id,
        other => panic!("expected a whisper, got {other:?}"),
    };

    let snapshot = h.conductor.snapshot();
    assert!(snapshot.is_revealed(&card));
    assert_eq!(snapshot.narration.as_deref(), Some(bistro_core::Narration::Revealing.text()));

    let whisper = snapshot.message(&whisper_id).unwrap();
    assert!(whisper.is_whisper());
    assert_eq!(whisper.role, MessageRole::Assistant);
    assert!(Arc::ptr_eq(
        whisper.cocktail().unwrap(),
        snapshot.message(&card).unwrap().cocktail().unwrap()
    ));

    // The card only fires once
    assert_eq!(h.conductor.reveal(&card).await, RevealOutcome::AlreadyRevealed);
    assert_eq!(h.conductor.snapshot().messages.len(), 4);
    assert_eq!(
        h.pacer.beats().last(),
        Some(&(Beat::Reveal, Duration::from_millis(1500)))
    );
}

#[tokio::test]
async fn test_whisper_deduplicated_by_name() {
    let h = harness(
        ScriptedBackend::new("meow", MixScript::Serve(midnight_ember())),
        ConductorConfig::default(),
        RecordingPacer::instant(),
    );

    h.conductor.submit("lonely").await;
    h.conductor.submit("still lonely").await;

    let cards: Vec<_> = h
        .conductor
        .snapshot()
        .messages
        .into_iter()
        .filter(|m| m.is_artifact())
        .map(|m| m.id)
        .collect();
    assert_eq!(cards.len(), 2);

    assert!(matches!(
        h.conductor.reveal(&cards[0]).await,
        RevealOutcome::Whispered(_)
    ));
    assert_eq!(
        h.conductor.reveal(&cards[1]).await,
        RevealOutcome::DuplicateWhisper
    );

    let snapshot = h.conductor.snapshot();
    let whispers = snapshot.messages.iter().filter(|m| m.is_whisper()).count();
    assert_eq!(whispers, 1);
    // The second card is still turned over
    assert!(snapshot.is_revealed(&cards[1]));
}

#[tokio::test]
async fn test_reveal_ignores_plain_and_unknown_messages() {
    let h = harness(
        ScriptedBackend::new("meow", MixScript::Nothing),
        ConductorConfig::default(),
        RecordingPacer::instant(),
    );

    h.conductor.submit("hello").await;
    let plain = h.conductor.snapshot().messages[0].id.clone();

    assert_eq!(h.conductor.reveal(&plain).await, RevealOutcome::NotAnArtifact);
    assert_eq!(
        h.conductor.reveal(&"msg_missing".into()).await,
        RevealOutcome::UnknownMessage
    );
    assert_eq!(h.conductor.snapshot().messages.len(), 2);
    assert!(h.pacer.beats().iter().all(|(beat, _)| *beat != Beat::Reveal));
}

// =============================================================================
// Surface Events
// =============================================================================

#[tokio::test]
async fn test_event_driven_session() {
    let mut h = harness(
        ScriptedBackend::new("Sit down, meow.", MixScript::Serve(midnight_ember())),
        ConductorConfig::default(),
        RecordingPacer::instant(),
    );

    assert_eq!(h.conductor.snapshot().screen, Screen::Intro);
    h.conductor.handle_event(SurfaceEvent::StartSession).await.unwrap();
    assert_eq!(h.conductor.snapshot().screen, Screen::Chatting);

    h.conductor.handle_event(SurfaceEvent::FocusGained).await.unwrap();
    assert_eq!(h.conductor.character_state(), CharacterState::Listening);

    h.conductor
        .handle_event(SurfaceEvent::InputChanged {
            text: "a quiet kind of happy".into(),
        })
        .await
        .unwrap();
    h.conductor.handle_event(SurfaceEvent::SubmitPending).await.unwrap();

    let snapshot = h.conductor.snapshot();
    assert_eq!(snapshot.pending_input, "");
    assert_eq!(snapshot.messages.len(), 4);
    assert_eq!(snapshot.messages[1].content, "a quiet kind of happy");

    let messages = drain(&mut h.rx);
    assert!(matches!(
        messages.first(),
        Some(ConductorMessage::ScreenChanged {
            screen: Screen::Chatting
        })
    ));
    assert!(messages
        .iter()
        .any(|m| matches!(m, ConductorMessage::InputCleared)));
    assert_eq!(
        h.pacer.beats().first(),
        Some(&(Beat::Greeting, Duration::from_millis(1000)))
    );
}

#[tokio::test]
async fn test_history_policy_include_artifacts() {
    let backend = ScriptedBackend::new("meow", MixScript::Serve(midnight_ember()));
    let (tx, _rx) = mpsc::channel(1024);
    let conductor = Conductor::with_components(
        backend,
        ConductorConfig {
            history_policy: HistoryPolicy::IncludeArtifacts,
            max_history_turns: 2,
            ..ConductorConfig::default()
        },
        Arc::new(RecordingPacer::instant()),
        Box::new(NoAudio),
        tx,
    );

    conductor.submit("first").await;
    conductor.submit("second").await;

    let histories = conductor.backend().histories.lock().clone();
    assert_eq!(
        histories[1],
        vec![
            HistoryTurn::new(MessageRole::Assistant, "meow"),
            HistoryTurn::new(MessageRole::Assistant, "[Served a cocktail: Midnight Ember]"),
        ]
    );
}

// =============================================================================
// Renderer
// =============================================================================

#[test]
fn test_render_is_pure() {
    for glass in GlassType::ALL {
        for garnish in Garnish::ALL {
            for ice in Ice::ALL {
                let visual = VisualStructure::new(glass, garnish, ice, "#9333ea");
                assert_eq!(render_cocktail(&visual, 1.0), render_cocktail(&visual, 1.0));
            }
        }
    }
}

#[test]
fn test_stemmed_glasses_never_have_ice() {
    for glass in [GlassType::Martini, GlassType::Coupe, GlassType::Flute] {
        for ice in Ice::ALL {
            let picture = render_cocktail(&VisualStructure::new(glass, Garnish::None, ice, "#fff"), 1.0);
            assert_eq!(picture.count(Layer::Ice), 0, "{glass:?} with {ice:?}");
            assert!(picture.has(Layer::StemBase));
        }
    }
}

#[test]
fn test_rocks_cherry_cubes() {
    let picture = render_cocktail(&midnight_ember().visual_structure, 1.0);

    let outlines: Vec<&Shape> = picture.layer(Layer::Glass).map(|e| &e.shape).collect();
    assert_eq!(
        outlines,
        vec![&Shape::Path(
            "M25 25 L28 95 Q28 100 50 100 Q72 100 72 95 L75 25".to_string()
        )]
    );
    assert_eq!(picture.count(Layer::Ice), 3);
    assert!(!picture.has(Layer::StemBase));

    let cherries = picture
        .layer(Layer::Garnish)
        .filter(|e| matches!(e.shape, Shape::Circle { r, .. } if (r - 5.0).abs() < f32::EPSILON))
        .count();
    assert_eq!(cherries, 1);

    let svg = picture.to_svg();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("viewBox=\"0 0 100 120\""));
}

#[test]
fn test_scale_resizes_without_moving_elements() {
    let visual = midnight_ember().visual_structure;
    let small = render_cocktail(&visual, 0.8);
    let large = render_cocktail(&visual, 1.2);

    assert_eq!(small.elements, large.elements);
    assert_eq!(small.view_box, large.view_box);
    assert!(large.width_rem > small.width_rem);

    let fallback = render_cocktail(&visual, f32::NAN);
    assert!((fallback.width_rem - 10.0).abs() < f32::EPSILON);
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn test_config_file_feeds_conductor() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bistro.toml");
    std::fs::write(
        &path,
        r#"
[pacing]
reply_to_mix_ms = 20
mix_to_serve_ms = 30
serve_to_idle_ms = 50

[conversation]
mix_policy = "never"
max_input_chars = 280
"#,
    )
    .unwrap();

    let config = load_config_from_path(Some(path), &ConfigOverrides::default()).unwrap();
    assert_eq!(config.conductor.pacing.reply_to_mix, Duration::from_millis(20));
    assert_eq!(config.conductor.pacing.reveal, Duration::from_millis(1500));
    assert_eq!(config.conductor.max_input_chars, 280);
    assert_eq!(config.source("conversation.mix_policy"), ConfigSource::File);
    assert_eq!(config.source("backend.model"), ConfigSource::Default);
}
