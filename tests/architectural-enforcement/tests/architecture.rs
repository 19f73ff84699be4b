//! Workspace-wide architecture rules

use architectural_enforcement::{find_violations, sources, workspace_root, PRODUCTION_CRATES};

fn all_sources() -> Vec<architectural_enforcement::SourceFile> {
    PRODUCTION_CRATES.iter().flat_map(|c| sources(c)).collect()
}

#[test]
fn sources_are_found() {
    let files = all_sources();
    assert!(files.iter().any(|f| f.is("conductor/core/src/conductor.rs")));
    assert!(files.iter().any(|f| f.is("conductor/daemon/src/main.rs")));
}

/// Timeline delays go through `Pacer` so tests can run on virtual time
#[test]
fn no_sleep_outside_pacing() {
    let files: Vec<_> = all_sources()
        .into_iter()
        .filter(|f| !f.is("conductor/core/src/pacing.rs"))
        .collect();

    let violations = find_violations(&files, &["sleep("]);
    assert!(
        violations.is_empty(),
        "sleep() outside pacing.rs:\n{}",
        violations.join("\n")
    );
}

#[test]
fn no_unwrap_or_expect_in_production_code() {
    let violations = find_violations(&all_sources(), &[".unwrap()", ".expect("]);
    assert!(
        violations.is_empty(),
        "unwrap()/expect() in production code:\n{}",
        violations.join("\n")
    );
}

/// Rendering is a pure function of the cocktail structure
#[test]
fn renderer_is_pure() {
    let render: Vec<_> = sources("conductor/core")
        .into_iter()
        .filter(|f| f.path.components().any(|c| c.as_os_str() == "render"))
        .filter(|f| !f.is("render/mod.rs"))
        .collect();
    assert!(!render.is_empty());

    let violations = find_violations(&render, &["tokio", "reqwest", "rand::", "chrono", "std::fs"]);
    assert!(
        violations.is_empty(),
        "render must stay pure:\n{}",
        violations.join("\n")
    );

    // mod.rs may only use randomness in the sparkle pass
    let module = sources("conductor/core")
        .into_iter()
        .find(|f| f.is("render/mod.rs"));
    let module = module.map(|m| m.text).unwrap_or_default();
    let render_fn = module
        .split("pub fn render_cocktail")
        .nth(1)
        .and_then(|rest| rest.split("pub fn decorate_sparkles").next())
        .unwrap_or_default();
    assert!(!render_fn.is_empty());
    assert!(!render_fn.contains("rng"), "render_cocktail must not be randomized");
}

/// The core knows nothing about terminals or CLIs
#[test]
fn core_is_ui_agnostic() {
    let manifest = std::fs::read_to_string(workspace_root().join("conductor/core/Cargo.toml"))
        .unwrap_or_default();
    for forbidden in ["clap", "tracing-subscriber", "ratatui", "crossterm"] {
        assert!(
            !manifest.contains(forbidden),
            "conductor/core must not depend on {forbidden}"
        );
    }

    let violations = find_violations(&sources("conductor/core"), &["println!", "eprintln!"]);
    assert!(
        violations.is_empty(),
        "core must not print:\n{}",
        violations.join("\n")
    );
}
