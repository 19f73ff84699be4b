//! Architectural Enforcement Integration Tests
//!
//! This package contains integration tests that enforce architectural principles:
//! - Timeline delays only go through the pacer (no stray `sleep()` calls)
//! - No `unwrap()`/`expect()` in production code
//! - The renderer stays pure (no runtime, network or randomness in its core)
//! - The core crate stays UI-agnostic
//!
//! The helpers below walk the workspace sources; the rules live in `tests/`.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Workspace root (two levels above this package)
#[must_use]
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("..")
}

/// A Rust source file under a crate's `src/`
#[derive(Debug)]
pub struct SourceFile {
    /// Path relative to the workspace root
    pub path: PathBuf,
    /// File contents
    pub text: String,
}

impl SourceFile {
    /// Lines before the first `#[cfg(test)]`, skipping comments
    ///
    /// Yields `(line_number, line)` with 1-based line numbers.
    pub fn production_lines(&self) -> impl Iterator<Item = (usize, &str)> {
        self.text
            .lines()
            .enumerate()
            .take_while(|(_, line)| !line.trim_start().starts_with("#[cfg(test)]"))
            .filter(|(_, line)| !line.trim_start().starts_with("//"))
            .map(|(i, line)| (i + 1, line))
    }

    /// Whether the path ends with the given components (e.g. `render/mod.rs`)
    #[must_use]
    pub fn is(&self, suffix: &str) -> bool {
        self.path.ends_with(suffix)
    }
}

/// All `.rs` files under `<crate_dir>/src`
///
/// # Panics
///
/// Panics if a source file cannot be read.
#[must_use]
pub fn sources(crate_dir: &str) -> Vec<SourceFile> {
    let root = workspace_root();
    let src = root.join(crate_dir).join("src");

    let mut files: Vec<SourceFile> = WalkDir::new(&src)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "rs"))
        .map(|e| {
            let path = e.path().strip_prefix(&root).unwrap_or(e.path()).to_path_buf();
            let text = fs::read_to_string(e.path())
                .unwrap_or_else(|err| panic!("cannot read {}: {err}", e.path().display()));
            SourceFile { path, text }
        })
        .collect();

    files.sort_by(|a, b| a.path.cmp(&b.path));
    files
}

/// Production crates checked by the rules
pub const PRODUCTION_CRATES: [&str; 2] = ["conductor/core", "conductor/daemon"];

/// Every production line containing one of `needles`, as `path:line: text`
#[must_use]
pub fn find_violations(files: &[SourceFile], needles: &[&str]) -> Vec<String> {
    files
        .iter()
        .flat_map(|file| {
            file.production_lines()
                .filter(|(_, line)| needles.iter().any(|n| line.contains(n)))
                .map(|(n, line)| format!("{}:{n}: {}", file.path.display(), line.trim()))
                .collect::<Vec<_>>()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_lines_stop_at_tests() {
        let file = SourceFile {
            path: PathBuf::from("x.rs"),
            text: "fn a() {}\n// note\nfn b() {}\n#[cfg(test)]\nmod tests {}\n".to_string(),
        };
        let lines: Vec<(usize, &str)> = file.production_lines().collect();
        assert_eq!(lines, vec![(1, "fn a() {}"), (3, "fn b() {}")]);
    }
}
