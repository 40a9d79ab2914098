//! Hygiene: scans the atlas production sources for patterns that crash the
//! page or swallow errors. Every budget is zero. The core must absorb bad
//! storage, bad datasets and stale ids by logging, never by panicking.

use std::fs;
use std::path::{Path, PathBuf};

/// Pattern, budget, what it means.
const BUDGETS: &[(&str, usize, &str)] = &[
    (".unwrap()", 0, "panics on None/Err"),
    (".expect(", 0, "panics on None/Err"),
    ("panic!(", 0, "explicit panic"),
    ("unreachable!(", 0, "explicit panic"),
    ("todo!(", 0, "unfinished code"),
    ("unimplemented!(", 0, "unfinished code"),
    ("let _ =", 0, "discarded result"),
    (".ok()", 0, "error dropped without logging"),
    ("#[allow(dead_code)]", 0, "unused code kept alive"),
];

/// Production `.rs` files under `src/`, sibling `_test.rs` files excluded.
fn production_sources() -> Vec<(PathBuf, String)> {
    let mut out = Vec::new();
    walk(Path::new("src"), &mut out);
    out.sort_by(|a, b| a.0.cmp(&b.0));
    out
}

fn walk(dir: &Path, out: &mut Vec<(PathBuf, String)>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for path in entries.flatten().map(|e| e.path()) {
        if path.is_dir() {
            walk(&path, out);
            continue;
        }
        let is_rs = path.extension().is_some_and(|e| e == "rs");
        let is_test = path.to_string_lossy().ends_with("_test.rs");
        if is_rs && !is_test {
            if let Ok(text) = fs::read_to_string(&path) {
                out.push((path, text));
            }
        }
    }
}

fn offenders(sources: &[(PathBuf, String)], pattern: &str) -> Vec<String> {
    let mut hits = Vec::new();
    for (path, text) in sources {
        for (n, line) in text.lines().enumerate() {
            if line.contains(pattern) {
                hits.push(format!("  {}:{}: {}", path.display(), n + 1, line.trim()));
            }
        }
    }
    hits
}

#[test]
fn sources_are_found() {
    let sources = production_sources();
    assert!(sources.iter().any(|(p, _)| p.ends_with("engine.rs")), "run from the atlas crate root");
}

#[test]
fn pattern_budgets() {
    let sources = production_sources();
    let mut report = Vec::new();
    for &(pattern, budget, why) in BUDGETS {
        let hits = offenders(&sources, pattern);
        if hits.len() > budget {
            report.push(format!("`{pattern}` ({why}): {} found, budget {budget}\n{}", hits.len(), hits.join("\n")));
        }
    }
    assert!(report.is_empty(), "hygiene budgets exceeded:\n{}", report.join("\n"));
}
