//! Fuzzy find for panefm.
//!
//! [search] ranks a haystack of strings against a query with the skim
//! algorithm from `fuzzy_matcher`. [find_streamed] walks a directory tree
//! in-process and hands matches back in bounded batches, so the UI can show
//! the first results while the walk is still running.
//!
//! Paths are matched with their separators flattened out, so a query such as
//! `srcmain` matches `src/main.rs`.

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Matches handed to the caller per batch.
pub const BATCH_SIZE: usize = 64;

/// Upper bound on visited entries, so a find started at `/` still finishes.
const MAX_VISITED: usize = 200_000;

/// Common directories excluded from the walk.
#[rustfmt::skip]
const EXCLUDES: &[&str] = &[
    ".git", ".hg", ".svn", ".rustup", ".cargo", "target", "node_modules", "dist",
    "venv", ".venv", "__pycache__", ".DS_Store", "build", "out", "obj"
];

/// A single find match: path, kind and fuzzy score.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct FindResult {
    path: PathBuf,
    is_dir: bool,
    score: i64,
}

/// Higher scores sort first; ties fall back to the shorter path.
impl Ord for FindResult {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .cmp(&self.score)
            .then_with(|| self.path.as_os_str().len().cmp(&other.path.as_os_str().len()))
            .then_with(|| self.path.cmp(&other.path))
    }
}

impl PartialOrd for FindResult {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FindResult {
    pub fn new(path: PathBuf, is_dir: bool, score: i64) -> Self {
        Self {
            path,
            is_dir,
            score,
        }
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline]
    pub fn is_dir(&self) -> bool {
        self.is_dir
    }

    /// Path relative to `base`, always with forward slashes.
    pub fn relative(&self, base: &Path) -> String {
        let rel = self.path.strip_prefix(base).unwrap_or(&self.path);
        normalize_separators(&rel.to_string_lossy()).into_owned()
    }
}

/// Ranks `haystack` against `query`, best match first. Returns indices into
/// `haystack` with their scores. An empty query matches everything in order.
pub fn search<S: AsRef<str>>(query: &str, haystack: &[S]) -> Vec<(usize, i64)> {
    if query.is_empty() {
        return (0..haystack.len()).map(|i| (i, 0)).collect();
    }
    let matcher = SkimMatcherV2::default();
    let mut ranked: Vec<(usize, i64)> = haystack
        .iter()
        .enumerate()
        .filter_map(|(i, s)| matcher.fuzzy_match(s.as_ref(), query).map(|score| (i, score)))
        .collect();
    // Stable, so equal scores keep haystack order
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

/// Walks `base` depth-first and calls `emit` with each batch of up to
/// [BATCH_SIZE] matches. Stops after `max_results` matches, or early when
/// `emit` returns false. Returns the number of matches emitted.
pub fn find_streamed(
    base: &Path,
    query: &str,
    max_results: usize,
    mut emit: impl FnMut(Vec<FindResult>) -> bool,
) -> io::Result<usize> {
    if query.is_empty() || max_results == 0 {
        return Ok(0);
    }
    // Surface an unreadable base as an error; deeper failures are skipped
    fs::read_dir(base)?;

    let matcher = SkimMatcherV2::default();
    let flat_query = flatten_separators(&normalize_separators(query));

    let mut stack = vec![base.to_path_buf()];
    let mut batch = Vec::with_capacity(BATCH_SIZE);
    let mut emitted = 0usize;
    let mut visited = 0usize;

    'walk: while let Some(dir) = stack.pop() {
        let Ok(read) = fs::read_dir(&dir) else {
            continue;
        };
        for entry in read.flatten() {
            visited += 1;
            if visited > MAX_VISITED {
                log::warn!("find: stopped after visiting {MAX_VISITED} entries");
                break 'walk;
            }
            let Ok(ft) = entry.file_type() else {
                continue;
            };
            let name = entry.file_name();
            let is_dir = ft.is_dir();
            if is_dir && EXCLUDES.iter().any(|ex| name == *ex) {
                continue;
            }

            let path = entry.path();
            if is_dir {
                // Symlinked dirs are reported but not descended, avoiding cycles
                stack.push(path.clone());
            }

            let rel = path.strip_prefix(base).unwrap_or(&path).to_string_lossy();
            let flat_rel = flatten_separators(&normalize_separators(&rel));
            let Some(score) = matcher.fuzzy_match(&flat_rel, &flat_query) else {
                continue;
            };

            batch.push(FindResult::new(path, is_dir, score));
            if emitted + batch.len() >= max_results || batch.len() >= BATCH_SIZE {
                emitted += batch.len();
                batch.sort();
                let full = emitted >= max_results;
                if !emit(std::mem::replace(&mut batch, Vec::with_capacity(BATCH_SIZE))) || full {
                    return Ok(emitted);
                }
            }
        }
    }

    if !batch.is_empty() {
        emitted += batch.len();
        batch.sort();
        emit(batch);
    }
    Ok(emitted)
}

fn normalize_separators(s: &str) -> Cow<'_, str> {
    if s.contains('\\') {
        Cow::Owned(s.replace('\\', "/"))
    } else {
        Cow::Borrowed(s)
    }
}

/// `src/core/find.rs` becomes `srccorefind.rs`.
fn flatten_separators(s: &str) -> String {
    s.chars().filter(|c| *c != '/' && *c != '\\').collect()
}
