//! Preview generation and the shared preview cache.
//!
//! [render_preview] produces the raw lines for the preview panel: text file
//! contents, a directory listing, `bat` output, or a bracketed message when
//! the target can't be shown. Failures never escape as errors; they are shown
//! inline in place of content. Lines are not width-fitted here; the renderer
//! sanitizes and truncates them.
//!
//! [PreviewCache] is shared by all preview worker threads, so it is
//! internally synchronized.

use crate::core::proc::{ProcError, preview_bat};
use crate::core::sort::SortOptions;
use crate::core::browse_dir;

use indexmap::IndexMap;
use parking_lot::Mutex;
use serde::Deserialize;

use std::ffi::OsString;
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind, Read, Seek};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

const MAX_PREVIEW_SIZE: u64 = 10 * 1024 * 1024;
const HEADER_PEEK_BYTES: usize = 8;
const BINARY_PEEK_BYTES: usize = 1024;
const CACHE_CAPACITY: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewMethod {
    #[default]
    Internal,
    Bat,
}

/// How previews are produced. Cloned into each preview task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewOptions {
    pub method: PreviewMethod,
    pub bat_args: Vec<OsString>,
    pub timeout: Duration,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            method: PreviewMethod::Internal,
            bat_args: vec![
                OsString::from("--color=always"),
                OsString::from("--style=plain"),
                OsString::from("--paging=never"),
            ],
            timeout: Duration::from_secs(2),
        }
    }
}

/// Lines to show for `path` in a panel of `width` x `height`.
pub fn render_preview(path: &Path, width: usize, height: usize, opts: &PreviewOptions) -> Vec<String> {
    render_checked(path, width, height, opts).0
}

/// The preview lines and whether they may be cached. A failed `bat` run is
/// shown once but retried on the next request.
fn render_checked(
    path: &Path,
    width: usize,
    height: usize,
    opts: &PreviewOptions,
) -> (Vec<String>, bool) {
    let Ok(meta) = std::fs::metadata(path) else {
        return (vec!["[Error: Access Denied]".to_string()], true);
    };

    if meta.is_dir() {
        return (preview_directory(path, height), true);
    }
    if meta.len() > MAX_PREVIEW_SIZE {
        return (vec!["[File too large for preview]".to_string()], true);
    }
    if !meta.is_file() {
        return (vec!["[Not a regular file]".to_string()], true);
    }

    if opts.method == PreviewMethod::Bat {
        let mut args = opts.bat_args.clone();
        args.push(OsString::from(format!("--terminal-width={width}")));
        return match preview_bat(path, height, &args, opts.timeout) {
            Ok(lines) => (lines, true),
            Err(e) => {
                log::debug!("bat preview of {} failed: {e}", path.display());
                (vec![bat_error_line(&e)], false)
            }
        };
    }
    (preview_text(path, height), true)
}

fn bat_error_line(err: &ProcError) -> String {
    match err {
        ProcError::NotFound { .. } => format!("[Error: {err}]"),
        _ => format!("[Error: bat {err}]"),
    }
}

/// Entries of a directory, directories first, with a trailing `/`.
pub fn preview_directory(path: &Path, max_lines: usize) -> Vec<String> {
    match browse_dir(path) {
        Ok(mut entries) => {
            SortOptions::default().sort(&mut entries);
            let total = entries.len();
            let mut lines: Vec<String> = entries
                .iter()
                .take(max_lines)
                .map(|e| {
                    if e.is_dir() {
                        format!("{}/", e.name_str())
                    } else {
                        e.name_str().into_owned()
                    }
                })
                .collect();

            if lines.is_empty() {
                lines.push("[empty directory]".to_string());
            } else if total > max_lines
                && let Some(last) = lines.last_mut()
            {
                *last = format!("... {} more", total - max_lines + 1);
            }
            lines
        }
        Err(e) => vec![format!("[Error: {e}]")],
    }
}

fn preview_text(path: &Path, max_lines: usize) -> Vec<String> {
    let mut file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            return vec![match e.kind() {
                ErrorKind::PermissionDenied => "[Error: Permission Denied]".to_string(),
                ErrorKind::NotFound => "[Error: File Not Found]".to_string(),
                _ => format!("[Error reading file: {e}]"),
            }];
        }
    };

    let mut header = [0u8; HEADER_PEEK_BYTES];
    let read = file.read(&mut header).unwrap_or(0);
    if read >= 5 && &header[..5] == b"%PDF-" {
        return vec!["[Binary file - preview hidden]".to_string()];
    }
    let mut buffer = [0u8; BINARY_PEEK_BYTES];
    let n = file.read(&mut buffer).unwrap_or(0);
    if header[..read].contains(&0) || buffer[..n].contains(&0) {
        return vec!["[Binary file - preview hidden]".to_string()];
    }
    if file.rewind().is_err() {
        return vec!["[Error reading file]".to_string()];
    }

    let lines: Vec<String> = BufReader::new(file)
        .lines()
        .take(max_lines)
        .map_while(Result::ok)
        .collect();
    if lines.is_empty() {
        vec!["[Empty file]".to_string()]
    } else {
        lines
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    path: PathBuf,
    width: usize,
    height: usize,
    modified: Option<SystemTime>,
}

/// Preview lines keyed by path, geometry and modification time, so an
/// edited file or a resized panel never hits a stale entry.
#[derive(Debug, Default)]
pub struct PreviewCache {
    entries: Mutex<IndexMap<CacheKey, Arc<Vec<String>>>>,
}

impl PreviewCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(path: &Path, width: usize, height: usize) -> CacheKey {
        let modified = std::fs::metadata(path).and_then(|m| m.modified()).ok();
        CacheKey {
            path: path.to_path_buf(),
            width,
            height,
            modified,
        }
    }

    pub fn get(&self, path: &Path, width: usize, height: usize) -> Option<Arc<Vec<String>>> {
        let key = Self::key(path, width, height);
        self.entries.lock().get(&key).cloned()
    }

    pub fn insert(&self, path: &Path, width: usize, height: usize, lines: Arc<Vec<String>>) {
        let key = Self::key(path, width, height);
        let mut map = self.entries.lock();
        if map.len() >= CACHE_CAPACITY && !map.contains_key(&key) {
            map.shift_remove_index(0);
        }
        map.insert(key, lines);
    }

    /// Cached lines, or freshly rendered ones stored for next time.
    pub fn get_or_render(
        &self,
        path: &Path,
        width: usize,
        height: usize,
        opts: &PreviewOptions,
    ) -> Arc<Vec<String>> {
        if let Some(hit) = self.get(path, width, height) {
            return hit;
        }
        let (lines, cacheable) = render_checked(path, width, height, opts);
        let lines = Arc::new(lines);
        if cacheable {
            self.insert(path, width, height, Arc::clone(&lines));
        }
        lines
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
