//! Background workers for panefm.
//!
//! Directory listings, previews, recursive finds and shell commands run on
//! dedicated threads. Requests [WorkerTask] come in from the AppState via
//! channels, and results [WorkerResponse] go back the same way.
//!
//! Workers never touch UI state. Every task carries the [Ticket] it was
//! issued with and every response hands it back inside a [Completed], so the
//! owner can decide whether the result still matches what it is showing.
//! Nothing in flight is ever cancelled; superseded work runs to completion
//! and is discarded on arrival.
//!
//! # Caution:
//! This module is the protocol boundary between the UI loop and the worker
//! threads. Adding or changing variants needs matching changes in the
//! response handling of [crate::app::AppState].

use crate::app::request::{Completed, Ticket};
use crate::core::find::{FindResult, find_streamed, search};
use crate::core::preview::{PreviewCache, PreviewOptions};
use crate::core::proc::{CommandOutcome, run_shell};
use crate::core::sort::SortOptions;
use crate::core::{FileEntry, browse_dir};

use crossbeam_channel::{Receiver, Sender, unbounded};

use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Preview threads sharing one task queue and one cache.
const PREVIEW_THREADS: usize = 2;

/// Inputs a directory listing must still match when it arrives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingContext {
    pub location: PathBuf,
    pub query: String,
    pub sort: SortOptions,
    pub show_hidden: bool,
}

/// Inputs a preview must still match: target and panel geometry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewContext {
    pub path: PathBuf,
    pub width: usize,
    pub height: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindContext {
    pub base: PathBuf,
    pub query: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellContext {
    pub workdir: PathBuf,
    pub command: String,
}

/// Tasks sent to the workers.
#[derive(Debug)]
pub enum WorkerTask {
    LoadDirectory {
        panel_id: u64,
        ticket: Ticket<ListingContext>,
    },
    LoadPreview {
        ticket: Ticket<PreviewContext>,
        options: PreviewOptions,
    },
    FindRecursive {
        ticket: Ticket<FindContext>,
        max_results: usize,
    },
    RunShell {
        ticket: Ticket<ShellContext>,
        timeout: Duration,
    },
}

/// Responses sent from the workers back to the main loop.
#[derive(Debug)]
pub enum WorkerResponse {
    DirectoryLoaded {
        panel_id: u64,
        result: Completed<ListingContext, Result<Vec<FileEntry>, String>>,
    },
    PreviewLoaded(Completed<PreviewContext, Arc<Vec<String>>>),
    /// One partial, score-sorted batch of find matches.
    FindBatch(Completed<FindContext, Vec<FindResult>>),
    /// Terminal message of a find: total matches, or the walk error.
    FindFinished(Completed<FindContext, Result<usize, String>>),
    ShellFinished(Completed<ShellContext, CommandOutcome>),
}

/// Channels to the worker threads.
///
/// Each concern (listing, preview, find, shell) has its own queue so a slow
/// find never delays a directory listing.
pub struct Workers {
    io_tx: Sender<WorkerTask>,
    preview_tx: Sender<WorkerTask>,
    find_tx: Sender<WorkerTask>,
    shell_tx: Sender<WorkerTask>,
    response_rx: Receiver<WorkerResponse>,
    preview_cache: Arc<PreviewCache>,
}

impl Workers {
    /// Spawns the worker threads.
    pub fn spawn() -> Self {
        let (io_tx, io_rx) = unbounded::<WorkerTask>();
        let (preview_tx, preview_rx) = unbounded::<WorkerTask>();
        let (find_tx, find_rx) = unbounded::<WorkerTask>();
        let (shell_tx, shell_rx) = unbounded::<WorkerTask>();
        let (res_tx, response_rx) = unbounded::<WorkerResponse>();
        let preview_cache = Arc::new(PreviewCache::new());

        start_io_worker(io_rx, res_tx.clone());
        for _ in 0..PREVIEW_THREADS {
            start_preview_worker(preview_rx.clone(), res_tx.clone(), Arc::clone(&preview_cache));
        }
        start_find_worker(find_rx, res_tx.clone());
        start_shell_worker(shell_rx, res_tx);

        Self {
            io_tx,
            preview_tx,
            find_tx,
            shell_tx,
            response_rx,
            preview_cache,
        }
    }

    #[inline]
    pub fn io_tx(&self) -> &Sender<WorkerTask> {
        &self.io_tx
    }

    #[inline]
    pub fn preview_tx(&self) -> &Sender<WorkerTask> {
        &self.preview_tx
    }

    #[inline]
    pub fn find_tx(&self) -> &Sender<WorkerTask> {
        &self.find_tx
    }

    #[inline]
    pub fn shell_tx(&self) -> &Sender<WorkerTask> {
        &self.shell_tx
    }

    #[inline]
    pub fn response_rx(&self) -> &Receiver<WorkerResponse> {
        &self.response_rx
    }

    /// Cache shared with the preview threads. The UI reads it to skip a
    /// round-trip when a preview is already known.
    #[inline]
    pub fn preview_cache(&self) -> &PreviewCache {
        &self.preview_cache
    }
}

/// Reads, filters and sorts one directory.
pub fn load_listing(ctx: &ListingContext) -> Result<Vec<FileEntry>, String> {
    let mut entries = browse_dir(&ctx.location).map_err(|e| format!("I/O Error: {e}"))?;
    if !ctx.show_hidden {
        entries.retain(|e| !e.is_hidden());
    }
    if !ctx.query.is_empty() {
        let names: Vec<String> = entries.iter().map(|e| e.name_str().into_owned()).collect();
        let mut keep = vec![false; entries.len()];
        for (idx, _) in search(&ctx.query, &names) {
            keep[idx] = true;
        }
        let mut flags = keep.into_iter();
        entries.retain(|_| flags.next().unwrap_or(false));
    }
    ctx.sort.sort(&mut entries);
    Ok(entries)
}

fn start_io_worker(task_rx: Receiver<WorkerTask>, res_tx: Sender<WorkerResponse>) {
    thread::spawn(move || {
        while let Ok(task) = task_rx.recv() {
            let WorkerTask::LoadDirectory { panel_id, ticket } = task else {
                continue;
            };
            let result = load_listing(ticket.context());
            if let Err(e) = &result {
                log::warn!("listing {} failed: {e}", ticket.context().location.display());
            }
            let _ = res_tx.send(WorkerResponse::DirectoryLoaded {
                panel_id,
                result: ticket.complete(result),
            });
        }
    });
}

fn start_preview_worker(
    task_rx: Receiver<WorkerTask>,
    res_tx: Sender<WorkerResponse>,
    cache: Arc<PreviewCache>,
) {
    thread::spawn(move || {
        while let Ok(task) = task_rx.recv() {
            let WorkerTask::LoadPreview {
                mut ticket,
                mut options,
            } = task
            else {
                continue;
            };

            // Coalesce queued previews; only the newest can still be current
            while let Ok(next) = task_rx.try_recv() {
                if let WorkerTask::LoadPreview {
                    ticket: t,
                    options: o,
                } = next
                {
                    ticket = t;
                    options = o;
                }
            }

            let ctx = ticket.context();
            let lines = cache.get_or_render(&ctx.path, ctx.width, ctx.height, &options);
            let _ = res_tx.send(WorkerResponse::PreviewLoaded(ticket.complete(lines)));
        }
    });
}

fn start_find_worker(task_rx: Receiver<WorkerTask>, res_tx: Sender<WorkerResponse>) {
    thread::spawn(move || {
        while let Ok(task) = task_rx.recv() {
            let WorkerTask::FindRecursive {
                mut ticket,
                mut max_results,
            } = task
            else {
                continue;
            };

            while let Ok(next) = task_rx.try_recv() {
                if let WorkerTask::FindRecursive {
                    ticket: t,
                    max_results: m,
                } = next
                {
                    ticket = t;
                    max_results = m;
                }
            }

            let ctx = ticket.context().clone();
            let outcome = find_streamed(&ctx.base, &ctx.query, max_results, |batch| {
                res_tx
                    .send(WorkerResponse::FindBatch(ticket.clone().complete(batch)))
                    .is_ok()
            })
            .map_err(|e| e.to_string());

            let _ = res_tx.send(WorkerResponse::FindFinished(ticket.complete(outcome)));
        }
    });
}

fn start_shell_worker(task_rx: Receiver<WorkerTask>, res_tx: Sender<WorkerResponse>) {
    thread::spawn(move || {
        while let Ok(task) = task_rx.recv() {
            let WorkerTask::RunShell { ticket, timeout } = task else {
                continue;
            };
            let ctx = ticket.context();
            let outcome = run_shell(timeout, &ctx.workdir, &ctx.command);
            let _ = res_tx.send(WorkerResponse::ShellFinished(ticket.complete(outcome)));
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::request::RequestTracker;
    use crate::core::sort::SortKind;

    use rand::{Rng, rng};
    use std::env;
    use std::fs::{self, File};
    use std::time::Instant;
    use tempfile::tempdir;

    fn listing(location: PathBuf) -> ListingContext {
        ListingContext {
            location,
            query: String::new(),
            sort: SortOptions::default(),
            show_hidden: false,
        }
    }

    #[test]
    fn worker_load_current_dir() -> Result<(), Box<dyn std::error::Error>> {
        let workers = Workers::spawn();
        let mut tracker = RequestTracker::new();
        let ticket = tracker.issue(listing(env::current_dir()?));

        workers.io_tx().send(WorkerTask::LoadDirectory { panel_id: 1, ticket })?;

        match workers.response_rx().recv_timeout(Duration::from_secs(2))? {
            WorkerResponse::DirectoryLoaded { panel_id, result } => {
                assert_eq!(panel_id, 1);
                let entries = result.value().as_ref().map_err(|e| e.clone())?;
                assert!(!entries.is_empty(), "Current dir should not be empty");
                for entry in entries {
                    assert!(!entry.name_str().is_empty());
                }
            }
            other => panic!("Unexpected worker response: {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn listing_filters_hidden_query_and_sorts() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        for name in ["b_report.txt", "a_report.md", ".hidden_report", "unrelated.rs"] {
            File::create(dir.path().join(name))?;
        }
        fs::create_dir(dir.path().join("z_reports"))?;

        let mut ctx = listing(dir.path().to_path_buf());
        ctx.query = "report".into();
        let names: Vec<String> = load_listing(&ctx)?
            .iter()
            .map(|e| e.name_str().into_owned())
            .collect();
        assert_eq!(names, ["z_reports", "a_report.md", "b_report.txt"]);

        ctx.show_hidden = true;
        ctx.sort.kind = SortKind::Name;
        ctx.sort.reversed = true;
        let names: Vec<String> = load_listing(&ctx)?
            .iter()
            .map(|e| e.name_str().into_owned())
            .collect();
        assert_eq!(names, ["z_reports", "b_report.txt", "a_report.md", ".hidden_report"]);
        Ok(())
    }

    #[test]
    fn missing_directory_is_an_error_value() {
        let res = load_listing(&listing(PathBuf::from("/path/does/not/exist")));
        assert!(res.is_err_and(|e| e.starts_with("I/O Error")));
    }

    #[test]
    fn worker_dir_load_requests_multithreaded() -> Result<(), Box<dyn std::error::Error>> {
        let temp_dir = tempdir()?;
        let safe_subdir = temp_dir.path().join("pfm_test_safe_dir");
        fs::create_dir_all(&safe_subdir)?;

        let dirs = vec![env::current_dir()?, temp_dir.path().to_path_buf(), safe_subdir];
        let thread_count = 2;
        let requests_per_thread = 25;

        let workers = Workers::spawn();
        let mut handles = Vec::new();
        for t in 0..thread_count {
            let task_tx = workers.io_tx().clone();
            let dirs = dirs.clone();
            handles.push(thread::spawn(move || {
                let mut rng = rng();
                let mut tracker = RequestTracker::new();
                for i in 0..requests_per_thread {
                    let mut ctx = listing(dirs[rng.random_range(0..dirs.len())].clone());
                    ctx.show_hidden = rng.random_bool(0.5);
                    ctx.sort.dirs_first = rng.random_bool(0.5);
                    task_tx
                        .send(WorkerTask::LoadDirectory {
                            panel_id: (t * requests_per_thread + i) as u64,
                            ticket: tracker.issue(ctx),
                        })
                        .expect("Couldn't send task to worker");
                }
            }));
        }
        for h in handles {
            if let Err(err) = h.join() {
                panic!("Thread panicked during stress test: {:?}", err);
            }
        }

        let total_requests = thread_count * requests_per_thread;
        for _ in 0..total_requests {
            match workers.response_rx().recv_timeout(Duration::from_secs(2)) {
                Ok(WorkerResponse::DirectoryLoaded { result, .. }) => {
                    let entries = result.value().as_ref().map_err(|e| e.clone())?;
                    for entry in entries {
                        assert!(!entry.name_str().contains('\0'));
                    }
                }
                Ok(other) => panic!("Unexpected WorkerResponse: {other:?}"),
                Err(_) => panic!("Missing worker response (timeout)"),
            }
        }
        Ok(())
    }

    #[test]
    fn find_worker_streams_batches_then_finishes() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        for i in 0..5 {
            File::create(dir.path().join(format!("crab_{i}.txt")))?;
        }
        File::create(dir.path().join("other.txt"))?;

        let workers = Workers::spawn();
        let mut tracker = RequestTracker::new();
        let ctx = FindContext {
            base: dir.path().to_path_buf(),
            query: "crab".into(),
        };
        workers.find_tx().send(WorkerTask::FindRecursive {
            ticket: tracker.issue(ctx.clone()),
            max_results: 10,
        })?;

        let mut found = Vec::new();
        let deadline = Instant::now() + Duration::from_secs(3);
        loop {
            let left = deadline.saturating_duration_since(Instant::now());
            match workers.response_rx().recv_timeout(left)? {
                WorkerResponse::FindBatch(batch) => {
                    assert_eq!(batch.ticket().context(), &ctx);
                    found.extend(batch.value().iter().cloned());
                }
                WorkerResponse::FindFinished(done) => {
                    assert_eq!(done.value().as_ref().ok(), Some(&5));
                    break;
                }
                other => panic!("Unexpected response: {other:?}"),
            }
        }
        assert_eq!(found.len(), 5);
        assert!(found.iter().all(|r| r.relative(dir.path()).starts_with("crab_")));
        Ok(())
    }

    #[test]
    fn preview_worker_uses_shared_cache() -> Result<(), Box<dyn std::error::Error>> {
        let temp = tempdir()?;
        let preview_file = temp.path().join("preview.txt");
        fs::write(&preview_file, "A\nB\nC\nD\n")?;

        let workers = Workers::spawn();
        let mut tracker = RequestTracker::new();
        let ctx = PreviewContext {
            path: preview_file.clone(),
            width: 40,
            height: 2,
        };
        workers.preview_tx().send(WorkerTask::LoadPreview {
            ticket: tracker.issue(ctx.clone()),
            options: PreviewOptions::default(),
        })?;

        match workers.response_rx().recv_timeout(Duration::from_secs(2))? {
            WorkerResponse::PreviewLoaded(done) => {
                let mut shown = Vec::new();
                let out = tracker.apply(done, &ctx, |lines| shown = lines.to_vec());
                assert!(out.is_applied());
                assert_eq!(shown, ["A", "B"]);
            }
            r => return Err(format!("Unexpected response: {:?}", r).into()),
        }
        assert!(workers.preview_cache().get(&preview_file, 40, 2).is_some());
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn shell_worker_runs_in_workdir() -> Result<(), Box<dyn std::error::Error>> {
        let temp = tempdir()?;
        let workers = Workers::spawn();
        let mut tracker = RequestTracker::new();
        workers.shell_tx().send(WorkerTask::RunShell {
            ticket: tracker.issue(ShellContext {
                workdir: temp.path().to_path_buf(),
                command: "touch made_by_shell".into(),
            }),
            timeout: Duration::from_secs(5),
        })?;

        match workers.response_rx().recv_timeout(Duration::from_secs(5))? {
            WorkerResponse::ShellFinished(done) => {
                assert_eq!(done.value().exit_code, Some(0));
                assert!(temp.path().join("made_by_shell").exists());
            }
            r => return Err(format!("Unexpected response: {:?}", r).into()),
        }
        Ok(())
    }
}
