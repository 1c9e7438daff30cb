use crate::triage_core::apply::{self, apply_capture_date};
use crate::triage_core::error::{Result, TriageError};
use crate::triage_core::media::detect_media_kind;
use crate::triage_core::resolve::{ResolvedDate, resolve_capture_date};
use crate::triage_core::sidecar::SidecarIndex;
use crossbeam_channel::unbounded;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::thread;
use walkdir::WalkDir;

/// Files drawn from the queue per batch.
pub const BATCH_SIZE: usize = 5;

/// Worker pool width; batches are serialized, files within a batch run in
/// parallel.
pub const WORKER_POOL_SIZE: usize = 4;

/// Folder under the destination for files that could not be tagged.
pub const UNTAGGED_FOLDER: &str = "noexifdata";

#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessOptions {
    /// Answer the checkpoint affirmatively up front.
    pub assume_yes: bool,
    /// Resolve and report routing without touching any file.
    pub dry_run: bool,
}

/// Per-file result of the pipeline.
#[derive(Debug)]
pub struct ProcessingOutcome {
    pub source_path: PathBuf,
    pub filename: String,
    pub resolved: Option<ResolvedDate>,
    pub applied: bool,
    pub final_path: PathBuf,
    pub error: Option<String>,
}

/// Aggregated run state, updated at batch boundaries.
#[derive(Debug, Default)]
pub struct RunStats {
    pub processed: usize,
    pub tagged: usize,
    pub untagged: usize,
    pub stopped_early: bool,
}

impl std::fmt::Display for RunStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} files processed: {} tagged, {} without usable metadata",
            self.processed, self.tagged, self.untagged
        )
    }
}

/// Scheduler states. Batches are dispatched one at a time; the checkpoint
/// only ever runs with the pool fully drained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SchedulerState {
    Dispatching,
    CheckpointPending,
    Done,
}

/// Run the metadata-reconciliation pipeline over a source tree.
///
/// Each media file gets its capture date resolved (sidecar first, filename
/// patterns second), stamped via exiftool, and is then moved to the
/// destination or its `noexifdata` bucket. After the first batch with at
/// least one successful stamp the run pauses once for a yes/no confirmation.
pub fn run_pipeline(source_dir: &Path, dest_dir: &Path, opts: ProcessOptions) -> Result<RunStats> {
    if !source_dir.exists() {
        return Err(TriageError::PathNotFound(source_dir.to_path_buf()));
    }
    if !source_dir.is_dir() {
        return Err(TriageError::NotADirectory(source_dir.to_path_buf()));
    }

    if !opts.dry_run && !apply::exiftool_available() {
        log::warn!("exiftool not found on PATH; metadata writes will fail");
    }

    let untagged_dir = dest_dir.join(UNTAGGED_FOLDER);

    let files = enumerate_media_files(source_dir, dest_dir)?;
    log::info!("Found {} media files under {}", files.len(), source_dir.display());

    let sidecars = SidecarIndex::build(source_dir)?;

    if !opts.dry_run {
        fs::create_dir_all(dest_dir)?;
        fs::create_dir_all(&untagged_dir)?;
    }

    let pool_width = WORKER_POOL_SIZE.min(num_cpus::get()).max(1);
    let worker = |path: &Path| {
        process_file(path, &sidecars, dest_dir, &untagged_dir, opts.dry_run)
    };

    let mut stats = RunStats::default();
    // The dry run has nothing to show at a checkpoint.
    let mut checkpoint_done = opts.assume_yes || opts.dry_run;
    let mut state = SchedulerState::Dispatching;
    let mut batches = files.chunks(BATCH_SIZE);
    let mut pending: Vec<ProcessingOutcome> = Vec::new();

    loop {
        match state {
            SchedulerState::Dispatching => match batches.next() {
                None => state = SchedulerState::Done,
                Some(batch) => {
                    let outcomes = dispatch_batch(batch, pool_width, &worker);

                    for outcome in &outcomes {
                        stats.processed += 1;
                        if is_tagged(outcome, opts.dry_run) {
                            stats.tagged += 1;
                        } else {
                            stats.untagged += 1;
                        }
                        if opts.dry_run {
                            println!(
                                "[DRY RUN] {} -> {}",
                                outcome.filename,
                                outcome.final_path.display()
                            );
                        }
                    }

                    let any_applied = outcomes.iter().any(|o| o.applied);
                    if !checkpoint_done && any_applied {
                        pending = outcomes;
                        state = SchedulerState::CheckpointPending;
                    }
                }
            },
            SchedulerState::CheckpointPending => {
                if confirm_continue(&pending)? {
                    checkpoint_done = true;
                    state = SchedulerState::Dispatching;
                } else {
                    log::info!("Run stopped at checkpoint; remaining queue discarded");
                    stats.stopped_early = true;
                    state = SchedulerState::Done;
                }
                pending.clear();
            }
            SchedulerState::Done => break,
        }
    }

    Ok(stats)
}

fn is_tagged(outcome: &ProcessingOutcome, dry_run: bool) -> bool {
    if dry_run {
        outcome.resolved.is_some()
    } else {
        outcome.applied
    }
}

/// Collect the media files to process, skipping sidecars, unsupported
/// extensions, and anything already under the destination tree.
pub(crate) fn enumerate_media_files(source_dir: &Path, dest_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(source_dir) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.starts_with(dest_dir) {
            continue;
        }
        if detect_media_kind(path).is_none() {
            log::debug!("Skipping unsupported file: {}", path.display());
            continue;
        }
        files.push(path.to_path_buf());
    }

    // Deterministic batch order regardless of walk order.
    files.sort();

    Ok(files)
}

/// Run one batch through the worker pool, blocking until every file in the
/// batch has an outcome. No file of the next batch starts before this
/// returns.
pub(crate) fn dispatch_batch<F>(
    batch: &[PathBuf],
    pool_width: usize,
    worker: &F,
) -> Vec<ProcessingOutcome>
where
    F: Fn(&Path) -> ProcessingOutcome + Sync,
{
    let (job_tx, job_rx) = unbounded::<PathBuf>();
    let (result_tx, result_rx) = unbounded();

    thread::scope(|s| {
        for _ in 0..pool_width.min(batch.len()).max(1) {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();
            s.spawn(move || {
                while let Ok(path) = job_rx.recv() {
                    if result_tx.send(worker(path.as_path())).is_err() {
                        break;
                    }
                }
            });
        }
        drop(job_rx);
        drop(result_tx);

        for path in batch {
            job_tx.send(path.clone()).ok();
        }
        drop(job_tx);
    });

    result_rx.into_iter().collect()
}

/// Process a single file: resolve its capture date, stamp it, and route the
/// file by outcome. Every failure is recorded in the outcome, never raised.
fn process_file(
    path: &Path,
    sidecars: &SidecarIndex,
    dest_dir: &Path,
    untagged_dir: &Path,
    dry_run: bool,
) -> ProcessingOutcome {
    let filename = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    let sidecar = sidecars.lookup(&filename);
    if let Some(sidecar) = sidecar {
        log::debug!("Sidecar for {}: {}", filename, sidecar.display());
    }

    let resolved = resolve_capture_date(&filename, sidecar);
    let mut error = None;

    let applied = match (&resolved, dry_run) {
        (Some(date), false) => match apply_capture_date(path, &date.exif_string()) {
            Ok(()) => {
                log::info!("Stamped {} with {}", path.display(), date);
                true
            }
            Err(e) => {
                log::error!("Failed to stamp {}: {}", path.display(), e);
                error = Some(e.to_string());
                false
            }
        },
        (Some(_), true) => false,
        (None, _) => {
            log::info!("No capture date for {}", path.display());
            error = Some(TriageError::UnresolvedDate(path.to_path_buf()).to_string());
            false
        }
    };

    let tagged = if dry_run { resolved.is_some() } else { applied };
    let dest_folder = route_destination(tagged, dest_dir, untagged_dir);
    let mut final_path = dest_folder.join(&filename);

    if !dry_run {
        if let Err(e) = move_file(path, &final_path) {
            log::error!("{e}");
            error = Some(e.to_string());
            final_path = path.to_path_buf();
        }
    }

    ProcessingOutcome {
        source_path: path.to_path_buf(),
        filename,
        resolved,
        applied,
        final_path,
        error,
    }
}

/// Triage routing: tagged files go to the destination, everything else to
/// the untagged bucket. Exactly one of the two.
fn route_destination<'a>(tagged: bool, dest_dir: &'a Path, untagged_dir: &'a Path) -> &'a Path {
    if tagged { dest_dir } else { untagged_dir }
}

/// Move a file, creating the destination directory if needed. Falls back to
/// copy-and-delete across filesystems, and retries once before giving up.
pub(crate) fn move_file(from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)?;
    }

    match rename_or_copy(from, to) {
        Ok(()) => Ok(()),
        Err(first) => {
            log::warn!(
                "Retrying move of {} after error: {}",
                from.display(),
                first
            );
            rename_or_copy(from, to).map_err(|e| TriageError::MoveFailed {
                source_path: from.to_path_buf(),
                destination: to.to_path_buf(),
                reason: e.to_string(),
            })
        }
    }
}

fn rename_or_copy(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        // rename cannot cross filesystems
        Err(_) => {
            fs::copy(from, to)?;
            fs::remove_file(from)
        }
    }
}

/// Display the stamped metadata of the pending batch and ask whether to
/// continue. Only `n` halts the run.
fn confirm_continue(outcomes: &[ProcessingOutcome]) -> Result<bool> {
    for outcome in outcomes.iter().filter(|o| o.applied) {
        match apply::capture_metadata_report(&outcome.final_path) {
            Ok(report) => {
                println!("Metadata for {}:\n{}", outcome.final_path.display(), report);
            }
            Err(e) => {
                log::warn!(
                    "Could not read back metadata for {}: {}",
                    outcome.final_path.display(),
                    e
                );
            }
        }
    }

    print!("Continue processing the remaining files? [y/n]: ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(!input.trim().eq_ignore_ascii_case("n"))
}
