use crate::triage_core::classify::{Category, classify};
use crate::triage_core::error::{Result, TriageError};
use crate::triage_core::pipeline::move_file;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Marker suffix exiftool gives backup copies of edited files.
pub const BACKUP_MARKER: &str = "_original";

/// Statistics from a sort pass.
#[derive(Debug, Default)]
pub struct SortStats {
    pub moved: usize,
    pub failed: usize,
    pub backups_deleted: usize,
}

impl std::fmt::Display for SortStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} files sorted ({} failed), {} backup copies deleted",
            self.moved, self.failed, self.backups_deleted
        )
    }
}

/// Move every file under the source tree into its category folder beneath
/// the output directory, then sweep exiftool backup artifacts out of the
/// output tree.
pub fn sort_tree(source_dir: &Path, output_dir: &Path) -> Result<SortStats> {
    if !source_dir.exists() || !source_dir.is_dir() {
        return Err(TriageError::NotADirectory(source_dir.to_path_buf()));
    }

    fs::create_dir_all(output_dir)?;
    for category in Category::ALL {
        fs::create_dir_all(output_dir.join(category.folder_name()))?;
    }

    let files: Vec<PathBuf> = WalkDir::new(source_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        // The output tree may live inside the source tree; never re-sort it.
        .filter(|p| !p.starts_with(output_dir))
        .collect();

    let bar_style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
        .unwrap();
    let bar = ProgressBar::new(files.len() as u64).with_style(bar_style);
    bar.set_message("Sorting files");

    let mut stats = SortStats::default();

    for path in &files {
        match sort_file(path, output_dir) {
            Ok(()) => stats.moved += 1,
            Err(e) => {
                log::error!("Error sorting {}: {}", path.display(), e);
                stats.failed += 1;
            }
        }
        bar.inc(1);
    }

    bar.finish_with_message("Sort complete");

    stats.backups_deleted = sweep_backup_artifacts(output_dir)?;
    if stats.backups_deleted > 0 {
        log::info!("Deleted {} {BACKUP_MARKER} backup files", stats.backups_deleted);
    }

    Ok(stats)
}

fn sort_file(path: &Path, output_dir: &Path) -> Result<()> {
    let filename = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    let category = classify(&filename);
    let dest = output_dir.join(category.folder_name()).join(&filename);
    log::debug!("{} -> {}", filename, category);

    move_file(path, &dest)
}

/// Delete files whose name carries the exiftool backup marker, returning
/// the number deleted.
pub fn sweep_backup_artifacts(dir: &Path) -> Result<usize> {
    let mut deleted = 0;

    for entry in WalkDir::new(dir) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let is_backup = entry
            .file_name()
            .to_str()
            .map(|n| n.ends_with(BACKUP_MARKER))
            .unwrap_or(false);
        if !is_backup {
            continue;
        }
        match fs::remove_file(entry.path()) {
            Ok(()) => deleted += 1,
            Err(e) => log::error!("Error deleting {}: {}", entry.path().display(), e),
        }
    }

    Ok(deleted)
}
