use crate::triage_core::apply::apply_capture_date;
use crate::triage_core::error::{Result, TriageError};
use crate::triage_core::pipeline::move_file;
use crate::triage_core::resolve::{EXIF_DATE_FORMAT, date_from_filename};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};

/// Statistics from an extract-dates pass.
#[derive(Debug, Default)]
pub struct ExtractStats {
    pub moved: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl std::fmt::Display for ExtractStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} files dated and moved, {} without a filename date, {} failed",
            self.moved, self.skipped, self.failed
        )
    }
}

/// Recover capture dates from filenames alone.
///
/// Walks the immediate files of the source directory (typically the
/// `noexifdata` bucket of a prior run). Files whose name matches a known
/// date pattern are moved to the output directory and stamped with the
/// resolved date; files without a match stay in place.
pub fn extract_dates(source_dir: &Path, output_dir: &Path) -> Result<ExtractStats> {
    if !source_dir.exists() || !source_dir.is_dir() {
        return Err(TriageError::NotADirectory(source_dir.to_path_buf()));
    }

    fs::create_dir_all(output_dir)?;

    let files: Vec<PathBuf> = fs::read_dir(source_dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .collect();

    let bar_style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
        .unwrap();
    let bar = ProgressBar::new(files.len() as u64).with_style(bar_style);
    bar.set_message("Extracting dates");

    let mut stats = ExtractStats::default();

    for path in &files {
        match extract_one(path, output_dir) {
            Ok(true) => stats.moved += 1,
            Ok(false) => stats.skipped += 1,
            Err(e) => {
                log::error!("Error updating file dates for {}: {}", path.display(), e);
                stats.failed += 1;
            }
        }
        bar.inc(1);
    }

    bar.finish_with_message("Extraction complete");

    Ok(stats)
}

/// Returns true if the file had a filename date and was moved.
fn extract_one(path: &Path, output_dir: &Path) -> Result<bool> {
    let filename = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    let Some(datetime) = date_from_filename(&filename) else {
        log::debug!("No filename date in {}", filename);
        return Ok(false);
    };

    let dest = output_dir.join(&filename);
    move_file(path, &dest)?;

    let exif_date = datetime.format(EXIF_DATE_FORMAT).unwrap();
    apply_capture_date(&dest, &exif_date)?;

    Ok(true)
}
