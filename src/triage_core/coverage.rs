use crate::triage_core::error::{Result, TriageError};
use crate::triage_core::media::is_image;
use exiftool::ExifTool;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Deserialize;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use walkdir::WalkDir;

thread_local! {
    static EXIFTOOL: RefCell<Option<ExifTool>> = const { RefCell::new(None) };
}

const MONTH_PREFIX_FORMAT: &[time::format_description::FormatItem] =
    time::macros::format_description!("[year]:[month]");

/// Capture date tags read back from a file.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "PascalCase")]
struct CaptureDates {
    #[serde(default)]
    date_time_original: String,
    #[serde(default)]
    create_date: String,
}

impl CaptureDates {
    fn best(&self) -> Option<&str> {
        [&self.date_time_original, &self.create_date]
            .into_iter()
            .map(String::as_str)
            .find(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CoverageBucket {
    CurrentMonth,
    OtherDate,
    Missing,
}

/// Counts from an EXIF-coverage sweep.
#[derive(Debug, Default)]
pub struct CoverageReport {
    /// Capture date in the current month, i.e. freshly stamped.
    pub current_month: usize,
    /// Capture date in some other month.
    pub other_dates: usize,
    /// No capture date at all.
    pub missing: usize,
}

impl CoverageReport {
    pub fn total(&self) -> usize {
        self.current_month + self.other_dates + self.missing
    }
}

impl std::fmt::Display for CoverageReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Files with a capture date in the current month: {}", self.current_month)?;
        writeln!(f, "Files with a capture date in another month:     {}", self.other_dates)?;
        write!(f, "Files with no capture date:                     {}", self.missing)
    }
}

/// Walk a tree and count how many image files carry an embedded capture
/// date, split by whether it falls in the current month.
pub fn scan_coverage(dir: &Path) -> Result<CoverageReport> {
    if !dir.exists() || !dir.is_dir() {
        return Err(TriageError::NotADirectory(dir.to_path_buf()));
    }

    let files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| is_image(p))
        .collect();

    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    let month_prefix = now.format(MONTH_PREFIX_FORMAT).unwrap();

    let bar_style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
        .unwrap();
    let bar = ProgressBar::new(files.len() as u64).with_style(bar_style);
    bar.set_message("Reading capture dates");

    let buckets: Vec<CoverageBucket> = files
        .par_iter()
        .map(|path| {
            let date = read_capture_date(path);
            if date.is_none() {
                log::info!("No capture date: {}", path.display());
            }
            bar.inc(1);
            bucket_for(date.as_deref(), &month_prefix)
        })
        .collect();

    bar.finish_with_message("Sweep complete");

    let mut report = CoverageReport::default();
    for bucket in buckets {
        match bucket {
            CoverageBucket::CurrentMonth => report.current_month += 1,
            CoverageBucket::OtherDate => report.other_dates += 1,
            CoverageBucket::Missing => report.missing += 1,
        }
    }

    Ok(report)
}

/// Read the best capture date tag using a thread-local exiftool instance.
fn read_capture_date(path: &Path) -> Option<String> {
    EXIFTOOL.with(|cell| {
        let mut exiftool_opt = cell.borrow_mut();
        if exiftool_opt.is_none() {
            *exiftool_opt = ExifTool::new().ok();
        }
        let exiftool = exiftool_opt.as_mut()?;

        let dates: CaptureDates = match exiftool.read_metadata(path, &[]) {
            Ok(dates) => dates,
            Err(e) => {
                log::warn!("Failed to read metadata for {}: {}", path.display(), e);
                return None;
            }
        };

        dates.best().map(str::to_string)
    })
}

fn bucket_for(date: Option<&str>, month_prefix: &str) -> CoverageBucket {
    match date {
        None => CoverageBucket::Missing,
        Some(d) if d.starts_with(month_prefix) => CoverageBucket::CurrentMonth,
        Some(_) => CoverageBucket::OtherDate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_for() {
        assert_eq!(bucket_for(None, "2023:04"), CoverageBucket::Missing);
        assert_eq!(
            bucket_for(Some("2023:04:01 10:15:30"), "2023:04"),
            CoverageBucket::CurrentMonth
        );
        assert_eq!(
            bucket_for(Some("2021:12:31 23:59:59"), "2023:04"),
            CoverageBucket::OtherDate
        );
    }

    #[test]
    fn test_best_capture_date_prefers_original() {
        let dates = CaptureDates {
            date_time_original: "2023:04:01 10:15:30".into(),
            create_date: "2020:01:01 00:00:00".into(),
        };
        assert_eq!(dates.best(), Some("2023:04:01 10:15:30"));

        let fallback = CaptureDates {
            date_time_original: String::new(),
            create_date: "2020:01:01 00:00:00".into(),
        };
        assert_eq!(fallback.best(), Some("2020:01:01 00:00:00"));

        assert_eq!(CaptureDates::default().best(), None);
    }
}
