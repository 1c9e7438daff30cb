use crate::triage_core::sidecar::SidecarRecord;
use regex::{Captures, Regex};
use std::path::Path;
use std::sync::OnceLock;
use time::{Date, Month, OffsetDateTime, PrimitiveDateTime, Time};

/// Date format understood by exiftool's date tags.
pub const EXIF_DATE_FORMAT: &[time::format_description::FormatItem] =
    time::macros::format_description!("[year]:[month]:[day] [hour]:[minute]:[second]");

static PATTERNS: OnceLock<Vec<FilenamePattern>> = OnceLock::new();

/// Which capture groups a filename pattern provides.
#[derive(Debug, Clone, Copy)]
enum PatternFields {
    /// Groups 1-6: year, month, day, hour, minute, second.
    DateTime,
    /// Groups 1-3: year, month, day. Time defaults to midnight.
    DateOnly,
}

struct FilenamePattern {
    name: &'static str,
    fields: PatternFields,
    regex: Regex,
}

fn patterns() -> &'static [FilenamePattern] {
    PATTERNS.get_or_init(|| {
        // Evaluated in order; the first matching pattern wins.
        [
            (
                "Screenshot_YYYYMMDD-HH-MM-SS",
                PatternFields::DateTime,
                r"Screenshot_(\d{4})(\d{2})(\d{2})-(\d{2})-(\d{2})-(\d{2})",
            ),
            (
                "Screenshot_YYYY-MM-DD-HH-MM-SS",
                PatternFields::DateTime,
                r"Screenshot_(\d{4})-(\d{2})-(\d{2})-(\d{2})-(\d{2})-(\d{2})",
            ),
            (
                "IMG_YYYYMMDD_HHMMSS",
                PatternFields::DateTime,
                r"IMG_(\d{4})(\d{2})(\d{2})_(\d{2})(\d{2})(\d{2})",
            ),
            ("_YYYYMMDD_", PatternFields::DateOnly, r"_(\d{4})(\d{2})(\d{2})_"),
            ("-YYYYMMDD-", PatternFields::DateOnly, r"-(\d{4})(\d{2})(\d{2})-"),
            (
                "IMG-YYYYMMDD-WA",
                PatternFields::DateOnly,
                r"IMG-(\d{4})(\d{2})(\d{2})-WA",
            ),
        ]
        .into_iter()
        .map(|(name, fields, pattern)| FilenamePattern {
            name,
            fields,
            regex: Regex::new(pattern).unwrap(),
        })
        .collect()
    })
}

/// Where a resolved capture date came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSource {
    Sidecar,
    Filename,
}

/// A capture timestamp reconstructed for a media file, in UTC.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedDate {
    pub datetime: PrimitiveDateTime,
    pub source: DateSource,
}

impl ResolvedDate {
    /// Format as `YYYY:MM:DD HH:MM:SS` for exiftool's date tags.
    pub fn exif_string(&self) -> String {
        self.datetime.format(EXIF_DATE_FORMAT).unwrap()
    }
}

impl std::fmt::Display for ResolvedDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.exif_string())
    }
}

/// Resolve the best-guess capture timestamp for a media file.
///
/// The sidecar record is preferred when one exists; filename patterns are
/// the fallback. Returns `None` when neither strategy yields a valid date,
/// which is a valid terminal state, not an error.
pub fn resolve_capture_date(filename: &str, sidecar: Option<&Path>) -> Option<ResolvedDate> {
    if let Some(path) = sidecar {
        match SidecarRecord::load(path) {
            Ok(record) => {
                if let Some(ts) = record.best_timestamp() {
                    if let Some(datetime) = date_from_unix_timestamp(ts) {
                        return Some(ResolvedDate {
                            datetime,
                            source: DateSource::Sidecar,
                        });
                    }
                    log::warn!("Invalid timestamp {:?} in sidecar {}", ts, path.display());
                } else {
                    log::debug!("Sidecar {} carries no usable timestamps", path.display());
                }
            }
            Err(e) => log::warn!("{e}"),
        }
    }

    date_from_filename(filename).map(|datetime| ResolvedDate {
        datetime,
        source: DateSource::Filename,
    })
}

/// Convert a Unix epoch-seconds string to a UTC calendar timestamp.
pub fn date_from_unix_timestamp(timestamp: &str) -> Option<PrimitiveDateTime> {
    let seconds: i64 = timestamp.trim().parse().ok()?;
    let utc = OffsetDateTime::from_unix_timestamp(seconds).ok()?;
    Some(PrimitiveDateTime::new(utc.date(), utc.time()))
}

/// Try the ordered filename patterns against a filename.
///
/// A match that fails calendar validation (day 32, month 13) is discarded
/// and the next pattern is tried.
pub fn date_from_filename(filename: &str) -> Option<PrimitiveDateTime> {
    for pattern in patterns() {
        let Some(caps) = pattern.regex.captures(filename) else {
            continue;
        };
        match datetime_from_captures(&caps, pattern.fields) {
            Some(datetime) => {
                log::debug!("Filename {:?} matched pattern {}", filename, pattern.name);
                return Some(datetime);
            }
            None => {
                log::debug!(
                    "Filename {:?} matched pattern {} but is not a valid date",
                    filename,
                    pattern.name
                );
            }
        }
    }
    None
}

fn datetime_from_captures(caps: &Captures, fields: PatternFields) -> Option<PrimitiveDateTime> {
    let year: i32 = caps[1].parse().ok()?;
    let month: u8 = caps[2].parse().ok()?;
    let day: u8 = caps[3].parse().ok()?;
    let date = Date::from_calendar_date(year, Month::try_from(month).ok()?, day).ok()?;

    let time = match fields {
        PatternFields::DateTime => {
            let hour: u8 = caps[4].parse().ok()?;
            let minute: u8 = caps[5].parse().ok()?;
            let second: u8 = caps[6].parse().ok()?;
            Time::from_hms(hour, minute, second).ok()?
        }
        PatternFields::DateOnly => Time::MIDNIGHT,
    };

    Some(PrimitiveDateTime::new(date, time))
}
