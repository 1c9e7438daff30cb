use crate::triage_core::error::{Result, TriageError};
use crate::triage_core::media::{SIDECAR_EXTENSION, is_sidecar};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Timestamps carried by an export sidecar, both optional and encoded as
/// Unix epoch seconds in string form.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct SidecarRecord {
    #[serde(default)]
    pub creation_time: Option<TimestampField>,
    #[serde(default)]
    pub photo_taken_time: Option<TimestampField>,
}

#[derive(Deserialize, Debug, Default)]
pub struct TimestampField {
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl SidecarRecord {
    /// Read and parse a sidecar JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents).map_err(|reason| TriageError::SidecarParse {
            path: path.to_path_buf(),
            reason,
        })
    }

    /// Parse a sidecar JSON document. Unknown fields are ignored.
    pub fn parse(contents: &str) -> std::result::Result<Self, String> {
        serde_json::from_str(contents).map_err(|e| e.to_string())
    }

    /// The best available capture timestamp: the photo-taken time when
    /// present and non-empty, otherwise the creation time.
    pub fn best_timestamp(&self) -> Option<&str> {
        field_timestamp(&self.photo_taken_time).or_else(|| field_timestamp(&self.creation_time))
    }
}

fn field_timestamp(field: &Option<TimestampField>) -> Option<&str> {
    field
        .as_ref()
        .and_then(|f| f.timestamp.as_deref())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// A one-time index of every sidecar file under a source tree, keyed by
/// sidecar filename. Built once per run; read-only afterwards, so it can be
/// shared across workers without locking.
#[derive(Debug, Default)]
pub struct SidecarIndex {
    by_filename: HashMap<String, PathBuf>,
}

impl SidecarIndex {
    /// Walk the source tree and record every `*.json` file.
    ///
    /// If the same sidecar filename appears in multiple directories the
    /// first one encountered wins, matching a plain top-down search.
    pub fn build(source_dir: &Path) -> Result<Self> {
        let mut by_filename = HashMap::new();

        for entry in WalkDir::new(source_dir) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if !is_sidecar(path) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                by_filename
                    .entry(name.to_string())
                    .or_insert_with(|| path.to_path_buf());
            }
        }

        log::debug!("Indexed {} sidecar files", by_filename.len());

        Ok(SidecarIndex { by_filename })
    }

    /// Look up the sidecar companion of a media file, named
    /// `<media_filename>.json`.
    pub fn lookup(&self, media_filename: &str) -> Option<&Path> {
        self.by_filename
            .get(&format!("{media_filename}.{SIDECAR_EXTENSION}"))
            .map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.by_filename.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_filename.is_empty()
    }
}
