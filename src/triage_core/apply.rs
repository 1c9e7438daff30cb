use crate::triage_core::error::{Result, TriageError};
use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// Wall-clock limit for a single exiftool invocation.
pub const EXIFTOOL_TIMEOUT: Duration = Duration::from_secs(30);

/// Total attempts per file. Timeouts are retried once; invocation failures
/// are not.
const APPLY_ATTEMPTS: u32 = 2;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Stamp a resolved capture timestamp onto a media file.
///
/// Sets the original capture time, creation time, and file modification
/// time tags to the same formatted value. exiftool keeps a `<name>_original`
/// backup copy of the file, which the cleanup pass removes later.
pub fn apply_capture_date(path: &Path, exif_date: &str) -> Result<()> {
    let mut attempt = 0;
    loop {
        attempt += 1;
        match run_exiftool_write(path, exif_date) {
            Ok(()) => return Ok(()),
            Err(e @ TriageError::ToolTimeout { .. }) if attempt < APPLY_ATTEMPTS => {
                log::warn!("Attempt {attempt}/{APPLY_ATTEMPTS}: {e}; retrying");
            }
            Err(e) => return Err(e),
        }
    }
}

fn run_exiftool_write(path: &Path, exif_date: &str) -> Result<()> {
    let mut child = Command::new("exiftool")
        .arg(format!("-DateTimeOriginal={exif_date}"))
        .arg(format!("-CreateDate={exif_date}"))
        .arg(format!("-FileModifyDate={exif_date}"))
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()?;

    let start = Instant::now();
    let status = loop {
        match child.try_wait()? {
            Some(status) => break status,
            None => {
                if start.elapsed() >= EXIFTOOL_TIMEOUT {
                    child.kill().ok();
                    child.wait().ok();
                    return Err(TriageError::ToolTimeout {
                        path: path.to_path_buf(),
                        timeout: EXIFTOOL_TIMEOUT,
                    });
                }
                thread::sleep(POLL_INTERVAL);
            }
        }
    };

    if status.success() {
        return Ok(());
    }

    let mut stderr = String::new();
    if let Some(mut pipe) = child.stderr.take() {
        pipe.read_to_string(&mut stderr).ok();
    }

    Err(TriageError::ToolInvocation {
        status: status.code().unwrap_or(-1),
        stderr: stderr.trim().to_string(),
    })
}

/// Read back a file's embedded metadata as exiftool's plain-text report.
///
/// Used by the checkpoint display; best-effort, so failures surface as an
/// error for the caller to log rather than abort on.
pub fn capture_metadata_report(path: &Path) -> Result<String> {
    let output = Command::new("exiftool")
        .arg(path)
        .stdin(Stdio::null())
        .output()?;

    if !output.status.success() {
        return Err(TriageError::ToolInvocation {
            status: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Check if exiftool is available on the system.
pub fn exiftool_available() -> bool {
    Command::new("exiftool")
        .arg("-ver")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}
