// E2E tests for the phototriage CLI commands
use assert_cmd::Command;
use assert_fs::prelude::*;
use predicates::prelude::*;

mod common;
use common::phototriage_cmd;

#[test]
fn test_process_routes_by_outcome() {
    let temp_dir = assert_fs::TempDir::new().unwrap();
    let src = temp_dir.child("takeout");
    let out = temp_dir.child("out");

    // Three files with sidecars carrying valid timestamps, sidecars partly
    // in a different directory than their media.
    src.child("IMG_0001.jpg").touch().unwrap();
    src.child("meta/IMG_0001.jpg.json")
        .write_str(r#"{ "photoTakenTime": { "timestamp": "1680345330" } }"#)
        .unwrap();
    src.child("IMG_0002.jpg").touch().unwrap();
    src.child("IMG_0002.jpg.json")
        .write_str(r#"{ "creationTime": { "timestamp": "1680000000" } }"#)
        .unwrap();
    src.child("clip_0003.mp4").touch().unwrap();
    src.child("clip_0003.mp4.json")
        .write_str(
            r#"{
                "creationTime": { "timestamp": "1680000000" },
                "photoTakenTime": { "timestamp": "1680345330" }
            }"#,
        )
        .unwrap();

    // Four files with neither sidecar nor filename date.
    for name in ["beach.jpg", "sunset.png", "holiday.webp", "random.mp4"] {
        src.child(name).touch().unwrap();
    }

    let exiftool_log = temp_dir.child("exiftool.log");

    let mut cmd = phototriage_cmd(&temp_dir);
    cmd.arg("process")
        .arg(src.path())
        .arg(out.path())
        .arg("--yes")
        .env("FAKE_EXIFTOOL_LOG", exiftool_log.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("7 files processed"))
        .stdout(predicate::str::contains("3 tagged into"));

    // Tagged files in the destination, the rest in the untagged bucket.
    assert!(out.child("IMG_0001.jpg").path().exists());
    assert!(out.child("IMG_0002.jpg").path().exists());
    assert!(out.child("clip_0003.mp4").path().exists());
    for name in ["beach.jpg", "sunset.png", "holiday.webp", "random.mp4"] {
        assert!(out.child("noexifdata").child(name).path().exists());
        assert!(!src.child(name).path().exists());
    }

    // The resolved timestamps reached exiftool.
    let log = std::fs::read_to_string(exiftool_log.path()).unwrap();
    assert!(log.contains("-DateTimeOriginal=2023:04:01 10:35:30"));
    assert!(log.contains("-DateTimeOriginal=2023:03:28 10:40:00"));
}

#[test]
fn test_checkpoint_no_stops_the_run() {
    let temp_dir = assert_fs::TempDir::new().unwrap();
    let src = temp_dir.child("takeout");
    let out = temp_dir.child("out");

    // Seven files, all resolvable from the filename, so the first batch of
    // five is guaranteed at least one success.
    for i in 0..7 {
        src.child(format!("IMG_20230401_10153{i}.jpg")).touch().unwrap();
    }

    let mut cmd = phototriage_cmd(&temp_dir);
    cmd.arg("process")
        .arg(src.path())
        .arg(out.path())
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Continue processing the remaining files?",
        ))
        .stdout(predicate::str::contains("Stopped at checkpoint"))
        .stdout(predicate::str::contains("5 files processed"));

    // Batch one moved; the remaining queue was discarded in place.
    for i in 0..5 {
        assert!(out.child(format!("IMG_20230401_10153{i}.jpg")).path().exists());
    }
    for i in 5..7 {
        assert!(src.child(format!("IMG_20230401_10153{i}.jpg")).path().exists());
    }
}

#[test]
fn test_checkpoint_yes_continues_without_further_pauses() {
    let temp_dir = assert_fs::TempDir::new().unwrap();
    let src = temp_dir.child("takeout");
    let out = temp_dir.child("out");

    for i in 0..7 {
        src.child(format!("IMG_20230401_10153{i}.jpg")).touch().unwrap();
    }

    let mut cmd = phototriage_cmd(&temp_dir);
    cmd.arg("process")
        .arg(src.path())
        .arg(out.path())
        .write_stdin("y\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Continue processing the remaining files?",
        ))
        .stdout(predicate::str::contains("7 files processed"));

    for i in 0..7 {
        assert!(out.child(format!("IMG_20230401_10153{i}.jpg")).path().exists());
    }
}

#[test]
fn test_process_dry_run() {
    let temp_dir = assert_fs::TempDir::new().unwrap();
    let src = temp_dir.child("takeout");
    let out = temp_dir.child("out");

    src.child("IMG_20230401_101530.jpg").touch().unwrap();
    src.child("beach.jpg").touch().unwrap();

    let mut cmd = phototriage_cmd(&temp_dir);
    cmd.arg("process")
        .arg(src.path())
        .arg(out.path())
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("[DRY RUN]"));

    // Nothing moved, nothing created.
    assert!(src.child("IMG_20230401_101530.jpg").path().exists());
    assert!(src.child("beach.jpg").path().exists());
    assert!(!out.path().exists());
}

#[test]
fn test_extract_dates_command() {
    let temp_dir = assert_fs::TempDir::new().unwrap();
    let src = temp_dir.child("noexifdata");
    let out = temp_dir.child("proc");

    src.child("Screenshot_20230401-10-15-30.png").touch().unwrap();
    src.child("beach.jpg").touch().unwrap();

    let exiftool_log = temp_dir.child("exiftool.log");

    let mut cmd = phototriage_cmd(&temp_dir);
    cmd.arg("extract-dates")
        .arg(src.path())
        .arg(out.path())
        .env("FAKE_EXIFTOOL_LOG", exiftool_log.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("1 files dated and moved"))
        .stdout(predicate::str::contains("1 files without a filename date"));

    assert!(out.child("Screenshot_20230401-10-15-30.png").path().exists());
    assert!(src.child("beach.jpg").path().exists());

    let log = std::fs::read_to_string(exiftool_log.path()).unwrap();
    assert!(log.contains("-DateTimeOriginal=2023:04:01 10:15:30"));
}

#[test]
fn test_sort_command() {
    let temp_dir = assert_fs::TempDir::new().unwrap();
    let src = temp_dir.child("tagged");
    let out = temp_dir.child("final");

    src.child("IMG_20230401_101530.jpg").touch().unwrap();
    src.child("IMG-20230101-WA0001.jpg").touch().unwrap();
    src.child("VID-20230101-WA0002.mp4").touch().unwrap();
    src.child("Screenshot_20230401-10-15-30.png").touch().unwrap();
    src.child("Snapchat-12345.jpg").touch().unwrap();
    src.child("beach.jpg").touch().unwrap();
    src.child("IMG_0001.jpg_original").touch().unwrap();

    let mut cmd = Command::cargo_bin("phototriage").unwrap();
    cmd.arg("sort")
        .arg(src.path())
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("7 files sorted"))
        .stdout(predicate::str::contains("1 backup copies deleted"));

    assert!(out.child("Camera/IMG_20230401_101530.jpg").path().exists());
    assert!(out.child("WhatsApp Images/IMG-20230101-WA0001.jpg").path().exists());
    assert!(out.child("WhatsApp Videos/VID-20230101-WA0002.mp4").path().exists());
    assert!(out
        .child("Screenshot/Screenshot_20230401-10-15-30.png")
        .path()
        .exists());
    assert!(out.child("Snapchat/Snapchat-12345.jpg").path().exists());
    assert!(out.child("Others/beach.jpg").path().exists());

    // The exiftool backup copy was sorted (IMG prefix) and then swept.
    assert!(!out.child("Camera/IMG_0001.jpg_original").path().exists());
    assert!(!src.child("IMG_0001.jpg_original").path().exists());
}
