use assert_cmd::Command;
use assert_fs::TempDir;
use assert_fs::prelude::*;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

/// Install a stub exiftool script into the temp dir and return its bin
/// directory. The stub exits 0 and, when FAKE_EXIFTOOL_LOG is set, appends
/// each invocation's arguments to that file so tests can assert on them.
pub fn install_fake_exiftool(temp_dir: &TempDir) -> PathBuf {
    let script = temp_dir.child("bin/exiftool");
    script
        .write_str(
            "#!/bin/sh\n\
             if [ -n \"$FAKE_EXIFTOOL_LOG\" ]; then\n\
             \techo \"$@\" >> \"$FAKE_EXIFTOOL_LOG\"\n\
             fi\n\
             exit 0\n",
        )
        .unwrap();

    let mut perms = std::fs::metadata(script.path()).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(script.path(), perms).unwrap();

    script.path().parent().unwrap().to_path_buf()
}

/// A phototriage command whose PATH resolves exiftool to the stub.
pub fn phototriage_cmd(temp_dir: &TempDir) -> Command {
    let bin_dir = install_fake_exiftool(temp_dir);
    let mut cmd = Command::cargo_bin("phototriage").unwrap();
    let path = std::env::var("PATH").unwrap_or_default();
    cmd.env("PATH", format!("{}:{}", bin_dir.display(), path));
    cmd
}
