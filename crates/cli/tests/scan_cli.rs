#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use predicates::prelude::*;
use tempfile::{tempdir, TempDir};

const BINARY_STUB: &[u8] = b"\x7fELF\x02\x01\x01\x00stub";

/// Fake cuobjdump that answers the version probe and produces canned
/// listings keyed off the target file name.
const FAKE_CUOBJDUMP: &str = r#"#!/bin/sh
if [ "$1" = "--version" ]; then
  echo "cuobjdump fake release 99.0, V99.0.0"
  exit 0
fi
mode="$1"
target="$2"
case "$target" in
  *alpha.so)
    if [ "$mode" = "-lelf" ]; then
      echo "ELF file    1: alpha.1.sm_86.cubin"
      echo "ELF file    2: alpha.2.sm_86.cubin"
    fi
    ;;
  *beta.so)
    if [ "$mode" = "-lptx" ]; then
      echo "PTX file    1: beta.1.sm_90.ptx"
    fi
    ;;
  *bad.so)
    echo "cuobjdump fatal   : Unrecognized file" >&2
    exit 9
    ;;
  *good.so)
    if [ "$mode" = "-lelf" ]; then
      echo "ELF file    1: good.1.sm_80.cubin"
    fi
    ;;
esac
exit 0
"#;

const FAKE_NVDISASM: &str = "#!/bin/sh\necho \"nvdisasm fake release 99.0\"\nexit 0\n";

fn write_executable(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).expect("write tool script");
    let mut perms = fs::metadata(&path).expect("tool metadata").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).expect("chmod tool script");
    path
}

/// Directory holding fake cuobjdump/nvdisasm, used as the child's PATH so
/// the tests never depend on an installed CUDA toolkit.
fn fake_toolchain_dir() -> TempDir {
    let dir = tempdir().expect("tempdir");
    write_executable(dir.path(), "cuobjdump", FAKE_CUOBJDUMP);
    write_executable(dir.path(), "nvdisasm", FAKE_NVDISASM);
    dir
}

fn binary_file(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, BINARY_STUB).expect("write binary stub");
    path
}

/// Invoking without a path is a usage error.
#[test]
fn usage_error_when_path_missing() {
    assert_cmd::cargo::cargo_bin_cmd!("cuda-arch-scan")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

/// An unusable toolchain is fatal before any scanning starts.
#[test]
fn missing_toolchain_fails_before_scanning() {
    // A real toolkit install defeats this scenario via the fallback dir.
    if Path::new("/usr/local/cuda/bin/cuobjdump").exists() {
        return;
    }

    let empty = tempdir().expect("tempdir");
    assert_cmd::cargo::cargo_bin_cmd!("cuda-arch-scan")
        .env("PATH", empty.path())
        .arg(".")
        .assert()
        .failure()
        .stderr(predicate::str::contains("cuobjdump"));
}

/// Directory scans are framed with a banner and a summary and list each
/// file's architectures in discovery order.
#[test]
fn directory_scan_prints_banner_reports_and_summary() {
    let tools = fake_toolchain_dir();
    let tree = tempdir().expect("tempdir");
    let alpha = binary_file(tree.path(), "alpha.so");
    let beta = binary_file(tree.path(), "beta.so");
    fs::write(tree.path().join("notes.txt"), "not a binary").expect("write notes");

    let output = assert_cmd::cargo::cargo_bin_cmd!("cuda-arch-scan")
        .env("PATH", tools.path())
        .arg(tree.path())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let stdout = String::from_utf8_lossy(&output);

    assert!(
        stdout.contains(&format!("Scanning for CUDA device code in {}", tree.path().display())),
        "missing banner in:\n{stdout}"
    );
    assert!(stdout.contains("[1/2] Processing"), "missing progress in:\n{stdout}");

    let alpha_block = format!("File: {}", alpha.display());
    let beta_block = format!("File: {}", beta.display());
    let alpha_at = stdout.find(&alpha_block).expect("alpha report");
    let beta_at = stdout.find(&beta_block).expect("beta report");
    assert!(alpha_at < beta_at, "reports out of order in:\n{stdout}");

    assert!(stdout.contains("  [2] sm_86"), "missing alpha entry in:\n{stdout}");
    assert!(stdout.contains("  [1] sm_90 (IR)"), "missing beta entry in:\n{stdout}");
    assert!(
        stdout.contains("Checked 2 file(s); found CUDA device code in 2."),
        "missing summary in:\n{stdout}"
    );
}

/// A single named file gets its report block without the directory framing.
#[test]
fn single_file_scan_omits_banner_and_summary() {
    let tools = fake_toolchain_dir();
    let tree = tempdir().expect("tempdir");
    let alpha = binary_file(tree.path(), "alpha.so");

    let output = assert_cmd::cargo::cargo_bin_cmd!("cuda-arch-scan")
        .env("PATH", tools.path())
        .arg(&alpha)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let stdout = String::from_utf8_lossy(&output);

    assert!(stdout.contains(&format!("File: {}", alpha.display())), "missing report in:\n{stdout}");
    assert!(stdout.contains("  [2] sm_86"), "missing entry in:\n{stdout}");
    assert!(!stdout.contains("Scanning for CUDA device code"), "unexpected banner in:\n{stdout}");
    assert!(!stdout.contains("Checked "), "unexpected summary in:\n{stdout}");
}

/// A directory with no candidate files still succeeds.
#[test]
fn empty_directory_reports_no_matching_binaries() {
    let tools = fake_toolchain_dir();
    let tree = tempdir().expect("tempdir");
    fs::write(tree.path().join("notes.txt"), "not a binary").expect("write notes");

    assert_cmd::cargo::cargo_bin_cmd!("cuda-arch-scan")
        .env("PATH", tools.path())
        .arg(tree.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No matching binaries to check."))
        .stdout(predicate::str::contains("Checked 0 file(s); found CUDA device code in 0."));
}

/// Candidates without device code yield no reports, which is still success.
#[test]
fn directory_without_device_code_reports_none_found() {
    let tools = fake_toolchain_dir();
    let tree = tempdir().expect("tempdir");
    binary_file(tree.path(), "gamma.so");

    assert_cmd::cargo::cargo_bin_cmd!("cuda-arch-scan")
        .env("PATH", tools.path())
        .arg(tree.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No CUDA architectures found."))
        .stdout(predicate::str::contains("Checked 1 file(s); found CUDA device code in 0."));
}

/// A file cuobjdump cannot read is reported on stderr and the scan goes on.
#[test]
fn per_file_failure_is_printed_and_scan_continues() {
    let tools = fake_toolchain_dir();
    let tree = tempdir().expect("tempdir");
    binary_file(tree.path(), "bad.so");
    binary_file(tree.path(), "good.so");

    assert_cmd::cargo::cargo_bin_cmd!("cuda-arch-scan")
        .env("PATH", tools.path())
        .arg(tree.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("cuobjdump failed on"))
        .stdout(predicate::str::contains("  [1] sm_80"))
        .stdout(predicate::str::contains("Checked 2 file(s); found CUDA device code in 1."));
}

/// A path that is neither file nor directory is a fatal input error.
#[test]
fn nonexistent_input_path_fails() {
    let tools = fake_toolchain_dir();

    assert_cmd::cargo::cargo_bin_cmd!("cuda-arch-scan")
        .env("PATH", tools.path())
        .arg("/nonexistent/input/tree")
        .assert()
        .failure()
        .stderr(predicate::str::contains("neither a file nor a directory"));
}
