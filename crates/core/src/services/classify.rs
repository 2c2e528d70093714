//! Selection of files that plausibly contain compiled device code.

use std::fs::Metadata;
use std::path::Path;
use std::process::Command;

use tracing::debug;

/// Decides whether a path looks like a compiled binary worth handing to
/// cuobjdump.
///
/// Name suffixes and the executable bit pick the candidates; the `file(1)`
/// content-type oracle then drops scripts, which otherwise slip in through
/// the executable bit. When the oracle is unavailable or fails, the
/// candidate stays in.
#[derive(Debug, Clone)]
pub struct FileClassifier {
    /// Name suffixes of shared libraries and static archives.
    pub library_suffixes: Vec<String>,
    /// MIME-type substrings that identify scripts.
    pub script_mime_markers: Vec<String>,
}

impl Default for FileClassifier {
    fn default() -> Self {
        Self {
            library_suffixes: vec![".so".to_string(), ".a".to_string()],
            script_mime_markers: vec![
                "script".to_string(),
                "python".to_string(),
                "perl".to_string(),
                "ruby".to_string(),
            ],
        }
    }
}

impl FileClassifier {
    /// True when `path` is a regular file that matches a library name
    /// pattern or carries an executable bit, and is not a script.
    pub fn is_candidate(&self, path: &Path) -> bool {
        let Ok(metadata) = path.symlink_metadata() else {
            return false;
        };
        if !metadata.is_file() {
            return false;
        }

        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        if !self.matches_library_name(name) && !is_executable(&metadata) {
            return false;
        }

        match mime_type(path) {
            Some(mime) if self.is_script_mime(&mime) => {
                debug!("excluding {} ({mime})", path.display());
                false
            }
            _ => true,
        }
    }

    /// Matches a configured suffix or a versioned shared object such as
    /// `libfoo.so.1.2`.
    fn matches_library_name(&self, name: &str) -> bool {
        self.library_suffixes.iter().any(|suffix| name.ends_with(suffix.as_str()))
            || name.contains(".so.")
    }

    fn is_script_mime(&self, mime: &str) -> bool {
        self.script_mime_markers.iter().any(|marker| mime.contains(marker.as_str()))
    }
}

#[cfg(unix)]
fn is_executable(metadata: &Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_metadata: &Metadata) -> bool {
    false
}

/// Asks `file --brief --mime-type` for the content type. `None` when the
/// oracle cannot answer.
fn mime_type(path: &Path) -> Option<String> {
    let output =
        Command::new("file").args(["--brief", "--mime-type"]).arg(path).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let mime = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if mime.is_empty() {
        None
    } else {
        Some(mime)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn library_names_match_suffixes_and_versioned_objects() {
        let classifier = FileClassifier::default();
        assert!(classifier.matches_library_name("libfoo.so"));
        assert!(classifier.matches_library_name("libfoo.a"));
        assert!(classifier.matches_library_name("libfoo.so.1"));
        assert!(classifier.matches_library_name("libfoo.so.1.2.3"));
        assert!(!classifier.matches_library_name("notes.txt"));
        assert!(!classifier.matches_library_name("keepsake"));
    }

    #[test]
    fn script_mimes_are_recognized_by_substring() {
        let classifier = FileClassifier::default();
        assert!(classifier.is_script_mime("text/x-shellscript"));
        assert!(classifier.is_script_mime("text/x-python"));
        assert!(classifier.is_script_mime("text/x-perl"));
        assert!(!classifier.is_script_mime("application/x-sharedlib"));
        assert!(!classifier.is_script_mime("application/octet-stream"));
    }

    #[test]
    fn plain_files_without_matching_traits_are_rejected() {
        let classifier = FileClassifier::default();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "hello").unwrap();
        assert!(!classifier.is_candidate(&path));
    }

    #[test]
    fn missing_paths_are_rejected() {
        let classifier = FileClassifier::default();
        assert!(!classifier.is_candidate(Path::new("/nonexistent/libfoo.so")));
    }

    #[test]
    fn directories_are_rejected_even_with_matching_names() {
        let classifier = FileClassifier::default();
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("fake.so");
        fs::create_dir(&sub).unwrap();
        assert!(!classifier.is_candidate(&sub));
    }

    #[test]
    fn library_suffix_selects_without_executable_bit() {
        let classifier = FileClassifier::default();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("libgpu.so");
        // Binary-looking content keeps the mime oracle from calling it a
        // script regardless of whether file(1) is installed.
        fs::write(&path, b"\x7fELF\x02\x01\x01\x00junk").unwrap();
        assert!(classifier.is_candidate(&path));
    }

    #[cfg(unix)]
    #[test]
    fn executable_bit_selects_files_without_library_suffix() {
        use std::os::unix::fs::PermissionsExt;

        let classifier = FileClassifier::default();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("launcher");
        fs::write(&path, b"\x7fELF\x02\x01\x01\x00junk").unwrap();
        let mut perms = fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).unwrap();
        assert!(classifier.is_candidate(&path));
    }
}
