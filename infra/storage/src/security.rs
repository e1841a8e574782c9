use crate::error::StorageError;
use std::path::{Path, PathBuf};

/// Longest key accepted; keeps file names well under common filesystem limits.
const MAX_KEY_LEN: usize = 128;

/// Extension of committed entries. Anything else in the namespace directory is ignored.
pub(crate) const ENTRY_EXTENSION: &str = "entry";

/// Marker embedded in temp file names so maintenance can find orphans.
pub(crate) const TMP_MARKER: &str = ".tstmp.";

/// Validates a key or namespace name.
///
/// Allowed characters are ASCII alphanumerics, `_`, `-` and `.`. Names may not start with a
/// dot, so `..` and hidden files are impossible by construction.
pub(crate) fn validate_name(kind: &'static str, name: &str) -> Result<(), StorageError> {
    if name.is_empty() {
        return Err(StorageError::InvalidKey {
            message: format!("{kind} cannot be empty").into(),
            context: None,
        });
    }

    if name.len() > MAX_KEY_LEN {
        return Err(StorageError::InvalidKey {
            message: format!("{kind} exceeds {MAX_KEY_LEN} bytes").into(),
            context: Some(name.chars().take(16).collect::<String>().into()),
        });
    }

    if name.starts_with('.') {
        return Err(StorageError::InvalidKey {
            message: name.to_owned().into(),
            context: Some(format!("{kind} cannot start with '.'").into()),
        });
    }

    let is_legal = |c: char| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.');
    if let Some(bad) = name.chars().find(|&c| !is_legal(c)) {
        return Err(StorageError::InvalidKey {
            message: name.to_owned().into(),
            context: Some(format!("{kind} contains illegal character {bad:?}").into()),
        });
    }

    Ok(())
}

/// Maps a validated key onto its entry file inside the namespace directory.
pub(crate) fn entry_path(dir: &Path, key: &str) -> Result<PathBuf, StorageError> {
    validate_name("key", key)?;
    let path = dir.join(format!("{key}.{ENTRY_EXTENSION}"));

    // Validation already rules out separators; this guards against platform surprises.
    if path.parent() != Some(dir) {
        return Err(StorageError::InvalidKey {
            message: key.to_owned().into(),
            context: Some("Key resolved outside of the namespace".into()),
        });
    }

    Ok(path)
}

/// Recovers the key from an entry file name, if the file is an entry.
pub(crate) fn key_of(path: &Path) -> Option<&str> {
    let name = path.file_name()?.to_str()?;
    if name.contains(TMP_MARKER) {
        return None;
    }
    name.strip_suffix(ENTRY_EXTENSION)?.strip_suffix('.')
}
