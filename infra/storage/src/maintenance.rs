use crate::security::TMP_MARKER;
use std::path::Path;
use std::time::{Duration, SystemTime};
use tracing::{error, info};
use walkdir::{DirEntry, WalkDir};

/// Temp files younger than this may still belong to an in-flight write.
const STALE_AFTER: Duration = Duration::from_secs(300);

pub(crate) async fn purge_tmp(dir: &Path) {
    let dir = dir.to_path_buf();
    let now = SystemTime::now();

    match tokio::task::spawn_blocking(move || remove_stale(&dir, now, STALE_AFTER)).await {
        Ok((removed, failed)) if removed > 0 || failed > 0 => {
            info!(removed, failed, "Cleaned up orphaned temp entries");
        },
        Err(e) => {
            error!(error = %e, "Temp entry cleanup task panicked");
        },
        _ => {},
    }
}

fn remove_stale(dir: &Path, now: SystemTime, threshold: Duration) -> (usize, usize) {
    let mut removed = 0;
    let mut failed = 0;

    WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .flatten()
        .filter(|entry| is_tmp(entry) && is_stale(entry, now, threshold))
        .for_each(|entry| match std::fs::remove_file(entry.path()) {
            Ok(()) => removed += 1,
            Err(e) => {
                tracing::warn!(path = %entry.path().display(), error = %e, "Temp entry removal failed");
                failed += 1;
            },
        });

    (removed, failed)
}

fn is_tmp(entry: &DirEntry) -> bool {
    entry.file_type().is_file()
        && entry.file_name().to_str().is_some_and(|name| name.contains(TMP_MARKER))
}

fn is_stale(entry: &DirEntry, now: SystemTime, threshold: Duration) -> bool {
    std::fs::metadata(entry.path())
        .ok()
        .and_then(|m| m.modified().ok())
        .and_then(|modified| now.duration_since(modified).ok())
        .is_none_or(|age| age > threshold)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_only_stale_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("user.entry.tstmp.7"), "partial").unwrap();
        std::fs::write(dir.path().join("user.entry"), "kept").unwrap();

        let later = SystemTime::now() + Duration::from_secs(600);
        assert_eq!(remove_stale(dir.path(), later, STALE_AFTER), (1, 0));
        assert!(dir.path().join("user.entry").exists());
        assert!(!dir.path().join("user.entry.tstmp.7").exists());
    }

    #[test]
    fn fresh_temp_files_survive() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("user.entry.tstmp.8"), "in flight").unwrap();

        assert_eq!(remove_stale(dir.path(), SystemTime::now(), STALE_AFTER), (0, 0));
        assert!(dir.path().join("user.entry.tstmp.8").exists());
    }
}
