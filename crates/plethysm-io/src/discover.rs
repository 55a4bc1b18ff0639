//! Recording discovery.

use std::path::{Path, PathBuf};

use crate::{IoError, Result};

/// Finds every file named `file_name` below `root`, recursively.
///
/// Symlinked directories are not followed. The result is sorted so batch
/// runs visit recordings in a stable order.
///
/// # Errors
///
/// [`IoError::Read`] if `root` or any directory below it cannot be listed.
pub fn find_recordings(root: impl AsRef<Path>, file_name: &str) -> Result<Vec<PathBuf>> {
    let root = root.as_ref();
    let mut found = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let entries = std::fs::read_dir(&dir).map_err(|e| IoError::read(&dir, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| IoError::read(&dir, e))?;
            let file_type = entry.file_type().map_err(|e| IoError::read(entry.path(), e))?;
            if file_type.is_dir() {
                pending.push(entry.path());
            } else if file_type.is_file() && entry.file_name() == file_name {
                tracing::debug!(path = %entry.path().display(), "found recording");
                found.push(entry.path());
            }
        }
    }

    found.sort();
    tracing::info!(root = %root.display(), count = found.len(), "recording search done");
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn finds_nested_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        for sub in ["b", "a", "a/deeper", "c"] {
            fs::create_dir_all(root.join(sub)).unwrap();
        }
        fs::write(root.join("b/pulse_data.csv"), "").unwrap();
        fs::write(root.join("a/deeper/pulse_data.csv"), "").unwrap();
        fs::write(root.join("a/other.csv"), "").unwrap();
        fs::write(root.join("pulse_data.csv"), "").unwrap();

        let found = find_recordings(root, "pulse_data.csv").unwrap();
        assert_eq!(
            found,
            vec![
                root.join("a/deeper/pulse_data.csv"),
                root.join("b/pulse_data.csv"),
                root.join("pulse_data.csv"),
            ]
        );
    }

    #[test]
    fn directory_with_target_name_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("pulse_data.csv")).unwrap();
        assert!(find_recordings(dir.path(), "pulse_data.csv").unwrap().is_empty());
    }

    #[test]
    fn missing_root_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = find_recordings(dir.path().join("absent"), "pulse_data.csv").unwrap_err();
        assert!(matches!(err, IoError::Read { .. }));
    }
}
