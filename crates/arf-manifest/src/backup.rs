//! Overwrite helpers that keep the previous file content as `<file>.backup`.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const BACKUP_SUFFIX: &str = ".backup";

/// `settings.json` -> `settings.json.backup`
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name: OsString = path
        .file_name()
        .map(ToOwned::to_owned)
        .unwrap_or_default();
    name.push(BACKUP_SUFFIX);
    path.with_file_name(name)
}

pub fn is_backup(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(BACKUP_SUFFIX))
}

/// Copy an existing file to its backup sibling. Returns the backup path, or
/// `None` when there was nothing to back up.
pub fn backup_file(path: &Path) -> io::Result<Option<PathBuf>> {
    if !path.is_file() {
        return Ok(None);
    }
    let backup = backup_path(path);
    fs::copy(path, &backup)?;
    tracing::debug!("Backed up {} to {}", path.display(), backup.display());
    Ok(Some(backup))
}

/// Back up `path` if it exists, then replace its content.
///
/// The new content is written to a temporary sibling and renamed into place.
pub fn write_with_backup(path: &Path, content: &str) -> io::Result<Option<PathBuf>> {
    let backup = backup_file(path)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut tmp_name: OsString = path
        .file_name()
        .map(ToOwned::to_owned)
        .unwrap_or_default();
    tmp_name.push(".tmp");
    let temp_path = path.with_file_name(tmp_name);

    fs::write(&temp_path, content)?;
    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    Ok(backup)
}

/// Back up and delete a file. Returns the backup path.
pub fn backup_and_remove(path: &Path) -> io::Result<PathBuf> {
    let backup = backup_path(path);
    fs::copy(path, &backup)?;
    fs::remove_file(path)?;
    Ok(backup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_backup_path_appends_suffix() {
        assert_eq!(
            backup_path(Path::new("/a/settings.json")),
            PathBuf::from("/a/settings.json.backup")
        );
        assert!(is_backup(Path::new("RULES.md.en.backup")));
        assert!(!is_backup(Path::new("RULES.md.en")));
    }

    #[test]
    fn test_write_with_backup_keeps_previous_content() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let file = dir.path().join("setup.html");

        assert_eq!(write_with_backup(&file, "one")?, None);
        let backup = write_with_backup(&file, "two")?;

        assert_eq!(fs::read_to_string(&file)?, "two");
        assert_eq!(backup, Some(dir.path().join("setup.html.backup")));
        assert_eq!(fs::read_to_string(dir.path().join("setup.html.backup"))?, "one");
        assert!(!dir.path().join("setup.html.tmp").exists());
        Ok(())
    }

    #[test]
    fn test_backup_and_remove() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let file = dir.path().join("CLAUDE.md");
        fs::write(&file, "rules")?;

        let backup = backup_and_remove(&file)?;
        assert!(!file.exists());
        assert_eq!(fs::read_to_string(backup)?, "rules");
        Ok(())
    }
}
