//! Shared filesystem utilities for markdown-merge crates.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::Builder;

/// Replace the merged document at `path` with `contents` in a single rename.
///
/// The text is staged next to the destination as `.<name>.*.partial`, so
/// a failed write leaves the previous document untouched. Missing parent
/// directories are created and an existing document keeps its permissions.
pub fn atomic_write(path: &Path, contents: &str) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let previous = fs::metadata(path).ok().map(|metadata| metadata.permissions());

    let mut staged = Builder::new()
        .prefix(&format!(".{name}."))
        .suffix(".partial")
        .tempfile_in(dir)?;
    staged.write_all(contents.as_bytes())?;
    staged.as_file().sync_all()?;
    if let Some(permissions) = previous {
        staged.as_file().set_permissions(permissions)?;
    }

    staged.persist(path)?;
    Ok(())
}

/// Read `path` as UTF-8, returning `None` when nothing exists there yet.
pub fn read_existing(path: &Path) -> io::Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn atomic_write_creates_parents_and_overwrites() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/deeper/doc.md");

        atomic_write(&path, "first").unwrap();
        atomic_write(&path, "second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
        let entries: Vec<_> = fs::read_dir(path.parent().unwrap())
            .unwrap()
            .filter_map(Result::ok)
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(entries, vec!["doc.md".to_string()]);
    }

    #[test]
    fn atomic_write_fails_when_parent_is_a_file() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("blocker"), "not a directory").unwrap();

        assert!(atomic_write(&dir.path().join("blocker/doc.md"), "body").is_err());
    }

    #[test]
    fn read_existing_distinguishes_absent_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.md");
        assert_eq!(read_existing(&path).unwrap(), None);
        fs::write(&path, "body").unwrap();
        assert_eq!(read_existing(&path).unwrap().as_deref(), Some("body"));
    }

    #[cfg(unix)]
    #[test]
    fn atomic_write_keeps_existing_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("Core-Overview.md");
        fs::write(&path, "# Core > Overview\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();

        atomic_write(&path, "# Core > Overview\n\nmerged\n").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
    }
}
