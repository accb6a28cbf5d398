//! Live filesystem adapter using `std::fs`.

use std::path::Path;

use tracing::warn;

use crate::ports::filesystem::FileSystem;

/// Live filesystem adapter backed by real disk I/O.
pub struct LiveFileSystem;

impl FileSystem for LiveFileSystem {
    fn read_to_string(
        &self,
        path: &Path,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        Ok(std::fs::read_to_string(path)?)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn list_dir(
        &self,
        path: &Path,
    ) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>> {
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(path)? {
            let entry = entry?;
            match entry.file_name().into_string() {
                Ok(name) => entries.push(name),
                Err(raw) => {
                    warn!(dir = %path.display(), name = ?raw, "skipping entry with a non-UTF-8 name");
                }
            }
        }
        entries.sort();
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_directory_sorted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Fleet.tsx"), "").unwrap();
        std::fs::write(dir.path().join("Accounting.tsx"), "").unwrap();

        let names = LiveFileSystem.list_dir(dir.path()).unwrap();
        assert_eq!(names, vec!["Accounting.tsx", "Fleet.tsx"]);
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_names_are_skipped() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Crm.tsx"), "").unwrap();
        let raw = OsStr::from_bytes(b"Fle\xffet.tsx");
        // Some filesystems refuse non-UTF-8 names outright.
        if std::fs::write(dir.path().join(raw), "").is_err() {
            return;
        }

        let names = LiveFileSystem.list_dir(dir.path()).unwrap();
        assert_eq!(names, vec!["Crm.tsx"]);
    }

    #[test]
    fn reading_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("App.tsx");
        assert!(!LiveFileSystem.exists(&missing));
        assert!(LiveFileSystem.read_to_string(&missing).is_err());
    }
}
