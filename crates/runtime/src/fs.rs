//! Filesystem access used by the render pipeline.

use std::{
    io,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::error::{Error, Result};

pub trait Filesystem: Send + Sync {
    fn exists(&self, path: &Path) -> bool;
    /// Create a single directory; the parent must already exist.
    fn mkdir(&self, path: &Path) -> io::Result<()>;
    fn write_file(&self, path: &Path, bytes: &[u8]) -> io::Result<()>;
}

/// The host's real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFilesystem;

impl Filesystem for LocalFilesystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn mkdir(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir(path)
    }

    fn write_file(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        std::fs::write(path, bytes)
    }
}

/// Create `relative` below `base` one segment at a time and return the
/// resulting directory.
///
/// Existing directories are skipped. Losing a creation race to another event
/// (`AlreadyExists`) counts as success. `.` and `..` segments are rejected so
/// the result always stays below `base`.
pub fn provision_dir(fs: &dyn Filesystem, base: &Path, relative: &str) -> Result<PathBuf> {
    let segments: Vec<&str> = relative.split('/').filter(|s| !s.is_empty()).collect();
    if segments.iter().any(|s| matches!(*s, "." | "..")) {
        return Err(Error::provisioning(
            &base.join(relative),
            io::Error::new(io::ErrorKind::InvalidInput, "relative segment in path"),
        ));
    }

    let mut dir = base.to_path_buf();
    for segment in segments {
        dir.push(segment);
        if fs.exists(&dir) {
            continue;
        }
        match fs.mkdir(&dir) {
            Ok(()) => debug!(path = %dir.display(), "created directory"),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {},
            Err(e) => return Err(Error::provisioning(&dir, e)),
        }
    }
    Ok(dir)
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    /// Reports nothing as existing and loses every creation race.
    struct RacingFs;

    impl Filesystem for RacingFs {
        fn exists(&self, _path: &Path) -> bool {
            false
        }

        fn mkdir(&self, _path: &Path) -> io::Result<()> {
            Err(io::ErrorKind::AlreadyExists.into())
        }

        fn write_file(&self, _path: &Path, _bytes: &[u8]) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn creates_each_segment() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = provision_dir(&LocalFilesystem, tmp.path(), "html/demo/card").unwrap();
        assert_eq!(dir, tmp.path().join("html").join("demo").join("card"));
        assert!(dir.is_dir());
    }

    #[test]
    fn provisioning_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        provision_dir(&LocalFilesystem, tmp.path(), "html/demo/a/b").unwrap();
        let again = provision_dir(&LocalFilesystem, tmp.path(), "html//demo/a/b/").unwrap();
        assert_eq!(again, tmp.path().join("html/demo/a/b"));
    }

    #[test]
    fn lost_creation_race_is_success() {
        let dir = provision_dir(&RacingFs, Path::new("/data"), "html/demo").unwrap();
        assert_eq!(dir, PathBuf::from("/data/html/demo"));
    }

    #[test]
    fn dot_segments_cannot_escape_base() {
        let tmp = tempfile::tempdir().unwrap();
        let base = tmp.path().join("data");
        std::fs::create_dir(&base).unwrap();

        for relative in ["html/demo/../../../escaped", "html/../escaped", "html/./demo"] {
            let err = provision_dir(&LocalFilesystem, &base, relative).unwrap_err();
            assert!(err.is_configuration_error(), "input {relative:?}");
        }
        assert!(!tmp.path().join("escaped").exists());
        assert!(!base.join("escaped").exists());
        assert!(!base.join("html").exists());
    }

    #[test]
    fn missing_base_is_configuration_error() {
        let tmp = tempfile::tempdir().unwrap();
        let base = tmp.path().join("absent");
        let err = provision_dir(&LocalFilesystem, &base, "html/demo").unwrap_err();
        assert!(err.is_configuration_error());
        assert!(err.to_string().contains("absent"));
    }
}
