//! File system operations (read, write, copy, directory, permissions).

use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::RealRuntime;

impl RealRuntime {
    #[tracing::instrument(skip(self, contents))]
    pub(crate) fn write_impl(&self, path: &Path, contents: &[u8]) -> Result<()> {
        fs::write(path, contents).with_context(|| format!("Failed to write {:?}", path))?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn read_to_string_impl(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn copy_impl(&self, from: &Path, to: &Path) -> Result<u64> {
        fs::copy(from, to).with_context(|| format!("Failed to copy {:?} to {:?}", from, to))
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn copy_contents_impl(&self, from: &Path, to: &Path) -> Result<u64> {
        let mut reader =
            fs::File::open(from).with_context(|| format!("Failed to open {:?}", from))?;
        let mut writer =
            fs::File::create(to).with_context(|| format!("Failed to create {:?}", to))?;
        io::copy(&mut reader, &mut writer)
            .with_context(|| format!("Failed to copy {:?} to {:?}", from, to))
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn create_dir_all_impl(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory {:?}", path))?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn exists_impl(&self, path: &Path) -> bool {
        path.exists()
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn is_dir_impl(&self, path: &Path) -> bool {
        path.is_dir()
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn read_dir_impl(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let mut entries = fs::read_dir(path)
            .with_context(|| format!("Failed to read directory {:?}", path))?
            .map(|entry| Ok(entry?.path()))
            .collect::<Result<Vec<_>>>()?;
        entries.sort();
        Ok(entries)
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn mode_impl(&self, path: &Path) -> Result<u32> {
        let metadata =
            fs::metadata(path).with_context(|| format!("Failed to stat {:?}", path))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            Ok(metadata.permissions().mode())
        }
        #[cfg(not(unix))]
        {
            let _ = metadata;
            Ok(0)
        }
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn set_permissions_impl(&self, path: &Path, mode: u32) -> Result<()> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = fs::Permissions::from_mode(mode);
            fs::set_permissions(path, permissions)
                .with_context(|| format!("Failed to set permissions on {:?}", path))?;
        }
        #[cfg(not(unix))]
        {
            let _ = (path, mode); // Suppress unused warnings on non-Unix
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::runtime::{RealRuntime, Runtime};
    use tempfile::tempdir;

    #[test]
    fn test_real_runtime_file_ops() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test.txt");

        runtime.write(&file_path, b"hello").unwrap();
        assert!(runtime.exists(&file_path));
        assert!(!runtime.is_dir(&file_path));

        let content = runtime.read_to_string(&file_path).unwrap();
        assert_eq!(content, "hello");

        let copy_path = dir.path().join("copy.txt");
        let copied = runtime.copy(&file_path, &copy_path).unwrap();
        assert_eq!(copied, 5);
        assert_eq!(runtime.read_to_string(&copy_path).unwrap(), "hello");
    }

    #[test]
    fn test_real_runtime_dir_ops() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();
        let sub_dir = dir.path().join("sub/nested");

        runtime.create_dir_all(&sub_dir).unwrap();
        assert!(runtime.is_dir(&sub_dir));

        // Creating it again is fine
        runtime.create_dir_all(&sub_dir).unwrap();

        runtime.write(&dir.path().join("sub/b.txt"), b"b").unwrap();
        runtime.write(&dir.path().join("sub/a.txt"), b"a").unwrap();

        let entries = runtime.read_dir(&dir.path().join("sub")).unwrap();
        let names: Vec<_> = entries
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.txt", "b.txt", "nested"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_real_runtime_permissions() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("tool");
        runtime.write(&file_path, b"#!/bin/sh\n").unwrap();

        runtime.set_permissions(&file_path, 0o640).unwrap();
        assert_eq!(runtime.mode(&file_path).unwrap() & 0o777, 0o640);

        // Copies keep the permission bits
        let copy_path = dir.path().join("tool-copy");
        runtime.copy(&file_path, &copy_path).unwrap();
        assert_eq!(runtime.mode(&copy_path).unwrap() & 0o777, 0o640);
    }

    #[cfg(unix)]
    #[test]
    fn test_real_runtime_copy_contents_ignores_source_mode() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();
        let source = dir.path().join("readonly");
        runtime.write(&source, b"payload").unwrap();
        runtime.set_permissions(&source, 0o444).unwrap();

        let target = dir.path().join("target");
        runtime.write(&target, b"old contents").unwrap();
        runtime.set_permissions(&target, 0o600).unwrap();

        assert_eq!(runtime.copy_contents(&source, &target).unwrap(), 7);
        assert_eq!(runtime.read_to_string(&target).unwrap(), "payload");
        assert_eq!(runtime.mode(&target).unwrap() & 0o777, 0o600);

        let fresh = dir.path().join("fresh");
        runtime.copy_contents(&source, &fresh).unwrap();
        assert_eq!(runtime.mode(&fresh).unwrap() & 0o200, 0o200);
    }

    #[test]
    fn test_real_runtime_errors() {
        let runtime = RealRuntime;
        let missing = std::path::Path::new("/nonexistent/path/file.txt");

        assert!(runtime.read_to_string(missing).is_err());
        assert!(runtime.mode(missing).is_err());
        assert!(runtime.read_dir(missing).is_err());
        assert!(!runtime.exists(missing));
    }
}
