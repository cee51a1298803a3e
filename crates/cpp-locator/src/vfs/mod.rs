//! File I/O boundary.
//!
//! The locator core never assumes a particular filesystem beyond UTF-8
//! text read/write; embedding hosts supply their own [`FileIo`] when the
//! default OS-backed implementation is not appropriate (virtual
//! documents, tests injecting failures).

use std::io;
use std::path::{Path, PathBuf};

/// Host-pluggable text file access.
pub trait FileIo: Send + Sync {
    fn read_to_string(
        &self,
        path: &Path,
    ) -> io::Result<String>;

    fn write(
        &self,
        path: &Path,
        content: &str,
    ) -> io::Result<()>;

    fn remove_file(
        &self,
        path: &Path,
    ) -> io::Result<()>;
}

/// Default implementation backed by `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsFileIo;

impl FileIo for OsFileIo {
    fn read_to_string(
        &self,
        path: &Path,
    ) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(
        &self,
        path: &Path,
        content: &str,
    ) -> io::Result<()> {
        std::fs::write(path, content)
    }

    fn remove_file(
        &self,
        path: &Path,
    ) -> io::Result<()> {
        std::fs::remove_file(path)
    }
}

pub fn normalized_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
