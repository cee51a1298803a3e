//! Checksum-guarded positional write-back.
//!
//! The writer is the only component that mutates files. Every write
//! re-verifies the on-disk content against the record's checksum,
//! takes a verbatim backup first, and restores from that backup when
//! the write itself fails. The one fatal condition is a failed write
//! whose restoration also fails: the source on disk may then be
//! inconsistent, and the backup file is left in place.

use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

use tracing::{debug, error, warn};

use crate::checksum;
use crate::config::BackupSettings;
use crate::reader::LocatedRecord;
use crate::span::SourceSpan;
use crate::vfs::{FileIo, OsFileIo};

/// What to write where: a spanned splice into a file, or a whole-file
/// replacement. Built from a record via [`WriteTarget::for_record`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteTarget {
    pub path: PathBuf,
    /// `None` means the target represents a whole-file load and the
    /// new text replaces the entire content.
    pub span: Option<SourceSpan>,
    pub checksum: u32,
}

impl WriteTarget {
    pub fn for_record(record: &impl LocatedRecord) -> Self {
        Self {
            path: record.file_path().to_path_buf(),
            span: Some(record.span()),
            checksum: record.checksum(),
        }
    }

    pub fn whole_file(
        path: &Path,
        checksum: u32,
    ) -> Self {
        Self {
            path: path.to_path_buf(),
            span: None,
            checksum,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteError {
    /// The file changed on disk since the record was read.
    Conflict {
        path: String,
    },
    /// The write failed but the original content is intact.
    WriteFailed {
        path: String,
        reason: String,
    },
    /// The write failed **and** restoring the original from the backup
    /// failed. The file on disk may be inconsistent; the backup is
    /// left in place.
    BackupRestoreFailed {
        path: String,
        backup_path: String,
        reason: String,
    },
}

impl Display for WriteError {
    fn fmt(
        &self,
        f: &mut Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Self::Conflict {
                path,
            } => {
                write!(f, "{path} changed on disk since it was read")
            },
            Self::WriteFailed {
                path,
                reason,
            } => {
                write!(f, "failed to write {path}: {reason}")
            },
            Self::BackupRestoreFailed {
                path,
                backup_path,
                reason,
            } => {
                write!(
                    f,
                    "failed to write {path} and could not restore it from {backup_path}: {reason}; the file may be inconsistent"
                )
            },
        }
    }
}

impl std::error::Error for WriteError {}

pub struct PositionalWriter {
    settings: BackupSettings,
    io: Box<dyn FileIo>,
}

impl PositionalWriter {
    pub fn new(settings: BackupSettings) -> Self {
        Self::with_io(settings, Box::new(OsFileIo))
    }

    /// Construct with a host-supplied file I/O boundary.
    pub fn with_io(
        settings: BackupSettings,
        io: Box<dyn FileIo>,
    ) -> Self {
        Self {
            settings,
            io,
        }
    }

    /// Splice `new_text` over the target span (or the whole file) and
    /// write the result back, backup-protected.
    ///
    /// The on-disk content must still match the target's checksum
    /// unless `force_overwrite` is set. After a successful write the
    /// caller must re-read to obtain a record with a fresh checksum.
    pub fn write(
        &self,
        target: &WriteTarget,
        new_text: &str,
        force_overwrite: bool,
    ) -> Result<(), WriteError> {
        let path = &target.path;
        let path_display = path.display().to_string();

        let original = self.io.read_to_string(path).map_err(|error| WriteError::WriteFailed {
            path: path_display.clone(),
            reason: format!("could not re-read before writing: {error}"),
        })?;

        if checksum::content_checksum(&original) != target.checksum {
            if !force_overwrite {
                return Err(WriteError::Conflict {
                    path: path_display,
                });
            }
            debug!("[writer] checksum drift on {path_display}, overwriting as requested");
        }

        let updated = match target.span {
            Some(span) => splice(&original, span, new_text).ok_or_else(|| WriteError::WriteFailed {
                path: path_display.clone(),
                reason: format!("span {}..{} is out of bounds for the current content", span.start, span.end),
            })?,
            None => new_text.to_string(),
        };

        let backup_path = backup_path_for(path, &self.settings.suffix);
        self.io.write(&backup_path, &original).map_err(|error| WriteError::WriteFailed {
            path: path_display.clone(),
            reason: format!("could not create backup at {}: {error}", backup_path.display()),
        })?;

        if let Err(write_error) = self.io.write(path, &updated) {
            return Err(self.restore_after_failure(path, &backup_path, &original, &write_error.to_string()));
        }

        if let Err(error) = self.io.remove_file(&backup_path) {
            warn!("[writer] wrote {path_display} but could not delete backup {}: {error}", backup_path.display());
        }
        debug!("[writer] wrote {} bytes to {path_display}", updated.len());
        Ok(())
    }

    fn restore_after_failure(
        &self,
        path: &Path,
        backup_path: &Path,
        original: &str,
        write_reason: &str,
    ) -> WriteError {
        match self.io.write(path, original) {
            Ok(()) => {
                if let Err(error) = self.io.remove_file(backup_path) {
                    warn!("[writer] restored {} but could not delete backup: {error}", path.display());
                }
                WriteError::WriteFailed {
                    path: path.display().to_string(),
                    reason: write_reason.to_string(),
                }
            },
            Err(restore_error) => {
                error!(
                    "[writer] CRITICAL: write to {} failed ({write_reason}) and restoring from {} also failed ({restore_error}); source may be corrupted",
                    path.display(),
                    backup_path.display(),
                );
                WriteError::BackupRestoreFailed {
                    path: path.display().to_string(),
                    backup_path: backup_path.display().to_string(),
                    reason: restore_error.to_string(),
                }
            },
        }
    }
}

fn backup_path_for(
    path: &Path,
    suffix: &str,
) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

/// Replace `[span.start, span.end)` in `content`. `None` when the span
/// does not fall on character boundaries of the current content.
fn splice(
    content: &str,
    span: SourceSpan,
    new_text: &str,
) -> Option<String> {
    if span.end > content.len()
        || !content.is_char_boundary(span.start)
        || !content.is_char_boundary(span.end)
    {
        return None;
    }
    let mut updated = String::with_capacity(content.len() - span.len() + new_text.len());
    updated.push_str(&content[..span.start]);
    updated.push_str(new_text);
    updated.push_str(&content[span.end..]);
    Some(updated)
}

#[cfg(test)]
#[path = "../../tests/src/writer/writer_tests.rs"]
mod tests;
