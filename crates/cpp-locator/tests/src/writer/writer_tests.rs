use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex};

use super::*;

const ALWAYS: u32 = u32::MAX;

/// In-memory file tree with per-path write failure injection; clones
/// share state so a test keeps a handle after the writer takes its
/// boxed copy.
#[derive(Clone, Default)]
struct StubIo {
    files: Arc<Mutex<HashMap<PathBuf, String>>>,
    write_failures: Arc<Mutex<HashMap<PathBuf, u32>>>,
}

impl StubIo {
    fn with_file(
        path: &str,
        content: &str,
    ) -> Self {
        let io = Self::default();
        io.files.lock().unwrap().insert(PathBuf::from(path), content.to_string());
        io
    }

    /// Make the next `times` writes to `path` fail (`ALWAYS` for every
    /// write).
    fn fail_writes(
        &self,
        path: &str,
        times: u32,
    ) {
        self.write_failures.lock().unwrap().insert(PathBuf::from(path), times);
    }

    fn content(
        &self,
        path: &str,
    ) -> Option<String> {
        self.files.lock().unwrap().get(Path::new(path)).cloned()
    }
}

impl FileIo for StubIo {
    fn read_to_string(
        &self,
        path: &Path,
    ) -> io::Result<String> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
    }

    fn write(
        &self,
        path: &Path,
        content: &str,
    ) -> io::Result<()> {
        let mut failures = self.write_failures.lock().unwrap();
        if let Some(remaining) = failures.get_mut(path) {
            if *remaining > 0 {
                if *remaining != ALWAYS {
                    *remaining -= 1;
                }
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "injected failure"));
            }
        }
        drop(failures);
        self.files.lock().unwrap().insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn remove_file(
        &self,
        path: &Path,
    ) -> io::Result<()> {
        self.files
            .lock()
            .unwrap()
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
    }
}

const CONTENT: &str = "void Foo(int A);\nvoid Bar();\n";

fn span_of(needle: &str) -> SourceSpan {
    let start = CONTENT.find(needle).expect("needle present");
    SourceSpan::new(start, start + needle.len())
}

fn target(span: Option<SourceSpan>) -> WriteTarget {
    WriteTarget {
        path: PathBuf::from("/proj/a.h"),
        span,
        checksum: checksum::content_checksum(CONTENT),
    }
}

fn writer(io: StubIo) -> PositionalWriter {
    PositionalWriter::with_io(BackupSettings::default(), Box::new(io))
}

#[test]
fn spliced_write_replaces_only_the_span() {
    let io = StubIo::with_file("/proj/a.h", CONTENT);
    let writer = writer(io.clone());

    writer
        .write(&target(Some(span_of("void Foo(int A);"))), "void Foo(float A);", false)
        .expect("write should succeed");

    assert_eq!(io.content("/proj/a.h").as_deref(), Some("void Foo(float A);\nvoid Bar();\n"));
    assert!(io.content("/proj/a.h.backup").is_none(), "backup must be cleaned up");
}

#[test]
fn whole_file_target_replaces_everything() {
    let io = StubIo::with_file("/proj/a.h", CONTENT);
    let writer = writer(io.clone());

    writer.write(&target(None), "// rewritten\n", false).expect("write should succeed");
    assert_eq!(io.content("/proj/a.h").as_deref(), Some("// rewritten\n"));
}

#[test]
fn stale_checksum_is_a_conflict() {
    let io = StubIo::with_file("/proj/a.h", "// drifted\n");
    let writer = writer(io.clone());

    let error = writer
        .write(&target(None), "x", false)
        .expect_err("drifted content must not be overwritten");
    assert!(matches!(error, WriteError::Conflict { .. }));
    assert_eq!(io.content("/proj/a.h").as_deref(), Some("// drifted\n"));
}

#[test]
fn force_overwrite_ignores_the_conflict() {
    let io = StubIo::with_file("/proj/a.h", "// drifted\n");
    let writer = writer(io.clone());

    writer.write(&target(None), "x", true).expect("forced write should succeed");
    assert_eq!(io.content("/proj/a.h").as_deref(), Some("x"));
}

#[test]
fn out_of_bounds_span_fails_without_touching_the_file() {
    let io = StubIo::with_file("/proj/a.h", CONTENT);
    let writer = writer(io.clone());

    let bad = SourceSpan::new(0, CONTENT.len() + 10);
    let error = writer
        .write(&target(Some(bad)), "x", false)
        .expect_err("span beyond the content must fail");
    assert!(matches!(error, WriteError::WriteFailed { .. }));
    assert_eq!(io.content("/proj/a.h").as_deref(), Some(CONTENT));
    assert!(io.content("/proj/a.h.backup").is_none());
}

#[test]
fn failed_write_is_restored_from_the_backup() {
    let io = StubIo::with_file("/proj/a.h", CONTENT);
    io.fail_writes("/proj/a.h", 1);
    let writer = writer(io.clone());

    let error = writer
        .write(&target(None), "x", false)
        .expect_err("injected write failure");
    assert!(matches!(error, WriteError::WriteFailed { .. }));
    assert_eq!(io.content("/proj/a.h").as_deref(), Some(CONTENT), "original must be restored");
    assert!(io.content("/proj/a.h.backup").is_none(), "backup deleted after restore");
}

#[test]
fn failed_restore_is_fatal_and_leaves_the_backup() {
    let io = StubIo::with_file("/proj/a.h", CONTENT);
    io.fail_writes("/proj/a.h", ALWAYS);
    let writer = writer(io.clone());

    let error = writer
        .write(&target(None), "x", false)
        .expect_err("write and restore both fail");
    assert!(matches!(error, WriteError::BackupRestoreFailed { .. }));
    assert_eq!(
        io.content("/proj/a.h.backup").as_deref(),
        Some(CONTENT),
        "backup must survive for manual recovery"
    );
}

#[test]
fn backup_creation_failure_aborts_before_the_main_write() {
    let io = StubIo::with_file("/proj/a.h", CONTENT);
    io.fail_writes("/proj/a.h.backup", 1);
    let writer = writer(io.clone());

    let error = writer
        .write(&target(None), "x", false)
        .expect_err("no backup, no write");
    assert!(matches!(error, WriteError::WriteFailed { .. }));
    assert_eq!(io.content("/proj/a.h").as_deref(), Some(CONTENT));
}

#[test]
fn missing_file_fails_before_any_mutation() {
    let writer = writer(StubIo::default());
    let error = writer.write(&target(None), "x", false).expect_err("nothing to write to");
    assert!(matches!(error, WriteError::WriteFailed { .. }));
}

#[test]
fn custom_backup_suffix_is_used() {
    let io = StubIo::with_file("/proj/a.h", CONTENT);
    io.fail_writes("/proj/a.h", ALWAYS);
    let writer = PositionalWriter::with_io(
        BackupSettings {
            suffix: ".orig".to_string(),
        },
        Box::new(io.clone()),
    );

    let error = writer.write(&target(None), "x", false).expect_err("injected failure");
    assert!(matches!(error, WriteError::BackupRestoreFailed { .. }));
    assert_eq!(io.content("/proj/a.h.orig").as_deref(), Some(CONTENT));
}

#[test]
fn splice_rejects_non_boundary_spans() {
    assert_eq!(splice("héllo", SourceSpan::new(1, 2), "x"), None);
    assert_eq!(splice("abc", SourceSpan::new(1, 2), "X").as_deref(), Some("aXc"));
}
