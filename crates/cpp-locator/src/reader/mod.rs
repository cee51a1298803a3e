//! Record construction.
//!
//! [`FunctionLocationReader`] orchestrates the scanner and the
//! candidate funnel into full [`DeclarationRecord`] /
//! [`ImplementationRecord`] values: file content, checksum, the matched
//! span extended backward over its prefix, and the signature as
//! actually written at the site. Records are cached per function
//! identity; a checksum drift or an explicit refresh invalidates the
//! cached value.

pub(crate) mod cache;
mod records;

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
pub use records::{DeclarationRecord, ImplementationRecord, LocatedRecord};
use tracing::debug;

use crate::checksum;
use crate::config::LocatorSettings;
use crate::locate::{self, LocateError, Located};
use crate::params;
use crate::reader::cache::{CachedRecord, RecordCache, RecordKey, RecordKind};
use crate::scan::{self, Region};
use crate::span::SourceSpan;
use crate::types;
use crate::types::signature::ParameterSignature;
use crate::vfs::{FileIo, OsFileIo};

static CLASS_KEYWORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:class|struct)\s+([A-Za-z_][A-Za-z0-9_]*)").unwrap());
static SCOPE_SUFFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z_][A-Za-z0-9_]*\s*::\s*$").unwrap());

/// Specifiers that may precede a return type but are not part of it.
const DECL_SPECIFIERS: &[&str] =
    &["virtual", "static", "inline", "explicit", "constexpr", "friend", "FORCEINLINE"];

pub struct FunctionLocationReader {
    settings: LocatorSettings,
    io: Box<dyn FileIo>,
    cache: RecordCache,
}

impl FunctionLocationReader {
    pub fn new(settings: LocatorSettings) -> Self {
        Self::with_io(settings, Box::new(OsFileIo))
    }

    /// Construct with a host-supplied file I/O boundary.
    pub fn with_io(
        settings: LocatorSettings,
        io: Box<dyn FileIo>,
    ) -> Self {
        let cache = RecordCache::new(settings.cache.capacity);
        Self {
            settings,
            io,
            cache,
        }
    }

    pub fn settings(&self) -> &LocatorSettings {
        &self.settings
    }

    /// Locate a function's declaration and package it as a record.
    ///
    /// `refresh` bypasses the cache; a cached record whose checksum no
    /// longer matches the file on disk is discarded automatically.
    pub fn read_declaration(
        &self,
        path: &Path,
        function_name: &str,
        signature: &ParameterSignature,
        class_hint: Option<&str>,
        refresh: bool,
    ) -> Result<DeclarationRecord, LocateError> {
        let text = self.read_file(path)?;
        let file_checksum = checksum::content_checksum(&text);

        let key = self.record_key(function_name, signature, class_hint, RecordKind::Declaration);
        if !refresh {
            if let Some(CachedRecord::Declaration(record)) = self.cache.get(&key) {
                if record.checksum == file_checksum && record.file_path == path {
                    debug!("[reader] declaration cache hit for '{function_name}'");
                    return Ok(record);
                }
                self.cache.invalidate(&key);
            }
        }

        let matching = &self.settings.matching;
        let located = locate::locate(
            &text,
            function_name,
            signature,
            class_hint,
            matching.require_annotation_macro,
            matching,
        )?;

        let regions = scan::region_map(&text, true);
        let mut start = line_start(&text, located.span.start);
        let mut return_type_floor = start;
        if let Some((macro_pos, macro_close)) = locate::attached_annotation(
            &text,
            &regions,
            located.name_pos,
            &matching.annotation_macro,
            matching.max_lookback_lines,
        ) {
            start = line_start(&text, macro_pos);
            return_type_floor = macro_close + 1;
        }
        let span = SourceSpan::new(start, located.span.end);

        let class_name =
            class_hint.map(str::to_string).or_else(|| enclosing_class_name(&text, &regions, start));
        let return_type = extract_return_type(&text, &regions, located.name_pos, return_type_floor);

        let record = DeclarationRecord {
            function_name: function_name.to_string(),
            class_name,
            return_type,
            parameters: signature_at_site(&text, &located),
            is_const: located.is_const,
            raw_text: span.slice(&text).to_string(),
            file_path: path.to_path_buf(),
            span,
            checksum: file_checksum,
        };
        self.cache.insert(key, CachedRecord::Declaration(record.clone()));
        Ok(record)
    }

    /// Locate a function's implementation and package it as a record.
    pub fn read_implementation(
        &self,
        path: &Path,
        function_name: &str,
        signature: &ParameterSignature,
        class_hint: Option<&str>,
        refresh: bool,
    ) -> Result<ImplementationRecord, LocateError> {
        let text = self.read_file(path)?;
        let file_checksum = checksum::content_checksum(&text);

        let key = self.record_key(function_name, signature, class_hint, RecordKind::Implementation);
        if !refresh {
            if let Some(CachedRecord::Implementation(record)) = self.cache.get(&key) {
                if record.checksum == file_checksum && record.file_path == path {
                    debug!("[reader] implementation cache hit for '{function_name}'");
                    return Ok(record);
                }
                self.cache.invalidate(&key);
            }
        }

        let located =
            locate::locate(&text, function_name, signature, class_hint, false, &self.settings.matching)?;

        let regions = scan::region_map(&text, true);
        let start = statement_start(&text, &regions, located.name_pos);
        let span = SourceSpan::new(start, located.span.end);

        let record = ImplementationRecord {
            function_name: function_name.to_string(),
            parameters: signature_at_site(&text, &located),
            is_const: located.is_const,
            raw_text: span.slice(&text).to_string(),
            file_path: path.to_path_buf(),
            span,
            checksum: file_checksum,
        };
        self.cache.insert(key, CachedRecord::Implementation(record.clone()));
        Ok(record)
    }

    /// Re-read the record's file and report whether its content no
    /// longer matches the checksum taken at read time. Does not touch
    /// the cache. An unreadable file counts as changed.
    pub fn has_changed_on_disk(
        &self,
        record: &impl LocatedRecord,
    ) -> bool {
        match self.io.read_to_string(record.file_path()) {
            Ok(content) => checksum::content_checksum(&content) != record.checksum(),
            Err(_) => true,
        }
    }

    /// Drop every cached record. Callers do this after a write, since
    /// post-write records carry stale checksums.
    pub fn invalidate_all(&self) {
        self.cache.clear();
    }

    /// Drop the cached declaration and implementation for one function
    /// identity.
    pub fn invalidate_function(
        &self,
        function_name: &str,
        signature: &ParameterSignature,
        class_hint: Option<&str>,
    ) {
        for kind in [RecordKind::Declaration, RecordKind::Implementation] {
            self.cache.invalidate(&self.record_key(function_name, signature, class_hint, kind));
        }
    }

    #[cfg(test)]
    pub(crate) fn cached_record_count(&self) -> usize {
        self.cache.len()
    }

    fn read_file(
        &self,
        path: &Path,
    ) -> Result<String, LocateError> {
        self.io.read_to_string(path).map_err(|error| LocateError::NotFound {
            path: path.display().to_string(),
            reason: error.to_string(),
        })
    }

    fn record_key(
        &self,
        function_name: &str,
        signature: &ParameterSignature,
        class_hint: Option<&str>,
        kind: RecordKind,
    ) -> RecordKey {
        RecordKey {
            class_name: class_hint.map(str::to_string),
            function_name: function_name.to_string(),
            signature_hash: signature.signature_hash(),
            kind,
        }
    }
}

/// The signature as written at the matched site, rebuilt from the
/// actual parameter-list text.
fn signature_at_site(
    text: &str,
    located: &Located,
) -> ParameterSignature {
    let inner = &text[located.param_list_span.start + 1..located.param_list_span.end - 1];
    ParameterSignature::from_raw_types(params::split_parameters(inner))
}

fn line_start(
    text: &str,
    pos: usize,
) -> usize {
    text[..pos].rfind('\n').map(|p| p + 1).unwrap_or(0)
}

/// Start of the statement containing `pos`: just past the previous
/// `;`, `{` or `}` in plain code — or past the last full preprocessor
/// line, which ends a statement context without any terminator —
/// skipping the whitespace that follows.
fn statement_start(
    text: &str,
    regions: &[Region],
    pos: usize,
) -> usize {
    let after_terminator = text[..pos]
        .char_indices()
        .rev()
        .find(|&(p, ch)| matches!(ch, ';' | '{' | '}') && regions[p] == Region::Normal)
        .map(|(p, _)| p + 1)
        .unwrap_or(0);

    let mut after_preproc = 0usize;
    let mut line_begin = 0usize;
    for (i, byte) in text[..pos].bytes().enumerate() {
        if byte == b'\n' {
            if text[line_begin..i].trim_start().starts_with('#') {
                after_preproc = i + 1;
            }
            line_begin = i + 1;
        }
    }

    let boundary = after_terminator.max(after_preproc);
    text[boundary..pos]
        .char_indices()
        .find(|(_, ch)| !ch.is_whitespace())
        .map(|(offset, _)| boundary + offset)
        .unwrap_or(pos)
}

/// Name of the nearest preceding `class`/`struct` keyword — the
/// enclosing type for a declaration inside a class body. Heuristic:
/// the last such keyword in plain code before the declaration.
fn enclosing_class_name(
    text: &str,
    regions: &[Region],
    before: usize,
) -> Option<String> {
    CLASS_KEYWORD_RE
        .captures_iter(&text[..before])
        .filter(|caps| {
            let m = caps.get(0).expect("capture 0 always present");
            regions[m.start()] == Region::Normal
        })
        .last()
        .map(|caps| caps[1].to_string())
}

/// Return type of a declaration: the text between the previous
/// statement boundary (or the annotation macro's close paren) and the
/// function name, minus specifiers and any `Class::` qualifier.
fn extract_return_type(
    text: &str,
    regions: &[Region],
    name_pos: usize,
    not_before: usize,
) -> String {
    let seg_start = statement_start(text, regions, name_pos).max(not_before);
    let mut segment = text[seg_start..name_pos].trim();

    if let Some(m) = SCOPE_SUFFIX_RE.find(segment) {
        segment = segment[..m.start()].trim_end();
    }

    loop {
        let before = segment;
        for specifier in DECL_SPECIFIERS {
            if let Some(rest) = segment.strip_prefix(specifier) {
                if rest.starts_with(char::is_whitespace) {
                    segment = rest.trim_start();
                    break;
                }
            }
        }
        if before == segment {
            break;
        }
    }

    types::normalize(segment, false, false)
}

#[cfg(test)]
#[path = "../../tests/src/reader/reader_tests.rs"]
mod tests;
