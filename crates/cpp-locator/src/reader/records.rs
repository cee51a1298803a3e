use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::span::SourceSpan;
use crate::types::signature::ParameterSignature;

/// A located function declaration, packaged with enough metadata to
/// edit it and write it back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclarationRecord {
    pub function_name: String,
    /// Enclosing class, from the hint or the nearest preceding
    /// `class`/`struct` keyword line.
    pub class_name: Option<String>,
    pub return_type: String,
    /// The signature as actually written at the matched site.
    pub parameters: ParameterSignature,
    pub is_const: bool,
    /// Verbatim text of `span` at read time.
    pub raw_text: String,
    pub file_path: PathBuf,
    pub span: SourceSpan,
    /// Content checksum of the whole file at read time.
    pub checksum: u32,
}

/// A located function implementation (definition with a body).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImplementationRecord {
    pub function_name: String,
    pub parameters: ParameterSignature,
    pub is_const: bool,
    pub raw_text: String,
    pub file_path: PathBuf,
    pub span: SourceSpan,
    pub checksum: u32,
}

/// Common surface the writer and change detection need from either
/// record kind.
pub trait LocatedRecord {
    fn file_path(&self) -> &Path;
    fn span(&self) -> SourceSpan;
    fn checksum(&self) -> u32;
    fn raw_text(&self) -> &str;
}

impl LocatedRecord for DeclarationRecord {
    fn file_path(&self) -> &Path {
        &self.file_path
    }

    fn span(&self) -> SourceSpan {
        self.span
    }

    fn checksum(&self) -> u32 {
        self.checksum
    }

    fn raw_text(&self) -> &str {
        &self.raw_text
    }
}

impl LocatedRecord for ImplementationRecord {
    fn file_path(&self) -> &Path {
        &self.file_path
    }

    fn span(&self) -> SourceSpan {
        self.span
    }

    fn checksum(&self) -> u32 {
        self.checksum
    }

    fn raw_text(&self) -> &str {
        &self.raw_text
    }
}
