//! Compilation contexts: normalized descriptions of one request.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! A context bundles a compilation unit with its options into the single
//! shape the compiler dispatches on. Two variants exist: in-memory source
//! text ([`StringContext`]) and a stylesheet on disk ([`FileContext`]).
//! The [`Context`] sum is closed; the compiler matches over it
//! exhaustively.
//!
//! Contexts are immutable once constructed and describe exactly one
//! compilation unit. Clone one to reuse it deliberately.

use std::path::{Path, PathBuf};
use std::str;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::options::Options;

/// Character encodings accepted for byte sources.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Charset {
    #[default]
    Utf8,
    Latin1,
}

impl Charset {
    /// The canonical label for this charset.
    pub fn label(self) -> &'static str {
        match self {
            Charset::Utf8 => "UTF-8",
            Charset::Latin1 => "ISO-8859-1",
        }
    }

    /// Parse a charset label such as `"utf-8"`, `"latin1"` or
    /// `"ISO-8859-1"`. Case, hyphens and underscores are ignored.
    pub fn parse(label: &str) -> Option<Self> {
        let normalized: String = label
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "utf8" => Some(Charset::Utf8),
            "latin1" | "iso88591" | "l1" => Some(Charset::Latin1),
            _ => None,
        }
    }

    fn decode(self, bytes: &[u8]) -> Result<String, ConfigError> {
        match self {
            Charset::Utf8 => {
                // A leading byte-order mark is not part of the source.
                let bytes = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(bytes);
                str::from_utf8(bytes)
                    .map(str::to_owned)
                    .map_err(|e| ConfigError::Decode {
                        charset: self.label(),
                        detail: e.to_string(),
                    })
            }
            Charset::Latin1 => Ok(bytes.iter().map(|&b| b as char).collect()),
        }
    }
}

/// A compilation request backed by in-memory source text.
#[derive(Debug, Clone)]
pub struct StringContext {
    source: String,
    charset: Charset,
    input_path: Option<PathBuf>,
    output_path: Option<PathBuf>,
    options: Options,
}

impl StringContext {
    /// A context over already-decoded source text, with no path hints.
    pub fn new(source: impl Into<String>, options: Options) -> Self {
        Self {
            source: source.into(),
            charset: Charset::Utf8,
            input_path: None,
            output_path: None,
            options,
        }
    }

    /// Decode `bytes` with `charset` and build a context over the result.
    ///
    /// A UTF-8 byte-order mark is stripped.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Decode`] when the bytes are not valid in the
    /// declared charset.
    pub fn from_bytes(
        bytes: &[u8],
        charset: Charset,
        options: Options,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            source: charset.decode(bytes)?,
            charset,
            input_path: None,
            output_path: None,
            options,
        })
    }

    /// Attach an input path hint.
    ///
    /// The hint names where the source text came from; it is used for
    /// resolving relative imports and in diagnostics, and is never
    /// checked for existence.
    pub fn with_input_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_path = Some(path.into());
        self
    }

    /// Attach an output path hint, used in diagnostics only.
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn charset(&self) -> Charset {
        self.charset
    }

    pub fn input_path(&self) -> Option<&Path> {
        self.input_path.as_deref()
    }

    pub fn output_path(&self) -> Option<&Path> {
        self.output_path.as_deref()
    }

    pub fn options(&self) -> &Options {
        &self.options
    }
}

/// A compilation request backed by a stylesheet on disk.
#[derive(Debug, Clone)]
pub struct FileContext {
    input_path: PathBuf,
    output_path: Option<PathBuf>,
    options: Options,
}

impl FileContext {
    /// A context over the stylesheet at `input_path`.
    ///
    /// The path must be non-empty; whether it resolves to a readable
    /// file is checked by the engine at compile time, not here.
    pub fn new(input_path: impl Into<PathBuf>, options: Options) -> Result<Self, ConfigError> {
        let input_path = input_path.into();
        if input_path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyInputPath);
        }
        Ok(Self {
            input_path,
            output_path: None,
            options,
        })
    }

    /// Attach an output path hint, used in diagnostics only.
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    pub fn input_path(&self) -> &Path {
        &self.input_path
    }

    pub fn output_path(&self) -> Option<&Path> {
        self.output_path.as_deref()
    }

    pub fn options(&self) -> &Options {
        &self.options
    }
}

/// Discriminant for routing a context to an engine entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextKind {
    String,
    File,
}

/// The closed set of context variants the compiler dispatches over.
#[derive(Debug, Clone)]
pub enum Context {
    String(StringContext),
    File(FileContext),
}

impl Context {
    pub fn kind(&self) -> ContextKind {
        match self {
            Context::String(_) => ContextKind::String,
            Context::File(_) => ContextKind::File,
        }
    }

    pub fn options(&self) -> &Options {
        match self {
            Context::String(context) => context.options(),
            Context::File(context) => context.options(),
        }
    }

    pub fn input_path(&self) -> Option<&Path> {
        match self {
            Context::String(context) => context.input_path(),
            Context::File(context) => Some(context.input_path()),
        }
    }
}

impl From<StringContext> for Context {
    fn from(context: StringContext) -> Self {
        Context::String(context)
    }
}

impl From<FileContext> for Context {
    fn from(context: FileContext) -> Self {
        Context::File(context)
    }
}
