//! SCSS compilation backend built on the grass crate.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! This crate is the boundary to the actual Sass engine. It wraps
//! [`grass`], a pure Rust implementation targeting dart-sass, behind two
//! free functions:
//! - [`compile_string`]: compile in-memory source text
//! - [`compile_file`]: compile a stylesheet from disk
//!
//! Both take a [`Settings`] record describing output style, load paths and
//! input syntax. Nothing here knows about compilation contexts or the
//! value hierarchy; that layering lives in the `sasskit` crate.

use std::io;
use std::path::{Path, PathBuf};

use grass::{InputSyntax, Options, OutputStyle};
use thiserror::Error;

/// Errors reported by the grass backend.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine rejected the input. The message is grass's diagnostic
    /// text verbatim, including the source span when grass reports one.
    #[error("SCSS compilation failed: {message}")]
    Compile { message: String },

    /// The input file could not be read.
    #[error("failed to read input file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Input syntax for string sources.
///
/// File sources are not affected; grass infers their syntax from the file
/// extension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SourceSyntax {
    #[default]
    Scss,
    /// The whitespace-sensitive indented syntax (`.sass`).
    Indented,
    Css,
}

impl SourceSyntax {
    fn to_grass(self) -> InputSyntax {
        match self {
            SourceSyntax::Scss => InputSyntax::Scss,
            SourceSyntax::Indented => InputSyntax::Sass,
            SourceSyntax::Css => InputSyntax::Css,
        }
    }
}

/// Compilation settings forwarded to grass.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Produce compressed output instead of the expanded default.
    pub compressed: bool,

    /// Directories searched for `@use`/`@import` resolution, in order.
    pub load_paths: Vec<PathBuf>,

    /// Syntax of string sources.
    pub syntax: SourceSyntax,

    /// Suppress engine warnings.
    pub quiet: bool,

    /// Whether the engine may emit a leading `@charset` or byte-order
    /// mark when the output contains non-ASCII characters.
    pub emit_charset: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            compressed: false,
            load_paths: Vec::new(),
            syntax: SourceSyntax::default(),
            quiet: false,
            emit_charset: true,
        }
    }
}

fn output_style(settings: &Settings) -> OutputStyle {
    if settings.compressed {
        OutputStyle::Compressed
    } else {
        OutputStyle::Expanded
    }
}

/// Compile SCSS source text to CSS.
///
/// # Arguments
///
/// * `source` - The source text, already decoded
/// * `settings` - Output style, load paths and input syntax
///
/// # Returns
///
/// Compiled CSS on success, [`EngineError::Compile`] with grass's
/// diagnostic message on failure.
pub fn compile_string(source: &str, settings: &Settings) -> Result<String, EngineError> {
    let options = Options::default()
        .style(output_style(settings))
        .quiet(settings.quiet)
        .allows_charset(settings.emit_charset)
        .input_syntax(settings.syntax.to_grass())
        .load_paths(&settings.load_paths);

    tracing::debug!(
        bytes = source.len(),
        compressed = settings.compressed,
        "compiling string source"
    );

    grass::from_string(source, &options).map_err(|e| EngineError::Compile {
        message: e.to_string(),
    })
}

/// Compile a stylesheet from disk to CSS.
///
/// Readability of `path` is checked here, not by callers: a missing or
/// unreadable input surfaces as [`EngineError::Io`] carrying the path.
/// Imports resolve relative to the file's directory first, then through
/// the load paths.
pub fn compile_file(path: &Path, settings: &Settings) -> Result<String, EngineError> {
    if let Err(source) = std::fs::metadata(path) {
        return Err(EngineError::Io {
            path: path.to_path_buf(),
            source,
        });
    }

    // grass takes the input path as a string.
    let input = path.to_str().ok_or_else(|| EngineError::Io {
        path: path.to_path_buf(),
        source: io::Error::from(io::ErrorKind::InvalidInput),
    })?;

    let options = Options::default()
        .style(output_style(settings))
        .quiet(settings.quiet)
        .allows_charset(settings.emit_charset)
        .load_paths(&settings.load_paths);

    tracing::debug!(path = %path.display(), compressed = settings.compressed, "compiling file source");

    grass::from_path(input, &options).map_err(|e| EngineError::Compile {
        message: e.to_string(),
    })
}
