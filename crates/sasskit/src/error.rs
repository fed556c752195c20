//! Error types for configuration and compilation.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! Failures fall into two families. [`ConfigError`] rejects an argument
//! at construction time, before any engine work happens; it can never
//! surface from [`Compiler::compile`](crate::Compiler::compile), whose
//! error type is [`CompileError`]. The convenience entry points both
//! construct and compile, so they return [`SassError`], the transparent
//! union of the two.

use std::path::PathBuf;

use thiserror::Error;

/// An invalid or missing construction argument.
///
/// Raised synchronously by option builders and context constructors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Numeric precision below zero.
    #[error("numeric precision must be non-negative, got {0}")]
    NegativePrecision(i32),

    /// An include path with no characters in it.
    #[error("include path must not be empty")]
    EmptyIncludePath,

    /// A custom function signature that is not of the form `name($args, ...)`.
    #[error("custom function signature {signature:?} is not of the form name($args, ...)")]
    MalformedSignature { signature: String },

    /// A file context constructed without an input path.
    #[error("input path must not be empty")]
    EmptyInputPath,

    /// Source bytes that do not decode in the declared charset.
    #[error("source bytes are not valid {charset}: {detail}")]
    Decode {
        charset: &'static str,
        detail: String,
    },
}

/// Diagnostic payload for a compilation the engine rejected.
///
/// The message carries the engine's text verbatim; the compiler never
/// rewrites or reinterprets it. `file`, `line` and `column` are filled in
/// when the engine reports them structurally.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct CompileError {
    /// The engine's diagnostic message.
    pub message: String,

    /// Numeric failure status: 1 for compile failures, 2 for input I/O
    /// failures.
    pub status: i32,

    /// The offending file, when known.
    pub file: Option<PathBuf>,

    /// 1-based line of the offending construct, when reported.
    pub line: Option<u32>,

    /// 1-based column of the offending construct, when reported.
    pub column: Option<u32>,
}

impl CompileError {
    /// A compile failure (status 1) with no span information.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: 1,
            file: None,
            line: None,
            column: None,
        }
    }
}

/// Any failure surfaced by the convenience compile entry points.
#[derive(Debug, Error)]
pub enum SassError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Compile(#[from] CompileError),
}
