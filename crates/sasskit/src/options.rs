//! Immutable compilation options.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! An [`Options`] instance is validated once when built and read-only
//! afterwards. Changing a setting means building a new instance, either
//! from scratch via [`Options::builder`] or seeded from an existing one
//! via [`Options::to_builder`]. Instances are cheap to clone and safe to
//! share across threads; custom function callbacks sit behind `Arc`.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::value::Value;

/// Default numeric precision carried by [`Options`].
pub const DEFAULT_PRECISION: i32 = 10;

/// Output formatting styles the engine recognizes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputStyle {
    #[default]
    Expanded,
    Compressed,
}

/// Input syntax for string sources. File sources infer their syntax from
/// the file extension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Syntax {
    #[default]
    Scss,
    /// The whitespace-sensitive indented syntax.
    Indented,
    Css,
}

/// Host callback invoked by engines that support custom functions.
pub type HostFn = Arc<dyn Fn(&[Value]) -> Value + Send + Sync>;

/// A custom function registration: a Sass signature plus a host callback.
///
/// The signature takes the form the engine declares functions with, e.g.
/// `darken-brand($amount)`; it is validated when the registration is
/// created.
#[derive(Clone)]
pub struct SassFunction {
    signature: String,
    name_len: usize,
    callback: HostFn,
}

impl SassFunction {
    /// Pair a signature with a callback, validating the signature shape.
    ///
    /// # Errors
    ///
    /// [`ConfigError::MalformedSignature`] unless the signature is of the
    /// form `name($args, ...)` with a non-empty identifier name.
    pub fn new(
        signature: impl Into<String>,
        callback: impl Fn(&[Value]) -> Value + Send + Sync + 'static,
    ) -> Result<Self, ConfigError> {
        let signature = signature.into();
        let name_len = validate_signature(&signature)?;
        Ok(Self {
            signature,
            name_len,
            callback: Arc::new(callback),
        })
    }

    /// The full declared signature.
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// The function name, without the argument list.
    pub fn name(&self) -> &str {
        &self.signature[..self.name_len]
    }

    /// Invoke the callback with already-converted arguments.
    ///
    /// Error arguments propagate unchanged without reaching the callback.
    pub fn call(&self, args: &[Value]) -> Value {
        if let Some(error) = args.iter().find(|arg| arg.is_error()) {
            return error.clone();
        }
        (self.callback)(args)
    }
}

impl fmt::Debug for SassFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SassFunction")
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

/// Check the `name($args, ...)` shape and return the name length.
fn validate_signature(signature: &str) -> Result<usize, ConfigError> {
    let malformed = || ConfigError::MalformedSignature {
        signature: signature.to_string(),
    };

    let open = signature.find('(').ok_or_else(malformed)?;
    let name = &signature[..open];
    if name.is_empty() || !signature.ends_with(')') {
        return Err(malformed());
    }
    let mut chars = name.chars();
    let first = chars.next().ok_or_else(malformed)?;
    if first.is_ascii_digit() {
        return Err(malformed());
    }
    let valid = |c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_';
    if !valid(first) || !chars.all(valid) {
        return Err(malformed());
    }
    Ok(open)
}

/// Immutable configuration for one compilation request.
#[derive(Debug, Clone)]
pub struct Options {
    style: OutputStyle,
    precision: i32,
    include_paths: Vec<PathBuf>,
    functions: Vec<SassFunction>,
    syntax: Syntax,
    quiet: bool,
    emit_charset: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            style: OutputStyle::default(),
            precision: DEFAULT_PRECISION,
            include_paths: Vec::new(),
            functions: Vec::new(),
            syntax: Syntax::default(),
            quiet: false,
            emit_charset: true,
        }
    }
}

impl Options {
    pub fn builder() -> OptionsBuilder {
        OptionsBuilder::default()
    }

    /// A builder seeded with this instance's settings, for building a
    /// modified copy.
    pub fn to_builder(&self) -> OptionsBuilder {
        OptionsBuilder {
            style: self.style,
            precision: self.precision,
            include_paths: self.include_paths.clone(),
            functions: self.functions.clone(),
            syntax: self.syntax,
            quiet: self.quiet,
            emit_charset: self.emit_charset,
        }
    }

    pub fn style(&self) -> OutputStyle {
        self.style
    }

    pub fn precision(&self) -> i32 {
        self.precision
    }

    /// Directories searched for `@use`/`@import` resolution, in order.
    /// Resolution happens in the engine, not here.
    pub fn include_paths(&self) -> &[PathBuf] {
        &self.include_paths
    }

    /// Registered custom functions.
    pub fn functions(&self) -> &[SassFunction] {
        &self.functions
    }

    pub fn syntax(&self) -> Syntax {
        self.syntax
    }

    pub fn quiet(&self) -> bool {
        self.quiet
    }

    /// Whether the engine may emit a leading `@charset` or byte-order
    /// mark for non-ASCII output.
    pub fn emit_charset(&self) -> bool {
        self.emit_charset
    }
}

/// Builder for [`Options`]; validation happens in [`OptionsBuilder::build`].
#[derive(Debug, Clone)]
pub struct OptionsBuilder {
    style: OutputStyle,
    precision: i32,
    include_paths: Vec<PathBuf>,
    functions: Vec<SassFunction>,
    syntax: Syntax,
    quiet: bool,
    emit_charset: bool,
}

impl Default for OptionsBuilder {
    fn default() -> Self {
        Options::default().to_builder()
    }
}

impl OptionsBuilder {
    pub fn style(mut self, style: OutputStyle) -> Self {
        self.style = style;
        self
    }

    pub fn precision(mut self, precision: i32) -> Self {
        self.precision = precision;
        self
    }

    pub fn include_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.include_paths.push(path.into());
        self
    }

    pub fn include_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.include_paths.extend(paths.into_iter().map(Into::into));
        self
    }

    pub fn function(mut self, function: SassFunction) -> Self {
        self.functions.push(function);
        self
    }

    pub fn syntax(mut self, syntax: Syntax) -> Self {
        self.syntax = syntax;
        self
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn emit_charset(mut self, emit_charset: bool) -> Self {
        self.emit_charset = emit_charset;
        self
    }

    /// Validate and produce the immutable [`Options`].
    ///
    /// # Errors
    ///
    /// [`ConfigError::NegativePrecision`] for a precision below zero,
    /// [`ConfigError::EmptyIncludePath`] when an include path has no
    /// characters. Include paths are checked syntactically only; whether
    /// they resolve is the engine's concern at compile time.
    pub fn build(self) -> Result<Options, ConfigError> {
        if self.precision < 0 {
            return Err(ConfigError::NegativePrecision(self.precision));
        }
        if self.include_paths.iter().any(|p| p.as_os_str().is_empty()) {
            return Err(ConfigError::EmptyIncludePath);
        }
        Ok(Options {
            style: self.style,
            precision: self.precision,
            include_paths: self.include_paths,
            functions: self.functions,
            syntax: self.syntax,
            quiet: self.quiet,
            emit_charset: self.emit_charset,
        })
    }
}
