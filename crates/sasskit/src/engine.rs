//! The engine adapter seam and the bundled grass adapter.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! [`Engine`] is the boundary behind which the actual Sass engine lives.
//! Adapter methods take `&mut self` because engines are assumed not to be
//! reentrant: one compiler (and therefore one adapter) serves one caller
//! at a time, and workers that compile concurrently each construct their
//! own compiler rather than locking a shared one.
//!
//! [`GrassEngine`] is the bundled native adapter, delegating to the
//! `sasskit-grass` backend crate.

use std::path::Path;

use serde::{Deserialize, Serialize};

use sasskit_grass::{EngineError, Settings, SourceSyntax};

use crate::context::{FileContext, StringContext};
use crate::error::CompileError;
use crate::options::{DEFAULT_PRECISION, Options, OutputStyle, Syntax};

/// Result of one successful compilation.
///
/// Built by the engine adapter and handed to the caller; immutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    css: String,
    source_map: Option<String>,
}

impl Output {
    pub fn new(css: impl Into<String>) -> Self {
        Self {
            css: css.into(),
            source_map: None,
        }
    }

    /// Attach source-map text, for adapters that produce one.
    pub fn with_source_map(mut self, source_map: impl Into<String>) -> Self {
        self.source_map = Some(source_map.into());
        self
    }

    pub fn css(&self) -> &str {
        &self.css
    }

    pub fn source_map(&self) -> Option<&str> {
        self.source_map.as_deref()
    }

    pub fn into_css(self) -> String {
        self.css
    }
}

/// Boundary to the external compilation engine.
///
/// Implementations turn a normalized context into CSS or a
/// [`CompileError`] carrying the engine's diagnostic payload.
pub trait Engine {
    fn compile_string(&mut self, context: &StringContext) -> Result<Output, CompileError>;

    fn compile_file(&mut self, context: &FileContext) -> Result<Output, CompileError>;
}

/// Adapter for the grass engine, the bundled native backend.
///
/// grass runs at fixed dart-sass numeric precision, so a non-default
/// precision is logged and ignored. This adapter does not bridge host
/// callbacks into grass's custom-function interface; registered custom
/// functions fail the compilation rather than being silently dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct GrassEngine;

impl GrassEngine {
    pub fn new() -> Self {
        Self
    }
}

impl Engine for GrassEngine {
    fn compile_string(&mut self, context: &StringContext) -> Result<Output, CompileError> {
        reject_custom_functions(context.options())?;
        let mut settings = settings_from(context.options());
        // Relative imports in string sources resolve against the input
        // path hint first, then the include paths. A bare filename hint
        // has an empty parent, which is not a usable load path.
        if let Some(dir) = context
            .input_path()
            .and_then(Path::parent)
            .filter(|dir| !dir.as_os_str().is_empty())
        {
            settings.load_paths.insert(0, dir.to_path_buf());
        }
        tracing::debug!(
            bytes = context.source().len(),
            charset = context.charset().label(),
            "dispatching string source to grass"
        );
        let css =
            sasskit_grass::compile_string(context.source(), &settings).map_err(to_compile_error)?;
        Ok(Output::new(css))
    }

    fn compile_file(&mut self, context: &FileContext) -> Result<Output, CompileError> {
        reject_custom_functions(context.options())?;
        let settings = settings_from(context.options());
        tracing::debug!(path = %context.input_path().display(), "dispatching file source to grass");
        let css = sasskit_grass::compile_file(context.input_path(), &settings)
            .map_err(to_compile_error)?;
        Ok(Output::new(css))
    }
}

fn settings_from(options: &Options) -> Settings {
    if options.precision() != DEFAULT_PRECISION {
        tracing::debug!(
            precision = options.precision(),
            "grass runs at fixed precision; requested precision ignored"
        );
    }
    Settings {
        compressed: options.style() == OutputStyle::Compressed,
        load_paths: options.include_paths().to_vec(),
        syntax: match options.syntax() {
            Syntax::Scss => SourceSyntax::Scss,
            Syntax::Indented => SourceSyntax::Indented,
            Syntax::Css => SourceSyntax::Css,
        },
        quiet: options.quiet(),
        emit_charset: options.emit_charset(),
    }
}

fn reject_custom_functions(options: &Options) -> Result<(), CompileError> {
    match options.functions().first() {
        Some(function) => Err(CompileError::new(format!(
            "custom function {:?} is not bridged to the grass engine; compile with an adapter that runs host callbacks",
            function.name()
        ))),
        None => Ok(()),
    }
}

fn to_compile_error(error: EngineError) -> CompileError {
    match error {
        EngineError::Compile { message } => CompileError::new(message),
        EngineError::Io { path, source } => CompileError {
            message: format!("failed to read {}: {}", path.display(), source),
            status: 2,
            file: Some(path),
            line: None,
            column: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::SassFunction;
    use crate::value::Value;
    use std::path::PathBuf;

    #[test]
    fn test_output_accessors() {
        let output = Output::new("body {}").with_source_map("{\"version\": 3}");
        assert_eq!(output.css(), "body {}");
        assert_eq!(output.source_map(), Some("{\"version\": 3}"));
        assert_eq!(output.into_css(), "body {}");
    }

    #[test]
    fn test_settings_reflect_options() {
        let options = Options::builder()
            .style(OutputStyle::Compressed)
            .syntax(Syntax::Indented)
            .quiet(true)
            .emit_charset(false)
            .include_path("/styles")
            .build()
            .unwrap();

        let settings = settings_from(&options);

        assert!(settings.compressed);
        assert_eq!(settings.syntax, SourceSyntax::Indented);
        assert!(settings.quiet);
        assert!(!settings.emit_charset);
        assert_eq!(settings.load_paths, vec![PathBuf::from("/styles")]);
    }

    #[test]
    fn test_registered_functions_fail_loudly() {
        let options = Options::builder()
            .function(SassFunction::new("shade($c)", |_| Value::Null).unwrap())
            .build()
            .unwrap();

        let err = reject_custom_functions(&options).unwrap_err();
        assert!(err.message.contains("shade"));
        assert_eq!(err.status, 1);
    }

    #[test]
    fn test_io_failures_carry_the_path() {
        let err = to_compile_error(EngineError::Io {
            path: PathBuf::from("/styles/missing.scss"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        });

        assert_eq!(err.status, 2);
        assert_eq!(err.file, Some(PathBuf::from("/styles/missing.scss")));
        assert!(err.message.contains("missing.scss"));
    }

}
