//! Compiler entry points and context dispatch.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! [`Compiler`] is the public entry point. The convenience methods build
//! a context and all reduce to [`Compiler::compile`], which matches over
//! the closed [`Context`] sum and routes each variant to its engine
//! entry point. Construction failures and compilation failures stay
//! separate: `compile` itself can only fail with [`CompileError`].

use std::fmt;
use std::path::PathBuf;

use crate::context::{Charset, Context, FileContext, StringContext};
use crate::engine::{Engine, GrassEngine, Output};
use crate::error::{CompileError, SassError};
use crate::options::Options;

/// Compiles SCSS strings, files and prepared contexts.
///
/// A compiler wraps exactly one engine adapter, and adapters are not
/// assumed reentrant: `compile` takes `&mut self`, so calls through one
/// compiler are serialized by the borrow checker. Workers that compile
/// concurrently construct one compiler each.
pub struct Compiler {
    engine: Box<dyn Engine>,
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

impl Compiler {
    /// A compiler backed by the bundled grass engine.
    pub fn new() -> Self {
        Self::with_engine(Box::new(GrassEngine::new()))
    }

    /// A compiler backed by a caller-supplied engine adapter.
    pub fn with_engine(engine: Box<dyn Engine>) -> Self {
        Self { engine }
    }

    /// Compile source text with no path hints.
    pub fn compile_string(
        &mut self,
        source: impl Into<String>,
        options: &Options,
    ) -> Result<Output, SassError> {
        let context = StringContext::new(source, options.clone());
        Ok(self.compile(context.into())?)
    }

    /// Compile raw source bytes decoded with `charset`.
    pub fn compile_bytes(
        &mut self,
        bytes: &[u8],
        charset: Charset,
        options: &Options,
    ) -> Result<Output, SassError> {
        let context = StringContext::from_bytes(bytes, charset, options.clone())?;
        Ok(self.compile(context.into())?)
    }

    /// Compile source text with input/output path hints.
    ///
    /// The input hint anchors relative import resolution and diagnostic
    /// messages; neither path is checked for existence.
    pub fn compile_string_with_paths(
        &mut self,
        source: impl Into<String>,
        input_path: Option<PathBuf>,
        output_path: Option<PathBuf>,
        options: &Options,
    ) -> Result<Output, SassError> {
        let mut context = StringContext::new(source, options.clone());
        if let Some(path) = input_path {
            context = context.with_input_path(path);
        }
        if let Some(path) = output_path {
            context = context.with_output_path(path);
        }
        Ok(self.compile(context.into())?)
    }

    /// Fully explicit string entry point: bytes, charset and path hints.
    pub fn compile_bytes_with_paths(
        &mut self,
        bytes: &[u8],
        charset: Charset,
        input_path: Option<PathBuf>,
        output_path: Option<PathBuf>,
        options: &Options,
    ) -> Result<Output, SassError> {
        let mut context = StringContext::from_bytes(bytes, charset, options.clone())?;
        if let Some(path) = input_path {
            context = context.with_input_path(path);
        }
        if let Some(path) = output_path {
            context = context.with_output_path(path);
        }
        Ok(self.compile(context.into())?)
    }

    /// Compile a stylesheet from disk.
    ///
    /// Readability of the input is checked by the engine at compile
    /// time; an unreadable input is a [`CompileError`], not a
    /// construction failure.
    pub fn compile_file(
        &mut self,
        input_path: impl Into<PathBuf>,
        output_path: Option<PathBuf>,
        options: &Options,
    ) -> Result<Output, SassError> {
        let mut context = FileContext::new(input_path, options.clone())?;
        if let Some(path) = output_path {
            context = context.with_output_path(path);
        }
        Ok(self.compile(context.into())?)
    }

    /// Compile a prepared context.
    ///
    /// Consumes the context: a context describes exactly one compilation
    /// unit. Clone it before the call to reuse one deliberately; the
    /// engine may be stateful per call, so repeated compilation of a
    /// clone is permitted but not guaranteed identical.
    ///
    /// Failures propagate the engine's diagnostic payload unchanged.
    pub fn compile(&mut self, context: Context) -> Result<Output, CompileError> {
        match context {
            Context::String(context) => self.engine.compile_string(&context),
            Context::File(context) => self.engine.compile_file(&context),
        }
    }
}

impl fmt::Debug for Compiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Compiler")
            .field("engine", &"<dyn Engine>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Engine that answers each entry point with a distinct marker, so
    /// dispatch routing is observable from the output.
    struct MarkerEngine;

    impl Engine for MarkerEngine {
        fn compile_string(&mut self, context: &StringContext) -> Result<Output, CompileError> {
            Ok(Output::new(format!("string:{}", context.source())))
        }

        fn compile_file(&mut self, context: &FileContext) -> Result<Output, CompileError> {
            Ok(Output::new(format!(
                "file:{}",
                context.input_path().display()
            )))
        }
    }

    /// Engine that fails every call with a fixed diagnostic.
    struct FailingEngine;

    impl Engine for FailingEngine {
        fn compile_string(&mut self, _: &StringContext) -> Result<Output, CompileError> {
            Err(CompileError::new("engine rejected the input"))
        }

        fn compile_file(&mut self, _: &FileContext) -> Result<Output, CompileError> {
            Err(CompileError::new("engine rejected the input"))
        }
    }

    #[test]
    fn test_string_contexts_route_to_the_string_entry_point() {
        let mut compiler = Compiler::with_engine(Box::new(MarkerEngine));
        let context = StringContext::new(".a {}", Options::default());

        let output = compiler.compile(context.into()).unwrap();
        assert_eq!(output.css(), "string:.a {}");
    }

    #[test]
    fn test_file_contexts_route_to_the_file_entry_point() {
        let mut compiler = Compiler::with_engine(Box::new(MarkerEngine));
        let context = FileContext::new("theme/main.scss", Options::default()).unwrap();

        let output = compiler.compile(context.into()).unwrap();
        assert_eq!(output.css(), "file:theme/main.scss");
    }

    #[test]
    fn test_convenience_entry_points_build_string_contexts() {
        let mut compiler = Compiler::with_engine(Box::new(MarkerEngine));

        let output = compiler
            .compile_string(".b { margin: 0; }", &Options::default())
            .unwrap();
        assert_eq!(output.css(), "string:.b { margin: 0; }");

        let output = compiler
            .compile_bytes(b".c {}", Charset::Utf8, &Options::default())
            .unwrap();
        assert_eq!(output.css(), "string:.c {}");
    }

    #[test]
    fn test_engine_diagnostics_pass_through_unchanged() {
        let mut compiler = Compiler::with_engine(Box::new(FailingEngine));
        let context = StringContext::new(".a {}", Options::default());

        let err = compiler.compile(context.into()).unwrap_err();
        assert_eq!(err.message, "engine rejected the input");
        assert_eq!(err.status, 1);
    }

    #[test]
    fn test_undecodable_bytes_fail_before_the_engine_runs() {
        // FailingEngine would turn any engine call into a compile error;
        // a decode failure must surface as a configuration error instead.
        let mut compiler = Compiler::with_engine(Box::new(FailingEngine));

        let err = compiler
            .compile_bytes(&[0xFF, 0xFE], Charset::Utf8, &Options::default())
            .unwrap_err();
        assert!(matches!(err, SassError::Config(_)));
    }
}
