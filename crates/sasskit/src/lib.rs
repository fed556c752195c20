//! Sass/SCSS compilation facade.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! This crate mediates between caller-supplied stylesheet sources and a
//! Sass engine. It provides:
//! - Runtime values ([`Value`], [`SassMap`]) with engine-compatible
//!   literal rendering, for custom functions and map/list manipulation
//! - Immutable, builder-validated compilation options ([`Options`])
//! - Normalized compilation requests ([`StringContext`], [`FileContext`]
//!   and the closed [`Context`] sum)
//! - The [`Compiler`] entry point, dispatching contexts to an [`Engine`]
//!   adapter; [`GrassEngine`] is the bundled native backend
//!
//! Compile a string in two lines:
//!
//! ```
//! use sasskit::{Compiler, Options};
//!
//! let output = Compiler::new()
//!     .compile_string("body { color: red; }", &Options::default())
//!     .unwrap();
//! assert!(output.css().contains("color: red"));
//! ```

mod compile;
mod context;
mod engine;
mod error;
mod options;
mod value;

pub use compile::Compiler;
pub use context::{Charset, Context, ContextKind, FileContext, StringContext};
pub use engine::{Engine, GrassEngine, Output};
pub use error::{CompileError, ConfigError, SassError};
pub use options::{DEFAULT_PRECISION, HostFn, Options, OptionsBuilder, OutputStyle, SassFunction, Syntax};
pub use value::{SassMap, Separator, Value, ValueError, ValueKind};
