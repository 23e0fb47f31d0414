#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod compiler;
pub mod config;
pub mod error;
pub mod filter;
pub mod request;
pub mod scanning;

pub use compiler::CatalogCompiler;
pub use config::ToolConfig;
pub use error::{CompileError, CompileResult};
pub use filter::{PathRewriteTable, filter_compiler_output, fix_absolute_path_in_line};
pub use request::{CompileRequest, Platform, TargetEnvironment};
