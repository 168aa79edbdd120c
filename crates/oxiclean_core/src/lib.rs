//! Core utilities for oxiclean tools.
//!
//! This crate provides shared functionality for analyzing JavaScript/TypeScript
//! projects, including:
//! - Extracting import specifiers (with source locations) from JS/TS files
//! - Resolving project-local module paths (relative paths, tsconfig aliases)
//! - Loading tsconfig `paths` aliases
//! - Collecting the source files of a project

mod collector;
mod constants;
mod error;
mod parser;
mod resolver;
mod tsconfig;
mod types;

// Re-export public API
pub use collector::{collect_source_files, is_source_file};
pub use constants::{
    INDEX_FILES, JS_TO_TS_EXTENSIONS, JS_TS_EXTENSIONS, NODE_BUILTIN_PREFIX, NODE_BUILTINS,
    RESOLVE_EXTENSIONS,
};
pub use error::ExtractError;
pub use parser::{extract_imports, imports_for};
pub use resolver::{ResolveCache, is_path_request, resolve};
pub use tsconfig::{PathAlias, PathAliases};
pub use types::{CanonicalPath, ImportNode, SourceLocation, SpecKind};
