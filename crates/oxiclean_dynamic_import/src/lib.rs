//! Enforce dynamic imports for external dependencies reachable from entry points.
//!
//! Every configured entry point is walked depth-first over its eager imports
//! (`import`, `export ... from`, top-level `require`). Project-local modules are
//! expanded once per traversal; each static import of a package dependency found
//! along the way is reported with message id `ENFORCE_DYNAMIC_IMPORT`. Dynamic
//! `import()` calls are compliant and end the walk on that branch.
//!
//! # Examples
//!
//! ```no_run
//! use clap::Parser;
//! use oxiclean_dynamic_import::{Config, print_findings, run_dynamic_import_check};
//!
//! # fn main() -> anyhow::Result<()> {
//! let cfg = Config::parse_from([
//!     "dynamic-import",
//!     "--root",
//!     "/path/to/project",
//!     "--entry-point",
//!     "src/index.ts",
//!     "--ignore-module",
//!     "react",
//! ]);
//!
//! let result = run_dynamic_import_check(&cfg)?;
//! let mut stdout = std::io::stdout();
//! print_findings(&mut stdout, &result.findings, &result.root, cfg.format)?;
//! # Ok(())
//! # }
//! ```

mod checker;
mod classifier;
mod config;
mod error;
mod gate;
mod reporter;
mod rule;
mod types;
mod walker;

// Re-export public API
pub use checker::run_dynamic_import_check;
pub use classifier::{ModuleClass, classify, is_builtin};
pub use config::{Config, OutputFormat, RuleOptions, TraversalConfig};
pub use error::ConfigError;
pub use gate::{entry_point_name, is_entry_point, project_relative_path};
pub use reporter::{print_findings, print_no_findings_message};
pub use rule::{DESCRIPTION, MESSAGE_ID, MESSAGE_TEMPLATE, RULE_NAME, RULE_TYPE, render_message};
pub use types::{CheckResult, Finding};
pub use walker::{Traversal, VisitedSet, Walker};
