use oxiclean_core::{CanonicalPath, ImportNode, SourceLocation, SpecKind};
use std::path::PathBuf;

use crate::rule::enforce_dynamic_import_message;

/// An external dependency loaded eagerly from an entry point's import graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// Project-relative path of the entry point whose traversal reached the import
    pub entry_point: String,
    /// File containing the offending import
    pub file: CanonicalPath,
    pub dependency: String,
    pub kind: SpecKind,
    pub location: SourceLocation,
}

impl Finding {
    pub fn new(entry_point: &str, file: &CanonicalPath, node: &ImportNode) -> Self {
        Self {
            entry_point: entry_point.to_string(),
            file: file.clone(),
            dependency: node.request.clone(),
            kind: node.kind,
            location: node.location,
        }
    }

    pub fn message(&self) -> String {
        enforce_dynamic_import_message(&self.dependency)
    }
}

#[derive(Debug, Clone)]
pub struct CheckResult {
    pub root: PathBuf,
    pub findings: Vec<Finding>,
    pub entries_analyzed: usize,
    pub files_analyzed: usize,
}
