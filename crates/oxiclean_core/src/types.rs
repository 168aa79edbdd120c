use serde::Serialize;
use std::{
    fmt,
    path::{Path, PathBuf},
};

use path_clean::clean;

/// One import/require/dynamic-import specifier found in a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportNode {
    /// The literal module specifier, e.g. `./util` or `lodash`
    pub request: String,
    pub kind: SpecKind,
    /// Location of the specifier string literal
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpecKind {
    /// `import ... from 'x'`, `import 'x'`, `export ... from 'x'`
    Static,
    /// Top-level `require('x')`
    Require,
    /// `import('x')`
    Dynamic,
}

impl SpecKind {
    /// Whether the module is loaded eagerly when the importing file is evaluated.
    pub fn is_eager(self) -> bool {
        !matches!(self, SpecKind::Dynamic)
    }
}

/// Byte span plus 1-based line/column of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub start: u32,
    pub end: u32,
    pub line: u32,
    pub column: u32,
}

/// An absolute, normalized file path used as a traversal identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalPath(PathBuf);

impl CanonicalPath {
    /// Canonicalizes through the filesystem, falling back to lexical cleaning when the
    /// path can't be canonicalized (e.g. it was removed after probing).
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match path.canonicalize() {
            Ok(p) => Self(p),
            Err(_) => Self(clean(path)),
        }
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

impl AsRef<Path> for CanonicalPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for CanonicalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}
