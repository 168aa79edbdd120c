use dashmap::DashMap;
use log::{debug, trace};
use oxiclean_core::{CanonicalPath, ImportNode, ResolveCache, imports_for, resolve};
use std::{collections::HashSet, path::PathBuf};

use crate::{
    classifier::{ModuleClass, classify},
    config::TraversalConfig,
    types::Finding,
};

/// Modules already expanded during one traversal.
#[derive(Debug, Default)]
pub struct VisitedSet {
    paths: HashSet<CanonicalPath>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if `path` was already present.
    pub fn insert(&mut self, path: CanonicalPath) -> bool {
        self.paths.insert(path)
    }

    pub fn contains(&self, path: &CanonicalPath) -> bool {
        self.paths.contains(path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

#[derive(Debug)]
pub struct Traversal {
    pub findings: Vec<Finding>,
    pub visited: VisitedSet,
}

/// Depth-first walk over the eager imports of an entry point.
///
/// The caches may be shared between walkers running on different threads;
/// every call to [`Walker::walk`] owns its own [`VisitedSet`].
pub struct Walker<'a> {
    cfg: &'a TraversalConfig,
    import_cache: &'a DashMap<PathBuf, Vec<ImportNode>>,
    resolve_cache: &'a ResolveCache,
}

impl<'a> Walker<'a> {
    pub fn new(
        cfg: &'a TraversalConfig,
        import_cache: &'a DashMap<PathBuf, Vec<ImportNode>>,
        resolve_cache: &'a ResolveCache,
    ) -> Self {
        Self { cfg, import_cache, resolve_cache }
    }

    pub fn walk(&self, entry: &CanonicalPath, entry_point: &str) -> Traversal {
        debug!("Walking imports of entry point {}", entry_point);
        let mut visited = VisitedSet::new();
        let mut findings = Vec::new();

        // The root is expanded directly, a cycle leading back to it stops here
        visited.insert(entry.clone());
        self.expand(entry_point, entry, &mut visited, &mut findings);

        debug!(
            "Entry point {} reached {} modules, {} findings",
            entry_point,
            visited.len(),
            findings.len()
        );
        Traversal { findings, visited }
    }

    fn expand(
        &self,
        entry_point: &str,
        file: &CanonicalPath,
        visited: &mut VisitedSet,
        findings: &mut Vec<Finding>,
    ) {
        let imports = match imports_for(file.as_path(), self.import_cache) {
            Ok(imports) => imports,
            Err(e) => {
                debug!("Not expanding {}: {}", file, e);
                return;
            }
        };

        for node in &imports {
            if !node.kind.is_eager() {
                trace!("Skipping dynamic import '{}' in {}", node.request, file);
                continue;
            }

            match classify(&node.request, self.cfg) {
                ModuleClass::Ignored | ModuleClass::Builtin => {
                    trace!("Skipping '{}' in {}", node.request, file);
                }
                ModuleClass::External => {
                    trace!("External '{}' imported statically in {}", node.request, file);
                    findings.push(Finding::new(entry_point, file, node));
                }
                ModuleClass::Internal => {
                    let Some(next) = resolve(
                        self.cfg.root(),
                        self.cfg.aliases(),
                        file.as_path(),
                        &node.request,
                        self.resolve_cache,
                    ) else {
                        trace!("Unresolved internal import '{}' in {}", node.request, file);
                        continue;
                    };
                    if visited.insert(next.clone()) {
                        self.expand(entry_point, &next, visited, findings);
                    }
                }
            }
        }
    }
}
