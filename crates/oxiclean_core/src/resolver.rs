use dashmap::DashMap;
use log::{debug, trace};
use path_clean::clean;
use std::path::{Path, PathBuf};

use crate::{
    constants::{INDEX_FILES, JS_TO_TS_EXTENSIONS, RESOLVE_EXTENSIONS},
    tsconfig::PathAliases,
    types::CanonicalPath,
};

pub type ResolveCache = DashMap<(PathBuf, String), Option<CanonicalPath>>;

/// Whether `request` is written as a path rather than a package name.
pub fn is_path_request(request: &str) -> bool {
    request == "."
        || request == ".."
        || request.starts_with("./")
        || request.starts_with("../")
        || request.starts_with('/')
}

/// Resolves a project-local `request` made from `from_file` to a file on disk.
///
/// Only path requests and tsconfig aliases are handled; package names return `None`.
pub fn resolve(
    root: &Path,
    aliases: &PathAliases,
    from_file: &Path,
    request: &str,
    cache: &ResolveCache,
) -> Option<CanonicalPath> {
    let key = (from_file.to_path_buf(), request.to_string());
    if let Some(v) = cache.get(&key) {
        trace!("Cache hit for resolve: '{}' from {}", request, from_file.display());
        return v.clone();
    }
    trace!("Resolving: '{}' from {}", request, from_file.display());

    let resolved = if is_path_request(request) {
        let base = from_file.parent().unwrap_or(root);
        resolve_file(&clean(base.join(request)))
    } else {
        aliases.candidates(request).iter().find_map(|candidate| resolve_file(&clean(candidate)))
    };

    match &resolved {
        Some(path) => debug!("Resolved '{}' from {} to {}", request, from_file.display(), path),
        None => trace!("Failed to resolve '{}' from {}", request, from_file.display()),
    }
    cache.insert(key, resolved.clone());
    resolved
}

fn resolve_file(p: &Path) -> Option<CanonicalPath> {
    if p.is_file() {
        return Some(CanonicalPath::new(p));
    }

    // `./util.js` written for `util.ts`
    if let Some(ext) = p.extension().and_then(|e| e.to_str())
        && let Some((_, ts_exts)) = JS_TO_TS_EXTENSIONS.iter().find(|(js, _)| *js == ext)
    {
        for ts in *ts_exts {
            let candidate = p.with_extension(ts);
            if candidate.is_file() {
                return Some(CanonicalPath::new(candidate));
            }
        }
    }

    for ext in RESOLVE_EXTENSIONS {
        let candidate = PathBuf::from(format!("{}.{}", p.display(), ext));
        if candidate.is_file() {
            return Some(CanonicalPath::new(candidate));
        }
    }

    INDEX_FILES.iter().map(|index| p.join(index)).find(|c| c.is_file()).map(CanonicalPath::new)
}
