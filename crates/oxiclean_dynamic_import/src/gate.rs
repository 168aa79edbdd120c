use std::path::{Component, Path};

use crate::config::TraversalConfig;

/// `file` relative to `root` with `/` separators, or `None` when it lies outside the root.
pub fn project_relative_path(file: &Path, root: &Path) -> Option<String> {
    let rel = file.strip_prefix(root).ok()?;
    let parts: Vec<_> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(p) => Some(p.to_string_lossy()),
            _ => None,
        })
        .collect();
    if parts.is_empty() { None } else { Some(parts.join("/")) }
}

/// The configured entry point name of `file`, if it is one.
pub fn entry_point_name(file: &Path, cfg: &TraversalConfig) -> Option<String> {
    project_relative_path(file, cfg.root()).filter(|rel| cfg.entry_points().contains(rel))
}

pub fn is_entry_point(file: &Path, cfg: &TraversalConfig) -> bool {
    entry_point_name(file, cfg).is_some()
}
