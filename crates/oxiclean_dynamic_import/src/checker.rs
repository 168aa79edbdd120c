use anyhow::{Context, Result};
use dashmap::DashMap;
use log::{debug, info, trace, warn};
use oxiclean_core::{CanonicalPath, ImportNode, ResolveCache, collect_source_files};
use path_clean::clean;
use rayon::prelude::*;
use std::{collections::HashSet, env, path::PathBuf, thread};

use crate::{
    config::{Config, TraversalConfig},
    gate::entry_point_name,
    types::{CheckResult, Finding},
    walker::Walker,
};

pub fn run_dynamic_import_check(cfg: &Config) -> Result<CheckResult> {
    info!("Starting dynamic import check");
    let traversal_cfg = cfg.traversal_config()?;
    let root = traversal_cfg.root().to_path_buf();

    if traversal_cfg.entry_points().is_empty() {
        warn!("No entry points configured, nothing to analyze");
    }

    let candidates = candidate_files(cfg, &traversal_cfg)?;
    debug!("Analyzing {} candidate files", candidates.len());

    // Entry-point gate: every other file is only reached through some entry's imports
    let entries: Vec<(String, CanonicalPath)> = candidates
        .into_iter()
        .filter_map(|file| {
            let name = entry_point_name(file.as_path(), &traversal_cfg)?;
            trace!("Admitted entry point: {}", name);
            Some((name, file))
        })
        .collect();

    if cfg.files.is_empty() {
        let seen: HashSet<&str> = entries.iter().map(|(name, _)| name.as_str()).collect();
        for missing in traversal_cfg.entry_points().iter().filter(|e| !seen.contains(e.as_str())) {
            warn!("Entry point '{}' was not found under {}", missing, root.display());
        }
    }
    info!("Found {} entry points", entries.len());

    let import_cache: DashMap<PathBuf, Vec<ImportNode>> = DashMap::new();
    let resolve_cache: ResolveCache = DashMap::new();
    let walker = Walker::new(&traversal_cfg, &import_cache, &resolve_cache);

    // One traversal (and one VisitedSet) per entry point, results kept in entry order
    let per_entry: Vec<Vec<Finding>> = entries
        .par_iter()
        .map(|(name, path)| {
            debug!("Thread {:?} processing: {}", thread::current().id(), name);
            walker.walk(path, name).findings
        })
        .collect();
    let findings: Vec<Finding> = per_entry.into_iter().flatten().collect();

    info!("Dynamic import check complete. Found {} findings", findings.len());
    debug!(
        "Cache statistics: imports={}, resolutions={}",
        import_cache.len(),
        resolve_cache.len()
    );

    Ok(CheckResult {
        root,
        findings,
        entries_analyzed: entries.len(),
        files_analyzed: import_cache.len(),
    })
}

/// Files handed to the entry-point gate, canonicalized so they compare against the root.
fn candidate_files(cfg: &Config, traversal_cfg: &TraversalConfig) -> Result<Vec<CanonicalPath>> {
    if cfg.files.is_empty() {
        let files = collect_source_files(traversal_cfg.root()).with_context(|| {
            format!("Failed to list source files under {}", traversal_cfg.root().display())
        })?;
        return Ok(files.into_iter().map(CanonicalPath::new).collect());
    }

    let cwd = env::current_dir().context("Failed to read the current directory")?;
    Ok(cfg
        .files
        .iter()
        .filter_map(|f| {
            let path = clean(cwd.join(f));
            if path.is_file() {
                Some(CanonicalPath::new(path))
            } else {
                warn!("Skipping {}: not a file", f.display());
                None
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use std::{fs, path::Path};
    use tempfile::TempDir;

    fn create_test_file(dir: &Path, path: &str, content: &str) -> PathBuf {
        let file_path = dir.join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&file_path, content).expect("Failed to write test file");
        file_path
    }

    fn config(root: &Path, entries: &[&str], files: Vec<PathBuf>) -> Config {
        Config {
            root: Some(root.to_path_buf()),
            entry_points: entries.iter().map(|s| s.to_string()).collect(),
            ignore_modules: Vec::new(),
            config: None,
            format: OutputFormat::Text,
            files,
        }
    }

    #[test]
    fn test_entry_point_traversal() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "src/index.ts", "import './a';");
        create_test_file(root, "src/a.ts", "import 'lodash';");

        let result = run_dynamic_import_check(&config(root, &["src/index.ts"], vec![])).unwrap();
        assert_eq!(result.entries_analyzed, 1);
        assert_eq!(result.files_analyzed, 2);
        assert_eq!(result.findings.len(), 1);
        assert_eq!(result.findings[0].dependency, "lodash");
        assert_eq!(result.findings[0].entry_point, "src/index.ts");
    }

    #[test]
    fn test_non_entry_files_are_not_roots() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "src/index.ts", "export const x = 1;");
        create_test_file(root, "src/tool.ts", "import 'lodash';");

        let result = run_dynamic_import_check(&config(root, &["src/index.ts"], vec![])).unwrap();
        assert!(result.findings.is_empty());
        assert_eq!(result.files_analyzed, 1);
    }

    #[test]
    fn test_explicit_non_entry_file_yields_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let file = create_test_file(root, "src/index.ts", "import 'lodash';");

        let result = run_dynamic_import_check(&config(root, &["src/main.ts"], vec![file])).unwrap();
        assert_eq!(result.entries_analyzed, 0);
        assert!(result.findings.is_empty());
    }

    #[test]
    fn test_no_entry_points_configured() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "src/index.ts", "import 'lodash';");

        let result = run_dynamic_import_check(&config(root, &[], vec![])).unwrap();
        assert_eq!(result.entries_analyzed, 0);
        assert!(result.findings.is_empty());
    }

    #[test]
    fn test_entries_traversed_independently_in_order() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "src/admin.ts", "import './shared';");
        create_test_file(root, "src/index.ts", "import './shared';\nimport 'zod';");
        create_test_file(root, "src/shared.ts", "import 'axios';");

        let result =
            run_dynamic_import_check(&config(root, &["src/index.ts", "src/admin.ts"], vec![]))
                .unwrap();
        let got: Vec<(&str, &str)> = result
            .findings
            .iter()
            .map(|f| (f.entry_point.as_str(), f.dependency.as_str()))
            .collect();
        assert_eq!(
            got,
            vec![("src/admin.ts", "axios"), ("src/index.ts", "axios"), ("src/index.ts", "zod")]
        );
    }

    #[test]
    fn test_invalid_options_abort_before_traversal() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "src/index.ts", "import 'lodash';");

        let cfg = config(root, &["src/index.ts", "src/index.ts"], vec![]);
        assert!(run_dynamic_import_check(&cfg).is_err());
    }
}
