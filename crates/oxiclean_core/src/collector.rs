use ignore::WalkBuilder;
use log::{debug, trace};
use std::path::{Path, PathBuf};

use crate::constants::JS_TS_EXTENSIONS;

/// Lists every JS/TS source file under `root`, sorted.
///
/// `.gitignore`/`.ignore` rules are honoured and `node_modules` is never entered.
pub fn collect_source_files(root: &Path) -> Result<Vec<PathBuf>, ignore::Error> {
    debug!("Walking directory tree from root: {}", root.display());
    let walker = WalkBuilder::new(root)
        .hidden(false)
        .ignore(true)
        .git_ignore(true)
        .filter_entry(|e| e.file_name() != "node_modules" && e.file_name() != ".git")
        .build();

    let mut files = Vec::new();
    for res in walker {
        let dent = res?;
        let p = dent.path();
        if !dent.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        if is_source_file(p) {
            trace!("Found source file: {}", p.display());
            files.push(p.to_path_buf());
        }
    }

    files.sort();
    debug!("Collected {} source files", files.len());
    Ok(files)
}

pub fn is_source_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()).is_some_and(|ext| JS_TS_EXTENSIONS.contains(&ext))
}
