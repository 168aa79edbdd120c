//! `compilerOptions.paths` aliases collected from every `tsconfig.json` in a project.

use ignore::WalkBuilder;
use log::{debug, trace, warn};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// One `paths` entry, e.g. `"@app/*": ["src/app/*"]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathAlias {
    /// Pattern text before the `*` (or the whole pattern for exact aliases)
    pub prefix: String,
    pub wildcard: bool,
    /// Target directories/files, already joined onto the tsconfig's `baseUrl`
    pub targets: Vec<PathBuf>,
}

impl PathAlias {
    /// Returns the part of `request` that the alias substitutes, if it matches.
    fn remainder<'r>(&self, request: &'r str) -> Option<&'r str> {
        if self.wildcard {
            request.strip_prefix(self.prefix.as_str())
        } else if request == self.prefix {
            Some("")
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PathAliases {
    /// Sorted by prefix length, longest first
    entries: Vec<PathAlias>,
}

impl PathAliases {
    pub fn new(mut entries: Vec<PathAlias>) -> Self {
        entries.retain(|a| !(a.wildcard && a.prefix.is_empty()));
        entries.sort_by(|a, b| b.prefix.len().cmp(&a.prefix.len()));
        Self { entries }
    }

    /// Walks `root` for `tsconfig.json` files and loads their path aliases.
    ///
    /// Unreadable or malformed tsconfig files are skipped with a warning.
    pub fn load(root: &Path) -> Self {
        debug!("Reading tsconfig paths from root: {:?}", root);
        let walker = WalkBuilder::new(root)
            .hidden(false)
            .git_ignore(true)
            .filter_entry(|e| e.file_name() != "node_modules")
            .build();

        let mut entries = Vec::new();
        for entry in walker.filter_map(|e| e.ok()) {
            let path = entry.path();
            if path.file_name().and_then(|n| n.to_str()) != Some("tsconfig.json") {
                continue;
            }
            trace!("Found tsconfig at: {:?}", path);
            match fs::read_to_string(path) {
                Ok(content) => entries.extend(parse_tsconfig_paths(path, &content)),
                Err(e) => warn!("Failed to read {}: {}", path.display(), e),
            }
        }

        debug!("Loaded {} tsconfig path aliases", entries.len());
        Self::new(entries)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether some alias claims `request` as a project-local module.
    pub fn is_aliased(&self, request: &str) -> bool {
        self.entries.iter().any(|a| a.remainder(request).is_some())
    }

    /// Candidate paths for `request`, in the order they should be probed.
    pub fn candidates(&self, request: &str) -> Vec<PathBuf> {
        let Some(alias) = self.entries.iter().find(|a| a.remainder(request).is_some()) else {
            return Vec::new();
        };
        let remainder = alias.remainder(request).unwrap_or_default();
        trace!("Matched alias '{}' for request '{}'", alias.prefix, request);
        alias
            .targets
            .iter()
            .map(|t| if remainder.is_empty() { t.clone() } else { t.join(remainder) })
            .collect()
    }
}

fn parse_tsconfig_paths(tsconfig_path: &Path, content: &str) -> Vec<PathAlias> {
    let json = match serde_json::from_str::<serde_json::Value>(&strip_jsonc(content)) {
        Ok(json) => json,
        Err(e) => {
            warn!("Ignoring malformed {}: {}", tsconfig_path.display(), e);
            return Vec::new();
        }
    };

    let Some(compiler_options) = json.get("compilerOptions") else {
        return Vec::new();
    };
    let Some(paths) = compiler_options.get("paths").and_then(|p| p.as_object()) else {
        return Vec::new();
    };

    let base_url = compiler_options.get("baseUrl").and_then(|b| b.as_str()).unwrap_or(".");
    let base_path = tsconfig_path.parent().unwrap_or(Path::new(".")).join(base_url);

    paths
        .iter()
        .filter_map(|(pattern, targets)| {
            let targets: Vec<PathBuf> = targets
                .as_array()?
                .iter()
                .filter_map(|t| t.as_str())
                .map(|t| base_path.join(t.trim_end_matches('*').trim_end_matches('/')))
                .collect();
            if targets.is_empty() {
                return None;
            }
            let (prefix, wildcard) = match pattern.strip_suffix('*') {
                Some(prefix) => (prefix.to_string(), true),
                None => (pattern.clone(), false),
            };
            trace!("Found tsconfig path alias: '{}' -> {:?}", pattern, targets);
            Some(PathAlias { prefix, wildcard, targets })
        })
        .collect()
}

/// Removes `//` and `/* */` comments and trailing commas from tsconfig-flavoured JSON.
/// String contents are copied untouched, so `"https://..."` survives.
fn strip_jsonc(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match (c, chars.peek()) {
            ('"', _) => {
                in_string = true;
                out.push(c);
            }
            ('/', Some('/')) => {
                while chars.peek().is_some_and(|&n| n != '\n') {
                    chars.next();
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for n in chars.by_ref() {
                    if prev == '*' && n == '/' {
                        break;
                    }
                    prev = n;
                }
            }
            (',', _) => {
                let rest = chars.clone().skip_while(|n| n.is_whitespace()).next();
                if !matches!(rest, Some('}') | Some(']')) {
                    out.push(c);
                }
            }
            _ => out.push(c),
        }
    }
    out
}
