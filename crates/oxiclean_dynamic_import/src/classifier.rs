use oxiclean_core::{NODE_BUILTIN_PREFIX, NODE_BUILTINS, is_path_request};

use crate::config::TraversalConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleClass {
    /// Listed in `ignoreModules`
    Ignored,
    /// Provided by the runtime (`fs`, `node:path`, ...)
    Builtin,
    /// A project file, expanded by the walker
    Internal,
    /// A package dependency, reported when loaded eagerly
    External,
}

/// Classifies a module specifier without touching the filesystem.
pub fn classify(request: &str, cfg: &TraversalConfig) -> ModuleClass {
    if cfg.ignore_modules().contains(request) {
        ModuleClass::Ignored
    } else if is_builtin(request) {
        ModuleClass::Builtin
    } else if is_path_request(request) || cfg.aliases().is_aliased(request) {
        ModuleClass::Internal
    } else {
        ModuleClass::External
    }
}

/// Any `node:` specifier, or an exact entry of the built-in list.
pub fn is_builtin(request: &str) -> bool {
    request.starts_with(NODE_BUILTIN_PREFIX) || NODE_BUILTINS.contains(&request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuleOptions;
    use oxiclean_core::{PathAlias, PathAliases};
    use std::path::PathBuf;

    fn traversal_config(ignore: &[&str], aliases: PathAliases) -> TraversalConfig {
        let options = RuleOptions {
            entry_points: Some(vec!["src/index.ts".into()]),
            ignore_modules: ignore.iter().map(|s| s.to_string()).collect(),
        };
        TraversalConfig::new(PathBuf::from("/project"), &options, aliases)
    }

    #[test]
    fn test_builtins() {
        assert!(is_builtin("fs"));
        assert!(is_builtin("fs/promises"));
        assert!(is_builtin("node:fs"));
        assert!(is_builtin("node:test"));
        assert!(is_builtin("path/posix"));
        assert!(!is_builtin("fs-extra"));
        assert!(!is_builtin("@types/node"));
        assert!(!is_builtin("./fs"));
    }

    #[test]
    fn test_unknown_builtin_subpaths_are_packages() {
        assert!(is_builtin("stream/web"));
        assert!(is_builtin("util/types"));
        assert!(!is_builtin("punycode/"));
        assert!(!is_builtin("fs/anything"));
        assert!(!is_builtin("path/whatever"));

        let cfg = traversal_config(&[], PathAliases::default());
        assert_eq!(classify("punycode/", &cfg), ModuleClass::External);
        assert_eq!(classify("fs/promises", &cfg), ModuleClass::Builtin);
    }

    #[test]
    fn test_relative_and_absolute_are_internal() {
        let cfg = traversal_config(&[], PathAliases::default());
        assert_eq!(classify("./a", &cfg), ModuleClass::Internal);
        assert_eq!(classify("../lib/b", &cfg), ModuleClass::Internal);
        assert_eq!(classify("/project/src/c", &cfg), ModuleClass::Internal);
    }

    #[test]
    fn test_packages_are_external() {
        let cfg = traversal_config(&[], PathAliases::default());
        assert_eq!(classify("lodash", &cfg), ModuleClass::External);
        assert_eq!(classify("lodash/get", &cfg), ModuleClass::External);
        assert_eq!(classify("@tanstack/react-query", &cfg), ModuleClass::External);
    }

    #[test]
    fn test_alias_is_internal() {
        let aliases = PathAliases::new(vec![PathAlias {
            prefix: "@/".into(),
            wildcard: true,
            targets: vec![PathBuf::from("/project/src")],
        }]);
        let cfg = traversal_config(&[], aliases);
        assert_eq!(classify("@/components/Button", &cfg), ModuleClass::Internal);
        assert_eq!(classify("@scope/pkg", &cfg), ModuleClass::External);
    }

    #[test]
    fn test_ignored_wins_over_everything() {
        let cfg = traversal_config(&["lodash", "fs", "./polyfills"], PathAliases::default());
        assert_eq!(classify("lodash", &cfg), ModuleClass::Ignored);
        assert_eq!(classify("fs", &cfg), ModuleClass::Ignored);
        assert_eq!(classify("./polyfills", &cfg), ModuleClass::Ignored);
        // exact match only
        assert_eq!(classify("lodash/get", &cfg), ModuleClass::External);
    }
}
