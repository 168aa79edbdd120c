use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{debug, info};
use oxiclean_core::PathAliases;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashSet,
    env, fs,
    path::{Path, PathBuf},
};

use crate::{error::ConfigError, rule::DESCRIPTION};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "dynamic-import")]
#[command(about = DESCRIPTION)]
pub struct Config {
    /// Project root that entry points are relative to (defaults to the current directory)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Project-relative path of an entry point file (repeatable)
    #[arg(long = "entry-point", value_name = "PATH")]
    pub entry_points: Vec<String>,

    /// Module specifier exempt from the rule (repeatable)
    #[arg(long = "ignore-module", value_name = "SPECIFIER")]
    pub ignore_modules: Vec<String>,

    /// JSON rule options file: { "entryPoints": [...], "ignoreModules": [...] }
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Files to analyze (defaults to every JS/TS file under the root)
    pub files: Vec<PathBuf>,
}

impl Config {
    /// Merges the options file (if any) with the command line flags and validates the result.
    pub fn rule_options(&self) -> Result<RuleOptions, ConfigError> {
        let mut options = match &self.config {
            Some(path) => RuleOptions::from_file(path)?,
            None => RuleOptions::default(),
        };
        if !self.entry_points.is_empty() {
            options.entry_points.get_or_insert_with(Vec::new).extend(self.entry_points.clone());
        }
        options.ignore_modules.extend(self.ignore_modules.clone());
        options.validate()?;
        Ok(options)
    }

    /// The directory entry points are relative to, canonicalized.
    pub fn project_root(&self) -> Result<PathBuf> {
        let root = match &self.root {
            Some(r) => {
                debug!("Using provided root directory: {:?}", r);
                r.clone()
            }
            None => env::current_dir().context("Failed to read the current directory")?,
        };
        root.canonicalize()
            .with_context(|| format!("Project root {} is not accessible", root.display()))
    }

    pub fn traversal_config(&self) -> Result<TraversalConfig> {
        let options = self.rule_options()?;
        let root = self.project_root()?;
        info!("Using root directory: {}", root.display());

        let aliases = PathAliases::load(&root);
        debug!("Found {} tsconfig path aliases", aliases.len());
        Ok(TraversalConfig::new(root, &options, aliases))
    }
}

/// Rule options as written in a JSON options file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RuleOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_points: Option<Vec<String>>,
    #[serde(default)]
    pub ignore_modules: Vec<String>,
}

impl RuleOptions {
    pub fn from_json(origin: &str, json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json)
            .map_err(|source| ConfigError::Schema { origin: origin.to_string(), source })
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        Self::from_json(&path.display().to_string(), &json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(entry_points) = &self.entry_points {
            if entry_points.is_empty() {
                return Err(ConfigError::EmptyEntryPoints);
            }
            ensure_unique("entryPoints", entry_points)?;
        }
        ensure_unique("ignoreModules", &self.ignore_modules)
    }
}

fn ensure_unique(option: &'static str, values: &[String]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    match values.iter().find(|v| !seen.insert(v.as_str())) {
        Some(dup) => Err(ConfigError::Duplicate { option, value: dup.clone() }),
        None => Ok(()),
    }
}

/// Read-only settings shared by every traversal of one run.
#[derive(Debug, Clone)]
pub struct TraversalConfig {
    root: PathBuf,
    entry_points: HashSet<String>,
    ignore_modules: HashSet<String>,
    aliases: PathAliases,
}

impl TraversalConfig {
    pub fn new(root: PathBuf, options: &RuleOptions, aliases: PathAliases) -> Self {
        Self {
            root,
            entry_points: options.entry_points.iter().flatten().cloned().collect(),
            ignore_modules: options.ignore_modules.iter().cloned().collect(),
            aliases,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn entry_points(&self) -> &HashSet<String> {
        &self.entry_points
    }

    pub fn ignore_modules(&self) -> &HashSet<String> {
        &self.ignore_modules
    }

    pub fn aliases(&self) -> &PathAliases {
        &self.aliases
    }
}
