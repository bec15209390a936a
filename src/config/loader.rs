// Configuration loader - some methods reserved for future use
#![allow(dead_code)]

use crate::registry::ResourceSpec;
use miette::{IntoDiagnostic, Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for a spannercheck run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Paths to scan for SSA exports
    pub targets: Vec<PathBuf>,

    /// Patterns to exclude from discovery
    pub exclude: Vec<String>,

    /// Resource types tracked on top of the builtin set
    pub resources: Vec<ResourceSpec>,

    /// Extra substrings marking generated source files
    pub generated_markers: Vec<String>,

    /// Report configuration
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Output format: terminal, json, sarif
    pub format: String,

    /// Print the containing function under each finding
    pub show_functions: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            targets: vec![],
            exclude: vec![
                "**/vendor/**".to_string(),
                "**/testdata/**".to_string(),
            ],
            resources: vec![],
            generated_markers: vec![],
            report: ReportConfig::default(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: "terminal".to_string(),
            show_functions: true,
        }
    }
}

impl Config {
    /// Load configuration from a file (YAML or TOML)
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        match extension {
            "yml" | "yaml" => serde_yaml::from_str(&contents)
                .into_diagnostic()
                .wrap_err("Failed to parse YAML config"),
            "toml" => toml::from_str(&contents)
                .into_diagnostic()
                .wrap_err("Failed to parse TOML config"),
            _ => {
                // Try YAML first, then TOML
                if let Ok(config) = serde_yaml::from_str(&contents) {
                    Ok(config)
                } else {
                    toml::from_str(&contents)
                        .into_diagnostic()
                        .wrap_err("Failed to parse config file")
                }
            }
        }
    }

    /// Try to load configuration from default locations
    pub fn from_default_locations(project_root: &Path) -> Result<Self> {
        let default_names = [
            ".spannercheck.yml",
            ".spannercheck.yaml",
            ".spannercheck.toml",
            "spannercheck.yml",
            "spannercheck.yaml",
            "spannercheck.toml",
        ];

        for name in &default_names {
            let path = project_root.join(name);
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        // No config file found, use defaults
        Ok(Self::default())
    }

    /// Check if a pattern matches for exclusion
    pub fn should_exclude(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();
        self.exclude.iter().any(|pattern| glob_match(pattern, &path_str))
    }
}

/// Simple glob matching for patterns like "*.ssa.json" or "**/vendor/**"
fn glob_match(pattern: &str, text: &str) -> bool {
    // Handle simple wildcard patterns
    if pattern.starts_with('*') && !pattern.contains('/') {
        // Pattern like "*.ssa.json" matches "unit.ssa.json"
        let suffix = &pattern[1..];
        return text.ends_with(suffix);
    }

    if pattern.ends_with('*') && !pattern.contains('/') {
        // Pattern like "tmp*" matches "tmpdir"
        let prefix = &pattern[..pattern.len() - 1];
        return text.starts_with(prefix);
    }

    // Handle path patterns with **
    if pattern.contains("**") {
        let cleaned = pattern.replace("**/", "").replace("/**", "");

        // Pattern like "**/vendor/**" matches a complete directory name
        // anywhere in the path: "/vendor/" matches, "/vendored/" does not.
        if pattern.starts_with("**/") && pattern.ends_with("/**") {
            let dir_name = cleaned.trim_matches('/');
            let dir_pattern = format!("/{}/", dir_name);
            return text.contains(&dir_pattern);
        }

        let parts: Vec<&str> = pattern.split("**").collect();
        if parts.len() == 2 {
            let prefix = parts[0].trim_end_matches('/');
            let suffix = parts[1].trim_start_matches('/');

            if prefix.is_empty() && suffix.is_empty() {
                return true; // Pattern is just "**"
            }

            if prefix.is_empty() {
                return text.ends_with(suffix) || text.contains(&format!("/{}", suffix));
            }

            if suffix.is_empty() {
                return text.starts_with(prefix) || text.contains(&format!("{}/", prefix));
            }

            // Both prefix and suffix
            return (text.starts_with(prefix) || text.contains(&format!("/{}/", prefix)))
                && (text.ends_with(suffix) || text.contains(&format!("/{}", suffix)));
        }
    }

    // Exact match
    text == pattern
}
