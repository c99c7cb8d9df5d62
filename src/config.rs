//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.importtally.toml` files.

use crate::cli::OutputFormat;
use crate::ingest::InputFormat;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// File name looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".importtally.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Outcome log settings.
    #[serde(default)]
    pub input: InputConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// Outcome log settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Log layout (auto, json, delimited).
    #[serde(default)]
    pub format: InputFormat,

    /// Separator between identifier and status in delimited logs.
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            format: InputFormat::default(),
            delimiter: default_delimiter(),
        }
    }
}

fn default_delimiter() -> char {
    '\t'
}

/// Report settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Output format (table, markdown, json).
    #[serde(default)]
    pub format: OutputFormat,

    /// List failed and duplicate identifiers below the table.
    #[serde(default)]
    pub show_items: bool,

    /// Exit with code 2 when any item failed.
    #[serde(default)]
    pub fail_on_error: bool,
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load `.importtally.toml` from a directory.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(DEFAULT_CONFIG_FILE);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Resolve the configuration for a run.
    ///
    /// Uses the explicit path if given, else `.importtally.toml` in `dir`,
    /// else defaults. A config file that exists but cannot be read or
    /// parsed is an error, never a silent fallback to defaults.
    pub fn resolve(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            info!("Loading config from: {}", path.display());
            return Self::load(path);
        }

        let loaded = Self::load_from_dir(dir)
            .with_context(|| format!("Failed to load {}", DEFAULT_CONFIG_FILE))?;
        match loaded {
            Some(config) => {
                info!("Loaded default config from {}", DEFAULT_CONFIG_FILE);
                Ok(config)
            }
            None => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// Only values given explicitly on the command line override.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(format) = args.input_format {
            self.input.format = format;
        }
        if let Some(delimiter) = args.delimiter {
            self.input.delimiter = delimiter;
        }

        if let Some(format) = args.format {
            self.report.format = format;
        }

        // Flags only switch things on
        if args.show_items {
            self.report.show_items = true;
        }
        if args.fail_on_error {
            self.report.fail_on_error = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::tests::make_args;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.input.format, InputFormat::Auto);
        assert_eq!(config.input.delimiter, '\t');
        assert_eq!(config.report.format, OutputFormat::Table);
        assert!(!config.report.show_items);
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[input]
format = "delimited"
delimiter = ","

[report]
format = "markdown"
show_items = true
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.input.format, InputFormat::Delimited);
        assert_eq!(config.input.delimiter, ',');
        assert_eq!(config.report.format, OutputFormat::Markdown);
        assert!(config.report.show_items);
        assert!(!config.report.fail_on_error);
    }

    #[test]
    fn test_merge_with_args() {
        let mut config = Config::default();
        config.report.show_items = true;

        let mut args = make_args();
        args.format = Some(OutputFormat::Json);
        args.delimiter = Some(';');
        config.merge_with_args(&args);

        assert_eq!(config.report.format, OutputFormat::Json);
        assert_eq!(config.input.delimiter, ';');
        assert_eq!(config.input.format, InputFormat::Auto);
        // Unset flags never switch config values off
        assert!(config.report.show_items);
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[input]"));
        assert!(toml_str.contains("[report]"));

        let roundtrip: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(roundtrip.input.delimiter, '\t');
    }

    #[test]
    fn test_load_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load_from_dir(dir.path()).unwrap().is_none());

        std::fs::write(
            dir.path().join(DEFAULT_CONFIG_FILE),
            "[report]\nfail_on_error = true\n",
        )
        .unwrap();
        let config = Config::load_from_dir(dir.path()).unwrap().unwrap();
        assert!(config.report.fail_on_error);
    }

    #[test]
    fn test_resolve_prefers_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(DEFAULT_CONFIG_FILE), "[report]\n").unwrap();
        let explicit = dir.path().join("ci.toml");
        std::fs::write(&explicit, "[report]\nfail_on_error = true\n").unwrap();

        let config = Config::resolve(Some(&explicit), dir.path()).unwrap();
        assert!(config.report.fail_on_error);
    }

    #[test]
    fn test_resolve_defaults_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::resolve(None, dir.path()).unwrap();
        assert!(!config.report.fail_on_error);
    }

    #[test]
    fn test_resolve_fails_on_broken_default_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(DEFAULT_CONFIG_FILE),
            "[report\nfail_on_error = true\n",
        )
        .unwrap();

        let err = Config::resolve(None, dir.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to load .importtally.toml"));
    }

    #[test]
    fn test_load_rejects_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[report\n").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
