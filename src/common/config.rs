//! Configuration file handling

use serde::Deserialize;
use std::path::Path;

use super::paths::config_path;
use super::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Test execution settings
    #[serde(default)]
    pub runner: RunnerConfig,

    /// Report output settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// Test execution settings
#[derive(Debug, Clone, Deserialize)]
pub struct RunnerConfig {
    /// Deepest allowed subtest nesting; top-level tests are depth 0
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Record a panicking body as a failed test instead of unwinding the run
    #[serde(default = "default_catch_panics")]
    pub catch_panics: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            catch_panics: default_catch_panics(),
        }
    }
}

fn default_max_depth() -> usize {
    64
}

fn default_catch_panics() -> bool {
    true
}

/// Report format written to stdout
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    /// Human-readable `--- PASS` / `--- FAIL` lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// Report output settings
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Colorize PASS/FAIL markers
    #[serde(default = "default_color")]
    pub color: bool,

    /// Print `=== RUN` lines and output of passing tests
    #[serde(default)]
    pub verbose: bool,

    /// Report format
    #[serde(default)]
    pub format: ReportFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            color: default_color(),
            verbose: false,
            format: ReportFormat::default(),
        }
    }
}

fn default_color() -> bool {
    true
}

impl Config {
    /// Load configuration from the default config file
    ///
    /// Returns default configuration if file doesn't exist
    pub fn load() -> Result<Self> {
        match config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| super::Error::file_read(path, &e))?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| super::Error::ConfigParse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.runner.max_depth, 64);
        assert!(config.runner.catch_panics);
        assert!(config.output.color);
        assert!(!config.output.verbose);
        assert_eq!(config.output.format, ReportFormat::Text);
    }

    #[test]
    fn test_partial_config() {
        let config = Config::parse(
            r#"
            [runner]
            max_depth = 3

            [output]
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.runner.max_depth, 3);
        assert!(config.runner.catch_panics);
        assert_eq!(config.output.format, ReportFormat::Json);
    }

    #[test]
    fn test_invalid_config_is_parse_error() {
        let err = Config::parse("[runner]\nmax_depth = \"deep\"").unwrap_err();
        assert!(matches!(err, crate::Error::ConfigParse(_)));
    }
}
