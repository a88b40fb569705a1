//! Configuration management for blatex.
//!
//! Parses `blatex.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ```toml
//! [directive]
//! prefix = "blatex:"
//! assignment = "="
//! case_insensitive_prefix = false
//!
//! [[delimiters]]
//! open = "@("
//! close = ")"
//!
//! [fragments]
//! math = "<span class=\"math\">{value}</span>"
//! ```
//!
//! Without a `[[delimiters]]` list the built-in pairs are used. A list, when
//! present, replaces them and its order is the matching priority.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use blatex_markup::{DEFAULT_ASSIGNMENT, DEFAULT_PREFIX, DelimiterPair, DirectiveSyntax};
use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the directive prefix.
    pub prefix: Option<String>,
    /// Override case-insensitive prefix matching.
    pub case_insensitive_prefix: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "blatex.toml";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directive syntax configuration.
    pub directive: DirectiveConfig,
    /// Delimiter pairs in priority order (built-in pairs when absent).
    delimiters: Option<Vec<DelimiterConfig>>,
    /// Fragment templates by directive key.
    pub fragments: BTreeMap<String, String>,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Directive syntax configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DirectiveConfig {
    /// Reserved prefix starting every directive.
    pub prefix: String,
    /// Token between key and value.
    pub assignment: String,
    /// Match the prefix ignoring ASCII case.
    pub case_insensitive_prefix: bool,
}

impl Default for DirectiveConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_owned(),
            assignment: DEFAULT_ASSIGNMENT.to_owned(),
            case_insensitive_prefix: false,
        }
    }
}

/// One `[[delimiters]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct DelimiterConfig {
    /// Opening token.
    pub open: String,
    /// Closing token.
    pub close: String,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `blatex.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading, allowing CLI arguments to take
    /// precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::discover_from(&cwd))
        {
            Self::load_from_file(&discovered)?
        } else {
            tracing::debug!("No {CONFIG_FILENAME} found, using defaults");
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(prefix) = &settings.prefix {
            self.directive.prefix.clone_from(prefix);
        }
        if let Some(case_insensitive) = settings.case_insensitive_prefix {
            self.directive.case_insensitive_prefix = case_insensitive;
        }
    }

    /// Search for config file in `start` and its parents.
    fn discover_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.config_path = Some(path.to_path_buf());

        config.validate()?;
        tracing::debug!(path = %path.display(), "Loaded configuration");

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_directive()?;
        self.validate_delimiters()?;
        self.validate_fragments()?;
        Ok(())
    }

    /// Validate directive configuration.
    fn validate_directive(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.directive.prefix, "directive.prefix")?;
        require_non_empty(&self.directive.assignment, "directive.assignment")?;

        if self.directive.prefix.starts_with(char::is_whitespace) {
            return Err(ConfigError::Validation(
                "directive.prefix cannot start with whitespace".to_owned(),
            ));
        }

        Ok(())
    }

    /// Validate delimiter pairs.
    fn validate_delimiters(&self) -> Result<(), ConfigError> {
        let Some(delimiters) = &self.delimiters else {
            return Ok(());
        };

        if delimiters.is_empty() {
            return Err(ConfigError::Validation(
                "delimiters list cannot be empty (omit it to use the defaults)".to_owned(),
            ));
        }
        for (i, pair) in delimiters.iter().enumerate() {
            require_non_empty(&pair.open, &format!("delimiters[{i}].open"))?;
            require_non_empty(&pair.close, &format!("delimiters[{i}].close"))?;
        }

        Ok(())
    }

    /// Validate fragment keys.
    ///
    /// Keys must be reachable by the locator and unique ignoring case.
    fn validate_fragments(&self) -> Result<(), ConfigError> {
        let mut seen: HashMap<String, &str> = HashMap::new();

        for key in self.fragments.keys() {
            if key.is_empty()
                || !key
                    .chars()
                    .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
            {
                return Err(ConfigError::Validation(format!(
                    "fragments.{key}: key must contain only letters, digits, '-' or '_'"
                )));
            }
            if let Some(other) = seen.insert(key.to_lowercase(), key) {
                return Err(ConfigError::Validation(format!(
                    "fragments.{key} and fragments.{other} differ only in case"
                )));
            }
        }

        Ok(())
    }

    /// Delimiter pairs in priority order.
    #[must_use]
    pub fn delimiters(&self) -> Vec<DelimiterPair> {
        match &self.delimiters {
            Some(pairs) => pairs
                .iter()
                .map(|p| DelimiterPair::new(p.open.clone(), p.close.clone()))
                .collect(),
            None => DelimiterPair::defaults(),
        }
    }

    /// Build the directive syntax described by this configuration.
    #[must_use]
    pub fn syntax(&self) -> DirectiveSyntax {
        DirectiveSyntax::default()
            .with_prefix(self.directive.prefix.clone())
            .with_assignment(self.directive.assignment.clone())
            .with_delimiters(self.delimiters())
            .with_case_insensitive_prefix(self.directive.case_insensitive_prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.directive.prefix, "blatex:");
        assert_eq!(config.directive.assignment, "=");
        assert!(!config.directive.case_insensitive_prefix);
        assert!(config.fragments.is_empty());
        assert_eq!(config.delimiters(), DelimiterPair::defaults());
        assert_eq!(config.syntax(), DirectiveSyntax::default());
        config.validate().unwrap();
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.directive.prefix, "blatex:");
        assert!(config.config_path.is_none());
    }

    #[test]
    fn test_parse_directive_config() {
        let toml = r#"
[directive]
prefix = "tex:"
assignment = ":="
case_insensitive_prefix = true
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.directive.prefix, "tex:");
        assert_eq!(config.directive.assignment, ":=");
        assert!(config.directive.case_insensitive_prefix);

        let syntax = config.syntax();
        assert_eq!(syntax.prefix(), "tex:");
        assert_eq!(syntax.assignment(), ":=");
        assert!(syntax.case_insensitive_prefix());
    }

    #[test]
    fn test_parse_delimiters_replace_defaults() {
        let toml = r#"
[[delimiters]]
open = "[["
close = "]]"

[[delimiters]]
open = "("
close = ")"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(
            config.delimiters(),
            vec![DelimiterPair::new("[[", "]]"), DelimiterPair::new("(", ")")]
        );
        assert_eq!(config.syntax().delimiters().len(), 2);
    }

    #[test]
    fn test_parse_fragments() {
        let toml = r#"
[fragments]
math = "<m>{value}</m>"
hr = "<hr/>"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.fragments.len(), 2);
        assert_eq!(config.fragments["math"], "<m>{value}</m>");
        assert_eq!(config.fragments["hr"], "<hr/>");
    }

    #[test]
    fn test_validate_empty_prefix() {
        let toml = r#"
[directive]
prefix = ""
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let err = config.validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        assert!(err.to_string().contains("directive.prefix"));
    }

    #[test]
    fn test_validate_whitespace_prefix() {
        let mut config = Config::default();
        config.directive.prefix = " x:".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("whitespace"));
    }

    #[test]
    fn test_validate_empty_assignment() {
        let mut config = Config::default();
        config.directive.assignment = String::new();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("directive.assignment"));
    }

    #[test]
    fn test_validate_empty_delimiter_token() {
        let toml = r#"
[[delimiters]]
open = "<"
close = ""
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("delimiters[0].close"));
    }

    #[test]
    fn test_validate_empty_delimiter_list() {
        let config: Config = toml::from_str("delimiters = []").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_fragment_key_characters() {
        let toml = r#"
[fragments]
"not valid" = "x"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("fragments.not valid"));
    }

    #[test]
    fn test_validate_fragment_keys_case_collision() {
        let toml = r#"
[fragments]
Math = "a"
math = "b"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("differ only in case"));
    }

    #[test]
    fn test_apply_cli_settings_prefix() {
        let mut config = Config::default();
        let overrides = CliSettings {
            prefix: Some("tex:".to_owned()),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.directive.prefix, "tex:");
        assert!(!config.directive.case_insensitive_prefix); // Unchanged
    }

    #[test]
    fn test_apply_cli_settings_case_insensitive() {
        let mut config = Config::default();
        let overrides = CliSettings {
            case_insensitive_prefix: Some(true),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert!(config.directive.case_insensitive_prefix);
        assert_eq!(config.directive.prefix, "blatex:"); // Unchanged
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[directive]\nprefix = \"x:\"\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.directive.prefix, "x:");
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        let err = Config::load(Some(&path), None).unwrap_err();

        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blatex.toml");
        std::fs::write(&path, "[directive\n").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();

        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_validates_cli_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blatex.toml");
        std::fs::write(&path, "").unwrap();
        let overrides = CliSettings {
            prefix: Some(String::new()),
            ..Default::default()
        };

        let err = Config::load(Some(&path), Some(&overrides)).unwrap_err();

        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_discover_from_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&config_path, "").unwrap();
        let nested = dir.path().join("a/b");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(Config::discover_from(&nested), Some(config_path));
    }
}
