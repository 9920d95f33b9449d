//! Configuration loading and parsing for React Lens
//!
//! Provides functionality to load and parse `react-lens.toml` configuration files.

use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::diagnostic::Severity;
use crate::rules::find_rule;

pub const CONFIG_FILENAME: &str = "react-lens.toml";

const KNOWN_TOP_LEVEL_KEYS: &[&str] = &["ignore", "rules", "ai"];
const KNOWN_RULES_KEYS: &[&str] = &["disabled", "severity"];
const KNOWN_AI_KEYS: &[&str] = &["models", "temperature", "max_tokens"];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid TOML in '{path}': {message}")]
    ParseError { path: PathBuf, message: String },
}

#[derive(Debug, Clone, Default)]
pub struct ConfigResult {
    pub config: Config,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Extra directory names skipped during file discovery.
    pub ignore: Vec<String>,
    pub rules: RulesConfig,
    pub ai: AiConfig,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct RulesConfig {
    pub disabled: Vec<String>,
    pub severity: HashMap<String, SeverityValue>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct AiConfig {
    pub models: Option<Vec<String>>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum SeverityValue {
    Error,
    #[serde(alias = "warning")]
    Warn,
}

impl From<SeverityValue> for Severity {
    fn from(value: SeverityValue) -> Self {
        match value {
            SeverityValue::Error => Severity::Error,
            SeverityValue::Warn => Severity::Warn,
        }
    }
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();
    loop {
        let config_path = current.join(CONFIG_FILENAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if !current.pop() {
            return None;
        }
    }
}

fn read_config(path: &Path) -> Result<(Config, String), ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        message: e.message().to_string(),
    })?;

    Ok((config, content))
}

pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    read_config(path).map(|(config, _)| config)
}

pub fn load_config_with_warnings(path: &Path) -> Result<ConfigResult, ConfigError> {
    let (config, content) = read_config(path)?;

    let mut warnings = detect_unknown_keys(&content);
    warnings.extend(detect_unknown_rules(&config.rules));

    Ok(ConfigResult { config, warnings })
}

fn detect_unknown_keys(content: &str) -> Vec<String> {
    let mut warnings = Vec::new();

    let table: toml::Table = match content.parse() {
        Ok(t) => t,
        Err(_) => return warnings,
    };

    let known_top: HashSet<&str> = KNOWN_TOP_LEVEL_KEYS.iter().copied().collect();
    for key in table.keys() {
        if !known_top.contains(key.as_str()) {
            warnings.push(format!("Unknown config option: '{}'", key));
        }
    }

    for (section, known) in [("rules", KNOWN_RULES_KEYS), ("ai", KNOWN_AI_KEYS)] {
        if let Some(toml::Value::Table(entries)) = table.get(section) {
            for key in entries.keys() {
                if !known.contains(&key.as_str()) {
                    warnings.push(format!(
                        "Unknown config option in [{}]: '{}'",
                        section, key
                    ));
                }
            }
        }
    }

    warnings
}

fn detect_unknown_rules(rules: &RulesConfig) -> Vec<String> {
    let mut ids: Vec<&str> = rules.disabled.iter().map(String::as_str).collect();
    let mut overridden: Vec<&str> = rules.severity.keys().map(String::as_str).collect();
    overridden.sort_unstable();
    ids.extend(overridden);

    ids.into_iter()
        .filter(|id| find_rule(id).is_none())
        .map(|id| format!("Unknown rule id: '{}'", id))
        .collect()
}

pub fn load_config_or_default(start_dir: &Path) -> Config {
    find_config_file(start_dir)
        .and_then(|path| load_config(&path).ok())
        .unwrap_or_default()
}

pub fn load_config_or_default_with_warnings(start_dir: &Path) -> ConfigResult {
    match find_config_file(start_dir) {
        Some(path) => match load_config_with_warnings(&path) {
            Ok(result) => result,
            Err(err) => ConfigResult {
                config: Config::default(),
                warnings: vec![err.to_string()],
            },
        },
        None => ConfigResult::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn create_temp_dir() -> tempfile::TempDir {
        tempfile::tempdir().expect("Failed to create temp dir")
    }

    #[test]
    fn load_config_from_file() {
        let dir = create_temp_dir();
        let config_path = dir.path().join(CONFIG_FILENAME);
        fs::write(
            &config_path,
            r#"
ignore = ["generated"]

[rules]
disabled = ["no-console-log"]

[rules.severity]
no-hardcoded-strings = "error"

[ai]
models = ["gemini-2.0-flash"]
temperature = 0.2
max_tokens = 1500
"#,
        )
        .unwrap();

        let config = load_config(&config_path).unwrap();

        assert_eq!(config.ignore, vec!["generated"]);
        assert_eq!(config.rules.disabled, vec!["no-console-log"]);
        assert_eq!(
            config.rules.severity.get("no-hardcoded-strings"),
            Some(&SeverityValue::Error)
        );
        assert_eq!(
            config.ai.models,
            Some(vec!["gemini-2.0-flash".to_string()])
        );
        assert_eq!(config.ai.temperature, Some(0.2));
        assert_eq!(config.ai.max_tokens, Some(1500));
    }

    #[test]
    fn default_config_when_missing() {
        let dir = create_temp_dir();
        let config = load_config_or_default(dir.path());

        assert_eq!(config, Config::default());
        assert!(config.ignore.is_empty());
        assert!(config.rules.disabled.is_empty());
        assert!(config.ai.models.is_none());
    }

    #[test]
    fn error_on_invalid_toml() {
        let dir = create_temp_dir();
        let config_path = dir.path().join(CONFIG_FILENAME);
        fs::write(&config_path, "this is not valid { toml }").unwrap();

        let result = load_config(&config_path);

        match result.unwrap_err() {
            ConfigError::ParseError { path, message } => {
                assert_eq!(path, config_path);
                assert!(!message.is_empty());
            }
            _ => panic!("Expected ParseError"),
        }
    }

    #[test]
    fn find_config_file_in_parent_directory() {
        let parent = create_temp_dir();
        let child = parent.path().join("src").join("components");
        fs::create_dir_all(&child).unwrap();
        let config_path = parent.path().join(CONFIG_FILENAME);
        fs::write(&config_path, "").unwrap();

        let found = find_config_file(&child);

        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn find_config_file_returns_none_when_not_found() {
        let dir = create_temp_dir();

        assert!(find_config_file(dir.path()).is_none());
    }

    #[test]
    fn severity_accepts_warning_alias() {
        let dir = create_temp_dir();
        let config_path = dir.path().join(CONFIG_FILENAME);
        fs::write(
            &config_path,
            r#"
[rules.severity]
no-console-log = "warning"
no-unused-imports = "warn"
no-img-without-alt = "error"
"#,
        )
        .unwrap();

        let config = load_config(&config_path).unwrap();

        assert_eq!(
            config.rules.severity.get("no-console-log"),
            Some(&SeverityValue::Warn)
        );
        assert_eq!(
            config.rules.severity.get("no-unused-imports"),
            Some(&SeverityValue::Warn)
        );
        assert_eq!(Severity::from(SeverityValue::Error), Severity::Error);
    }

    #[test]
    fn rejects_unknown_severity_value() {
        let dir = create_temp_dir();
        let config_path = dir.path().join(CONFIG_FILENAME);
        fs::write(&config_path, "[rules.severity]\nno-console-log = \"hint\"").unwrap();

        assert!(load_config(&config_path).is_err());
    }

    #[test]
    fn warns_on_unknown_keys_in_every_section() {
        let dir = create_temp_dir();
        let config_path = dir.path().join(CONFIG_FILENAME);
        fs::write(
            &config_path,
            r#"
include = ["src/**"]

[rules]
enabled = ["no-console-log"]

[ai]
model = "gemini"
"#,
        )
        .unwrap();

        let result = load_config_with_warnings(&config_path).unwrap();

        assert_eq!(result.warnings.len(), 3);
        assert!(result.warnings[0].contains("include"));
        assert!(result.warnings.iter().any(|w| w.contains("[rules]") && w.contains("enabled")));
        assert!(result.warnings.iter().any(|w| w.contains("[ai]") && w.contains("model")));
    }

    #[test]
    fn warns_on_unknown_rule_ids() {
        let dir = create_temp_dir();
        let config_path = dir.path().join(CONFIG_FILENAME);
        fs::write(
            &config_path,
            r#"
[rules]
disabled = ["no-console-log", "no-such-rule"]

[rules.severity]
also-missing = "error"
"#,
        )
        .unwrap();

        let result = load_config_with_warnings(&config_path).unwrap();

        assert_eq!(
            result.warnings,
            vec![
                "Unknown rule id: 'no-such-rule'".to_string(),
                "Unknown rule id: 'also-missing'".to_string(),
            ]
        );
    }

    #[test]
    fn no_warnings_for_valid_config() {
        let dir = create_temp_dir();
        let config_path = dir.path().join(CONFIG_FILENAME);
        fs::write(
            &config_path,
            r#"
ignore = ["storybook-static"]

[rules]
disabled = ["no-console-log"]

[rules.severity]
no-large-component = "error"
"#,
        )
        .unwrap();

        let result = load_config_with_warnings(&config_path).unwrap();

        assert!(result.warnings.is_empty());
    }

    #[test]
    fn load_config_or_default_with_warnings_reports_broken_file() {
        let dir = create_temp_dir();
        fs::write(dir.path().join(CONFIG_FILENAME), "rules = [").unwrap();

        let result = load_config_or_default_with_warnings(dir.path());

        assert_eq!(result.config, Config::default());
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("Invalid TOML"));
    }

    #[test]
    fn load_config_or_default_with_warnings_returns_empty_when_no_config() {
        let dir = create_temp_dir();

        let result = load_config_or_default_with_warnings(dir.path());

        assert_eq!(result.config, Config::default());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn config_error_display_is_helpful() {
        let err = ConfigError::ParseError {
            path: PathBuf::from("/path/to/react-lens.toml"),
            message: "expected `=`".to_string(),
        };

        let msg = format!("{}", err);

        assert!(msg.contains("/path/to/react-lens.toml"));
        assert!(msg.contains("expected `=`"));
    }
}
