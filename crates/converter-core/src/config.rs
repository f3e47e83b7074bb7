use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

const CONFIG_FILE_PATH: &str = "config.toml";

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Unsupported config file extension: {0}")]
    UnsupportedFormat(String),
}

/// Source and target SQL dialects named in the role instructions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialectPair {
    pub source: String,
    pub target: String,
}

impl Default for DialectPair {
    fn default() -> Self {
        Self {
            source: "Snowflake".to_string(),
            target: "ANSI".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConverterConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub temperature: f32,
    #[serde(default)]
    pub dialects: DialectPair,
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(".sql-convert")
}

fn config_json_path() -> PathBuf {
    config_dir().join("config.json")
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: default_api_base(),
            model: default_model(),
            temperature: 0.0,
            dialects: DialectPair::default(),
        }
    }
}

impl ConverterConfig {
    /// Load from the user config dir or `./config.toml`, then apply
    /// environment overrides. Unreadable files fall back to defaults.
    pub fn load() -> Self {
        Self::load_from(
            &config_json_path(),
            Path::new(CONFIG_FILE_PATH),
            |key| std::env::var(key).ok(),
        )
    }

    /// The first of `json_path` and `toml_path` that parses wins; `lookup`
    /// overrides are applied on top.
    pub fn load_from<F>(json_path: &Path, toml_path: &Path, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = [json_path, toml_path]
            .into_iter()
            .filter(|path| path.exists())
            .find_map(|path| match Self::from_path(path) {
                Ok(file_config) => {
                    log::debug!("Loaded config from {}", path.display());
                    Some(file_config)
                }
                Err(e) => {
                    log::warn!("Ignoring {}: {}", path.display(), e);
                    None
                }
            })
            .unwrap_or_default();

        config.apply_env_overrides(lookup);
        config
    }

    /// Load a JSON or TOML file, chosen by extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(serde_json::from_str(&content)?),
            Some("toml") => Ok(toml::from_str(&content)?),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or_default().to_string(),
            )),
        }
    }

    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(api_key) = lookup("API_KEY") {
            self.api_key = Some(api_key);
        }
        if let Some(api_base) = lookup("API_BASE") {
            self.api_base = api_base;
        }
        if let Some(model) = lookup("MODEL") {
            self.model = model;
        }
        if let Some(source) = lookup("SOURCE_DIALECT") {
            self.dialects.source = source;
        }
        if let Some(target) = lookup("TARGET_DIALECT") {
            self.dialects.target = target;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_target_snowflake_to_ansi() {
        let config = ConverterConfig::default();
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.temperature, 0.0);
        assert_eq!(config.dialects.source, "Snowflake");
        assert_eq!(config.dialects.target, "ANSI");
    }

    #[test]
    fn loads_partial_toml_with_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "model = \"gpt-4o-mini\"\n\n[dialects]\nsource = \"BigQuery\"\ntarget = \"ANSI\"\n",
        )
        .unwrap();

        let config = ConverterConfig::from_path(&path).unwrap();
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.dialects.source, "BigQuery");
    }

    #[test]
    fn loads_json_config() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"api_key": "sk-test", "api_base": "http://localhost:9000/v1"}"#,
        )
        .unwrap();

        let config = ConverterConfig::from_path(&path).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.api_base, "http://localhost:9000/v1");
        assert_eq!(config.dialects, DialectPair::default());
    }

    #[test]
    fn rejects_unknown_extension() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "model: x").unwrap();

        assert!(matches!(
            ConverterConfig::from_path(&path),
            Err(ConfigError::UnsupportedFormat(ext)) if ext == "yaml"
        ));
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn json_config_wins_over_toml() {
        let dir = tempfile::tempdir().expect("tempdir");
        let json_path = dir.path().join("config.json");
        let toml_path = dir.path().join("config.toml");
        std::fs::write(&json_path, r#"{"model": "from-json"}"#).unwrap();
        std::fs::write(&toml_path, "model = \"from-toml\"\n").unwrap();

        let config = ConverterConfig::load_from(&json_path, &toml_path, no_env);
        assert_eq!(config.model, "from-json");
    }

    #[test]
    fn corrupt_json_falls_through_to_toml() {
        let dir = tempfile::tempdir().expect("tempdir");
        let json_path = dir.path().join("config.json");
        let toml_path = dir.path().join("config.toml");
        std::fs::write(&json_path, "{ not json").unwrap();
        std::fs::write(&toml_path, "model = \"from-toml\"\n").unwrap();

        let config = ConverterConfig::load_from(&json_path, &toml_path, no_env);
        assert_eq!(config.model, "from-toml");
    }

    #[test]
    fn missing_or_corrupt_files_fall_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let json_path = dir.path().join("config.json");
        let toml_path = dir.path().join("config.toml");

        let config = ConverterConfig::load_from(&json_path, &toml_path, no_env);
        assert_eq!(config.model, DEFAULT_MODEL);

        std::fs::write(&json_path, "{ not json").unwrap();
        std::fs::write(&toml_path, "model = [").unwrap();
        let config = ConverterConfig::load_from(&json_path, &toml_path, no_env);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.api_base, DEFAULT_API_BASE);
    }

    #[test]
    fn env_applies_after_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let json_path = dir.path().join("config.json");
        std::fs::write(
            &json_path,
            r#"{"model": "from-json", "api_key": "sk-file"}"#,
        )
        .unwrap();

        let config = ConverterConfig::load_from(
            &json_path,
            &dir.path().join("config.toml"),
            |key| (key == "MODEL").then(|| "from-env".to_string()),
        );
        assert_eq!(config.model, "from-env");
        assert_eq!(config.api_key.as_deref(), Some("sk-file"));
    }

    #[test]
    fn env_overrides_win() {
        let env: HashMap<&str, &str> = [
            ("API_KEY", "sk-env"),
            ("MODEL", "gpt-4.1"),
            ("TARGET_DIALECT", "PostgreSQL"),
        ]
        .into_iter()
        .collect();

        let mut config = ConverterConfig::default();
        config.apply_env_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.api_key.as_deref(), Some("sk-env"));
        assert_eq!(config.model, "gpt-4.1");
        assert_eq!(config.dialects.source, "Snowflake");
        assert_eq!(config.dialects.target, "PostgreSQL");
    }
}
