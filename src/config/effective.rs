//! Merged tool configuration and the sources it was built from
//!
//! Every file layer is recorded with its path and a sha256 of its raw
//! bytes so `suitekit config --json` can show exactly what was read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

use suitekit_merge::{deep_merge, merge_layers, MergeError};

use super::defaults::BuiltinDefaults;
use super::settings::ToolConfig;

/// Version of the serialized `EffectiveConfig` shape
pub const SCHEMA_VERSION: u32 = 1;

/// Identifier written alongside the version
pub const SCHEMA_ID: &str = "suitekit/effective_config@1";

/// Project config file name, looked up in the working directory
pub const PROJECT_CONFIG_FILE: &str = "suitekit.toml";

/// Upper bound for test and hook timeouts (one hour)
const MAX_TIMEOUT_MS: u64 = 3_600_000;

/// Which layer a source belongs to
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ConfigOrigin {
    Builtin,
    User,
    Project,
    Cli,
}

/// One layer that contributed to the merged config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSource {
    /// Origin of this source
    pub origin: ConfigOrigin,

    /// File path (None for builtin/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// SHA-256 digest of raw file bytes (None for builtin/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

/// Merged configuration plus provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveConfig {
    /// Schema version
    pub schema_version: u32,

    /// Schema identifier
    pub schema_id: String,

    /// Merge time
    pub created_at: DateTime<Utc>,

    /// Merged layers as a JSON object
    pub config: Value,

    /// Contributing sources in precedence order
    pub sources: Vec<ConfigSource>,
}

impl EffectiveConfig {
    /// Merge builtin defaults, the user and project files (when present)
    /// and the CLI overrides, lowest precedence first.
    pub fn build(
        user_config_path: Option<&Path>,
        project_config_path: Option<&Path>,
        cli_overrides: Option<Value>,
    ) -> Result<Self, ConfigError> {
        let mut stack = LayerStack::default();
        stack.push(ConfigOrigin::Builtin, BuiltinDefaults::default().to_value(), None);

        for (origin, path) in [
            (ConfigOrigin::User, user_config_path),
            (ConfigOrigin::Project, project_config_path),
        ] {
            if let Some(path) = path.filter(|p| p.exists()) {
                stack.push_file(origin, path)?;
            }
        }

        if let Some(cli) = cli_overrides {
            stack.push(ConfigOrigin::Cli, cli, None);
        }

        tracing::debug!(layers = stack.layers.len(), "merging configuration layers");
        let config = merge_layers(stack.layers)?;
        Self::validate_config(&config)?;

        Ok(Self {
            schema_version: SCHEMA_VERSION,
            schema_id: SCHEMA_ID.to_string(),
            created_at: Utc::now(),
            config,
            sources: stack.sources,
        })
    }

    /// Load and parse a TOML (or `.json`) file, returning the value and digest
    pub fn load_file(path: &Path) -> Result<(Value, String), ConfigError> {
        let bytes = fs::read(path)
            .map_err(|e| ConfigError::IoError(format!("{}: {}", path.display(), e)))?;

        // Compute digest
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let digest = hex::encode(hasher.finalize());

        let contents = String::from_utf8(bytes)
            .map_err(|e| ConfigError::ParseError(format!("Invalid UTF-8: {}", e)))?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let value = if is_json {
            serde_json::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(format!("JSON parse error: {}", e)))?
        } else {
            let toml_value: toml::Value = toml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(format!("TOML parse error: {}", e)))?;
            Self::toml_to_json(toml_value)
        };

        tracing::debug!(path = %path.display(), %digest, "loaded config file");
        Ok((value, digest))
    }

    /// Convert TOML Value to JSON Value
    fn toml_to_json(toml: toml::Value) -> Value {
        match toml {
            toml::Value::String(s) => Value::String(s),
            toml::Value::Integer(i) => Value::Number(i.into()),
            toml::Value::Float(f) => serde_json::Number::from_f64(f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            toml::Value::Boolean(b) => Value::Bool(b),
            toml::Value::Datetime(dt) => Value::String(dt.to_string()),
            toml::Value::Array(arr) => {
                Value::Array(arr.into_iter().map(Self::toml_to_json).collect())
            }
            toml::Value::Table(table) => {
                let map: serde_json::Map<String, Value> = table
                    .into_iter()
                    .map(|(k, v)| (k, Self::toml_to_json(v)))
                    .collect();
                Value::Object(map)
            }
        }
    }

    /// Validate configuration values
    fn validate_config(config: &Value) -> Result<(), ConfigError> {
        match config.get("root") {
            Some(Value::String(root)) if !root.is_empty() => {}
            _ => {
                return Err(ConfigError::ValidationError(
                    "root must be a non-empty string".to_string(),
                ))
            }
        }

        for key in ["test_timeout_ms", "hook_timeout_ms"] {
            if let Some(value) = config.get(key) {
                match value.as_u64() {
                    Some(ms) if ms > 0 && ms <= MAX_TIMEOUT_MS => {}
                    _ => {
                        return Err(ConfigError::ValidationError(format!(
                            "{} must be in (0, {}]",
                            key, MAX_TIMEOUT_MS
                        )))
                    }
                }
            }
        }

        if let Some(reporters) = config.get("reporters") {
            let all_strings = reporters
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string));
            if !all_strings {
                return Err(ConfigError::ValidationError(
                    "reporters must be a list of strings".to_string(),
                ));
            }
        }

        if let Some(platform) = config.get("platform") {
            let name = platform.as_str().unwrap_or_default();
            name.parse::<super::PlatformKind>()?;
        }

        Ok(())
    }

    /// Deserialize the merged config into its typed form
    pub fn settings(&self) -> Result<ToolConfig, ConfigError> {
        serde_json::from_value(self.config.clone())
            .map_err(|e| ConfigError::ParseError(format!("Invalid configuration: {}", e)))
    }

    /// Pretty-printed JSON, as shown by `suitekit config --json`
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Get a config value by path (dot-separated)
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut current = &self.config;
        for part in path.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    /// Get a config value as u64
    pub fn get_u64(&self, path: &str) -> Option<u64> {
        self.get(path).and_then(|v| v.as_u64())
    }

    /// Get a config value as string
    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(|v| v.as_str())
    }

    /// Get a config value as bool
    pub fn get_bool(&self, path: &str) -> Option<bool> {
        self.get(path).and_then(|v| v.as_bool())
    }
}

/// Layers collected for merging, with their provenance
#[derive(Default)]
struct LayerStack {
    layers: Vec<Value>,
    sources: Vec<ConfigSource>,
}

impl LayerStack {
    fn push(&mut self, origin: ConfigOrigin, value: Value, file: Option<(&Path, String)>) {
        let (path, digest) = match file {
            Some((path, digest)) => (Some(path.to_string_lossy().into_owned()), Some(digest)),
            None => (None, None),
        };
        self.layers.push(value);
        self.sources.push(ConfigSource { origin, path, digest });
    }

    fn push_file(&mut self, origin: ConfigOrigin, path: &Path) -> Result<(), ConfigError> {
        let (value, digest) = EffectiveConfig::load_file(path)?;
        self.push(origin, value, Some((path, digest)));
        Ok(())
    }
}

/// Default user config location: `$XDG_CONFIG_HOME/suitekit/config.toml`,
/// falling back to `~/.config/suitekit/config.toml`.
pub fn user_config_path() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))?;
    Some(base.join("suitekit").join("config.toml"))
}

/// Parse a `key.path=value` override into a nested JSON object.
///
/// The value is read as JSON when it parses (`true`, `5000`, `["a"]`) and
/// as a plain string otherwise.
pub fn parse_override(pair: &str) -> Result<Value, ConfigError> {
    let (key, raw) = pair.split_once('=').ok_or_else(|| {
        ConfigError::ParseError(format!("Override '{}' must have the form key=value", pair))
    })?;

    if key.is_empty() || key.split('.').any(str::is_empty) {
        return Err(ConfigError::ParseError(format!(
            "Override '{}' has an empty key segment",
            pair
        )));
    }

    let mut value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    for part in key.rsplit('.') {
        let mut map = serde_json::Map::new();
        map.insert(part.to_string(), value);
        value = Value::Object(map);
    }
    Ok(value)
}

/// Fold several `key=value` overrides into one CLI layer
pub fn parse_overrides<S: AsRef<str>>(pairs: &[S]) -> Result<Option<Value>, ConfigError> {
    let mut layer: Option<Value> = None;
    for pair in pairs {
        let value = parse_override(pair.as_ref())?;
        layer = Some(match layer {
            Some(acc) => deep_merge(acc, value)?,
            None => value,
        });
    }
    Ok(layer)
}

/// Errors while loading, merging or validating config layers
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Merge error: {0}")]
    MergeError(#[from] MergeError),
}
