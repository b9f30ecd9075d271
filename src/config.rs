use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration keys enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    ApiBase,
    Owner,
    Repo,
    User,
    Password,
    Output,
    Delimiter,
    IncludePullRequests,
    TimeoutSecs,
}

impl ConfigKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigKey::ApiBase => "api_base",
            ConfigKey::Owner => "owner",
            ConfigKey::Repo => "repo",
            ConfigKey::User => "user",
            ConfigKey::Password => "password",
            ConfigKey::Output => "output",
            ConfigKey::Delimiter => "delimiter",
            ConfigKey::IncludePullRequests => "include_pull_requests",
            ConfigKey::TimeoutSecs => "timeout_secs",
        }
    }

    /// Get all config keys
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::ApiBase,
            ConfigKey::Owner,
            ConfigKey::Repo,
            ConfigKey::User,
            ConfigKey::Password,
            ConfigKey::Output,
            ConfigKey::Delimiter,
            ConfigKey::IncludePullRequests,
            ConfigKey::TimeoutSecs,
        ]
    }
}

/// Filename for the project-specific configuration within the .issue-export directory.
pub const PROJECT_CONFIG_FILENAME: &str = "config.json";
/// Directory name for project-specific configuration.
pub const PROJECT_CONFIG_DIR: &str = ".issue-export";
/// Environment variable overriding the configured password.
pub const PASSWORD_ENV: &str = "ISSUE_EXPORT_PASSWORD";

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_DELIMITER: char = ';';

/// Parses a JSON configuration file content into a map of configuration values.
///
/// Expects `content` to be a byte slice holding a JSON object with configuration
/// keys (e.g., {"owner": "octocat", "repo": "hello-world", ...}).
///
/// - Returns `Ok(HashMap<ConfigKey, Value>)` containing all recognized keys. Unknown keys are skipped.
/// - Returns an empty HashMap if the input `content` is empty or contains only whitespace.
/// - Returns an `Err` if the JSON parsing fails or the top-level value is not an object.
pub fn parse_config(content: &[u8]) -> Result<HashMap<ConfigKey, Value>> {
    if content.iter().all(|b| b.is_ascii_whitespace()) {
        return Ok(HashMap::new());
    }

    let value: Value = serde_json::from_slice(content).context("Failed to parse config JSON")?;

    let mut config_map = HashMap::new();

    if let Value::Object(map) = &value {
        for key in ConfigKey::all() {
            if let Some(val) = map.get(key.as_str()) {
                config_map.insert(*key, val.clone());
            }
        }
        return Ok(config_map);
    }

    Err(anyhow::anyhow!("Config must be a JSON object"))
}

/// Merges `updates` into `base_config` and returns a new configuration map.
///
/// If a key exists in both, the value from `updates` wins. Neither input is modified.
pub fn update_config(
    base_config: &HashMap<ConfigKey, Value>,
    updates: &HashMap<ConfigKey, Value>,
) -> HashMap<ConfigKey, Value> {
    let mut new_config = base_config.clone();
    for (key, value) in updates {
        new_config.insert(*key, value.clone());
    }
    new_config
}

/// Default location of the configuration file, relative to the working directory.
pub fn default_config_path() -> PathBuf {
    Path::new(PROJECT_CONFIG_DIR).join(PROJECT_CONFIG_FILENAME)
}

/// Reads and parses the configuration file at `path`.
pub fn load_config(path: &Path) -> Result<HashMap<ConfigKey, Value>> {
    let content = std::fs::read(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Invalid config file {}", path.display()))
}

/// Collects overrides from the process environment.
pub fn env_overrides() -> HashMap<ConfigKey, Value> {
    env_overrides_from(|name| std::env::var(name).ok())
}

/// Collects overrides through `lookup`, which maps a variable name to its value.
pub fn env_overrides_from(lookup: impl Fn(&str) -> Option<String>) -> HashMap<ConfigKey, Value> {
    let mut overrides = HashMap::new();
    if let Some(password) = lookup(PASSWORD_ENV) {
        overrides.insert(ConfigKey::Password, Value::String(password));
    }
    overrides
}

/// Validated settings for one export run.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportConfig {
    pub api_base: String,
    pub owner: String,
    pub repo: String,
    pub user: String,
    pub password: String,
    pub output: PathBuf,
    pub delimiter: char,
    pub include_pull_requests: bool,
    pub timeout: Option<Duration>,
}

impl ExportConfig {
    /// Builds the typed configuration, applying defaults for optional keys.
    pub fn from_map(map: &HashMap<ConfigKey, Value>) -> Result<Self> {
        let owner = required_str(map, ConfigKey::Owner)?;
        let repo = required_str(map, ConfigKey::Repo)?;
        let user = required_str(map, ConfigKey::User)?;
        let password = required_str(map, ConfigKey::Password)?;

        let api_base = optional_str(map, ConfigKey::ApiBase)?
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let output = optional_str(map, ConfigKey::Output)?
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(format!("{repo}.csv")));

        let delimiter = match optional_str(map, ConfigKey::Delimiter)? {
            None => DEFAULT_DELIMITER,
            Some(text) => {
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => c,
                    _ => {
                        return Err(anyhow::anyhow!(
                            "Config key `{}` must be a single character",
                            ConfigKey::Delimiter.as_str()
                        ));
                    }
                }
            }
        };

        let include_pull_requests = match map.get(&ConfigKey::IncludePullRequests) {
            None => true,
            Some(value) => value.as_bool().ok_or_else(|| {
                anyhow::anyhow!(
                    "Config key `{}` must be a boolean",
                    ConfigKey::IncludePullRequests.as_str()
                )
            })?,
        };

        let timeout = match map.get(&ConfigKey::TimeoutSecs) {
            None => None,
            Some(value) => Some(Duration::from_secs(value.as_u64().ok_or_else(|| {
                anyhow::anyhow!(
                    "Config key `{}` must be a non-negative integer",
                    ConfigKey::TimeoutSecs.as_str()
                )
            })?)),
        };

        Ok(ExportConfig {
            api_base,
            owner,
            repo,
            user,
            password,
            output,
            delimiter,
            include_pull_requests,
            timeout,
        })
    }

    /// Issue listing endpoint of the configured repository.
    pub fn issues_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/issues",
            self.api_base.trim_end_matches('/'),
            self.owner,
            self.repo
        )
    }
}

fn optional_str(map: &HashMap<ConfigKey, Value>, key: ConfigKey) -> Result<Option<String>> {
    match map.get(&key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(anyhow::anyhow!(
            "Config key `{}` must be a string",
            key.as_str()
        )),
    }
}

fn required_str(map: &HashMap<ConfigKey, Value>, key: ConfigKey) -> Result<String> {
    optional_str(map, key)?
        .filter(|s| !s.is_empty())
        .ok_or_else(|| anyhow::anyhow!("Missing required config key `{}`", key.as_str()))
}
