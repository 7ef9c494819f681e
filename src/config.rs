use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cache::FetchPolicy;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  pub api: ApiConfig,
  #[serde(default)]
  pub cache: CacheConfig,
  #[serde(default)]
  pub session: SessionConfig,
  #[serde(default)]
  pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
  /// Base URL of the REST backend, e.g. "https://turismo.example.com/api/"
  pub base_url: String,
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
  30
}

impl ApiConfig {
  pub fn timeout(&self) -> Duration {
    Duration::from_secs(self.timeout_secs)
  }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CachePolicy {
  /// Always ask the server first, fall back to the cache on failure
  #[default]
  NetworkFirst,
  /// Serve cached rows younger than `max_age_secs` without a request
  CacheFirst,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
  /// Database file (defaults to $XDG_DATA_HOME/turismo/cache.db)
  pub path: Option<PathBuf>,
  /// Keep the cache in memory only; nothing survives the process
  #[serde(default)]
  pub in_memory: bool,
  #[serde(default)]
  pub policy: CachePolicy,
  #[serde(default = "default_max_age_secs")]
  pub max_age_secs: u64,
}

fn default_max_age_secs() -> u64 {
  300
}

impl Default for CacheConfig {
  fn default() -> Self {
    Self {
      path: None,
      in_memory: false,
      policy: CachePolicy::default(),
      max_age_secs: default_max_age_secs(),
    }
  }
}

impl CacheConfig {
  pub fn fetch_policy(&self) -> FetchPolicy {
    match self.policy {
      CachePolicy::NetworkFirst => FetchPolicy::NetworkFirst,
      CachePolicy::CacheFirst => FetchPolicy::CacheFirst {
        max_age: chrono::Duration::seconds(self.max_age_secs as i64),
      },
    }
  }

  pub fn resolved_path(&self) -> Result<PathBuf> {
    match &self.path {
      Some(p) => Ok(p.clone()),
      None => Ok(data_dir()?.join("cache.db")),
    }
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionConfig {
  /// Where the login token is persisted (defaults to $XDG_DATA_HOME/turismo/session.json)
  pub path: Option<PathBuf>,
}

impl SessionConfig {
  pub fn resolved_path(&self) -> Result<PathBuf> {
    match &self.path {
      Some(p) => Ok(p.clone()),
      None => Ok(data_dir()?.join("session.json")),
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
  #[serde(default = "default_log_level")]
  pub level: String,
  /// Log file; logs go to stderr when unset
  pub file: Option<PathBuf>,
}

fn default_log_level() -> String {
  "info".to_string()
}

impl Default for LogConfig {
  fn default() -> Self {
    Self {
      level: default_log_level(),
      file: None,
    }
  }
}

fn data_dir() -> Result<PathBuf> {
  let data_dir = dirs::data_dir()
    .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
    .ok_or_else(|| eyre!("Could not determine data directory"))?;

  Ok(data_dir.join("turismo"))
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./turismo.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/turismo/config.yaml
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Err(eyre!(
        "No configuration file found. Create one at ~/.config/turismo/config.yaml"
      )),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("turismo.yaml");
    if local.exists() {
      return Some(local);
    }

    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("turismo").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::parse(&contents).map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  pub fn parse(contents: &str) -> Result<Self> {
    let config: Config = serde_yaml::from_str(contents)?;
    if config.api.base_url.trim().is_empty() {
      return Err(eyre!("api.base_url must not be empty"));
    }
    Ok(config)
  }

  /// Bearer token override from the environment.
  ///
  /// Checks TURISMO_TOKEN.
  pub fn get_token() -> Option<String> {
    std::env::var("TURISMO_TOKEN").ok().filter(|t| !t.is_empty())
  }

  /// Login password from the environment.
  ///
  /// Checks TURISMO_PASSWORD.
  pub fn get_password() -> Result<String> {
    std::env::var("TURISMO_PASSWORD")
      .map_err(|_| eyre!("Password not found. Set TURISMO_PASSWORD environment variable."))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn minimal_config_uses_defaults() {
    let config = Config::parse("api:\n  base_url: http://localhost:8080/api/\n").unwrap();
    assert_eq!(config.api.timeout_secs, 30);
    assert_eq!(config.cache.policy, CachePolicy::NetworkFirst);
    assert!(!config.cache.in_memory);
    assert_eq!(config.log.level, "info");
    assert_eq!(config.cache.fetch_policy(), FetchPolicy::NetworkFirst);
  }

  #[test]
  fn cache_first_policy_carries_max_age() {
    let yaml = r#"
api:
  base_url: http://localhost/api/
  timeout_secs: 5
cache:
  policy: cache_first
  max_age_secs: 60
  path: /tmp/turismo-test.db
log:
  level: debug
"#;
    let config = Config::parse(yaml).unwrap();
    assert_eq!(config.api.timeout(), Duration::from_secs(5));
    assert_eq!(
      config.cache.fetch_policy(),
      FetchPolicy::CacheFirst {
        max_age: chrono::Duration::seconds(60)
      }
    );
    assert_eq!(
      config.cache.resolved_path().unwrap(),
      PathBuf::from("/tmp/turismo-test.db")
    );
    assert_eq!(config.log.level, "debug");
  }

  #[test]
  fn empty_base_url_is_rejected() {
    assert!(Config::parse("api:\n  base_url: \"\"\n").is_err());
  }

  #[test]
  fn missing_explicit_file_is_an_error() {
    let err = Config::load(Some(Path::new("/definitely/not/here.yaml"))).unwrap_err();
    assert!(err.to_string().contains("Config file not found"));
  }
}
