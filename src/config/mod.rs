//
//  sonarqube-client
//  config/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Configuration Module
//!
//! This module provides configuration management for the `sq` command-line
//! front end. The library itself never reads configuration; it is handed a
//! base URL and an [`AuthProvider`](crate::auth::AuthProvider) directly.
//!
//! ## Configuration File Location
//!
//! - **Linux**: `~/.config/sq/config.toml`
//! - **macOS**: `~/Library/Application Support/sq/config.toml`
//! - **Windows**: `C:\Users\<User>\AppData\Roaming\sq\config.toml`
//!
//! ## Example Configuration File
//!
//! ```toml
//! [core]
//! default_server = "prod"
//! timeout_secs = 30
//!
//! [servers.prod]
//! url = "https://sonar.example.com"
//! auth = "token"
//!
//! [servers.legacy]
//! url = "http://sonar.internal:9000/sonarqube"
//! auth = "basic"
//! username = "ci-bot"
//! ```
//!
//! Secrets are never written here; they live in the system keyring.
//!
//! ## Environment Overrides
//!
//! - `SONAR_HOST_URL` replaces the selected server's URL
//! - `SONAR_TOKEN` / `SONAR_PASSCODE` supply credentials without the keyring

mod servers;

pub use servers::*;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::api::ClientBuilder;
use crate::auth::AuthType;

pub const ENV_HOST_URL: &str = "SONAR_HOST_URL";
pub const ENV_TOKEN: &str = "SONAR_TOKEN";
pub const ENV_PASSCODE: &str = "SONAR_PASSCODE";

/// Global configuration container for the `sq` CLI.
///
/// # Examples
///
/// ```rust
/// use sonarqube_client::config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.core.timeout_secs, 30);
/// assert!(config.servers.is_empty());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub core: CoreConfig,

    /// Server profiles keyed by a short name.
    #[serde(default)]
    pub servers: HashMap<String, ServerConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoreConfig {
    /// Profile used when `--server` is not given.
    #[serde(default)]
    pub default_server: Option<String>,

    /// Per-call timeout; `0` disables it.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            default_server: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// One SonarQube server profile.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ServerConfig {
    pub url: String,

    #[serde(default)]
    pub auth: AuthType,

    /// Login for `basic` auth.
    #[serde(default)]
    pub username: Option<String>,
}

/// A server profile after defaults and environment overrides are applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedServer {
    pub name: String,
    pub config: ServerConfig,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Loads the file at `path`, or the defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        tracing::debug!(path = %path.display(), "saved configuration");
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", crate::APP_NAME)
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn server_config(&self, name: &str) -> Option<&ServerConfig> {
        self.servers.get(name)
    }

    /// Picks the server profile to use.
    ///
    /// Order: the explicit `name`, then `core.default_server`, then the only
    /// configured profile. `SONAR_HOST_URL` (passed in as `env_url`) replaces
    /// the profile's URL, and alone is enough when nothing is configured.
    pub fn resolve_server(&self, name: Option<&str>, env_url: Option<&str>) -> Result<ResolvedServer> {
        let selected = name
            .map(str::to_string)
            .or_else(|| self.core.default_server.clone())
            .or_else(|| {
                if self.servers.len() == 1 {
                    self.servers.keys().next().cloned()
                } else {
                    None
                }
            });

        let mut resolved = match selected {
            Some(name) => match self.servers.get(&name) {
                Some(config) => ResolvedServer {
                    name,
                    config: config.clone(),
                },
                None if env_url.is_some() => ResolvedServer {
                    name,
                    config: ServerConfig::default(),
                },
                None => bail!(
                    "Unknown server '{}'. Run 'sq auth login --server {} --url <URL>' first.",
                    name,
                    name
                ),
            },
            None => match env_url {
                Some(url) => ResolvedServer {
                    name: server_name_from_url(url),
                    config: ServerConfig::default(),
                },
                None => bail!(
                    "No SonarQube server configured. Run 'sq auth login --url <URL>' or set {}.",
                    ENV_HOST_URL
                ),
            },
        };

        if let Some(url) = env_url {
            resolved.config.url = normalize_server_url(url);
        }
        Ok(resolved)
    }

    /// A client builder carrying the configured timeout.
    pub fn client_builder(&self, server: &ServerConfig) -> ClientBuilder {
        let timeout = match self.core.timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };
        ClientBuilder::new(server.url.clone()).timeout(timeout)
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "default_server" => self.core.default_server.clone(),
            "timeout_secs" => Some(self.core.timeout_secs.to_string()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: String) -> Result<()> {
        match key {
            "default_server" => {
                self.core.default_server = Some(value);
            }
            "timeout_secs" => {
                self.core.timeout_secs = value
                    .parse()
                    .with_context(|| format!("Invalid value for timeout_secs: '{}'", value))?;
            }
            _ => bail!(
                "Unknown configuration key '{}'. Valid keys: {}",
                key,
                VALID_CORE_KEYS.join(", ")
            ),
        }
        Ok(())
    }

    pub fn unset(&mut self, key: &str) -> Result<()> {
        match key {
            "default_server" => self.core.default_server = None,
            "timeout_secs" => self.core.timeout_secs = default_timeout_secs(),
            _ => bail!(
                "Unknown configuration key '{}'. Valid keys: {}",
                key,
                VALID_CORE_KEYS.join(", ")
            ),
        }
        Ok(())
    }
}

pub const VALID_CORE_KEYS: &[&str] = &["default_server", "timeout_secs"];

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> Config {
        let mut config = Config::default();
        config.core.default_server = Some("prod".to_string());
        config.servers.insert(
            "prod".to_string(),
            ServerConfig {
                url: "https://sonar.example.com".to_string(),
                auth: AuthType::Token,
                username: None,
            },
        );
        config.servers.insert(
            "legacy".to_string(),
            ServerConfig {
                url: "http://sonar.internal:9000".to_string(),
                auth: AuthType::Basic,
                username: Some("ci-bot".to_string()),
            },
        );
        config
    }

    #[test]
    fn test_round_trip_through_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = sample();
        config.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("auth = \"basic\""));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_parse_minimal_file() {
        let config: Config = toml::from_str(
            r#"
            [servers.local]
            url = "http://localhost:9000"
            "#,
        )
        .unwrap();
        assert_eq!(config.core.timeout_secs, 30);
        assert_eq!(config.servers["local"].auth, AuthType::None);
    }

    #[test]
    fn test_resolve_server_order() {
        let config = sample();
        assert_eq!(config.resolve_server(None, None).unwrap().name, "prod");
        assert_eq!(
            config.resolve_server(Some("legacy"), None).unwrap().config.username,
            Some("ci-bot".to_string())
        );
        assert!(config.resolve_server(Some("missing"), None).is_err());

        let mut single = Config::default();
        single
            .servers
            .insert("only".to_string(), ServerConfig::default());
        assert_eq!(single.resolve_server(None, None).unwrap().name, "only");
    }

    #[test]
    fn test_env_url_overrides() {
        let resolved = sample()
            .resolve_server(None, Some("https://other.example.com/"))
            .unwrap();
        assert_eq!(resolved.name, "prod");
        assert_eq!(resolved.config.url, "https://other.example.com");
        assert_eq!(resolved.config.auth, AuthType::Token);

        let resolved = Config::default()
            .resolve_server(None, Some("https://ci.example.com"))
            .unwrap();
        assert_eq!(resolved.name, "ci.example.com");
        assert!(Config::default().resolve_server(None, None).is_err());
    }

    #[test]
    fn test_get_set_unset() {
        let mut config = Config::default();
        config.set("timeout_secs", "5".to_string()).unwrap();
        assert_eq!(config.get("timeout_secs"), Some("5".to_string()));
        assert!(config.set("timeout_secs", "soon".to_string()).is_err());
        assert!(config.set("editor", "vim".to_string()).is_err());

        config.unset("timeout_secs").unwrap();
        assert_eq!(config.core.timeout_secs, 30);
    }
}
