use anyhow::{Context, Result};
use archivist_core::domain::{normalize_host, DEFAULT_HOST};
use archivist_core::ports::ConfigPort;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Whether interactive prompts may be shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptSetting {
    #[default]
    Enabled,
    Disabled,
}

/// Per-host credentials
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    pub oauth_token: Option<String>,
    pub user: Option<String>,
}

/// User configuration, after environment overrides
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub default_host: Option<String>,
    pub prompt: PromptSetting,
    pub http_timeout_secs: Option<u64>,
    pub hosts: BTreeMap<String, HostConfig>,

    #[serde(skip)]
    env_token: Option<String>,
    #[serde(skip)]
    env_enterprise_token: Option<String>,
}

impl AppConfig {
    /// Layer `GH_HOST`, `GH_PROMPT_DISABLED` and the token variables over the file values.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(host) = non_empty("GH_HOST") {
            self.default_host = Some(host);
        }
        if non_empty("GH_PROMPT_DISABLED").is_some() {
            self.prompt = PromptSetting::Disabled;
        }
        self.env_token = non_empty("GH_TOKEN").or_else(|| non_empty("GITHUB_TOKEN"));
        self.env_enterprise_token =
            non_empty("GH_ENTERPRISE_TOKEN").or_else(|| non_empty("GITHUB_ENTERPRISE_TOKEN"));
        self
    }

    pub fn default_host(&self) -> String {
        self.default_host
            .as_deref()
            .map(normalize_host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string())
    }

    pub fn prompt_disabled(&self) -> bool {
        self.prompt == PromptSetting::Disabled
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs.unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS))
    }

    /// Token for `host`: environment first, then the hosts table
    pub fn token_for(&self, host: &str) -> Option<String> {
        let host = normalize_host(host);
        let from_env = if host == DEFAULT_HOST {
            self.env_token.clone()
        } else {
            self.env_enterprise_token.clone()
        };
        from_env.or_else(|| self.host(&host).and_then(|h| h.oauth_token.clone()))
    }

    /// Login recorded for `host`, if any
    pub fn user_for(&self, host: &str) -> Option<String> {
        self.host(&normalize_host(host)).and_then(|h| h.user.clone())
    }

    /// Hosts the user has configured, default host first
    pub fn known_hosts(&self) -> Vec<String> {
        let mut hosts = vec![self.default_host()];
        for host in self.hosts.keys().map(|h| normalize_host(h)) {
            if !hosts.contains(&host) {
                hosts.push(host);
            }
        }
        hosts
    }

    fn host(&self, host: &str) -> Option<&HostConfig> {
        self.hosts
            .iter()
            .find(|(name, _)| normalize_host(name) == host)
            .map(|(_, config)| config)
    }
}

impl ConfigPort for AppConfig {
    fn default_host(&self) -> Result<String> {
        Ok(AppConfig::default_host(self))
    }
}

/// Read-only TOML configuration store
pub struct FileConfigStore {
    config_path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Result<Self> {
        let config_path = Self::get_default_config_path()?;
        Ok(Self { config_path })
    }

    pub fn with_path<P: AsRef<Path>>(config_path: P) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    fn get_default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("", "", "archivist")
            .context("Failed to determine project directories")?;

        let config_dir = proj_dirs.config_dir();
        Ok(config_dir.join("archivist.toml"))
    }

    /// Load the file; a missing file yields the defaults.
    pub fn load(&self) -> Result<AppConfig> {
        if !self.config_path.exists() {
            tracing::debug!("No config at {}, using defaults", self.config_path.display());
            return Ok(AppConfig::default());
        }

        let contents = fs::read_to_string(&self.config_path)
            .with_context(|| format!("Failed to read config file: {}", self.config_path.display()))?;

        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", self.config_path.display()))?;

        Ok(config)
    }
}
