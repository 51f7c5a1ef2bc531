//! Configuration for the pms client.
//!
//! Settings are read from `<state_dir>/pms.toml` and layered
//! file → environment → CLI.
//!
//! # Configuration File Format
//!
//! ```toml
//! [api]
//! base_url = "http://localhost:8000/"
//! timeout_secs = 30
//! user_agent = "pms-cli"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE: &str = "pms.toml";
pub const SESSION_FILE: &str = "session.json";
pub const KANBAN_FILE: &str = "kanban.json";

/// API connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSection {
    /// Backend root URL; request paths are joined onto it
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    "http://localhost:8000/".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("pms-cli/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

/// Contents of `pms.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PmsToml {
    #[serde(default)]
    pub api: ApiSection,
}

impl PmsToml {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse pms.toml")
    }

    /// Load `pms.toml` from the state directory, or defaults if it is absent.
    pub fn load_or_default(state_dir: &Path) -> Result<Self> {
        let config_path = state_dir.join(CONFIG_FILE);
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize pms.toml")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Validate the configuration and return a list of warnings.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        let base_url = self.api.base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            warnings.push(format!(
                "api.base_url '{}' must start with http:// or https://",
                self.api.base_url
            ));
        } else if reqwest::Url::parse(base_url).is_err() {
            warnings.push(format!("api.base_url '{}' is not a valid URL", self.api.base_url));
        }

        if self.api.timeout_secs == 0 {
            warnings.push("api.timeout_secs must be greater than 0".to_string());
        }

        if self.api.user_agent.trim().is_empty() {
            warnings.push("api.user_agent should not be empty".to_string());
        }

        warnings
    }
}

/// Resolve the state directory: explicit path, then `PMS_HOME`, then `~/.pms`.
pub fn resolve_state_dir(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        return Ok(dir.to_path_buf());
    }
    if let Some(dir) = std::env::var_os("PMS_HOME") {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(".pms"))
        .context("Could not determine home directory; pass --state-dir or set PMS_HOME")
}

/// Effective configuration with environment and CLI overrides applied.
#[derive(Debug, Clone)]
pub struct PmsConfig {
    pub state_dir: PathBuf,
    /// Parsed pms.toml configuration
    pub toml: PmsToml,
    /// CLI override for the API URL (if specified)
    pub cli_api_url: Option<String>,
}

impl PmsConfig {
    pub fn new(state_dir: PathBuf) -> Result<Self> {
        let toml = PmsToml::load_or_default(&state_dir)?;
        Ok(Self {
            state_dir,
            toml,
            cli_api_url: None,
        })
    }

    pub fn with_cli_args(state_dir: PathBuf, api_url: Option<String>) -> Result<Self> {
        let mut config = Self::new(state_dir)?;
        config.cli_api_url = api_url;
        Ok(config)
    }

    /// The API base URL (CLI → env → file), always ending in `/`.
    pub fn api_url(&self) -> String {
        let url = self
            .cli_api_url
            .clone()
            .or_else(|| std::env::var("PMS_API_URL").ok())
            .unwrap_or_else(|| self.toml.api.base_url.clone());
        let url = url.trim().to_string();
        if url.ends_with('/') { url } else { format!("{}/", url) }
    }

    /// Request timeout (env → file).
    pub fn timeout(&self) -> Duration {
        let secs = std::env::var("PMS_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(self.toml.api.timeout_secs);
        Duration::from_secs(secs.max(1))
    }

    pub fn user_agent(&self) -> &str {
        &self.toml.api.user_agent
    }

    pub fn config_file(&self) -> PathBuf {
        self.state_dir.join(CONFIG_FILE)
    }

    pub fn session_file(&self) -> PathBuf {
        self.state_dir.join(SESSION_FILE)
    }

    pub fn kanban_file(&self) -> PathBuf {
        self.state_dir.join(KANBAN_FILE)
    }

    pub fn ensure_state_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.state_dir).with_context(|| {
            format!("Failed to create state directory: {}", self.state_dir.display())
        })
    }

    pub fn validate(&self) -> Vec<String> {
        let mut warnings = self.toml.validate();
        if let Some(url) = &self.cli_api_url {
            if reqwest::Url::parse(url).is_err() {
                warnings.push(format!("--api-url '{}' is not a valid URL", url));
            }
        }
        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let toml = PmsToml::default();
        assert_eq!(toml.api.base_url, "http://localhost:8000/");
        assert_eq!(toml.api.timeout_secs, 30);
        assert!(toml.api.user_agent.starts_with("pms-cli/"));
        assert!(toml.validate().is_empty());
    }

    #[test]
    fn test_parse_partial_file_fills_defaults() {
        let toml = PmsToml::parse("[api]\nbase_url = \"https://pms.example.com/api/\"\n").unwrap();
        assert_eq!(toml.api.base_url, "https://pms.example.com/api/");
        assert_eq!(toml.api.timeout_secs, 30);
    }

    #[test]
    fn test_parse_empty_file() {
        let toml = PmsToml::parse("").unwrap();
        assert_eq!(toml.api.base_url, "http://localhost:8000/");
    }

    #[test]
    fn test_parse_invalid_toml() {
        let err = PmsToml::parse("[api\nbase_url = 1").unwrap_err();
        assert!(err.to_string().contains("Failed to parse pms.toml"));
    }

    #[test]
    fn test_validate_reports_problems() {
        let toml = PmsToml::parse(
            "[api]\nbase_url = \"ftp://x\"\ntimeout_secs = 0\nuser_agent = \" \"\n",
        )
        .unwrap();
        let warnings = toml.validate();
        assert_eq!(warnings.len(), 3);
        assert!(warnings[0].contains("http://"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        let mut toml = PmsToml::default();
        toml.api.base_url = "https://pms.example.com/".to_string();
        toml.api.timeout_secs = 5;
        toml.save(&path).unwrap();

        let loaded = PmsToml::load_or_default(dir.path()).unwrap();
        assert_eq!(loaded.api.base_url, "https://pms.example.com/");
        assert_eq!(loaded.api.timeout_secs, 5);
    }

    #[test]
    fn test_load_or_default_without_file() {
        let dir = tempdir().unwrap();
        let toml = PmsToml::load_or_default(dir.path()).unwrap();
        assert_eq!(toml.api.timeout_secs, 30);
    }

    #[test]
    fn test_cli_url_wins_and_gets_trailing_slash() {
        let dir = tempdir().unwrap();
        let config = PmsConfig::with_cli_args(
            dir.path().to_path_buf(),
            Some("http://127.0.0.1:9000".to_string()),
        )
        .unwrap();
        assert_eq!(config.api_url(), "http://127.0.0.1:9000/");
    }

    #[test]
    fn test_state_files_live_in_state_dir() {
        let dir = tempdir().unwrap();
        let config = PmsConfig::new(dir.path().to_path_buf()).unwrap();
        assert_eq!(config.config_file(), dir.path().join("pms.toml"));
        assert_eq!(config.session_file(), dir.path().join("session.json"));
        assert_eq!(config.kanban_file(), dir.path().join("kanban.json"));
    }

    #[test]
    fn test_explicit_state_dir_wins() {
        let dir = tempdir().unwrap();
        assert_eq!(resolve_state_dir(Some(dir.path())).unwrap(), dir.path());
    }

    #[test]
    fn test_validate_flags_bad_cli_url() {
        let dir = tempdir().unwrap();
        let config =
            PmsConfig::with_cli_args(dir.path().to_path_buf(), Some("not a url".to_string()))
                .unwrap();
        assert_eq!(config.validate().len(), 1);
    }
}
