use crate::core::module::DEFAULT_CONFIG_EXTENSION;
use crate::domain::ports::DEFAULT_STOP_TIMEOUT;
use crate::utils::error::{DockrError, Result};
use crate::utils::validation::{
    validate_extension, validate_path, validate_positive_number, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

pub const DEFAULT_SETTINGS_PATH: &str = "dockr.toml";

/// Supervisor settings, read from `dockr.toml`.
///
/// Every table and key is optional:
///
/// ```toml
/// [supervisor]
/// stop_timeout_ms = 3000
///
/// [discovery]
/// modules_dir = "modules"
/// config_extension = "json"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DockrSettings {
    pub supervisor: Option<SupervisorConfig>,
    pub discovery: Option<DiscoveryConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SupervisorConfig {
    pub stop_timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    pub modules_dir: Option<String>,
    pub config_extension: Option<String>,
}

impl DockrSettings {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(DockrError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Like `from_file`, but a missing file yields the defaults.
    pub fn from_file_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        match std::fs::read_to_string(&path) {
            Ok(content) => Self::from_toml_str(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(DockrError::IoError(e)),
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| DockrError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the value of `VAR`. Unset variables stay as written.
    fn substitute_env_vars(content: &str) -> String {
        static ENV_VAR: OnceLock<Regex> = OnceLock::new();
        let re = ENV_VAR
            .get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    pub fn stop_timeout(&self) -> Duration {
        self.supervisor
            .as_ref()
            .and_then(|s| s.stop_timeout_ms)
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_STOP_TIMEOUT)
    }

    pub fn modules_dir(&self) -> &str {
        self.discovery
            .as_ref()
            .and_then(|d| d.modules_dir.as_deref())
            .unwrap_or(".")
    }

    pub fn config_extension(&self) -> &str {
        self.discovery
            .as_ref()
            .and_then(|d| d.config_extension.as_deref())
            .unwrap_or(DEFAULT_CONFIG_EXTENSION)
    }
}

impl Validate for DockrSettings {
    fn validate(&self) -> Result<()> {
        if let Some(timeout) = self.supervisor.as_ref().and_then(|s| s.stop_timeout_ms) {
            validate_positive_number("supervisor.stop_timeout_ms", timeout, 1)?;
        }
        validate_path("discovery.modules_dir", self.modules_dir())?;
        validate_extension("discovery.config_extension", self.config_extension())?;
        Ok(())
    }
}
