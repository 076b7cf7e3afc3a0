use crate::adapters::anthropic::{ANTHROPIC_BASE_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL};
use crate::core::thresholds::Thresholds;
use crate::utils::error::{AnalysisError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_range,
    validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variables consulted for the API key when the file leaves it unset.
pub const API_KEY_ENV_VARS: [&str; 2] = ["ANTHROPIC_API_KEY", "api_key"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub insights: InsightsConfig,
    pub store: StoreConfig,
    pub report: ReportConfig,
    pub thresholds: Thresholds,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
    pub workers: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            max_upload_bytes: 10 * 1024 * 1024,
            workers: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightsConfig {
    pub enabled: bool,
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl Default for InsightsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            base_url: ANTHROPIC_BASE_URL.to_string(),
            timeout_seconds: 20,
        }
    }
}

impl InsightsConfig {
    /// The key to send, if insights are on and a usable key is configured.
    pub fn effective_api_key(&self) -> Option<&str> {
        if !self.enabled {
            return None;
        }
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && !is_unresolved_placeholder(key))
    }

    /// Fills an unset key from the environment.
    pub fn resolve_api_key_from_env(&mut self) {
        if self.effective_api_key().is_some() || !self.enabled {
            return;
        }
        self.api_key = API_KEY_ENV_VARS
            .iter()
            .find_map(|name| std::env::var(name).ok())
            .filter(|key| !key.trim().is_empty());
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Seconds a report stays exportable. 0 keeps reports until evicted by capacity.
    pub ttl_seconds: u64,
    pub max_reports: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: 3600,
            max_reports: 256,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub output_path: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_path: "./reports".to_string(),
        }
    }
}

fn is_unresolved_placeholder(value: &str) -> bool {
    value.starts_with("${") && value.ends_with('}')
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AnalysisError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the variable's value; unknown variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AnalysisError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("server.host", &self.server.host)?;
        validate_positive_number("server.port", self.server.port as usize, 1)?;
        validate_positive_number("server.max_upload_bytes", self.server.max_upload_bytes, 1)?;
        if let Some(workers) = self.server.workers {
            validate_range("server.workers", workers, 1, 256)?;
        }

        if self.insights.enabled {
            validate_url("insights.base_url", &self.insights.base_url)?;
            validate_non_empty_string("insights.model", &self.insights.model)?;
            validate_range("insights.max_tokens", self.insights.max_tokens, 1, 8192)?;
            validate_range("insights.timeout_seconds", self.insights.timeout_seconds, 1, 600)?;
        }

        validate_positive_number("store.max_reports", self.store.max_reports, 1)?;
        validate_path("report.output_path", &self.report.output_path)?;
        self.thresholds.validate()?;

        Ok(())
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
