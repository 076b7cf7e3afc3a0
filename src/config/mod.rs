pub mod cli;
pub mod toml_config;

use crate::utils::error::Result;
use toml_config::AppConfig;

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "finhealth")]
#[command(about = "Financial health analysis service for small businesses")]
pub struct CliConfig {
    #[arg(long, short, help = "TOML configuration file")]
    pub config: Option<String>,

    #[arg(long, help = "Override server.host")]
    pub host: Option<String>,

    #[arg(long, help = "Override server.port")]
    pub port: Option<u16>,

    #[arg(long, help = "Disable AI insights and always use the rule-based narrative")]
    pub no_ai: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[arg(long, short, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per analysis phase")]
    pub monitor: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// File values (or defaults), then command line overrides, then the
    /// environment API key fallback.
    pub fn load_app_config(&self) -> Result<AppConfig> {
        let mut config = load_or_default(self.config.as_deref())?;

        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if self.no_ai {
            config.insights.enabled = false;
        }

        config.insights.resolve_api_key_from_env();
        Ok(config)
    }
}

/// Reads the file when a path is given; otherwise every section takes its default.
pub fn load_or_default(path: Option<&str>) -> Result<AppConfig> {
    match path {
        Some(path) => {
            tracing::debug!("Loading configuration from {}", path);
            AppConfig::from_file(path)
        }
        None => Ok(AppConfig::default()),
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_flags_override_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[server]\nhost = \"0.0.0.0\"\nport = 9000\n")
            .unwrap();
        let path = file.path().display().to_string();

        let cli = CliConfig::parse_from(["finhealth", "--config", &path, "--port", "9001", "--no-ai"]);
        let config = cli.load_app_config().unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9001);
        assert!(!config.insights.enabled);
        assert_eq!(config.insights.effective_api_key(), None);
    }

    #[test]
    fn test_no_config_file_uses_defaults() {
        let cli = CliConfig::parse_from(["finhealth"]);
        let config = cli.load_app_config().unwrap();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.store.max_reports, 256);
    }

    #[test]
    fn test_missing_config_file_is_io_error() {
        let cli = CliConfig::parse_from(["finhealth", "--config", "/definitely/not/here.toml"]);
        assert!(matches!(
            cli.load_app_config(),
            Err(crate::utils::error::AnalysisError::IoError(_))
        ));
    }
}
