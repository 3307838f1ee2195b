//! CLI configuration.
//!
//! Settings come from three places, highest precedence first: command-line
//! flags (or their environment variables), the TOML config file, built-in
//! defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use policyctl_client::{ClientConfig, DEFAULT_ENDPOINT};
use serde::{Deserialize, Serialize};

use crate::commands::GlobalArgs;
use crate::error::{CliError, CliResult};
use crate::output::OutputFormat;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Contents of the config file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Policy service endpoint.
    pub host: Option<String>,
    /// Output format.
    pub output: Option<OutputFormat>,
    /// Bearer token.
    pub token: Option<String>,
    /// Extra CA certificate for TLS endpoints.
    pub ca_cert: Option<PathBuf>,
    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,
}

impl FileConfig {
    /// `<config dir>/policyctl/config.toml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("policyctl").join("config.toml"))
    }

    /// Reads and parses a config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid.
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| CliError::Config(format!("failed to parse {}: {e}", path.display())))?;
        if config.timeout_secs == Some(0) {
            return Err(CliError::Config(format!(
                "invalid {}: timeout_secs must be at least 1",
                path.display()
            )));
        }
        Ok(config)
    }

    /// Loads the config for this invocation.
    ///
    /// An explicitly given path must exist. The default path is used only
    /// if a file is there.
    ///
    /// # Errors
    ///
    /// Returns an error if the chosen file cannot be loaded.
    pub fn discover(explicit: Option<&Path>) -> CliResult<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => {
                tracing::debug!(path = %path.display(), "Loading config file");
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }
}

/// Effective settings after applying precedence.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Client connection settings.
    pub client: ClientConfig,
    /// Output format.
    pub output: OutputFormat,
    /// Skip confirmation prompts.
    pub force: bool,
}

impl Settings {
    /// Merges flags over the file over defaults.
    pub fn resolve(args: &GlobalArgs, file: FileConfig) -> Self {
        let timeout = args
            .timeout
            .or(file.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let client = ClientConfig::builder()
            .endpoint(
                args.host
                    .clone()
                    .or(file.host)
                    .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            )
            .request_timeout(Duration::from_secs(timeout))
            .token(args.token.clone().or(file.token))
            .ca_cert(args.ca_cert.clone().or(file.ca_cert))
            .build();

        Self {
            client,
            output: args.output.or(file.output).unwrap_or_default(),
            force: args.force,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use clap::Parser;

    use super::*;
    use crate::commands::Cli;

    fn global(args: &[&str]) -> GlobalArgs {
        let mut argv = vec!["policyctl"];
        argv.extend_from_slice(args);
        argv.extend_from_slice(&["kas-registry", "list"]);
        Cli::try_parse_from(argv).unwrap().global
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::resolve(&GlobalArgs::default(), FileConfig::default());
        assert_eq!(settings.client.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(settings.client.request_timeout, Duration::from_secs(30));
        assert_eq!(settings.output, OutputFormat::Table);
        assert!(!settings.force);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let file = FileConfig {
            host: Some("https://policy.internal".to_string()),
            output: Some(OutputFormat::Json),
            timeout_secs: Some(5),
            ..FileConfig::default()
        };
        let settings = Settings::resolve(&GlobalArgs::default(), file);
        assert_eq!(settings.client.endpoint, "https://policy.internal");
        assert_eq!(settings.output, OutputFormat::Json);
        assert_eq!(settings.client.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_flags_override_file() {
        let file = FileConfig {
            host: Some("https://policy.internal".to_string()),
            token: Some("from-file".to_string()),
            ..FileConfig::default()
        };
        let args = global(&["--host", "http://127.0.0.1:9000", "--token", "from-flag", "--force"]);
        let settings = Settings::resolve(&args, file);
        assert_eq!(settings.client.endpoint, "http://127.0.0.1:9000");
        assert_eq!(settings.client.token.as_deref(), Some("from-flag"));
        assert!(settings.force);
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "host = \"https://policy.example.com\"").unwrap();
        writeln!(file, "output = \"json\"").unwrap();
        writeln!(file, "timeout_secs = 10").unwrap();

        let config = FileConfig::load(file.path()).unwrap();
        assert_eq!(config.host.as_deref(), Some("https://policy.example.com"));
        assert_eq!(config.output, Some(OutputFormat::Json));
        assert_eq!(config.timeout_secs, Some(10));
    }

    #[test]
    fn test_load_rejects_unknown_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "hots = \"typo\"").unwrap();
        assert!(matches!(FileConfig::load(file.path()), Err(CliError::Config(_))));
    }

    #[test]
    fn test_load_rejects_zero_timeout() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "timeout_secs = 0").unwrap();
        let err = FileConfig::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("timeout_secs"));
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(FileConfig::discover(Some(&missing)).is_err());
    }
}
