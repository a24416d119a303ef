//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables: `ROWGUARD__<SECTION>__<KEY>`, e.g.
//!    `ROWGUARD__CHECK__KIND=update`
//! 3. Config file: `--config <FILE>`, else [`AppConfig::config_path`] if it exists
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::cli::ReportFormat;

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "ROWGUARD";

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// How `rowguard check` treats a write.
    pub check: CheckConfig,
    /// Output settings.
    pub output: OutputConfig,
    /// Rule registry settings.
    pub rules: RulesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
    /// `create` or `update`.
    pub kind: String,
    /// Print the `Model_PK_Column` label next to each error.
    pub show_labels: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    /// `human` or `json`.
    pub format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Register the bundled custom rules (`alpha`, `alphanumeric`, ...).
    pub builtin: bool,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            kind: "create".into(),
            show_labels: true,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "human".into(),
        }
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self { builtin: true }
    }
}

impl AppConfig {
    /// Load configuration: defaults, then file, then environment.
    ///
    /// An explicit `config_file` must exist; the default location is optional.
    pub fn load(config_file: Option<&Path>) -> anyhow::Result<Self> {
        let (path, required) = match config_file {
            Some(path) => (path.to_path_buf(), true),
            None => (Self::config_path(), false),
        };

        let settings = Config::builder()
            .add_source(
                Config::try_from(&Self::default()).context("invalid default configuration")?,
            )
            .add_source(File::from(path.clone()).required(required))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("failed to read configuration from {}", path.display()))?;

        let config: Self = settings
            .try_deserialize()
            .context("configuration has invalid values")?;
        config.validate()?;
        Ok(config)
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.rowguard.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "rowguard", "rowguard")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".rowguard.toml"))
    }

    /// The configured report format.
    pub fn report_format(&self) -> anyhow::Result<ReportFormat> {
        self.output.format.parse().map_err(|_| {
            anyhow::anyhow!(
                "output.format must be 'human' or 'json', got '{}'",
                self.output.format
            )
        })
    }

    fn validate(&self) -> anyhow::Result<()> {
        self.report_format()?;
        if !matches!(
            self.check.kind.to_ascii_lowercase().as_str(),
            "create" | "update"
        ) {
            anyhow::bail!(
                "check.kind must be 'create' or 'update', got '{}'",
                self.check.kind
            );
        }
        Ok(())
    }
}
