//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No validation logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::GlobalArgs;

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "rowguard",
    bin_name = "rowguard",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Validate records against declared field rules before they are written",
    long_about = "rowguard runs the pre-write validation hook over JSON records, \
                  using model schemas declared in TOML files.",
    after_help = "EXAMPLES:\n\
        \x20 rowguard check users.json --schema schemas/user.toml\n\
        \x20 rowguard check users.json --schema schemas/ --update --format json\n\
        \x20 rowguard rules\n\
        \x20 rowguard completions bash > /usr/share/bash-completion/completions/rowguard",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Validate records from a JSON file.
    #[command(
        visible_alias = "c",
        about = "Validate records against their schema",
        after_help = "EXAMPLES:\n\
            \x20 rowguard check users.json --schema user.toml\n\
            \x20 rowguard check users.json --schema schemas/ --update\n\
            \x20 rowguard check users.json --schema schemas/ --update --columns Name,Email\n\
            \x20 rowguard check users.json --schema user.toml --format json"
    )]
    Check(CheckArgs),

    /// List the rules schemas may use.
    #[command(
        visible_alias = "ls",
        about = "List available rules",
        after_help = "EXAMPLES:\n\
            \x20 rowguard rules\n\
            \x20 rowguard rules --format json"
    )]
    Rules(RulesArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 rowguard completions bash > ~/.local/share/bash-completion/completions/rowguard\n\
            \x20 rowguard completions zsh  > ~/.zfunc/_rowguard\n\
            \x20 rowguard completions fish > ~/.config/fish/completions/rowguard.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the rowguard configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 rowguard config get check.kind\n\
            \x20 rowguard config list\n\
            \x20 rowguard config path"
    )]
    Config(ConfigCommands),
}

// ── check ─────────────────────────────────────────────────────────────────────

/// Arguments for `rowguard check`.
#[derive(Debug, Args)]
pub struct CheckArgs {
    /// JSON file of the form `{ "model": "User", "records": [ {...} ] }`.
    #[arg(value_name = "RECORDS", help = "JSON records file")]
    pub records: PathBuf,

    /// Schema file, or a directory searched recursively for `*.toml`.
    #[arg(
        short = 's',
        long = "schema",
        value_name = "FILE|DIR",
        help = "Schema file or directory"
    )]
    pub schema: PathBuf,

    /// Validate as an update instead of a create.
    #[arg(short = 'u', long = "update", help = "Treat the write as an update")]
    pub update: bool,

    /// Restrict the update to these columns (skips validation).
    #[arg(
        long = "columns",
        value_name = "COLUMN",
        value_delimiter = ',',
        requires = "update",
        help = "Partial update of these columns"
    )]
    pub columns: Vec<String>,

    /// Set the opt-out flag on the operation.
    #[arg(long = "skip-validations", help = "Skip validation for this write")]
    pub skip_validations: bool,

    /// Report format; defaults to `output.format` from the configuration.
    #[arg(
        short = 'f',
        long = "format",
        value_enum,
        value_name = "FORMAT",
        help = "Report format"
    )]
    pub format: Option<ReportFormat>,
}

/// How results are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Human-readable, one line per error.
    Human,
    /// A single JSON document on stdout.
    Json,
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Self as ValueEnum>::from_str(s, true)
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Human => write!(f, "human"),
            Self::Json => write!(f, "json"),
        }
    }
}

// ── rules ─────────────────────────────────────────────────────────────────────

/// Arguments for `rowguard rules`.
#[derive(Debug, Args)]
pub struct RulesArgs {
    /// Output format; defaults to `output.format` from the configuration.
    #[arg(short = 'f', long = "format", value_enum, value_name = "FORMAT")]
    pub format: Option<ReportFormat>,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `rowguard completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `rowguard config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `check.kind`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the default configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_check_command() {
        let cli = Cli::parse_from([
            "rowguard",
            "check",
            "users.json",
            "--schema",
            "schemas",
            "--update",
            "--columns",
            "Name,Email",
            "--format",
            "json",
        ]);
        let Commands::Check(args) = cli.command else {
            panic!("expected Check command");
        };
        assert!(args.update);
        assert_eq!(args.columns, vec!["Name", "Email"]);
        assert_eq!(args.format, Some(ReportFormat::Json));
        assert!(!args.skip_validations);
    }

    #[test]
    fn columns_require_update() {
        let result = Cli::try_parse_from([
            "rowguard", "check", "u.json", "-s", "u.toml", "--columns", "Name",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn report_format_parses_case_insensitively() {
        assert_eq!("JSON".parse::<ReportFormat>(), Ok(ReportFormat::Json));
        assert!("yaml".parse::<ReportFormat>().is_err());
        assert_eq!(ReportFormat::Human.to_string(), "human");
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["rowguard", "--quiet", "--verbose", "rules"]);
        assert!(result.is_err());
    }

    #[test]
    fn no_color_flag_needs_no_value() {
        let cli = Cli::try_parse_from(["rowguard", "--no-color", "rules"]).unwrap();
        assert!(cli.global.no_color);
    }
}
