//! Output management and formatting.

use std::io;

use console::Term;
use owo_colors::OwoColorize;
use serde::Serialize;

use rowguard_core::application::ErrorReport;

use crate::cli::global::GlobalArgs;
use crate::config::AppConfig;

/// Manages CLI output based on configuration.
pub struct OutputManager {
    quiet: bool,
    no_color: bool,
    show_labels: bool,
    term: Term,
}

impl OutputManager {
    /// Build an `OutputManager` from parsed CLI flags and loaded config.
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        Self {
            quiet: args.quiet,
            no_color: args.no_color || config.output.no_color,
            show_labels: config.check.show_labels,
            term: Term::stdout(),
        }
    }

    // ── Public write methods ───────────────────────────────────────────────

    /// Generic message; suppressed in quiet mode.
    pub fn print(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.term.write_line(msg)
    }

    /// Success indicator: `✓ <msg>`.
    pub fn success(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{2713} {msg}") // ✓
        } else {
            format!("{} {}", "\u{2713}".green().bold(), msg.green())
        };
        self.term.write_line(&line)
    }

    /// Warning indicator: `⚠ <msg>`.
    pub fn warning(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{26a0} {msg}") // ⚠
        } else {
            format!("{} {}", "\u{26a0}".yellow().bold(), msg.yellow())
        };
        self.term.write_line(&line)
    }

    /// Bold cyan header line.
    pub fn header(&self, text: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            text.to_owned()
        } else {
            text.cyan().bold().to_string()
        };
        self.term.write_line(&line)
    }

    /// One violation: `✗ <label>: <message>`.  Not suppressed in quiet mode.
    pub fn violation(&self, report: &ErrorReport) -> io::Result<()> {
        self.term.write_line(&self.violation_line(report))
    }

    /// A value as pretty JSON on stdout, regardless of quiet mode.
    pub fn json<T: Serialize>(&self, value: &T) -> io::Result<()> {
        let text = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        self.term.write_line(&text)
    }

    fn violation_line(&self, report: &ErrorReport) -> String {
        let label = report.label.as_deref().filter(|_| self.show_labels);
        match (label, self.no_color) {
            (Some(label), true) => format!("\u{2717} {label}: {}", report.message),
            (None, true) => format!("\u{2717} {}", report.message),
            (Some(label), false) => format!(
                "{} {} {}",
                "\u{2717}".red().bold(),
                format!("{label}:").dimmed(),
                report.message.red()
            ),
            (None, false) => format!("{} {}", "\u{2717}".red().bold(), report.message.red()),
        }
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn make_manager(quiet: bool, no_color: bool) -> OutputManager {
        let args = GlobalArgs {
            verbose: 0,
            quiet,
            no_color,
            config: None,
        };
        OutputManager::new(&args, &AppConfig::default())
    }

    fn report(label: Option<&str>) -> ErrorReport {
        ErrorReport {
            model: Some("User".into()),
            column: Some("Name".into()),
            message: "Name can't be blank".into(),
            label: label.map(Into::into),
        }
    }

    #[test]
    fn quiet_suppresses_print() {
        let out = make_manager(true, true);
        assert!(out.print("hello").is_ok());
    }

    #[test]
    fn violation_line_includes_label() {
        let out = make_manager(false, true);
        assert_eq!(
            out.violation_line(&report(Some("User_1_Name"))),
            "\u{2717} User_1_Name: Name can't be blank"
        );
        assert_eq!(
            out.violation_line(&report(None)),
            "\u{2717} Name can't be blank"
        );
    }

    #[test]
    fn labels_can_be_hidden() {
        let mut out = make_manager(false, true);
        out.show_labels = false;
        assert_eq!(
            out.violation_line(&report(Some("User_1_Name"))),
            "\u{2717} Name can't be blank"
        );
    }

    #[test]
    fn config_can_disable_color() {
        let args = GlobalArgs {
            verbose: 0,
            quiet: false,
            no_color: false,
            config: None,
        };
        let mut config = AppConfig::default();
        config.output.no_color = true;
        let out = OutputManager::new(&args, &config);
        assert_eq!(
            out.violation_line(&report(None)),
            "\u{2717} Name can't be blank"
        );
    }
}
