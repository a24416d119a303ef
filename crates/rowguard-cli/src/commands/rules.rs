//! Implementation of the `rowguard rules` command.

use serde::Serialize;

use rowguard_adapters::{BUILTIN_RULES, register_builtin_rules};
use rowguard_core::{
    domain::{RuleKind, RuleRegistry},
    error::RowguardResult,
};

use crate::{
    cli::{ReportFormat, RulesArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// One row of the listing.
#[derive(Debug, Serialize, PartialEq, Eq)]
struct RuleEntry {
    name: String,
    kind: &'static str,
    description: String,
}

pub fn execute(args: RulesArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let format = match args.format {
        Some(format) => format,
        None => config.report_format().map_err(|e| CliError::ConfigError {
            message: e.to_string(),
            source: None,
        })?,
    };

    let registry = RuleRegistry::global();
    if config.rules.builtin {
        register_builtin_rules(&registry)?;
    }
    let entries = collect(&registry)?;

    match format {
        ReportFormat::Human => {
            output.header("Built-in rules:")?;
            for entry in entries.iter().filter(|e| e.kind == "builtin") {
                output.print(&format!("  {:<14} {}", entry.name, entry.description))?;
            }
            output.header("Registered custom rules (use with rule = \"custom\"):")?;
            let custom: Vec<_> = entries.iter().filter(|e| e.kind == "custom").collect();
            if custom.is_empty() {
                output.print("  (none)")?;
            }
            for entry in custom {
                output.print(&format!("  {:<14} {}", entry.name, entry.description))?;
            }
        }
        ReportFormat::Json => output.json(&entries)?,
    }

    Ok(())
}

fn collect(registry: &RuleRegistry) -> RowguardResult<Vec<RuleEntry>> {
    let builtin = RuleKind::BUILTIN.iter().map(|kind| RuleEntry {
        name: kind.as_str().to_string(),
        kind: "builtin",
        description: kind.description().to_string(),
    });

    let custom = registry.names()?.into_iter().map(|name| {
        let description = BUILTIN_RULES
            .iter()
            .find(|(bundled, _)| *bundled == name)
            .map_or("custom predicate", |(_, description)| *description)
            .to_string();
        RuleEntry {
            name,
            kind: "custom",
            description,
        }
    });

    Ok(builtin.chain(custom).collect())
}
