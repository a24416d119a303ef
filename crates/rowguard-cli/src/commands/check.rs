//! Implementation of the `rowguard check` command.
//!
//! Loads schemas, decodes the records file, and drives one write operation
//! through the same callback chain a store would use. Nothing is persisted.

use std::{fs, path::Path, str::FromStr, sync::Arc};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, instrument};

use rowguard_adapters::{
    CallbackChain, DynamicRecord, SchemaCatalog, SchemaLoader, WriteOperation, WriteOptions,
    register_builtin_rules, register_callbacks,
};
use rowguard_core::{
    application::{ErrorReport, SkipReason, ValidationHook},
    domain::{ModelSchema, Record, RuleRegistry, WriteKind},
};

use crate::{
    cli::{CheckArgs, ReportFormat},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Accepted shapes of a records file.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecordsFile {
    Tagged {
        #[serde(default)]
        model: Option<String>,
        records: Vec<Value>,
    },
    Bare(Vec<Value>),
}

impl RecordsFile {
    fn into_parts(self) -> (Option<String>, Vec<Value>) {
        match self {
            Self::Tagged { model, records } => (model, records),
            Self::Bare(records) => (None, records),
        }
    }
}

/// Machine-readable outcome printed with `--format json`.
#[derive(Debug, Serialize)]
struct CheckReport<'a> {
    model: &'a str,
    kind: WriteKind,
    checked: usize,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    skipped: Option<&'static str>,
    errors: &'a [ErrorReport],
}

#[instrument(skip_all, fields(records = %args.records.display(), schema = %args.schema.display()))]
pub fn execute(args: CheckArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let format = match args.format {
        Some(format) => format,
        None => config.report_format().map_err(|e| CliError::ConfigError {
            message: e.to_string(),
            source: None,
        })?,
    };
    let kind = if args.update {
        WriteKind::Update
    } else {
        WriteKind::from_str(&config.check.kind).map_err(|e| CliError::ConfigError {
            message: e.to_string(),
            source: Some(Box::new(e)),
        })?
    };

    let catalog = SchemaLoader::new(&args.schema).load()?;
    let (model, values) = read_records(&args.records)?;
    let schema = select_schema(&catalog, model.as_deref())?;
    debug!(model = schema.model(), records = values.len(), "Records decoded");

    let records = values
        .iter()
        .map(|value| DynamicRecord::from_json(Arc::clone(&schema), value))
        .collect::<Result<Vec<_>, _>>()?;

    let registry = RuleRegistry::global();
    if config.rules.builtin {
        register_builtin_rules(&registry)?;
    }
    let mut chain = CallbackChain::new();
    register_callbacks(&mut chain, ValidationHook::with_registry(registry))?;

    let mut options = WriteOptions::new().skip_validations(args.skip_validations);
    if !args.columns.is_empty() {
        options = options.columns(args.columns.iter().cloned());
    }

    let refs: Vec<&dyn Record> = records.iter().map(|r| r as &dyn Record).collect();
    let mut op = WriteOperation::new(kind, &options, refs);
    let skipped = SkipReason::for_context(&op).map(|reason| reason.as_str());
    chain.run(&mut op)?;
    let reports = op.errors().reports();
    info!(errors = reports.len(), "Check finished");

    match format {
        ReportFormat::Human => {
            output.header(&format!(
                "Checking {} {} record(s) ({kind})",
                records.len(),
                schema.model()
            ))?;
            if let Some(reason) = skipped {
                output.warning(&format!("Validation skipped: {reason}"))?;
            }
            for report in &reports {
                output.violation(report)?;
            }
            if reports.is_empty() {
                output.success(&format!("All {} record(s) valid", records.len()))?;
            }
        }
        ReportFormat::Json => output.json(&CheckReport {
            model: schema.model(),
            kind,
            checked: records.len(),
            valid: reports.is_empty(),
            skipped,
            errors: &reports,
        })?,
    }

    if reports.is_empty() {
        Ok(())
    } else {
        Err(CliError::ViolationsFound {
            model: schema.model().to_string(),
            count: reports.len(),
        })
    }
}

fn read_records(path: &Path) -> CliResult<(Option<String>, Vec<Value>)> {
    let text = fs::read_to_string(path)
        .with_cli_context(|| format!("Failed to read {}", path.display()))?;
    let file: RecordsFile = serde_json::from_str(&text)
        .with_cli_context(|| format!("{} is not a records file", path.display()))?;
    Ok(file.into_parts())
}

fn select_schema(catalog: &SchemaCatalog, model: Option<&str>) -> CliResult<Arc<ModelSchema>> {
    match model {
        Some(model) => Ok(catalog.get(model)?),
        None => catalog.single().ok_or_else(|| CliError::InvalidInput {
            message: format!(
                "records file names no model and the schema declares {} models ({})",
                catalog.len(),
                catalog.models().collect::<Vec<_>>().join(", ")
            ),
            source: None,
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use tempfile::NamedTempFile;

    use super::*;

    fn write_temp(text: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(text.as_bytes()).unwrap();
        file
    }

    #[test]
    fn reads_tagged_records_file() {
        let file = write_temp(r#"{"model": "User", "records": [{"ID": 1}, {"ID": 2}]}"#);
        let (model, records) = read_records(file.path()).unwrap();
        assert_eq!(model.as_deref(), Some("User"));
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn reads_bare_array() {
        let file = write_temp(r#"[{"ID": 1}]"#);
        let (model, records) = read_records(file.path()).unwrap();
        assert!(model.is_none());
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn rejects_other_json() {
        let file = write_temp(r#"{"rows": []}"#);
        assert!(matches!(
            read_records(file.path()),
            Err(CliError::InvalidInput { .. })
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = read_records(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, CliError::IoError { .. }));
    }

    #[test]
    fn model_is_required_when_catalog_is_ambiguous() {
        let mut catalog = SchemaCatalog::new();
        for model in ["A", "B"] {
            let text =
                format!("model = \"{model}\"\n[[fields]]\nname = \"ID\"\nprimary_key = true\n");
            catalog.insert(SchemaLoader::parse_str(&text).unwrap()).unwrap();
        }

        assert_eq!(select_schema(&catalog, Some("B")).unwrap().model(), "B");
        let err = select_schema(&catalog, None).unwrap_err();
        assert!(err.to_string().contains("A, B"));
        assert_eq!(select_schema(&catalog, Some("C")).unwrap_err().exit_code(), 3);
    }
}
