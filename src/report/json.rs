use crate::analysis::{Leak, Severity};
use crate::registry::ResourceKind;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::path::PathBuf;

/// JSON reporter for programmatic output
pub struct JsonReporter {
    output_path: Option<PathBuf>,
}

impl JsonReporter {
    pub fn new(output_path: Option<PathBuf>) -> Self {
        Self { output_path }
    }

    pub fn report(&self, leaks: &[Leak]) -> Result<()> {
        let report = JsonReport::from_leaks(leaks);
        let json = serde_json::to_string_pretty(&report).into_diagnostic()?;

        if let Some(path) = &self.output_path {
            std::fs::write(path, &json).into_diagnostic()?;
            println!("Report written to: {}", path.display());
        } else {
            println!("{}", json);
        }

        Ok(())
    }
}

#[derive(Serialize)]
struct JsonReport {
    version: &'static str,
    total_leaks: usize,
    leaks: Vec<JsonLeak>,
    summary: JsonSummary,
}

#[derive(Serialize)]
struct JsonLeak {
    code: &'static str,
    severity: &'static str,
    resource: String,
    cleanup_method: String,
    kind: &'static str,
    message: String,
    file: String,
    line: usize,
    column: usize,
    function: String,
}

#[derive(Serialize)]
struct JsonSummary {
    errors: usize,
    warnings: usize,
    infos: usize,
    transactions: usize,
    iterators: usize,
}

impl JsonReport {
    fn from_leaks(leaks: &[Leak]) -> Self {
        let mut errors = 0;
        let mut warnings = 0;
        let mut infos = 0;
        let mut transactions = 0;
        let mut iterators = 0;

        let rows: Vec<JsonLeak> = leaks
            .iter()
            .map(|leak| {
                match leak.severity {
                    Severity::Error => errors += 1,
                    Severity::Warning => warnings += 1,
                    Severity::Info => infos += 1,
                }
                match leak.kind {
                    ResourceKind::Transaction => transactions += 1,
                    ResourceKind::Iterator => iterators += 1,
                }

                JsonLeak {
                    code: leak.code(),
                    severity: leak.severity.as_str(),
                    resource: leak.resource.clone(),
                    cleanup_method: leak.cleanup_method.clone(),
                    kind: leak.kind.as_str(),
                    message: leak.message.clone(),
                    file: leak.location.file.clone(),
                    line: leak.location.line,
                    column: leak.location.column,
                    function: leak.function.clone(),
                }
            })
            .collect();

        Self {
            version: "1.0",
            total_leaks: leaks.len(),
            leaks: rows,
            summary: JsonSummary {
                errors,
                warnings,
                infos,
                transactions,
                iterators,
            },
        }
    }
}
