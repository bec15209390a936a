mod json;
mod sarif;
mod terminal;

pub use json::JsonReporter;
pub use sarif::SarifReporter;
pub use terminal::TerminalReporter;

use crate::analysis::Leak;
use miette::Result;
use std::path::PathBuf;

/// Output format for reports
#[derive(Debug, Clone, Default)]
pub enum ReportFormat {
    #[default]
    Terminal,
    Json,
    Sarif,
}

/// Reporter for outputting leak findings
pub struct Reporter {
    format: ReportFormat,
    output_path: Option<PathBuf>,
    show_functions: bool,
}

impl Reporter {
    pub fn new(format: ReportFormat, output_path: Option<PathBuf>) -> Self {
        Self {
            format,
            output_path,
            show_functions: true,
        }
    }

    pub fn with_functions(mut self, show: bool) -> Self {
        self.show_functions = show;
        self
    }

    /// Report the leak findings
    pub fn report(&self, leaks: &[Leak]) -> Result<()> {
        match &self.format {
            ReportFormat::Terminal => {
                let reporter = TerminalReporter::new().with_functions(self.show_functions);
                reporter.report(leaks)
            }
            ReportFormat::Json => {
                let reporter = JsonReporter::new(self.output_path.clone());
                reporter.report(leaks)
            }
            ReportFormat::Sarif => {
                let reporter = SarifReporter::new(self.output_path.clone());
                reporter.report(leaks)
            }
        }
    }
}
