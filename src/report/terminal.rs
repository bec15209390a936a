use crate::analysis::{Leak, Severity};
use crate::registry::ResourceKind;
use colored::Colorize;
use miette::Result;
use std::collections::HashMap;

/// Terminal reporter with colored output
pub struct TerminalReporter {
    /// Show the containing function under each finding
    show_functions: bool,
}

impl TerminalReporter {
    pub fn new() -> Self {
        Self {
            show_functions: true,
        }
    }

    pub fn with_functions(mut self, show: bool) -> Self {
        self.show_functions = show;
        self
    }

    pub fn report(&self, leaks: &[Leak]) -> Result<()> {
        if leaks.is_empty() {
            println!("{}", "No leaking resource handles found!".green().bold());
            return Ok(());
        }

        // Group by file
        let mut by_file: HashMap<&str, Vec<&Leak>> = HashMap::new();
        for leak in leaks {
            by_file.entry(&leak.location.file).or_default().push(leak);
        }

        // Print header
        println!();
        println!(
            "{}",
            format!("Found {} undeferred resource handles:", leaks.len())
                .yellow()
                .bold()
        );
        println!();

        // Print by file
        let mut files: Vec<_> = by_file.keys().collect();
        files.sort();

        for file in files {
            let items = &by_file[*file];

            // File header
            println!("{}", file.cyan().bold());

            for leak in items {
                self.print_leak(leak);
            }

            println!();
        }

        // Print summary
        self.print_summary(leaks);

        Ok(())
    }

    fn print_leak(&self, leak: &Leak) {
        let severity_str = match leak.severity {
            Severity::Error => "error".red().bold(),
            Severity::Warning => "warning".yellow().bold(),
            Severity::Info => "info".blue().bold(),
        };

        let location = format!("{}:{}", leak.location.line, leak.location.column);

        println!(
            "  {} {} [{}] {}",
            location.dimmed(),
            severity_str,
            leak.code().dimmed(),
            leak.message
        );

        if self.show_functions {
            println!("    {} in {}", "→".dimmed(), leak.function.white());
        }
    }

    fn print_summary(&self, leaks: &[Leak]) {
        let mut errors = 0;
        let mut warnings = 0;
        let mut infos = 0;
        let mut transactions = 0;
        let mut iterators = 0;

        for leak in leaks {
            match leak.severity {
                Severity::Error => errors += 1,
                Severity::Warning => warnings += 1,
                Severity::Info => infos += 1,
            }
            match leak.kind {
                ResourceKind::Transaction => transactions += 1,
                ResourceKind::Iterator => iterators += 1,
            }
        }

        println!("{}", "─".repeat(60).dimmed());

        let mut severity_parts = Vec::new();
        if errors > 0 {
            severity_parts.push(format!("{} errors", errors).red().to_string());
        }
        if warnings > 0 {
            severity_parts.push(format!("{} warnings", warnings).yellow().to_string());
        }
        if infos > 0 {
            severity_parts.push(format!("{} info", infos).blue().to_string());
        }
        println!("Summary: {}", severity_parts.join(", "));

        let mut kind_parts = Vec::new();
        if transactions > 0 {
            kind_parts.push(format!("{} unclosed transactions", transactions));
        }
        if iterators > 0 {
            kind_parts.push(format!("{} unstopped iterators", iterators));
        }
        println!("{}", format!("By resource: {}", kind_parts.join(", ")).dimmed());

        println!();
        println!(
            "{}",
            "Tip: Silence a finding with // nolint:spannercheck on the flagged line".dimmed()
        );
    }
}

impl Default for TerminalReporter {
    fn default() -> Self {
        Self::new()
    }
}
