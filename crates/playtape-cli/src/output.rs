//! Output formatting for CLI
//!
//! Provides consistent output formatting for batch results:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use std::path::PathBuf;

use playtape_core::CommandFailure;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Result of one batch run, ready to print
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// Commands applied
    pub applied: usize,
    /// Commands that failed, in order
    pub failures: Vec<CommandFailure>,
    /// Where the snapshot was written
    pub out: PathBuf,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.applied + self.failures.len()
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print the batch summary; problems go to stderr except in JSON mode
    pub fn print_report(&self, report: &BatchReport) {
        match self.format {
            OutputFormat::Human => {
                println!(
                    "Applied {} of {} command(s), wrote {}",
                    report.applied,
                    report.total(),
                    report.out.display()
                );
                if !report.failures.is_empty() {
                    eprintln!();
                    eprintln!("List of problems:");
                    for failure in &report.failures {
                        eprintln!("  {}", failure);
                    }
                }
            }
            OutputFormat::Json => {
                println!("{}", report_json(report));
            }
            OutputFormat::Quiet => {
                for failure in &report.failures {
                    eprintln!("{}", failure);
                }
            }
        }
    }
}

fn report_json(report: &BatchReport) -> serde_json::Value {
    let errors: Vec<_> = report
        .failures
        .iter()
        .map(|f| {
            serde_json::json!({
                "index": f.index,
                "error": f.error.to_string(),
            })
        })
        .collect();

    serde_json::json!({
        "applied": report.applied,
        "failed": report.failures.len(),
        "out": report.out.display().to_string(),
        "errors": errors,
    })
}
