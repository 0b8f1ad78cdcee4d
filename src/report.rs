/*!
 * Reporting functionality for csbundle
 *
 * Renders the outcome of a combine run as console tables using the tabled
 * library.
 */

use std::fs;

use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::combiner::RunSummary;
use crate::utils::format_file_size;

/// Format of the report output
pub enum ReportFormat {
    /// Console table output
    ConsoleTable,
}

/// Report generator for run summaries
pub struct Reporter {
    format: ReportFormat,
}

impl Reporter {
    /// Create a new reporter
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Format a number with human-readable units
    fn format_number(&self, num: usize) -> String {
        if num >= 1_000_000 {
            format!("{:.1}M", num as f64 / 1_000_000.0)
        } else if num >= 1_000 {
            format!("{:.1}K", num as f64 / 1_000.0)
        } else {
            num.to_string()
        }
    }

    /// Generate a report string for a run
    pub fn generate_report(&self, summary: &RunSummary) -> String {
        match self.format {
            ReportFormat::ConsoleTable => self.generate_console_report(summary),
        }
    }

    /// Print the report to stdout
    pub fn print_report(&self, summary: &RunSummary) {
        println!("\n{}", self.generate_report(summary));
    }

    fn create_parts_table(&self, summary: &RunSummary) -> String {
        #[derive(Tabled)]
        struct PartRow {
            #[tabled(rename = "Part File")]
            file: String,

            #[tabled(rename = "Category")]
            category: String,

            #[tabled(rename = "Files")]
            files: String,

            #[tabled(rename = "Lines")]
            lines: String,
        }

        let rows: Vec<PartRow> = summary
            .parts
            .iter()
            .map(|part| PartRow {
                file: part.file_name.clone(),
                category: part.category.to_string(),
                files: part.files.to_string(),
                lines: self.format_number(part.lines),
            })
            .collect();

        styled(Table::new(rows))
    }

    fn create_summary_table(&self, summary: &RunSummary) -> String {
        #[derive(Tabled)]
        struct SummaryRow {
            #[tabled(rename = "Metric")]
            key: String,

            #[tabled(rename = "Value")]
            value: String,
        }

        let archive_size = fs::metadata(&summary.archive)
            .map(|m| format_file_size(m.len()))
            .unwrap_or_else(|_| "unknown".to_string());

        let mut rows = vec![
            SummaryRow {
                key: "📂 Output Directory".to_string(),
                value: summary.output_dir.display().to_string(),
            },
            SummaryRow {
                key: "⏱️ Process Time".to_string(),
                value: format!("{:.4?}", summary.duration),
            },
            SummaryRow {
                key: "📄 Files Combined".to_string(),
                value: self.format_number(summary.files),
            },
            SummaryRow {
                key: "📝 Total Lines".to_string(),
                value: self.format_number(summary.total_lines),
            },
            SummaryRow {
                key: "🧩 Parts".to_string(),
                value: summary.parts.len().to_string(),
            },
        ];

        if summary.types > 0 {
            rows.push(SummaryRow {
                key: "🔖 Indexed Types".to_string(),
                value: self.format_number(summary.types),
            });
        }

        if summary.removed > 0 {
            rows.push(SummaryRow {
                key: "🧹 Stale Files Removed".to_string(),
                value: summary.removed.to_string(),
            });
        }

        rows.push(SummaryRow {
            key: "📦 Archive".to_string(),
            value: format!(
                "{} ({} entries, {})",
                summary.archive.display(),
                summary.archived.len(),
                archive_size
            ),
        });

        styled(Table::new(rows))
    }

    fn generate_console_report(&self, summary: &RunSummary) -> String {
        let parts_table = self.create_parts_table(summary);
        let summary_table = self.create_summary_table(summary);

        format!(
            "{}\n{}\n\n{}\n{}",
            "📋  PART FILES", parts_table, "✅  COMBINE COMPLETE", summary_table
        )
    }
}

fn styled(mut table: Table) -> String {
    table
        .with(Style::rounded())
        .with(Padding::new(1, 1, 0, 0))
        .with(Modify::new(Columns::new(..)).with(Alignment::left()));
    table.to_string()
}
